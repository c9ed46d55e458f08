//! Coordinator-free, roughly time-ordered numeric identifiers.
//!
//! An identifier packs a logical tick (seconds since an epoch), a server id,
//! a process id and a per-tick sequence into one `u32`, `u64` or `i64`. The
//! split between the fields is a [`BitLayout`]; a [`LockOneIdGenerator`]
//! owns one layout and the mutable tick/sequence state.
//!
//! ```
//! use oneid::{BitLayout, LockOneIdGenerator, MonotonicClock};
//!
//! let generator = LockOneIdGenerator::new(BitLayout::<u64>::new(10, 5, 24), MonotonicClock::default());
//!
//! let id = generator.generate(42, 7);
//! let parts = generator.layout().decompose(id);
//! assert_eq!(parts.server_id, 42);
//! assert_eq!(parts.process_id, 7);
//! ```
//!
//! Uniqueness across processes and servers depends entirely on callers
//! handing out distinct server and process ids.

mod env;
mod error;
mod generator;
mod id;
mod layout;
mod time;

pub use crate::env::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::layout::*;
pub use crate::time::*;

/// The process-wide generator of width `ID`.
///
/// Built on first access with [`BitLayout::default`] and a clock anchored at
/// that moment; never reconfigured. Owning a generator is preferred where
/// threading one through is practical.
///
/// ```
/// let a: u32 = oneid::default_generator::<u32>().generate(1, 0);
/// let b: u32 = oneid::default_generator::<u32>().generate(1, 0);
/// assert_ne!(a, b);
/// ```
pub fn default_generator<ID: OneId>() -> &'static LockOneIdGenerator<ID, MonotonicClock> {
    ID::default_generator()
}
