mod interface;
mod primitive;

pub use interface::*;
pub(crate) use interface::bit_mask;
