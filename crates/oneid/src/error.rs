use core::num::ParseIntError;

use thiserror::Error;

/// A result type defaulting to this crate's [`enum@Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors raised while reading identifiers from the environment.
///
/// Generation itself is infallible: out-of-range layouts are corrected and
/// non-positive ids are substituted. Only external input can be rejected.
///
/// Rejected values are carried as `i128` so a single error type covers every
/// [`OneId`] width.
///
/// [`OneId`]: crate::OneId
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// The variable is unset or not valid unicode.
    ///
    /// Like [`Error::ParseId`] this means no parseable value was found; use
    /// [`Error::is_parse`] to match both.
    #[error("environment variable {key} is not set")]
    MissingEnv { key: &'static str },

    /// The variable is empty, not a base-10 integer, or outside the width's
    /// range. See [`Error::is_parse`].
    #[error("parsing {key}={value:?} as {width}: {source}")]
    ParseId {
        key: &'static str,
        value: String,
        width: &'static str,
        source: ParseIntError,
    },

    /// Server ids start at one.
    #[error("server id cannot be less than one, current value: {value}")]
    InvalidServerId { value: i128 },

    /// Process ids cannot be negative; zero selects the OS process id.
    #[error("process id cannot be negative, current value: {value}")]
    InvalidProcessId { value: i128 },
}

impl Error {
    /// Returns `true` when no parseable value was found, either because the
    /// variable is unset or because its contents are not an integer.
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::MissingEnv { .. } | Self::ParseId { .. })
    }
}
