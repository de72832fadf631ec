//! Error type for this crate's fallible operations.
//!
//! Each variant carries the stable numeric code spec.md assigns it in its
//! external interface table, retrievable via [`Error::code`] for callers
//! that need the original ABI-style integers.

/// Errors returned by [`crate::init`], [`crate::encode`], and [`crate::decode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// One of `k`, `m`, `B` is non-positive.
    #[error("invalid parameters: original_count, recovery_count, and block_bytes must all be positive")]
    InvalidParams,
    /// `k + m > 256`.
    #[error("too large: original_count + recovery_count must not exceed 256")]
    TooLarge,
    /// A required buffer was missing.
    ///
    /// Rust's borrow checker makes a null/missing buffer unrepresentable
    /// for in-process callers of this crate's safe API; this variant is
    /// kept for parity with spec.md's external interface table and is
    /// effectively unreachable from safe call sites.
    #[error("a required buffer argument was missing")]
    NullArg,
    /// Two supplied blocks carried the same original index.
    #[error("duplicate original block index")]
    DuplicateIndex,
    /// `init` was called with a version tag that does not match this
    /// crate's compiled-in version.
    #[error("version mismatch: caller and crate were built against different versions")]
    VersionMismatch,
}

impl Error {
    /// The stable numeric code for this error, per spec.md §7.
    pub fn code(self) -> i32 {
        match self {
            Error::InvalidParams => -1,
            Error::TooLarge => -2,
            Error::NullArg => -3,
            Error::DuplicateIndex => -5,
            Error::VersionMismatch => -10,
        }
    }
}
