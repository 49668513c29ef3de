//! Error handling and result types for release-herald.
//!
//! All failures in this tool are fatal: they propagate up to `main`, where
//! `color-eyre` prints the diagnostic chain to stderr and the process exits
//! with a non-zero status.

use color_eyre::eyre::Result as EyreResult;

/// Standard result type used throughout release-herald.
///
/// Type alias for `color_eyre::eyre::Result<T>`, providing colorized error
/// output and chain-able error contexts via `.wrap_err()`.
pub type Result<T> = EyreResult<T>;
