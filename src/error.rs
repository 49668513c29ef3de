//! Custom error types for release-herald with improved type safety.

use thiserror::Error;

/// Main error type for release-herald operations.
///
/// Every variant is fatal: the announcement is never partially emitted on
/// failure, aside from diagnostics already written to stderr.
#[derive(Error, Debug)]
pub enum HeraldError {
    #[error("failed to read package manifest {path}: {reason}")]
    MissingManifest { path: String, reason: String },

    #[error("no tags matching '{pattern}' found: nothing has been deployed to production yet")]
    NoProductionTags { pattern: String },

    #[error(
        "tag {tag} points at HEAD and no earlier production tag exists to announce against"
    )]
    NoPreviousRelease { tag: String },

    #[error("couldn't find a version subject line at or near tag {tag}")]
    VersionTagNotFound { tag: String },

    #[error("couldn't find latest non-prod version in changelog delta")]
    VersionNotInDelta,

    #[error("git {args} failed: {stderr}")]
    GitCommandFailed { args: String, stderr: String },

    #[error("invalid version format: {0}")]
    InvalidVersion(#[from] semver::Error),
}

impl HeraldError {
    /// Create a missing manifest error with context.
    pub fn missing_manifest(
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MissingManifest {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an error for a failed git invocation.
    pub fn git_failed(
        args: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::GitCommandFailed {
            args: args.into(),
            stderr: stderr.into(),
        }
    }
}
