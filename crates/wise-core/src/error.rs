//! Error types for wise-core
//!
//! Decoding failures never surface here: a malformed envelope is skipped,
//! not raised. Rule failures travel as [`Error::Validation`] inside the
//! engine and are surfaced to callers as a failed verdict, never as a
//! process fault.

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// External ledger call failed (network, timeout). Aborts the current
    /// pipeline run or validation call; retrying is the caller's decision.
    #[error("transport error: {0}")]
    Transport(String),

    /// A remote check endpoint failed or answered with something other
    /// than a verdict.
    #[error("remote check error: {0}")]
    Remote(String),

    /// A rule precondition was not met, including "content not found",
    /// "ruleset not found" and structural defects in the rule itself.
    /// Carries the human-readable reason shown in the verdict.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A decoded operation could not be encoded back to its wire form.
    #[error("encoding error: {0}")]
    Encode(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
