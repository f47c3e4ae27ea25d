//! Shared, crate-local error type for geometry/id plumbing.
//!
//! The provider-facing error taxonomy (`ConfigError`, `MapInconsistency`,
//! `OwnershipViolation`, …) lives in `mtsim-provider::error`, since it names
//! concepts (actors, routes) this crate doesn't know about. `CoreError`
//! covers only failures that can occur inside `mtsim-core` itself.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
