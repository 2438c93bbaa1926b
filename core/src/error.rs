//! Typed errors for the area-file parsing layer (§4.A/§7).

use std::path::PathBuf;
use thiserror::Error;

/// A malformed area-file record. Carries enough context for the bulk
/// loader to log and skip the offending record (§7).
#[derive(Debug, Error)]
#[error("{file}:{line}: {reason}")]
pub struct ParseError {
    pub file: PathBuf,
    pub line: usize,
    pub reason: String,
}

impl ParseError {
    pub fn new(file: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        ParseError {
            file: file.into(),
            line,
            reason: reason.into(),
        }
    }
}
