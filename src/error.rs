//! Errors at the system boundary
//!
//! Compilation and interpretation themselves never fail; everything here comes
//! from reading inputs or writing outputs.

use std::path::PathBuf;

use thiserror::Error;

use crate::validator::ValidationError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot read geometry source {path}: {reason}")]
    UnreadableSource { path: PathBuf, reason: String },

    #[error("cannot write {path}: {source}")]
    UnwritableOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    #[error("invalid job parameters: {}", format_all(.0))]
    Validation(Vec<ValidationError>),
}

fn format_all(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, Error>;
