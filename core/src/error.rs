use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong in the core.
///
/// Persistence errors carry the offending path; all of them leave the
/// in-memory store untouched.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid due date '{input}': expected YYYY-MM-DD")]
    InvalidDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("no task file at {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("cannot access {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("task file {} is corrupt or unsupported: {reason}", .path.display())]
    Format { path: PathBuf, reason: String },

    #[error("could not determine home directory")]
    NoHomeDir,
}
