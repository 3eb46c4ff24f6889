//! Errors for the fallible boundary operations (high-score and tuning files).
//!
//! The simulation itself has no error surface; only I/O at the edges returns these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
