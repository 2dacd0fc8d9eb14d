//! Error types for drecalc-store

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Snapshot not found: {path}")]
    NotFound { path: String },

    #[error("Invalid snapshot format: {0}")]
    InvalidFormat(#[from] serde_json::Error),

    #[error("IO error")]
    IoError(#[from] io::Error),
}
