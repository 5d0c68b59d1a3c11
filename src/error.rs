//! Error types for the few fallible boundaries (storage, image loading).
//!
//! Expected gameplay conditions (out-of-order steps, cardinality limits) are
//! not errors; they surface as outcome enums instead.

use thiserror::Error;

/// Errors raised by a key/value storage backend
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage backend unavailable")]
    Unavailable,

    #[error("Failed to write key '{0}'")]
    WriteFailed(String),

    #[error("Failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised while resolving an image reference to a bitmap
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("Failed to load image '{0}'")]
    LoadFailed(String),

    #[error("Image has zero size")]
    Empty,

    #[error("Pixel buffer is {actual} bytes, expected {expected}")]
    BadBuffer { expected: usize, actual: usize },
}

/// Errors raised when registering a user-added puzzle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("At most {0} custom puzzles can be added")]
    Full(usize),

    #[error("Puzzle id '{0}' is already in use")]
    DuplicateId(String),

    #[error("Puzzle id must not be blank")]
    InvalidId,
}

pub type Result<T, E = StorageError> = std::result::Result<T, E>;
