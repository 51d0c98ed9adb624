//! Error types for pointpick

use thiserror::Error;

/// Main error type for pointpick operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Transform is singular and cannot be inverted")]
    SingularTransform,

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Index {index} references point slot {slot}, but only {point_count} points exist")]
    IndexOutOfRange {
        index: usize,
        slot: usize,
        point_count: usize,
    },
}

/// Result type alias for pointpick operations
pub type Result<T> = std::result::Result<T, Error>;
