//! Error types for path and structure operations
//!
//! Simple, flat error hierarchy. A lookup miss is not an error.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReflectError>;

#[derive(Debug, Error)]
pub enum ReflectError {
    #[error("Malformed path: empty path")]
    EmptyPath,

    #[error("Malformed path: empty segment at position {position} in '{path}'")]
    EmptySegment { path: String, position: usize },

    #[error("Cannot descend into {kind} at '{at}'")]
    NotAContainer { at: String, kind: &'static str },

    #[error("Segment '{segment}' is not an index into the array at '{at}'")]
    InvalidIndex { at: String, segment: String },

    #[error("Index {index} out of bounds for array of length {len} at '{at}'")]
    IndexOutOfBounds { at: String, index: usize, len: usize },

    #[error("Type error: {0}")]
    Type(#[from] serde_json::Error),
}
