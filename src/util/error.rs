//! Error types for the rhino3dm library.

use thiserror::Error;

/// Main error type for archive, codec and wrapper operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Archive header declares a 3dm version in the rejected band (6..=49)
    #[error("Unsupported 3dm archive version: {0}")]
    UnsupportedVersion(i32),

    /// No on-disk dialect exists for the requested 3dm version
    #[error("Cannot resolve an opennurbs version to write for 3dm version {0}")]
    UnresolvedVersion(i32),

    /// Payload is truncated
    #[error("Unexpected end of archive at position {0}")]
    UnexpectedEof(u64),

    /// Invalid data structure in the payload
    #[error("Invalid archive structure: {0}")]
    InvalidStructure(String),

    /// A chunk with a different typecode was found
    #[error("Unexpected chunk: expected {expected:#010x}, got {actual:#010x}")]
    UnexpectedChunk { expected: u32, actual: u32 },

    /// Chunk body does not match its stored CRC-32
    #[error("CRC mismatch in chunk {typecode:#010x}: stored {stored:#010x}, computed {computed:#010x}")]
    CrcMismatch { typecode: u32, stored: u32, computed: u32 },

    /// Class data was written by an incompatible major version
    #[error("Unsupported {class} data version {major}.{minor}")]
    UnsupportedClassVersion { class: &'static str, major: u8, minor: u8 },

    /// Type mismatch between an object and the view requested of it
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// Write operation failed
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// A borrowed wrapper outlived its component table entry
    #[error("Component is no longer part of its table")]
    Detached,

    /// Component index not present in a table
    #[error("Component not found: {0}")]
    ComponentNotFound(usize),

    /// Envelope `data` field is not valid base64
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Envelope JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 conversion error
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an invalid structure error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidStructure(msg.into())
    }

    /// Create a write failure error.
    pub fn write_failed(msg: impl Into<String>) -> Self {
        Self::WriteFailed(msg.into())
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Result type alias for rhino3dm operations.
pub type Result<T> = std::result::Result<T, Error>;
