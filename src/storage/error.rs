//! Storage layer error types
//!
//! Absence of a record is never an error here; lookups return `Option`.
//! These variants cover faults of the backing key-value slot itself.

use thiserror::Error;

/// Errors that can occur while reading or writing a storage slot
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Slot contents could not be serialized or deserialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Backing storage is missing or disabled (e.g. no `localStorage`)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Backing storage refused the write (quota exceeded, read-only)
    #[error("Storage quota exceeded for key '{key}'")]
    Quota { key: String },

    /// Storage key is not usable as a slot name
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::Quota {
            key: "calls".to_string(),
        };
        assert_eq!(err.to_string(), "Storage quota exceeded for key 'calls'");

        let err = StorageError::Unavailable("localStorage disabled".to_string());
        assert_eq!(err.to_string(), "Storage unavailable: localStorage disabled");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let storage_err: StorageError = io_err.into();
        assert!(matches!(storage_err, StorageError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<Vec<u32>>("[1,").unwrap_err();
        let storage_err: StorageError = json_err.into();
        assert!(matches!(storage_err, StorageError::Serialization(_)));
    }
}
