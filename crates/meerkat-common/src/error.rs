//! Error types for meerkat

use thiserror::Error;

/// Result type alias for meerkat operations
pub type Result<T> = std::result::Result<T, MeerkatError>;

/// Unified error type for all meerkat operations
///
/// Validation failures are *not* represented here; they accumulate on the
/// document's error collector and never surface as an `Err`. This enum covers
/// the persistence boundary and the serialization codec.
#[derive(Error, Debug, Clone)]
pub enum MeerkatError {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    /// Unique index violation reported by the store. Carries the index name
    /// so the save protocol can translate it into a field validation error.
    #[error("Duplicate key for index: {index}")]
    DuplicateKey { index: String },
}

impl MeerkatError {
    /// Returns true if this error is a unique index violation
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, MeerkatError::DuplicateKey { .. })
    }
}

impl From<serde_json::Error> for MeerkatError {
    fn from(err: serde_json::Error) -> Self {
        MeerkatError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_store() {
        let err = MeerkatError::Store("write failed".to_string());
        assert_eq!(err.to_string(), "Store error: write failed");
    }

    #[test]
    fn test_error_display_serialization() {
        let err = MeerkatError::Serialization("invalid JSON".to_string());
        assert_eq!(err.to_string(), "Serialization error: invalid JSON");
    }

    #[test]
    fn test_error_display_deserialization() {
        let err = MeerkatError::Deserialization("missing field".to_string());
        assert_eq!(err.to_string(), "Deserialization error: missing field");
    }

    #[test]
    fn test_error_display_connection() {
        let err = MeerkatError::Connection("timeout".to_string());
        assert_eq!(err.to_string(), "Connection error: timeout");
    }

    #[test]
    fn test_error_display_duplicate_key() {
        let err = MeerkatError::DuplicateKey {
            index: "name_unique_index".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Duplicate key for index: name_unique_index"
        );
    }

    #[test]
    fn test_is_duplicate_key() {
        let err = MeerkatError::DuplicateKey {
            index: "name_unique_index".to_string(),
        };
        assert!(err.is_duplicate_key());
        assert!(!MeerkatError::Store("oops".to_string()).is_duplicate_key());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: MeerkatError = json_err.into();
        assert!(matches!(err, MeerkatError::Serialization(_)));
    }

    #[test]
    fn test_result_type() {
        let result: Result<i32> = Ok(42);
        assert_eq!(result.unwrap(), 42);
        let result: Result<i32> = Err(MeerkatError::Query("failed".to_string()));
        assert!(result.is_err());
    }
}
