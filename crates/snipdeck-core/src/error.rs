//! Error types for snipdeck operations.
//!
//! Errors carry a structured [`ErrorCode`] for programmatic handling and,
//! where it helps the caller, a suggestion for resolution.

use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for snipdeck operations.
pub type SnipResult<T> = Result<T, SnipError>;

/// Main error type for all snipdeck operations.
#[derive(Error, Debug)]
pub enum SnipError {
    /// Input validation failed (invalid argument).
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        details: HashMap<String, String>,
        suggestion: Option<String>,
    },

    /// Snippet not found for the given owner.
    #[error("Snippet not found: {message}")]
    NotFound {
        message: String,
        code: ErrorCode,
        snippet_id: Option<String>,
    },

    /// Embedding generation failed.
    #[error("Embedding error: {message}")]
    Embedding {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Persistence operation failed.
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation (VAL_xxx)
    ValInvalidInput,
    ValInvalidGrade,
    ValNotReviewable,

    // Snippet (SNIP_xxx)
    SnipNotFound,

    // Embedding (EMB_xxx)
    EmbGenerationFailed,
    EmbTimeout,
    EmbDimensionMismatch,

    // Database (DB_xxx)
    DbConnectionFailed,
    DbOperationFailed,
    DbCorruptRow,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValInvalidGrade => "VAL_002",
            ErrorCode::ValNotReviewable => "VAL_003",
            ErrorCode::SnipNotFound => "SNIP_001",
            ErrorCode::EmbGenerationFailed => "EMB_001",
            ErrorCode::EmbTimeout => "EMB_002",
            ErrorCode::EmbDimensionMismatch => "EMB_003",
            ErrorCode::DbConnectionFailed => "DB_001",
            ErrorCode::DbOperationFailed => "DB_002",
            ErrorCode::DbCorruptRow => "DB_003",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl SnipError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            details: HashMap::new(),
            suggestion: None,
        }
    }

    /// Create a validation error for a review grade outside 0-5.
    pub fn invalid_grade(raw: i64) -> Self {
        let mut details = HashMap::new();
        details.insert("grade".to_string(), raw.to_string());
        Self::Validation {
            message: format!("Review grade {} is outside 0..=5", raw),
            code: ErrorCode::ValInvalidGrade,
            details,
            suggestion: Some("Grades run from 0 (blackout) to 5 (perfect recall)".to_string()),
        }
    }

    /// Create a validation error for reviewing a snippet that has no review state.
    pub fn not_reviewable(snippet_id: impl Into<String>) -> Self {
        let id = snippet_id.into();
        let mut details = HashMap::new();
        details.insert("snippet_id".to_string(), id.clone());
        Self::Validation {
            message: format!("Snippet '{}' is not enabled for review", id),
            code: ErrorCode::ValNotReviewable,
            details,
            suggestion: Some("Enable review for the snippet before submitting grades".to_string()),
        }
    }

    /// Create a not found error.
    pub fn not_found(snippet_id: impl Into<String>) -> Self {
        let id = snippet_id.into();
        Self::NotFound {
            message: format!("Snippet with id '{}' not found", id),
            code: ErrorCode::SnipNotFound,
            snippet_id: Some(id),
        }
    }

    /// Create an embedding error.
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding {
            message: message.into(),
            code: ErrorCode::EmbGenerationFailed,
            source: None,
        }
    }

    /// Create an embedding timeout error.
    pub fn timeout(millis: u64) -> Self {
        Self::Embedding {
            message: format!("Embedding request timed out after {}ms", millis),
            code: ErrorCode::EmbTimeout,
            source: None,
        }
    }

    /// Create an error for a provider returning vectors of the wrong length.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::Embedding {
            message: format!("Expected {}-dimensional embedding, provider returned {}", expected, actual),
            code: ErrorCode::EmbDimensionMismatch,
            source: None,
        }
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            code: ErrorCode::DbOperationFailed,
            source: None,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::Embedding { code, .. } => *code,
            Self::Storage { code, .. } => *code,
            _ => ErrorCode::Internal,
        }
    }

    /// Whether search can degrade around this error instead of failing.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Embedding { .. })
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::NotFound { .. } => Some("Please check the snippet ID and ensure it belongs to the caller"),
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            Self::Storage { .. } => Some("Please check the database path and permissions"),
            Self::Embedding { .. } => Some("Please check your embedding provider configuration"),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for SnipError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage {
            message: err.to_string(),
            code: ErrorCode::DbOperationFailed,
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = SnipError::validation("Invalid input");
        assert_eq!(err.code(), ErrorCode::ValInvalidInput);
        assert!(err.to_string().contains("Invalid input"));
    }

    #[test]
    fn test_invalid_grade_carries_details() {
        let err = SnipError::invalid_grade(7);
        assert_eq!(err.code(), ErrorCode::ValInvalidGrade);
        assert!(err.suggestion().is_some());
        match err {
            SnipError::Validation { details, .. } => {
                assert_eq!(details.get("grade").map(String::as_str), Some("7"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_not_found_error() {
        let err = SnipError::not_found("snip-1");
        assert_eq!(err.code(), ErrorCode::SnipNotFound);
        assert!(err.suggestion().is_some());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_embedding_errors_are_recoverable() {
        assert!(SnipError::embedding("boom").is_recoverable());
        assert!(SnipError::timeout(250).is_recoverable());
        assert_eq!(SnipError::timeout(250).code(), ErrorCode::EmbTimeout);
        assert!(SnipError::dimension_mismatch(1536, 768).is_recoverable());
        assert_eq!(SnipError::dimension_mismatch(1536, 768).code().as_str(), "EMB_003");
        assert!(!SnipError::storage("disk full").is_recoverable());
    }

    #[test]
    fn test_rusqlite_error_maps_to_storage() {
        let err: SnipError = rusqlite::Error::QueryReturnedNoRows.into();
        assert_eq!(err.code(), ErrorCode::DbOperationFailed);
        assert_eq!(ErrorCode::DbOperationFailed.as_str(), "DB_002");
    }
}
