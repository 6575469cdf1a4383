//! Error types for fbarchive.

use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Group not found: {0}")]
    GroupNotFound(String),

    #[error("Post not found: {0}")]
    PostNotFound(String),

    #[error("Comment not found: {0}")]
    CommentNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the stable error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::GroupNotFound(_) => "GROUP_NOT_FOUND",
            Self::PostNotFound(_) => "POST_NOT_FOUND",
            Self::CommentNotFound(_) => "COMMENT_NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error is caused by the storage layer or the
    /// process itself rather than by the caller's input.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Config(_) | Self::Internal(_)
        )
    }

    /// Log this error at a level matching its class and return it.
    #[must_use]
    pub fn logged(self) -> Self {
        if self.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = self.error_code(), "Client error occurred");
        }
        self
    }
}

// === From implementations ===

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::PostNotFound("p1".to_string()).error_code(),
            "POST_NOT_FOUND"
        );
        assert_eq!(
            AppError::Database("boom".to_string()).error_code(),
            "DATABASE_ERROR"
        );
    }

    #[test]
    fn test_server_error_classification() {
        assert!(AppError::Database("down".to_string()).is_server_error());
        assert!(AppError::Internal("bug".to_string()).is_server_error());
        assert!(!AppError::GroupNotFound("g1".to_string()).is_server_error());
        assert!(!AppError::Validation("bad".to_string()).is_server_error());
    }

    #[test]
    fn test_display() {
        let err = AppError::CommentNotFound("c1".to_string());
        assert_eq!(err.to_string(), "Comment not found: c1");
    }

    #[test]
    fn test_logged_passes_error_through() {
        let err = AppError::Database("down".to_string()).logged();
        assert!(matches!(err, AppError::Database(ref msg) if msg == "down"));

        let err = Err::<(), _>(AppError::NotFound("r1".to_string()))
            .map_err(AppError::logged)
            .unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }
}
