//! Catalog error types.

use std::fmt;

/// Errors a catalog backend can report.
///
/// During a reconciliation pass these are per-child failures: the pass
/// records them and moves on to the next child.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    /// The caller is not allowed to perform the operation.
    #[error("User {user} is not authorized: {message}")]
    Authorization {
        /// The user id the call was made under.
        user: String,
        /// Description from the catalog.
        message: String,
    },

    /// The request was rejected as malformed.
    #[error("Invalid request: {message}")]
    Validation {
        /// Description of why the request is invalid.
        message: String,
    },

    /// The addressed element does not exist.
    #[error("Element not found: {id}")]
    NotFound {
        /// Identifier that was looked up.
        id: String,
    },

    /// The catalog failed to process the request.
    #[error("Catalog server error: {message}")]
    Server {
        /// Description of the server-side failure.
        message: String,
    },
}

impl CatalogError {
    #[must_use]
    pub fn authorization(user: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Authorization {
            user: user.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    #[must_use]
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns the error category for logging.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Authorization { .. } => ErrorCategory::Authorization,
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Server { .. } => ErrorCategory::Server,
        }
    }
}

/// Categories of catalog errors for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Authorization,
    Validation,
    NotFound,
    Server,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authorization => write!(f, "authorization"),
            Self::Validation => write!(f, "validation"),
            Self::NotFound => write!(f, "not_found"),
            Self::Server => write!(f, "server"),
        }
    }
}
