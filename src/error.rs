use thiserror::Error;

/// Errors raised by a document store backend.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Identifier is not a 24-character hex object id
    #[error("Invalid identifier: {0:?} is not a 24-character hex string")]
    InvalidId(String),

    /// Error reported by the database or its driver
    #[error("Database error: {0}")]
    Backend(String),

    /// Document could not be converted to or from the store's native format
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors from job board operations.
#[derive(Debug, Clone, Error)]
pub enum BoardError {
    /// Underlying store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised while issuing or checking session tokens.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// No `token` cookie on the request
    #[error("Unauthorized access")]
    MissingToken,

    /// Token failed signature or expiry validation
    #[error("Unauthorized access")]
    InvalidToken(String),

    /// Token identity does not match the requested resource
    #[error("forbidden access")]
    Forbidden,

    /// Token could not be signed
    #[error("Failed to sign token: {0}")]
    Signing(String),
}
