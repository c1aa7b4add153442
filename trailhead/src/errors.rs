use std::borrow::Cow;

use thiserror::Error;

/// Top-level error type returned by trailhead repositories, the identity
/// session, and the engagement coordinator.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Input failed local validation; no store call was made.
    #[error("validation failed")]
    Validation(#[from] ValidationError),

    /// The requested guide or comment does not exist (it may have been
    /// deleted concurrently).
    #[error("entity not found")]
    NotFound { entity_id: Option<String> },

    /// The action requires a signed-in identity.
    #[error("not signed in")]
    Unauthenticated,

    /// Ownership check refused the action; raised before any store call.
    #[error("only the author may modify `{resource_id}`")]
    Forbidden { resource_id: String },

    /// The identity provider rejected the supplied credentials.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// A read against the document store failed in transport or backend.
    #[error("store read failed: {0}")]
    StoreRead(#[source] redis::RedisError),

    /// A write against the document store failed in transport or backend.
    #[error("store write failed: {0}")]
    StoreWrite(#[source] redis::RedisError),

    /// A blob upload failed; the dependent flow is aborted.
    #[error("upload failed: {message}")]
    Upload { message: Cow<'static, str> },

    /// Protocol or decode fault that fits no other variant.
    #[error("{message}")]
    Other { message: Cow<'static, str> },
}

impl PlatformError {
    pub fn not_found(entity_id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_id: Some(entity_id.into()),
        }
    }

    pub fn other(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

/// Collection of validation issues gathered while checking a mutation's input.
#[derive(Debug, Error)]
#[error("validation errors: {issues:?}")]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new<I>(issues: I) -> Self
    where
        I: IntoIterator<Item = ValidationIssue>,
    {
        Self {
            issues: issues.into_iter().collect(),
        }
    }

    /// Convenience constructor for a single-field failure.
    pub fn single(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new([ValidationIssue::new(field, code, message)])
    }
}

/// One failed check on a single field.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Alias used by validation helpers throughout the crate.
pub type ValidationResult<T> = Result<T, ValidationError>;
