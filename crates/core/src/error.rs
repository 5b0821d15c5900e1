use crate::types::DbId;

/// Message returned to callers when an operation fails for a reason they
/// cannot act on. The detail is logged, never exposed.
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred while processing the request";

/// Domain-level failure of a cart or user operation.
///
/// Every variant renders to at least one human-readable message, see
/// [`CoreError::messages`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A required identifier was blank or malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The payload broke one or more field rules. Carries every violation.
    #[error("Validation failed: {}", .0.join(", "))]
    ValidationFailed(Vec<String>),

    #[error("User not found")]
    UserNotFound,

    #[error("Cart item not found")]
    CartItemNotFound { id: DbId },

    /// The store accepted the call but returned no row.
    #[error("{0}")]
    PersistenceFailed(String),

    /// The caller cancelled the operation or the server is shutting down.
    #[error("The operation was cancelled")]
    Cancelled,

    #[error("{0}")]
    Unexpected(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::Unexpected`] with the generic message.
    pub fn unexpected() -> Self {
        Self::Unexpected(UNEXPECTED_MESSAGE.to_string())
    }

    /// Human-readable messages for the caller. Never empty.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::ValidationFailed(violations) if !violations.is_empty() => violations.clone(),
            Self::ValidationFailed(_) => vec!["Validation failed".to_string()],
            Self::CartItemNotFound { .. } => vec!["Cart item not found".to_string()],
            other => vec![other.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failure_exposes_every_violation() {
        let err = CoreError::ValidationFailed(vec!["a".into(), "b".into()]);
        assert_eq!(err.messages(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn empty_validation_failure_still_has_a_message() {
        let err = CoreError::ValidationFailed(Vec::new());
        assert_eq!(err.messages().len(), 1);
    }

    #[test]
    fn not_found_messages_do_not_leak_ids() {
        let err = CoreError::CartItemNotFound { id: DbId::new_v4() };
        assert_eq!(err.messages(), vec!["Cart item not found".to_string()]);
        assert_eq!(CoreError::UserNotFound.messages(), vec!["User not found".to_string()]);
    }

    #[test]
    fn unexpected_uses_generic_message() {
        assert_eq!(
            CoreError::unexpected().messages(),
            vec![UNEXPECTED_MESSAGE.to_string()]
        );
    }
}
