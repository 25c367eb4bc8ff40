use crate::{
    domain::EnumMappingError, errors::repository::RepositoryError, utils::validation_messages,
};
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepositoryError),

    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payment gateway error: {0}")]
    Gateway(String),

    #[error("Upstream unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Custom error: {0}")]
    Custom(String),
}

impl ServiceError {
    /// True when the remote side definitely refused the call. Timeouts,
    /// transport failures and internal errors leave the outcome unknown.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ServiceError::Validation(_)
                | ServiceError::NotFound(_)
                | ServiceError::InvalidTransition(_)
                | ServiceError::Gateway(_)
        )
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::Validation(validation_messages(&errors))
    }
}

impl From<EnumMappingError> for ServiceError {
    fn from(err: EnumMappingError) -> Self {
        match err {
            EnumMappingError::UnknownWire { .. } => ServiceError::Validation(vec![err.to_string()]),
            _ => ServiceError::Internal(err.to_string()),
        }
    }
}
