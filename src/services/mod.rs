//! Services orchestrating the event pages on top of the repository traits.

use thiserror::Error;

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;

pub mod events;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found")]
    NotFound,

    /// User-correctable input problem; the message is shown as is.
    #[error("{0}")]
    Form(String),

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    #[error("content API failure: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Unauthorized => ServiceError::Unauthorized,
            RepositoryError::InvalidRequest(message) => ServiceError::Internal(message),
            other @ (RepositoryError::Upstream { .. }
            | RepositoryError::Network(_)
            | RepositoryError::Decode(_)) => ServiceError::Upstream(other.to_string()),
        }
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(err.to_string())
    }
}
