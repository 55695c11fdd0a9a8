use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the content API.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    /// The API refused the token (401 or 403).
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Content API responded with {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    /// Classifies a non-success status code.
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RepositoryError::Unauthorized,
            StatusCode::NOT_FOUND => RepositoryError::NotFound,
            _ => RepositoryError::Upstream {
                status: status.as_u16(),
                message: message.into(),
            },
        }
    }
}

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RepositoryError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            RepositoryError::from_status(status, err.to_string())
        } else {
            RepositoryError::Network(err.to_string())
        }
    }
}

impl From<crate::filter::FilterError> for RepositoryError {
    fn from(err: crate::filter::FilterError) -> Self {
        RepositoryError::InvalidRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_statuses_map_to_unauthorized() {
        assert!(matches!(
            RepositoryError::from_status(StatusCode::UNAUTHORIZED, ""),
            RepositoryError::Unauthorized
        ));
        assert!(matches!(
            RepositoryError::from_status(StatusCode::FORBIDDEN, ""),
            RepositoryError::Unauthorized
        ));
    }

    #[test]
    fn other_statuses_keep_code_and_body() {
        match RepositoryError::from_status(StatusCode::BAD_REQUEST, "date is invalid") {
            RepositoryError::Upstream { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "date is invalid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            RepositoryError::from_status(StatusCode::NOT_FOUND, ""),
            RepositoryError::NotFound
        ));
    }
}
