//! Form definitions backing the event routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod events;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("uploaded file is empty")]
    EmptyUpload,

    #[error("failed to read uploaded file: {0}")]
    UploadRead(#[from] std::io::Error),
}
