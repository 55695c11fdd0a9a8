use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;
use validator::Validate;

use crate::domain::event::EventDraft;
use crate::domain::image::ImageUpload;
use crate::forms::FormError;

#[derive(Clone, Debug, Deserialize, Validate)]
/// Form data posted by the edit event page.
pub struct EditEventForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub performers: String,
    #[validate(length(min = 1))]
    pub venue: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1))]
    pub date: String,
    #[validate(length(min = 1))]
    pub time: String,
    #[validate(length(min = 1))]
    pub description: String,
}

impl From<&EditEventForm> for EventDraft {
    fn from(form: &EditEventForm) -> Self {
        Self {
            name: form.name.clone(),
            performers: form.performers.clone(),
            venue: form.venue.clone(),
            address: form.address.clone(),
            date: form.date.clone(),
            time: form.time.clone(),
            description: form.description.clone(),
        }
    }
}

#[cfg(test)]
impl From<&EventDraft> for EditEventForm {
    fn from(draft: &EventDraft) -> Self {
        Self {
            name: draft.name.clone(),
            performers: draft.performers.clone(),
            venue: draft.venue.clone(),
            address: draft.address.clone(),
            date: draft.date.clone(),
            time: draft.time.clone(),
            description: draft.description.clone(),
        }
    }
}

#[derive(MultipartForm)]
/// Image picked in the "Set Image" modal.
pub struct UploadImageForm {
    #[multipart(limit = "10MB")]
    pub files: TempFile,
}

impl UploadImageForm {
    /// Reads the spooled temporary file into memory.
    pub fn into_upload(self) -> Result<ImageUpload, FormError> {
        if self.files.size == 0 {
            return Err(FormError::EmptyUpload);
        }

        let bytes = std::fs::read(self.files.file.path())?;
        let file_name = self
            .files
            .file_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "image".to_string());

        Ok(ImageUpload {
            file_name,
            content_type: self.files.content_type.map(|mime| mime.to_string()),
            bytes,
        })
    }
}
