use serde::Serialize;

/// Image file received from the browser, ready to forward to the content API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Refreshed preview returned after an image upload completes.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ImagePreview {
    pub image_preview: Option<String>,
}
