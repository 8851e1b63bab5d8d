use bytes::Bytes;
use uuid::Uuid;

/// A photo picked by the owner, not yet stored
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub content_type: String,
    pub filename: Option<String>,
    pub body: Bytes,
}

impl ImageUpload {
    pub fn new<S: Into<String>>(content_type: S, body: impl Into<Bytes>) -> Self {
        Self {
            content_type: content_type.into(),
            filename: None,
            body: body.into(),
        }
    }

    pub fn with_filename<S: Into<String>>(mut self, filename: S) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn size_bytes(&self) -> u64 {
        self.body.len() as u64
    }
}

/// Fresh, unique blob name for a photo
pub fn new_image_name() -> String {
    Uuid::new_v4().to_string()
}
