use carhub_core::CarHubConfigSnapshot;

/// Rules applied to listing photos before they reach the store
#[derive(Debug, Clone)]
pub struct ImageRules {
    /// Content types accepted for upload
    pub allowed_content_types: Vec<String>,

    /// Absolute max size allowed for a single image
    pub max_image_bytes: u64,
}

impl Default for ImageRules {
    fn default() -> Self {
        Self {
            allowed_content_types: vec!["image/jpeg".to_string(), "image/png".to_string()],
            max_image_bytes: 5 * 1024 * 1024, // 5MB
        }
    }
}

impl ImageRules {
    /// Create new rules with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `images.max_bytes` from config, falling back to defaults
    pub fn from_config(config: &CarHubConfigSnapshot) -> Self {
        let mut rules = Self::default();
        if let Some(max) = config.get_u64("images.max_bytes") {
            rules.max_image_bytes = max;
        }
        rules
    }

    /// Set max image size
    pub fn with_max_image_bytes(mut self, bytes: u64) -> Self {
        self.max_image_bytes = bytes;
        self
    }

    pub fn accepts(&self, content_type: &str) -> bool {
        let content_type = content_type.trim();
        self.allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(content_type))
    }
}
