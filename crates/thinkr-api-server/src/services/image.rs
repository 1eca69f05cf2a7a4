use reqwest::Url;
use tracing::debug;

use crate::utils::error::ApiError;

/// Builder for the external image-generation API. The API is
/// GET-addressable: the composed URL is itself the image source handed
/// back to the client, so no request is made here.
pub struct ImageService {
    base_url: String,
}

impl ImageService {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    pub fn generate_url(&self, prompt: &str) -> Result<String, ApiError> {
        let endpoint = format!("{}/v1/generate", self.base_url.trim_end_matches('/'));

        let url = Url::parse_with_params(&endpoint, &[("prompt", prompt)])
            .map_err(|e| ApiError::Internal(format!("Invalid image endpoint: {}", e)))?;

        debug!("Composed image URL for prompt ({} chars)", prompt.len());
        Ok(url.to_string())
    }
}
