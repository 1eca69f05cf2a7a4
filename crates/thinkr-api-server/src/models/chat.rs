use serde::{Deserialize, Serialize};

// ===== REQUEST MODELS =====

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateImageRequest {
    #[serde(default)]
    pub prompt: String,
}

// ===== RESPONSE MODELS =====

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub response: String,
}

/// Signal for the frontend to call the dedicated image endpoint.
#[derive(Debug, Serialize)]
pub struct ImageIntentResponse {
    #[serde(rename = "type")]
    pub kind: String,
    pub prompt: String,
}

impl ImageIntentResponse {
    pub fn new(prompt: String) -> Self {
        Self {
            kind: "image".to_string(),
            prompt,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateImageResponse {
    pub image_url: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}
