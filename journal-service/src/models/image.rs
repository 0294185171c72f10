use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /analyze-image`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeImageRequest {
    /// JPEG bytes, base64 encoded.
    #[validate(length(min = 1))]
    pub base64: String,
    /// Characteristic the main object should have (e.g. "soft").
    #[validate(length(min = 1, max = 200))]
    pub prompt_chars: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeImageResponse {
    pub result: String,
}
