//! Google Generative Language API client.
//!
//! Two endpoints are used:
//! - `models/{image_model}:predict` (Imagen) for text-to-image
//! - `models/{text_model}:generateContent` (Gemini) for describing a photo

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use tracing::{debug, info, instrument, warn};

use super::backend::GenerativeBackend;
use super::error::{GenerationError, GenerationResult};
use super::types::{GeneratedImage, ImageRequest};
use crate::core::config::GenerationConfig;

const API_KEY_HEADER: &str = "x-goog-api-key";
const DEFAULT_IMAGE_MIME: &str = "image/png";

/// reqwest-backed [`GenerativeBackend`].
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    text_model: String,
    image_model: String,
}

impl GeminiClient {
    /// Create a client from the generation settings.
    ///
    /// A missing API key is not an error here; every request will fail with
    /// [`GenerationError::MissingApiKey`] instead.
    pub fn new(config: &GenerationConfig, api_key: Option<String>) -> GenerationResult<Self> {
        if api_key.is_none() {
            warn!("GOOGLE_API_KEY not found in environment variables. Image generation will fail.");
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
        })
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    async fn post_json(&self, url: &str, body: &Value) -> GenerationResult<Value> {
        let api_key = self.api_key.as_deref().ok_or(GenerationError::MissingApiKey)?;

        debug!("POST {}", url);
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GenerationError::api(status.as_u16(), api_error_message(&text)));
        }

        Ok(response.json().await?)
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .finish()
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    #[instrument(skip_all, fields(model = %self.image_model, aspect = %request.aspect_ratio))]
    async fn generate_image(&self, request: &ImageRequest) -> GenerationResult<GeneratedImage> {
        if !request.reference_images.is_empty() {
            debug!(
                "Text-to-image endpoint does not take reference images; ignoring {:?}",
                request.reference_images
            );
        }

        let url = self.endpoint(&self.image_model, "predict");
        let response = self.post_json(&url, &imagen_request_body(request)).await?;
        let image = parse_imagen_response(&response)?;
        info!("Received {} bytes of {}", image.bytes.len(), image.mime_type);
        Ok(image)
    }

    #[instrument(skip_all, fields(model = %self.text_model))]
    async fn describe_image(
        &self,
        prompt: &str,
        image: &[u8],
        mime_type: &str,
    ) -> GenerationResult<String> {
        let url = self.endpoint(&self.text_model, "generateContent");
        let response = self
            .post_json(&url, &describe_request_body(prompt, image, mime_type))
            .await?;
        parse_text_response(&response)
    }
}

// ============================================================================
// Wire format helpers
// ============================================================================

fn imagen_request_body(request: &ImageRequest) -> Value {
    json!({
        "instances": [{ "prompt": request.prompt }],
        "parameters": {
            "sampleCount": 1,
            "aspectRatio": request.aspect_ratio.as_str(),
        }
    })
}

fn parse_imagen_response(response: &Value) -> GenerationResult<GeneratedImage> {
    let prediction = response
        .get("predictions")
        .and_then(Value::as_array)
        .and_then(|p| p.first())
        .ok_or_else(|| GenerationError::empty("No image data found in response"))?;

    if let Some(reason) = prediction.get("raiFilteredReason").and_then(Value::as_str) {
        return Err(GenerationError::empty(format!("image was filtered: {}", reason)));
    }

    let encoded = prediction
        .get("bytesBase64Encoded")
        .and_then(Value::as_str)
        .ok_or_else(|| GenerationError::empty("No image data found in response"))?;

    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| GenerationError::decode(e.to_string()))?;

    let mime_type = prediction
        .get("mimeType")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_IMAGE_MIME)
        .to_string();

    Ok(GeneratedImage { bytes, mime_type })
}

fn describe_request_body(prompt: &str, image: &[u8], mime_type: &str) -> Value {
    json!({
        "contents": [{
            "parts": [
                { "text": prompt },
                { "inlineData": { "mimeType": mime_type, "data": STANDARD.encode(image) } }
            ]
        }]
    })
}

fn parse_text_response(response: &Value) -> GenerationResult<String> {
    let parts = response
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .ok_or_else(|| GenerationError::empty("No candidates in response"))?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();

    let text = text.trim();
    if text.is_empty() {
        return Err(GenerationError::empty("Response contained no text"));
    }
    Ok(text.to_string())
}

/// Pull `error.message` out of a Google API error body, or fall back to the raw text.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.pointer("/error/message").and_then(Value::as_str).map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}
