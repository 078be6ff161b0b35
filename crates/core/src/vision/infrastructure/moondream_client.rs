use std::io::Cursor;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::shared::constants::{MOONDREAM_API_KEY_ENV, MOONDREAM_ENDPOINT, MOONDREAM_ENDPOINT_ENV};
use crate::shared::frame::Frame;
use crate::vision::domain::vision_model::{
    CaptionResponse, DetectResponse, PointResponse, QueryResponse, VisionError, VisionModel,
};

const AUTH_HEADER: &str = "X-Moondream-Auth";
const JPEG_QUALITY: u8 = 90;

/// Blocking client for the hosted Moondream vision API.
///
/// Images are uploaded inline as base64 JPEG data URLs.
pub struct MoondreamClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
}

impl MoondreamClient {
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, VisionError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(VisionError::MissingApiKey(MOONDREAM_API_KEY_ENV));
        }
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VisionError::Request {
                url: endpoint.clone(),
                source: e,
            })?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    /// Reads the API key from `MOONDREAM_API_KEY` and an optional endpoint
    /// override from `MOONDREAM_ENDPOINT`.
    pub fn from_env(timeout: Duration) -> Result<Self, VisionError> {
        let api_key = std::env::var(MOONDREAM_API_KEY_ENV)
            .map_err(|_| VisionError::MissingApiKey(MOONDREAM_API_KEY_ENV))?;
        let endpoint =
            std::env::var(MOONDREAM_ENDPOINT_ENV).unwrap_or_else(|_| MOONDREAM_ENDPOINT.to_string());
        Self::new(api_key, endpoint, timeout)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn task_url(&self, task: &str) -> String {
        format!("{}/{task}", self.endpoint)
    }

    fn post<T: DeserializeOwned>(&self, task: &str, body: serde_json::Value) -> Result<T, VisionError> {
        let url = self.task_url(task);
        log::debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .header(AUTH_HEADER, &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| VisionError::Request {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        let text = response.text().map_err(|e| VisionError::Request {
            url: url.clone(),
            source: e,
        })?;
        if !status.is_success() {
            return Err(VisionError::Status {
                url,
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(VisionError::Decode)
    }
}

impl VisionModel for MoondreamClient {
    fn caption(&self, image: &Frame) -> Result<CaptionResponse, VisionError> {
        let body = json!({
            "image_url": encode_data_url(image)?,
            "length": "normal",
            "stream": false,
        });
        self.post("caption", body)
    }

    fn query(&self, image: &Frame, question: &str) -> Result<QueryResponse, VisionError> {
        let body = json!({
            "image_url": encode_data_url(image)?,
            "question": question,
            "stream": false,
        });
        self.post("query", body)
    }

    fn detect(&self, image: &Frame, subject: &str) -> Result<DetectResponse, VisionError> {
        let body = json!({
            "image_url": encode_data_url(image)?,
            "object": subject,
        });
        self.post("detect", body)
    }

    fn point(&self, image: &Frame, prompt: &str) -> Result<PointResponse, VisionError> {
        let body = json!({
            "image_url": encode_data_url(image)?,
            "object": prompt,
        });
        self.post("point", body)
    }
}

/// JPEG-encodes the frame as a `data:` URL.
pub fn encode_data_url(image: &Frame) -> Result<String, VisionError> {
    let mut buf = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY)
        .encode(
            image.data(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(VisionError::Encode)?;
    Ok(format!(
        "data:image/jpeg;base64,{}",
        STANDARD.encode(buf.into_inner())
    ))
}
