use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::frame::Frame;
use crate::shared::region::{NormalizedBox, NormalizedPoint};

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("missing API key: set {0}")]
    MissingApiKey(&'static str),
    #[error("failed to encode image for upload: {0}")]
    Encode(#[source] image::ImageError),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("malformed model response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to read recorded responses from {path}: {source}")]
    Recorded {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Response of a caption request. Missing keys deserialize to `None`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptionResponse {
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub answer: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectResponse {
    #[serde(default)]
    pub objects: Vec<NormalizedBox>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointResponse {
    #[serde(default)]
    pub points: Vec<NormalizedPoint>,
}

/// Domain interface for the hosted vision model.
///
/// Only the structured geometry of `detect`/`point` feeds the compositor;
/// how it is produced (network, local model, recording) is up to the
/// implementation.
pub trait VisionModel: Send + Sync {
    fn caption(&self, image: &Frame) -> Result<CaptionResponse, VisionError>;

    fn query(&self, image: &Frame, question: &str) -> Result<QueryResponse, VisionError>;

    fn detect(&self, image: &Frame, subject: &str) -> Result<DetectResponse, VisionError>;

    fn point(&self, image: &Frame, prompt: &str) -> Result<PointResponse, VisionError>;
}
