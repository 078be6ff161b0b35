use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::shared::frame::Frame;
use crate::shared::region::{NormalizedBox, NormalizedPoint};
use crate::vision::domain::vision_model::{
    CaptionResponse, DetectResponse, PointResponse, QueryResponse, VisionError, VisionModel,
};

/// Canned model output, as stored on disk.
///
/// Every key is optional so a recording can cover just the tasks it needs:
///
/// ```json
/// { "caption": "a cat", "objects": [{"x_min": 0.1, "y_min": 0.1, "x_max": 0.4, "y_max": 0.5}] }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedResponses {
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub objects: Vec<NormalizedBox>,
    #[serde(default)]
    pub points: Vec<NormalizedPoint>,
}

/// Replays recorded responses regardless of image or prompt.
///
/// Lets the pipeline run offline and gives tests a deterministic model.
pub struct RecordedVisionModel {
    responses: RecordedResponses,
}

impl RecordedVisionModel {
    pub fn new(responses: RecordedResponses) -> Self {
        Self { responses }
    }

    pub fn from_path(path: &Path) -> Result<Self, VisionError> {
        let json = fs::read_to_string(path).map_err(|e| VisionError::Recorded {
            path: path.to_path_buf(),
            source: e,
        })?;
        let responses = serde_json::from_str(&json).map_err(VisionError::Decode)?;
        Ok(Self::new(responses))
    }
}

impl VisionModel for RecordedVisionModel {
    fn caption(&self, _image: &Frame) -> Result<CaptionResponse, VisionError> {
        Ok(CaptionResponse {
            caption: self.responses.caption.clone(),
        })
    }

    fn query(&self, _image: &Frame, _question: &str) -> Result<QueryResponse, VisionError> {
        Ok(QueryResponse {
            answer: self.responses.answer.clone(),
        })
    }

    fn detect(&self, _image: &Frame, _subject: &str) -> Result<DetectResponse, VisionError> {
        Ok(DetectResponse {
            objects: self.responses.objects.clone(),
        })
    }

    fn point(&self, _image: &Frame, _prompt: &str) -> Result<PointResponse, VisionError> {
        Ok(PointResponse {
            points: self.responses.points.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame::filled(4, 4, [0, 0, 0])
    }

    #[test]
    fn test_from_path_replays_all_tasks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("responses.json");
        fs::write(
            &path,
            r#"{
                "caption": "a red square",
                "answer": "red",
                "objects": [{"x_min": 0.2, "y_min": 0.2, "x_max": 0.6, "y_max": 0.6, "label": "square"}],
                "points": [{"x": 0.5, "y": 0.5}]
            }"#,
        )
        .unwrap();

        let model = RecordedVisionModel::from_path(&path).unwrap();
        let image = frame();
        assert_eq!(model.caption(&image).unwrap().caption.as_deref(), Some("a red square"));
        assert_eq!(model.query(&image, "color?").unwrap().answer.as_deref(), Some("red"));
        assert_eq!(model.detect(&image, "square").unwrap().objects[0].label, "square");
        assert_eq!(
            model.point(&image, "center").unwrap().points,
            vec![NormalizedPoint::new(0.5, 0.5)]
        );
    }

    #[test]
    fn test_partial_recording_defaults_missing_tasks() {
        let model = RecordedVisionModel::new(serde_json::from_str(r#"{"caption": "x"}"#).unwrap());
        let image = frame();
        assert_eq!(model.query(&image, "q").unwrap().answer, None);
        assert!(model.detect(&image, "s").unwrap().objects.is_empty());
        assert!(model.point(&image, "p").unwrap().points.is_empty());
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = RecordedVisionModel::from_path(Path::new("/nonexistent/responses.json"));
        assert!(matches!(result, Err(VisionError::Recorded { .. })));
    }

    #[test]
    fn test_malformed_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        let result = RecordedVisionModel::from_path(&path);
        assert!(matches!(result, Err(VisionError::Decode(_))));
    }
}
