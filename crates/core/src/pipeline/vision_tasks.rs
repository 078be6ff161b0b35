use thiserror::Error;

use crate::compositing::disclosure_compositor::DisclosureCompositor;
use crate::shared::frame::Frame;
use crate::vision::domain::vision_model::VisionModel;

pub const NO_CAPTION: &str = "No caption returned.";
pub const NO_ANSWER: &str = "No answer returned.";

/// Rejected input or a compositing failure. The `Display` text of the
/// input variants is meant to be shown to the user verbatim.
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Please provide an image.")]
    MissingImage,
    #[error("Please provide a question.")]
    MissingQuestion,
    #[error("Please provide an object to detect.")]
    MissingSubject,
    #[error("Please provide a prompt for pointing.")]
    MissingPrompt,
    #[error("compositing failed: {0}")]
    Compose(String),
}

fn require_image(image: Option<&Frame>) -> Result<&Frame, TaskError> {
    image.ok_or(TaskError::MissingImage)
}

fn require_text<'a>(text: &'a str, missing: TaskError) -> Result<&'a str, TaskError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(missing)
    } else {
        Ok(trimmed)
    }
}

/// Describes the image. A failed or empty model call yields [`NO_CAPTION`].
pub fn process_caption(model: &dyn VisionModel, image: Option<&Frame>) -> Result<String, TaskError> {
    let image = require_image(image)?;
    let caption = match model.caption(image) {
        Ok(response) => response.caption,
        Err(e) => {
            log::warn!("Caption request failed: {e}");
            None
        }
    };
    Ok(caption.unwrap_or_else(|| NO_CAPTION.to_string()))
}

/// Answers a free-form question. A failed or empty model call yields [`NO_ANSWER`].
pub fn process_query(
    model: &dyn VisionModel,
    image: Option<&Frame>,
    question: &str,
) -> Result<String, TaskError> {
    let image = require_image(image)?;
    let question = require_text(question, TaskError::MissingQuestion)?;
    let answer = match model.query(image, question) {
        Ok(response) => response.answer,
        Err(e) => {
            log::warn!("Query request failed: {e}");
            None
        }
    };
    Ok(answer.unwrap_or_else(|| NO_ANSWER.to_string()))
}

/// Detects `subject` and discloses every returned box.
///
/// A failed model call is treated as "nothing found", which produces the
/// fully blurred image.
pub fn process_detect(
    model: &dyn VisionModel,
    compositor: &DisclosureCompositor,
    image: Option<&Frame>,
    subject: &str,
) -> Result<Frame, TaskError> {
    let image = require_image(image)?;
    let subject = require_text(subject, TaskError::MissingSubject)?;
    let objects = match model.detect(image, subject) {
        Ok(response) => response.objects,
        Err(e) => {
            log::warn!("Detect request failed: {e}");
            Vec::new()
        }
    };
    log::info!("Detected {} regions for '{subject}'", objects.len());
    compositor
        .compose_boxes(image, &objects)
        .map_err(|e| TaskError::Compose(e.to_string()))
}

/// Points at `prompt` and discloses a square around every returned point.
///
/// Failure handling matches [`process_detect`].
pub fn process_pointing(
    model: &dyn VisionModel,
    compositor: &DisclosureCompositor,
    image: Option<&Frame>,
    prompt: &str,
) -> Result<Frame, TaskError> {
    let image = require_image(image)?;
    let prompt = require_text(prompt, TaskError::MissingPrompt)?;
    let points = match model.point(image, prompt) {
        Ok(response) => response.points,
        Err(e) => {
            log::warn!("Point request failed: {e}");
            Vec::new()
        }
    };
    log::info!("Found {} points for '{prompt}'", points.len());
    compositor
        .compose_points(image, &points)
        .map_err(|e| TaskError::Compose(e.to_string()))
}
