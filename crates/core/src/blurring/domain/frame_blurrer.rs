use crate::shared::frame::Frame;

/// Domain interface for blurring a whole frame.
///
/// Implementations modify the frame in-place (`&mut Frame`) and keep no
/// per-call state, so one blurrer can serve concurrent requests.
pub trait FrameBlurrer: Send + Sync {
    fn blur(&self, frame: &mut Frame) -> Result<(), Box<dyn std::error::Error>>;
}
