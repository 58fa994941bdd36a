use crate::detection::domain::detection_config::DetectionConfig;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Domain interface for face detection.
///
/// `frame` is a single-channel grayscale frame. Returned regions are in its
/// coordinate space, possibly empty, in whatever order the backend yields.
/// Backends take `&mut self` because the underlying classifiers mutate
/// internal scratch buffers while searching.
pub trait FaceDetector: Send {
    fn detect(
        &mut self,
        frame: &Frame,
        config: &DetectionConfig,
    ) -> Result<Vec<Region>, Box<dyn std::error::Error>>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}
