use std::path::Path;

use opencv::core::{Rect, Size, Vector};
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;

use crate::detection::domain::detection_config::{DetectionConfig, DEFAULT_MIN_NEIGHBORS};
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

use super::cascade_model::{self, CascadeLoadError};
use super::opencv_convert::{cv_size, gray_mat, to_regions};

/// Cascade face detector running on the processor via OpenCV's
/// `CascadeClassifier::detectMultiScale`.
///
/// Honors every [`DetectionConfig`] knob. A missing neighbor count falls
/// back to the usual default of 3; a missing max size searches up to the
/// full frame.
pub struct CpuCascadeDetector {
    classifier: CascadeClassifier,
}

// Safety: CpuCascadeDetector is only used from a single thread at a time.
// The classifier's native handle is never shared.
unsafe impl Send for CpuCascadeDetector {}

impl CpuCascadeDetector {
    /// Loads the cascade definition at `cascade_path`.
    ///
    /// Fails if the file is missing, unreadable, or yields an empty classifier.
    pub fn new(cascade_path: &Path) -> Result<Self, CascadeLoadError> {
        let path_str = cascade_model::locate(cascade_path)?;
        let classifier = CascadeClassifier::new(path_str)
            .map_err(|e| CascadeLoadError::opencv(cascade_path, e))?;
        let empty = classifier
            .empty()
            .map_err(|e| CascadeLoadError::opencv(cascade_path, e))?;
        if empty {
            return Err(CascadeLoadError::Empty(cascade_path.to_path_buf()));
        }
        log::info!("Loaded cascade {}", cascade_path.display());
        Ok(Self { classifier })
    }
}

impl FaceDetector for CpuCascadeDetector {
    fn detect(
        &mut self,
        frame: &Frame,
        config: &DetectionConfig,
    ) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        let mat = gray_mat(frame)?;
        let mut objects = Vector::<Rect>::new();
        let max_size = config.max_size.map(cv_size).unwrap_or(Size::new(0, 0));

        self.classifier.detect_multi_scale(
            &mat,
            &mut objects,
            config.scale_factor,
            config.min_neighbors.unwrap_or(DEFAULT_MIN_NEIGHBORS),
            0,
            cv_size(config.min_size),
            max_size,
        )?;

        Ok(to_regions(&objects))
    }

    fn name(&self) -> &'static str {
        "cpu"
    }
}
