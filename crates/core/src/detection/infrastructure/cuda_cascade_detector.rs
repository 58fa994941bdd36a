use std::path::Path;

use opencv::core::{self, GpuMat, Ptr, Rect, Vector};
use opencv::cudaobjdetect::CUDA_CascadeClassifier;
use opencv::prelude::*;

use crate::detection::domain::detection_config::DetectionConfig;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

use super::cascade_model::{self, CascadeLoadError};
use super::opencv_convert::{cv_size, gray_mat, to_regions};

/// Cascade face detector offloaded to a CUDA device.
///
/// Expects a cascade in the CUDA-compatible format (OpenCV ships these
/// under `haarcascades_cuda/`). The call blocks until the device returns.
/// Knobs left as `None` keep the accelerator classifier's own defaults.
pub struct CudaCascadeDetector {
    classifier: Ptr<CUDA_CascadeClassifier>,
    applied: Option<DetectionConfig>,
}

// Safety: CudaCascadeDetector is only used from a single thread at a time.
unsafe impl Send for CudaCascadeDetector {}

impl CudaCascadeDetector {
    pub fn new(cascade_path: &Path) -> Result<Self, CascadeLoadError> {
        let path_str = cascade_model::locate(cascade_path)?;

        let device = core::get_device().map_err(|e| CascadeLoadError::opencv(cascade_path, e))?;
        core::print_short_cuda_device_info(device)
            .map_err(|e| CascadeLoadError::opencv(cascade_path, e))?;

        let classifier = CUDA_CascadeClassifier::create(path_str)
            .map_err(|e| CascadeLoadError::opencv(cascade_path, e))?;
        let empty = classifier
            .empty()
            .map_err(|e| CascadeLoadError::opencv(cascade_path, e))?;
        if empty {
            return Err(CascadeLoadError::Empty(cascade_path.to_path_buf()));
        }

        log::info!(
            "Loaded cascade {} on CUDA device {device}",
            cascade_path.display()
        );
        Ok(Self {
            classifier,
            applied: None,
        })
    }

    /// Pushes the config into the classifier, skipping it when unchanged.
    fn apply(&mut self, config: &DetectionConfig) -> opencv::Result<()> {
        if self.applied.as_ref() == Some(config) {
            return Ok(());
        }

        self.classifier.set_scale_factor(config.scale_factor)?;
        self.classifier
            .set_min_object_size(cv_size(config.min_size))?;
        match config.min_neighbors {
            Some(n) => self.classifier.set_min_neighbors(n)?,
            None => log::debug!("cuda: min_neighbors unset, keeping classifier default"),
        }
        match config.max_size {
            Some(size) => self.classifier.set_max_object_size(cv_size(size))?,
            None => log::debug!("cuda: max_size unset, keeping classifier default"),
        }

        self.applied = Some(config.clone());
        Ok(())
    }
}

impl FaceDetector for CudaCascadeDetector {
    fn detect(
        &mut self,
        frame: &Frame,
        config: &DetectionConfig,
    ) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        self.apply(config)?;

        let mat = gray_mat(frame)?;
        let mut gpu_frame = GpuMat::new_def()?;
        gpu_frame.upload(&mat)?;

        let mut gpu_objects = GpuMat::new_def()?;
        self.classifier
            .detect_multi_scale_def(&gpu_frame, &mut gpu_objects)?;

        let mut objects = Vector::<Rect>::new();
        self.classifier.convert(&mut gpu_objects, &mut objects)?;

        Ok(to_regions(&objects))
    }

    fn name(&self) -> &'static str {
        "cuda"
    }
}
