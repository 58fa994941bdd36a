use std::path::PathBuf;

use thiserror::Error;

use crate::cropping::crop_normalizer::CropError;
use crate::detection::infrastructure::cascade_model::CascadeLoadError;

/// Everything that can end an extraction run.
///
/// A decode error part-way through the video is deliberately absent: the
/// run stops early and reports it instead of failing.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("can't open video {path}: {source}")]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error>,
    },
    #[error(transparent)]
    ModelLoad(#[from] CascadeLoadError),
    #[error("face detection failed on frame {frame}: {source}")]
    Detection {
        frame: usize,
        #[source]
        source: Box<dyn std::error::Error>,
    },
    #[error("failed to crop frame {frame}: {source}")]
    Crop {
        frame: usize,
        #[source]
        source: CropError,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error>,
    },
    #[error("annotated video output failed: {0}")]
    Annotation(#[source] Box<dyn std::error::Error>),
}
