use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::detection::domain::face_detector::FaceDetector;

use super::cascade_model::CascadeLoadError;
use super::cpu_cascade_detector::CpuCascadeDetector;

/// Where the cascade classifier executes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    Cpu,
    Cuda,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cpu" => Ok(Backend::Cpu),
            "cuda" | "gpu" => Ok(Backend::Cuda),
            other => Err(format!("Backend must be 'cpu' or 'cuda', got '{other}'")),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Cpu => f.write_str("cpu"),
            Backend::Cuda => f.write_str("cuda"),
        }
    }
}

/// Loads the cascade at `cascade_path` into a detector for `backend`.
///
/// Model loading happens here, once, before any frame is processed.
pub fn create_detector(
    backend: Backend,
    cascade_path: &Path,
) -> Result<Box<dyn FaceDetector>, CascadeLoadError> {
    log::info!(
        "Using {backend} backend with cascade {}",
        cascade_path.display()
    );
    match backend {
        Backend::Cpu => Ok(Box::new(CpuCascadeDetector::new(cascade_path)?)),
        Backend::Cuda => create_cuda_detector(cascade_path),
    }
}

/// Returns true if this build can run detection on a CUDA device.
pub fn cuda_available() -> bool {
    cfg!(feature = "cuda")
}

#[cfg(feature = "cuda")]
fn create_cuda_detector(cascade_path: &Path) -> Result<Box<dyn FaceDetector>, CascadeLoadError> {
    use super::cuda_cascade_detector::CudaCascadeDetector;
    Ok(Box::new(CudaCascadeDetector::new(cascade_path)?))
}

#[cfg(not(feature = "cuda"))]
fn create_cuda_detector(_cascade_path: &Path) -> Result<Box<dyn FaceDetector>, CascadeLoadError> {
    Err(CascadeLoadError::BackendUnavailable("cuda"))
}
