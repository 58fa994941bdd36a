use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CascadeLoadError {
    #[error("cascade file not found: {0}")]
    NotFound(PathBuf),
    #[error("cascade path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),
    #[error("failed to load cascade {path}: {source}")]
    OpenCv {
        path: PathBuf,
        #[source]
        source: opencv::Error,
    },
    #[error("cascade {0} loaded but holds no classifier stages")]
    Empty(PathBuf),
    #[error("{0} backend is not available in this build")]
    BackendUnavailable(&'static str),
}

impl CascadeLoadError {
    pub(crate) fn opencv(path: &Path, source: opencv::Error) -> Self {
        Self::OpenCv {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Checks that a cascade definition exists and returns the path in the
/// form OpenCV expects.
pub fn locate(path: &Path) -> Result<&str, CascadeLoadError> {
    if !path.is_file() {
        return Err(CascadeLoadError::NotFound(path.to_path_buf()));
    }
    path.to_str()
        .ok_or_else(|| CascadeLoadError::NonUtf8Path(path.to_path_buf()))
}
