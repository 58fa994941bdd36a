pub mod cascade_model;
pub mod cpu_cascade_detector;
#[cfg(feature = "cuda")]
pub mod cuda_cascade_detector;
pub mod detector_factory;
mod opencv_convert;
