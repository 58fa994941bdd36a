pub mod cropping;
pub mod detection;
pub mod pipeline;
pub mod shared;
pub mod video;
