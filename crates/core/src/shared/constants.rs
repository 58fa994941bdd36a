/// Edge length of every extracted face crop, in pixels.
pub const CROP_SIZE: u32 = 300;

/// File extension of extracted crops.
pub const OUTPUT_EXTENSION: &str = "jpg";

/// JPEG quality used for crops (matches the common imwrite default).
pub const JPEG_QUALITY: u8 = 95;

/// Cascade definition looked up when `--cascade` is not given.
///
/// Relative to the working directory, which is usually the output directory.
pub const DEFAULT_CASCADE_PATH: &str = "../haarcascade_frontalface_default.xml";

/// File name of the annotated copy written in diagnostic mode.
pub const ANNOTATED_VIDEO_NAME: &str = "TestVideo_output.mkv";

/// Outline thickness for regions drawn into the annotated video.
pub const OUTLINE_THICKNESS: u32 = 2;

/// Outline color (RGB) for regions drawn into the annotated video.
pub const OUTLINE_COLOR: [u8; 3] = [0, 0, 255];
