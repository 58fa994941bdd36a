use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;

use crate::shared::constants::JPEG_QUALITY;
use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Writes frames as JPEG files using the `image` crate.
///
/// Accepts RGB and grayscale frames. Existing files are truncated; the
/// parent directory is never created.
pub struct ImageFileWriter {
    quality: u8,
}

impl ImageFileWriter {
    pub fn new() -> Self {
        Self {
            quality: JPEG_QUALITY,
        }
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let mut out = BufWriter::new(File::create(path)?);
        let mut encoder = JpegEncoder::new_with_quality(&mut out, self.quality);

        match frame.channels() {
            3 => {
                let img = image::RgbImage::from_raw(
                    frame.width(),
                    frame.height(),
                    frame.data().to_vec(),
                )
                .ok_or("Failed to create image from frame data")?;
                encoder.encode_image(&img)?;
            }
            1 => {
                let img = image::GrayImage::from_raw(
                    frame.width(),
                    frame.height(),
                    frame.data().to_vec(),
                )
                .ok_or("Failed to create image from frame data")?;
                encoder.encode_image(&img)?;
            }
            n => return Err(format!("Unsupported channel count for JPEG: {n}").into()),
        }
        drop(encoder);

        out.flush()?;
        Ok(())
    }
}
