use image::imageops::{self, FilterType};
use thiserror::Error;

use crate::shared::constants::CROP_SIZE;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

#[derive(Error, Debug, PartialEq)]
pub enum CropError {
    #[error("region {0:?} is empty")]
    Empty(Region),
    #[error("region {region:?} exceeds {width}x{height} frame")]
    OutOfBounds {
        region: Region,
        width: u32,
        height: u32,
    },
    #[error("unsupported channel count {0}")]
    Channels(u8),
}

/// Cuts a detected region out of a color frame and scales it to a fixed
/// output size.
///
/// The resize ignores aspect ratio: every crop comes out exactly
/// `width` x `height`.
pub struct CropNormalizer {
    width: u32,
    height: u32,
}

impl CropNormalizer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn extract(&self, frame: &Frame, region: &Region) -> Result<Frame, CropError> {
        if region.is_empty() {
            return Err(CropError::Empty(*region));
        }
        if !region.fits_within(frame.width(), frame.height()) {
            return Err(CropError::OutOfBounds {
                region: *region,
                width: frame.width(),
                height: frame.height(),
            });
        }

        let cropped = frame.crop(region).ok_or(CropError::Empty(*region))?;
        let (w, h) = (cropped.width(), cropped.height());
        let pixels = cropped.data().to_vec();

        let data = match frame.channels() {
            3 => {
                let img = image::RgbImage::from_raw(w, h, pixels)
                    .ok_or(CropError::Channels(3))?;
                imageops::resize(&img, self.width, self.height, FilterType::Triangle).into_raw()
            }
            1 => {
                let img = image::GrayImage::from_raw(w, h, pixels)
                    .ok_or(CropError::Channels(1))?;
                imageops::resize(&img, self.width, self.height, FilterType::Triangle).into_raw()
            }
            n => return Err(CropError::Channels(n)),
        };

        Ok(Frame::new(
            data,
            self.width,
            self.height,
            frame.channels(),
            frame.index(),
        ))
    }
}

impl Default for CropNormalizer {
    fn default() -> Self {
        Self::new(CROP_SIZE, CROP_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// 200x100 frame: left half red, right half blue.
    fn split_frame() -> Frame {
        let (w, h) = (200u32, 100u32);
        let mut data = Vec::with_capacity((w * h * 3) as usize);
        for _ in 0..h {
            for col in 0..w {
                if col < w / 2 {
                    data.extend_from_slice(&[255, 0, 0]);
                } else {
                    data.extend_from_slice(&[0, 0, 255]);
                }
            }
        }
        Frame::new(data, w, h, 3, 4)
    }

    #[rstest]
    #[case::square(Region::new(10, 10, 50, 50))]
    #[case::wide(Region::new(0, 0, 180, 20))]
    #[case::tall(Region::new(120, 0, 10, 100))]
    #[case::whole_frame(Region::new(0, 0, 200, 100))]
    fn test_output_is_always_fixed_size(#[case] region: Region) {
        let crop = CropNormalizer::default()
            .extract(&split_frame(), &region)
            .unwrap();
        assert_eq!(crop.width(), 300);
        assert_eq!(crop.height(), 300);
        assert_eq!(crop.channels(), 3);
        assert_eq!(crop.data().len(), 300 * 300 * 3);
    }

    #[test]
    fn test_crop_takes_the_requested_subregion() {
        let crop = CropNormalizer::default()
            .extract(&split_frame(), &Region::new(110, 10, 60, 60))
            .unwrap();
        assert!(crop
            .data()
            .chunks_exact(3)
            .all(|px| px == [0, 0, 255]));
    }

    #[test]
    fn test_crop_keeps_frame_index() {
        let crop = CropNormalizer::default()
            .extract(&split_frame(), &Region::new(0, 0, 10, 10))
            .unwrap();
        assert_eq!(crop.index(), 4);
    }

    #[test]
    fn test_custom_size() {
        let normalizer = CropNormalizer::new(64, 32);
        let crop = normalizer
            .extract(&split_frame(), &Region::new(0, 0, 100, 100))
            .unwrap();
        assert_eq!((crop.width(), crop.height()), (64, 32));
    }

    #[test]
    fn test_grayscale_crop() {
        let frame = Frame::new(vec![77; 40 * 40], 40, 40, 1, 0);
        let crop = CropNormalizer::default()
            .extract(&frame, &Region::new(5, 5, 20, 20))
            .unwrap();
        assert_eq!(crop.channels(), 1);
        assert!(crop.data().iter().all(|&v| v == 77));
    }

    #[rstest]
    #[case::past_right(Region::new(180, 0, 50, 50))]
    #[case::past_bottom(Region::new(0, 80, 50, 50))]
    #[case::negative(Region::new(-5, 0, 50, 50))]
    fn test_out_of_bounds_is_rejected(#[case] region: Region) {
        let err = CropNormalizer::default()
            .extract(&split_frame(), &region)
            .unwrap_err();
        assert!(matches!(err, CropError::OutOfBounds { .. }));
    }

    #[test]
    fn test_empty_region_is_rejected() {
        let err = CropNormalizer::default()
            .extract(&split_frame(), &Region::new(10, 10, 0, 20))
            .unwrap_err();
        assert_eq!(err, CropError::Empty(Region::new(10, 10, 0, 20)));
    }
}
