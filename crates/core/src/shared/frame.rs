use ndarray::{s, ArrayView3, ArrayViewMut3};

use crate::shared::region::Region;

/// Fixed-point luma weights (14-bit) for R, G and B.
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// A decoded raster image: contiguous bytes in row-major order.
///
/// Color frames carry three interleaved RGB channels; grayscale frames
/// carry one. `index` is the position of the frame in decode order.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_grayscale(&self) -> bool {
        self.channels == 1
    }

    /// Single-channel copy with identical geometry and index.
    ///
    /// Uses the BT.601 luma weights, so a detector searching the result sees
    /// the same coordinates as the color original.
    pub fn to_grayscale(&self) -> Frame {
        if self.is_grayscale() {
            return self.clone();
        }
        let data = self
            .data
            .chunks_exact(self.channels as usize)
            .map(|px| luma(px[0], px[1], px[2]))
            .collect();
        Frame::new(data, self.width, self.height, 1, self.index)
    }

    /// Copy of the pixels under `region`, or `None` when the region is
    /// empty or reaches outside the frame.
    pub fn crop(&self, region: &Region) -> Option<Frame> {
        if region.is_empty() || !region.fits_within(self.width, self.height) {
            return None;
        }
        let (x, y) = (region.x as usize, region.y as usize);
        let (w, h) = (region.width as usize, region.height as usize);
        let data: Vec<u8> = self
            .as_ndarray()
            .slice(s![y..y + h, x..x + w, ..])
            .iter()
            .copied()
            .collect();
        Some(Frame::new(
            data,
            w as u32,
            h as u32,
            self.channels,
            self.index,
        ))
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = r as u32 * LUMA_R + g as u32 * LUMA_G + b as u32 * LUMA_B;
    ((y + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8
}
