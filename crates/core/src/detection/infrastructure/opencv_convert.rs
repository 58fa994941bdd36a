//! Conversions between domain frames/regions and OpenCV types.

use opencv::core::{Mat, Rect, Scalar, Size, Vector, CV_8UC1};
use opencv::prelude::*;

use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Copies a grayscale frame into an owned 8-bit single-channel `Mat`.
pub(crate) fn gray_mat(frame: &Frame) -> Result<Mat, Box<dyn std::error::Error>> {
    if !frame.is_grayscale() {
        return Err(format!(
            "cascade detection needs a grayscale frame, got {} channels",
            frame.channels()
        )
        .into());
    }
    let mut mat = Mat::new_rows_cols_with_default(
        frame.height() as i32,
        frame.width() as i32,
        CV_8UC1,
        Scalar::all(0.0),
    )?;
    mat.data_bytes_mut()?.copy_from_slice(frame.data());
    Ok(mat)
}

pub(crate) fn cv_size((width, height): (u32, u32)) -> Size {
    Size::new(width as i32, height as i32)
}

pub(crate) fn to_regions(rects: &Vector<Rect>) -> Vec<Region> {
    rects
        .iter()
        .map(|r| Region::new(r.x, r.y, r.width, r.height))
        .collect()
}
