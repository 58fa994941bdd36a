use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Draws a hollow rectangle of `thickness` pixels around each region.
///
/// Outlines are drawn inside the region bounds and clipped to the frame.
/// Grayscale frames take the first channel of `color`.
pub fn outline_regions(frame: &mut Frame, regions: &[Region], color: [u8; 3], thickness: u32) {
    let (fw, fh) = (frame.width(), frame.height());
    let channels = frame.channels() as usize;
    let t = thickness.max(1) as i32;
    let mut pixels = frame.as_ndarray_mut();

    for region in regions {
        let Some(r) = region.clamp_to(fw, fh) else {
            continue;
        };
        for y in r.y..r.bottom() {
            for x in r.x..r.right() {
                let on_edge = x < region.x + t
                    || x >= region.right() - t
                    || y < region.y + t
                    || y >= region.bottom() - t;
                if !on_edge {
                    continue;
                }
                for c in 0..channels {
                    pixels[[y as usize, x as usize, c]] = color[c.min(2)];
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 3] = [255, 0, 0];

    fn black(w: u32, h: u32) -> Frame {
        Frame::new(vec![0; (w * h * 3) as usize], w, h, 3, 0)
    }

    fn pixel(frame: &Frame, x: usize, y: usize) -> [u8; 3] {
        let arr = frame.as_ndarray();
        [arr[[y, x, 0]], arr[[y, x, 1]], arr[[y, x, 2]]]
    }

    #[test]
    fn test_outline_edges_and_hollow_center() {
        let mut frame = black(20, 20);
        outline_regions(&mut frame, &[Region::new(5, 5, 10, 10)], RED, 2);

        assert_eq!(pixel(&frame, 5, 5), RED);
        assert_eq!(pixel(&frame, 6, 10), RED);
        assert_eq!(pixel(&frame, 14, 14), RED);
        assert_eq!(pixel(&frame, 10, 10), [0, 0, 0]);
        assert_eq!(pixel(&frame, 7, 7), [0, 0, 0]);
        assert_eq!(pixel(&frame, 4, 4), [0, 0, 0]);
        assert_eq!(pixel(&frame, 15, 15), [0, 0, 0]);
    }

    #[test]
    fn test_outline_clipped_at_frame_edge() {
        let mut frame = black(10, 10);
        outline_regions(&mut frame, &[Region::new(6, 6, 10, 10)], RED, 2);
        assert_eq!(pixel(&frame, 6, 9), RED);
        assert_eq!(pixel(&frame, 9, 6), RED);
        assert_eq!(pixel(&frame, 9, 9), [0, 0, 0]);
    }

    #[test]
    fn test_region_outside_frame_is_ignored() {
        let mut frame = black(10, 10);
        outline_regions(&mut frame, &[Region::new(50, 50, 5, 5)], RED, 2);
        assert!(frame.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_no_regions_leaves_frame_untouched() {
        let mut frame = black(8, 8);
        outline_regions(&mut frame, &[], RED, 2);
        assert!(frame.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_grayscale_uses_first_channel() {
        let mut frame = Frame::new(vec![0; 100], 10, 10, 1, 0);
        outline_regions(&mut frame, &[Region::new(0, 0, 10, 10)], [200, 0, 0], 1);
        assert_eq!(frame.as_ndarray()[[0, 0, 0]], 200);
        assert_eq!(frame.as_ndarray()[[5, 5, 0]], 0);
    }
}
