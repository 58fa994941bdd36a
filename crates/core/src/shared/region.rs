/// An axis-aligned detection rectangle in frame pixel coordinates.
///
/// Has no identity across frames; two regions are equal only if their
/// geometry is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// True when the region lies entirely inside a `width` x `height` frame.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.right() as i64 <= width as i64
            && self.bottom() as i64 <= height as i64
    }

    /// Intersection with the `width` x `height` frame, or `None` if they
    /// do not overlap.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Region> {
        let x1 = self.x.max(0);
        let y1 = self.y.max(0);
        let x2 = (self.right() as i64).min(width as i64) as i32;
        let y2 = (self.bottom() as i64).min(height as i64) as i32;
        let clamped = Region::new(x1, y1, x2 - x1, y2 - y1);
        if clamped.is_empty() {
            None
        } else {
            Some(clamped)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_edges() {
        let r = Region::new(10, 20, 30, 40);
        assert_eq!(r.right(), 40);
        assert_eq!(r.bottom(), 60);
        assert!(!r.is_empty());
    }

    #[rstest]
    #[case::zero_width(Region::new(0, 0, 0, 10))]
    #[case::zero_height(Region::new(0, 0, 10, 0))]
    #[case::negative(Region::new(5, 5, -3, 4))]
    fn test_degenerate_regions_are_empty(#[case] r: Region) {
        assert!(r.is_empty());
    }

    #[rstest]
    #[case::inside(Region::new(10, 10, 50, 50), true)]
    #[case::whole_frame(Region::new(0, 0, 640, 480), true)]
    #[case::touches_corner(Region::new(590, 430, 50, 50), true)]
    #[case::past_right(Region::new(600, 10, 50, 50), false)]
    #[case::past_bottom(Region::new(10, 450, 50, 50), false)]
    #[case::negative_origin(Region::new(-1, 10, 50, 50), false)]
    fn test_fits_within(#[case] r: Region, #[case] expected: bool) {
        assert_eq!(r.fits_within(640, 480), expected);
    }

    #[test]
    fn test_clamp_to_trims_overhang() {
        let r = Region::new(-10, 90, 50, 50);
        let clamped = r.clamp_to(100, 100).unwrap();
        assert_eq!(clamped, Region::new(0, 90, 40, 10));
    }

    #[test]
    fn test_clamp_to_outside_is_none() {
        let r = Region::new(200, 200, 10, 10);
        assert!(r.clamp_to(100, 100).is_none());
    }

    #[test]
    fn test_clamp_to_inside_is_unchanged() {
        let r = Region::new(5, 5, 10, 10);
        assert_eq!(r.clamp_to(100, 100), Some(r));
    }
}
