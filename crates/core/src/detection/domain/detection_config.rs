/// Shrink step between successive search scales.
pub const DEFAULT_SCALE_FACTOR: f64 = 1.1;

/// Overlapping raw hits required to confirm a detection.
pub const DEFAULT_MIN_NEIGHBORS: i32 = 3;

/// Smallest face searched for, in pixels.
pub const DEFAULT_MIN_SIZE: (u32, u32) = (250, 250);

/// Largest face searched for, in pixels.
pub const DEFAULT_MAX_SIZE: (u32, u32) = (1200, 1200);

/// Search parameters handed to a [`FaceDetector`](super::face_detector::FaceDetector).
///
/// `min_neighbors` and `max_size` are optional because not every backend
/// exposes them; `None` leaves the backend's own default in place.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionConfig {
    pub scale_factor: f64,
    pub min_neighbors: Option<i32>,
    pub min_size: (u32, u32),
    pub max_size: Option<(u32, u32)>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            min_neighbors: Some(DEFAULT_MIN_NEIGHBORS),
            min_size: DEFAULT_MIN_SIZE,
            max_size: Some(DEFAULT_MAX_SIZE),
        }
    }
}

impl DetectionConfig {
    /// Checks the invariants every backend relies on.
    pub fn validate(&self) -> Result<(), String> {
        if !self.scale_factor.is_finite() || self.scale_factor <= 1.0 {
            return Err(format!(
                "Scale factor must be greater than 1.0, got {}",
                self.scale_factor
            ));
        }
        if let Some(n) = self.min_neighbors {
            if n < 0 {
                return Err(format!("Min neighbors must be non-negative, got {n}"));
            }
        }
        if let Some((max_w, max_h)) = self.max_size {
            let (min_w, min_h) = self.min_size;
            if max_w < min_w || max_h < min_h {
                return Err(format!(
                    "Max size {max_w}x{max_h} is smaller than min size {min_w}x{min_h}"
                ));
            }
        }
        Ok(())
    }

    /// True if a `width` x `height` detection lies within the size bounds.
    pub fn accepts_size(&self, width: u32, height: u32) -> bool {
        let (min_w, min_h) = self.min_size;
        if width < min_w || height < min_h {
            return false;
        }
        match self.max_size {
            Some((max_w, max_h)) => width <= max_w && height <= max_h,
            None => true,
        }
    }
}
