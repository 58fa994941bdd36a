use std::fmt;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    /// Frame count reported by the container; 0 when unknown.
    pub total_frames: usize,
    pub codec: String,
    /// Four-character codec tag from the container, if it carries one.
    pub fourcc: Option<String>,
    pub source_path: Option<PathBuf>,
}

impl VideoMetadata {
    /// Renders a container codec tag as its four ASCII characters.
    ///
    /// Returns `None` for a zero tag; non-printable bytes become `.`.
    pub fn fourcc_from_tag(tag: u32) -> Option<String> {
        if tag == 0 {
            return None;
        }
        Some(
            tag.to_le_bytes()
                .iter()
                .map(|&b| {
                    if b.is_ascii_graphic() || b == b' ' {
                        b as char
                    } else {
                        '.'
                    }
                })
                .collect(),
        )
    }
}

impl fmt::Display for VideoMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Frame size: {}x{}", self.width, self.height)?;
        writeln!(f, "FPS: {:.2}", self.fps)?;
        match &self.fourcc {
            Some(tag) => writeln!(f, "Codec: {} ({tag})", self.codec)?,
            None => writeln!(f, "Codec: {}", self.codec)?,
        }
        write!(f, "Total frames: {}", self.total_frames)
    }
}
