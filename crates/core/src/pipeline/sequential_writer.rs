use std::path::PathBuf;

use crate::pipeline::extraction_error::ExtractionError;
use crate::shared::constants::OUTPUT_EXTENSION;
use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Names crops `<label><n>.jpg` and persists them in order.
///
/// `n` starts at zero and goes up by one per successful write for the
/// lifetime of the writer.
pub struct SequentialWriter {
    image_writer: Box<dyn ImageWriter>,
    output_dir: PathBuf,
    label: String,
    counter: usize,
}

impl SequentialWriter {
    pub fn new(
        image_writer: Box<dyn ImageWriter>,
        output_dir: impl Into<PathBuf>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            image_writer,
            output_dir: output_dir.into(),
            label: label.into(),
            counter: 0,
        }
    }

    /// Path the next crop will be written to.
    pub fn next_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}{}.{OUTPUT_EXTENSION}", self.label, self.counter))
    }

    pub fn write(&mut self, crop: &Frame) -> Result<PathBuf, ExtractionError> {
        let path = self.next_path();
        if path.exists() {
            log::warn!("Overwriting existing file {}", path.display());
        }

        self.image_writer
            .write(&path, crop)
            .map_err(|source| ExtractionError::Write {
                path: path.clone(),
                source,
            })?;

        self.counter += 1;
        Ok(path)
    }

    /// Number of crops written so far.
    pub fn count(&self) -> usize {
        self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    struct RecordingWriter {
        paths: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl ImageWriter for RecordingWriter {
        fn write(&self, path: &Path, _frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.paths.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }

    struct FailingWriter;

    impl ImageWriter for FailingWriter {
        fn write(&self, _path: &Path, _frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            Err("disk full".into())
        }
    }

    fn crop() -> Frame {
        Frame::new(vec![0; 300 * 300 * 3], 300, 300, 3, 0)
    }

    fn recording(dir: &str, label: &str) -> (SequentialWriter, Arc<Mutex<Vec<PathBuf>>>) {
        let paths = Arc::new(Mutex::new(Vec::new()));
        let writer = SequentialWriter::new(
            Box::new(RecordingWriter {
                paths: paths.clone(),
            }),
            dir,
            label,
        );
        (writer, paths)
    }

    #[test]
    fn test_filenames_follow_counter_without_padding() {
        let (mut writer, paths) = recording("out", "alice");
        for _ in 0..12 {
            writer.write(&crop()).unwrap();
        }

        let paths = paths.lock().unwrap();
        assert_eq!(paths[0], Path::new("out/alice0.jpg"));
        assert_eq!(paths[1], Path::new("out/alice1.jpg"));
        assert_eq!(paths[10], Path::new("out/alice10.jpg"));
        assert_eq!(paths[11], Path::new("out/alice11.jpg"));
        assert_eq!(writer.count(), 12);
    }

    #[test]
    fn test_write_returns_written_path() {
        let (mut writer, _) = recording(".", "bob");
        assert_eq!(writer.write(&crop()).unwrap(), Path::new("./bob0.jpg"));
        assert_eq!(writer.next_path(), Path::new("./bob1.jpg"));
    }

    #[test]
    fn test_new_writer_starts_at_zero() {
        let (writer, paths) = recording("out", "x");
        assert_eq!(writer.count(), 0);
        assert!(paths.lock().unwrap().is_empty());
    }

    #[test]
    fn test_failed_write_does_not_advance_counter() {
        let mut writer = SequentialWriter::new(Box::new(FailingWriter), "out", "carol");
        let err = writer.write(&crop()).unwrap_err();

        match err {
            ExtractionError::Write { path, .. } => {
                assert_eq!(path, Path::new("out/carol0.jpg"));
            }
            other => panic!("expected write error, got {other:?}"),
        }
        assert_eq!(writer.count(), 0);
        assert_eq!(writer.next_path(), Path::new("out/carol0.jpg"));
    }

    #[test]
    fn test_existing_file_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("dan0.jpg"), b"old").unwrap();

        let mut writer = SequentialWriter::new(
            Box::new(crate::video::infrastructure::image_file_writer::ImageFileWriter::new()),
            dir.path(),
            "dan",
        );
        let path = writer.write(&crop()).unwrap();

        assert_ne!(std::fs::read(&path).unwrap(), b"old");
        assert_eq!(writer.count(), 1);
    }
}
