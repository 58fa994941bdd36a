use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cropping::crop_normalizer::CropNormalizer;
use crate::detection::domain::detection_config::DetectionConfig;
use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::extraction_error::ExtractionError;
use crate::pipeline::frame_annotator::outline_regions;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::sequential_writer::SequentialWriter;
use crate::shared::constants::{OUTLINE_COLOR, OUTLINE_THICKNESS};
use crate::shared::frame::Frame;
use crate::video::domain::video_reader::VideoReader;
use crate::video::domain::video_writer::VideoWriter;

/// Lifecycle of one extraction run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    Initializing,
    Streaming,
    Draining,
    Done,
}

/// Outcome of [`ExtractFacesUseCase::execute`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtractionReport {
    pub frames_processed: usize,
    pub images_written: usize,
    pub written_paths: Vec<PathBuf>,
    /// True when a decode error ended the stream before the container did.
    pub stopped_early: bool,
}

/// Debug copy of the input with every detection outlined.
struct AnnotatedOutput {
    writer: Box<dyn VideoWriter>,
    path: PathBuf,
    open: bool,
}

/// Per-frame work: grayscale, detect, crop, write.
///
/// Kept apart from the reader so a frame iterator borrowing the reader can
/// coexist with mutable access to everything else.
struct FrameProcessor {
    detector: Box<dyn FaceDetector>,
    config: DetectionConfig,
    normalizer: CropNormalizer,
    writer: SequentialWriter,
    annotated: Option<AnnotatedOutput>,
}

impl FrameProcessor {
    fn process(
        &mut self,
        frame: Frame,
        logger: &mut dyn PipelineLogger,
        written: &mut Vec<PathBuf>,
    ) -> Result<(), ExtractionError> {
        let index = frame.index();

        let t = Instant::now();
        let gray = frame.to_grayscale();
        logger.timing("grayscale", elapsed_ms(t));

        let t = Instant::now();
        let regions = self
            .detector
            .detect(&gray, &self.config)
            .map_err(|source| ExtractionError::Detection {
                frame: index,
                source,
            })?;
        logger.timing("detect", elapsed_ms(t));
        logger.metric("faces", regions.len() as f64);
        if !regions.is_empty() {
            log::debug!("Frame {index}: {} face(s)", regions.len());
        }

        let t = Instant::now();
        for region in &regions {
            let crop = self
                .normalizer
                .extract(&frame, region)
                .map_err(|source| ExtractionError::Crop {
                    frame: index,
                    source,
                })?;
            let path = self.writer.write(&crop)?;
            logger.file_written(&path);
            written.push(path);
        }
        logger.timing("crop_write", elapsed_ms(t));

        if let Some(out) = self.annotated.as_mut() {
            let mut annotated = frame;
            outline_regions(&mut annotated, &regions, OUTLINE_COLOR, OUTLINE_THICKNESS);
            out.writer
                .write(&annotated)
                .map_err(ExtractionError::Annotation)?;
        }

        Ok(())
    }
}

/// Pulls every frame from a video, finds faces, and writes each one as a
/// fixed-size numbered image.
///
/// A decode error part-way through ends the stream early; it is logged and
/// flagged in the report. Detection, crop and write errors abort the run.
pub struct ExtractFacesUseCase {
    reader: Box<dyn VideoReader>,
    processor: FrameProcessor,
    logger: Box<dyn PipelineLogger>,
    state: PipelineState,
}

impl ExtractFacesUseCase {
    pub fn new(
        reader: Box<dyn VideoReader>,
        detector: Box<dyn FaceDetector>,
        normalizer: CropNormalizer,
        writer: SequentialWriter,
        config: DetectionConfig,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            reader,
            processor: FrameProcessor {
                detector,
                config,
                normalizer,
                writer,
                annotated: None,
            },
            logger,
            state: PipelineState::Initializing,
        }
    }

    /// Also writes every frame, detections outlined, to `path`.
    pub fn with_annotated_output(mut self, writer: Box<dyn VideoWriter>, path: PathBuf) -> Self {
        self.processor.annotated = Some(AnnotatedOutput {
            writer,
            path,
            open: false,
        });
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn execute(&mut self, input: &Path) -> Result<ExtractionReport, ExtractionError> {
        self.transition(PipelineState::Initializing);
        log::debug!(
            "Detecting with {} backend: {:?}",
            self.processor.detector.name(),
            self.processor.config
        );

        let metadata = self
            .reader
            .open(input)
            .map_err(|source| ExtractionError::SourceOpen {
                path: input.to_path_buf(),
                source,
            })?;
        self.logger.opened(&metadata);
        self.logger
            .info(&format!("Extracting faces from {}", input.display()));

        if let Some(out) = self.processor.annotated.as_mut() {
            if let Err(e) = out.writer.open(&out.path, &metadata) {
                self.reader.close();
                return Err(ExtractionError::Annotation(e));
            }
            out.open = true;
        }

        self.transition(PipelineState::Streaming);
        let streamed = self.stream(metadata.total_frames);

        self.transition(PipelineState::Draining);
        let drained = self.drain();
        self.reader.close();

        let report = streamed?;
        drained?;

        self.transition(PipelineState::Done);
        log::debug!(
            "Processed {} frames, wrote {} images",
            report.frames_processed,
            report.images_written
        );
        Ok(report)
    }

    fn stream(&mut self, total_frames: usize) -> Result<ExtractionReport, ExtractionError> {
        let mut report = ExtractionReport::default();

        for item in self.reader.frames() {
            let frame = match item {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!(
                        "Stopping after {} frames, decode failed: {e}",
                        report.frames_processed
                    );
                    report.stopped_early = true;
                    break;
                }
            };

            self.processor
                .process(frame, self.logger.as_mut(), &mut report.written_paths)?;
            report.frames_processed += 1;
            self.logger.progress(report.frames_processed, total_frames);
        }

        report.images_written = self.processor.writer.count();
        Ok(report)
    }

    fn drain(&mut self) -> Result<(), ExtractionError> {
        if let Some(out) = self.processor.annotated.as_mut() {
            if out.open {
                out.open = false;
                out.writer.close().map_err(ExtractionError::Annotation)?;
                log::info!("Annotated video written to {}", out.path.display());
            }
        }
        self.logger.summary();
        Ok(())
    }

    fn transition(&mut self, next: PipelineState) {
        log::debug!("Pipeline {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
