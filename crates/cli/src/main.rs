use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use facecrop_core::cropping::crop_normalizer::CropNormalizer;
use facecrop_core::detection::domain::detection_config::{
    DetectionConfig, DEFAULT_MIN_NEIGHBORS, DEFAULT_SCALE_FACTOR,
};
use facecrop_core::detection::domain::face_detector::FaceDetector;
use facecrop_core::detection::infrastructure::detector_factory::{
    create_detector, cuda_available, Backend,
};
use facecrop_core::pipeline::extract_faces_use_case::ExtractFacesUseCase;
use facecrop_core::pipeline::extraction_error::ExtractionError;
use facecrop_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use facecrop_core::pipeline::sequential_writer::SequentialWriter;
use facecrop_core::shared::constants::{ANNOTATED_VIDEO_NAME, DEFAULT_CASCADE_PATH};
use facecrop_core::video::infrastructure::ffmpeg_reader::FfmpegReader;
use facecrop_core::video::infrastructure::ffmpeg_writer::FfmpegWriter;
use facecrop_core::video::infrastructure::image_file_writer::ImageFileWriter;

/// Extracts every detected face in a video as a numbered 300x300 JPEG.
///
/// Exit status: 0 on success, 1 when the video, cascade or an output file
/// fails, 2 on a usage error (wrong argument count or a bad option).
#[derive(Parser, Debug)]
#[command(name = "facecrop")]
struct Cli {
    /// Input video file.
    video: PathBuf,

    /// Filename prefix for the extracted crops (<label><n>.jpg).
    label: String,

    /// Haar cascade XML describing the face classifier.
    #[arg(long, default_value = DEFAULT_CASCADE_PATH)]
    cascade: PathBuf,

    /// Where detection runs: cpu or cuda.
    #[arg(long, default_value = "cpu")]
    backend: Backend,

    /// Directory the crops are written to (must exist).
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Shrink step between search scales (> 1.0).
    #[arg(long, default_value_t = DEFAULT_SCALE_FACTOR)]
    scale_factor: f64,

    /// Overlapping hits required to keep a detection.
    #[arg(long, default_value_t = DEFAULT_MIN_NEIGHBORS)]
    min_neighbors: i32,

    /// Smallest face searched for, as WxH.
    #[arg(long, default_value = "250x250", value_parser = parse_size)]
    min_size: (u32, u32),

    /// Largest face searched for, as WxH, or "none" for no limit.
    #[arg(long, default_value = "1200x1200")]
    max_size: String,

    /// Print video metadata and written filenames, log at debug level and
    /// write an annotated copy of the video.
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn detection_config(&self) -> Result<DetectionConfig, String> {
        Ok(DetectionConfig {
            scale_factor: self.scale_factor,
            min_neighbors: Some(self.min_neighbors),
            min_size: self.min_size,
            max_size: parse_max_size(&self.max_size)?,
        })
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = validate(&cli)?;

    let detector = load_detector(cli.backend, &cli.cascade)?;
    let writer = SequentialWriter::new(
        Box::new(ImageFileWriter::new()),
        &cli.output_dir,
        cli.label.as_str(),
    );
    let logger = StdoutPipelineLogger::default().with_diagnostics(cli.debug);

    let mut use_case = ExtractFacesUseCase::new(
        Box::new(FfmpegReader::new()),
        detector,
        CropNormalizer::default(),
        writer,
        config,
        Box::new(logger),
    );
    if cli.debug {
        use_case = use_case.with_annotated_output(
            Box::new(FfmpegWriter::new()),
            cli.output_dir.join(ANNOTATED_VIDEO_NAME),
        );
    }

    let report = use_case.execute(&cli.video)?;
    if report.stopped_early {
        log::warn!(
            "{} ended after {} frames because of a decode error",
            cli.video.display(),
            report.frames_processed
        );
    }
    println!("Extracted frames: {}", report.images_written);
    Ok(())
}

fn load_detector(
    backend: Backend,
    cascade: &Path,
) -> Result<Box<dyn FaceDetector>, ExtractionError> {
    create_detector(backend, cascade).map_err(ExtractionError::from)
}

fn validate(cli: &Cli) -> Result<DetectionConfig, Box<dyn std::error::Error>> {
    if cli.label.is_empty() {
        return Err("Label must not be empty".into());
    }
    if !cli.output_dir.is_dir() {
        return Err(format!(
            "Output directory not found: {}",
            cli.output_dir.display()
        )
        .into());
    }
    if cli.backend == Backend::Cuda && !cuda_available() {
        return Err("The cuda backend needs a build with the 'cuda' feature".into());
    }
    let config = cli.detection_config()?;
    config.validate()?;
    Ok(config)
}

/// Parses `WxH` (also accepts `W,H`) into a pixel size.
fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(&['x', 'X', ','][..])
        .ok_or_else(|| format!("Size must look like WxH, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<u32>()
            .map_err(|_| format!("Size must look like WxH, got '{s}'"))
    };
    Ok((parse(w)?, parse(h)?))
}

fn parse_max_size(s: &str) -> Result<Option<(u32, u32)>, String> {
    if s.eq_ignore_ascii_case("none") {
        Ok(None)
    } else {
        parse_size(s).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("250x250", (250, 250))]
    #[case("640X480", (640, 480))]
    #[case("30,40", (30, 40))]
    #[case(" 12 x 8 ", (12, 8))]
    fn test_parse_size(#[case] input: &str, #[case] expected: (u32, u32)) {
        assert_eq!(parse_size(input.trim()).unwrap(), expected);
    }

    #[rstest]
    #[case("250")]
    #[case("ax250")]
    #[case("250x")]
    #[case("-1x5")]
    fn test_parse_size_rejects_garbage(#[case] input: &str) {
        assert!(parse_size(input).is_err());
    }

    #[test]
    fn test_parse_max_size_none_disables_limit() {
        assert_eq!(parse_max_size("none").unwrap(), None);
        assert_eq!(parse_max_size("NONE").unwrap(), None);
        assert_eq!(parse_max_size("800x600").unwrap(), Some((800, 600)));
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["facecrop", "clip.mp4", "alice"]).unwrap();
        assert_eq!(cli.video, PathBuf::from("clip.mp4"));
        assert_eq!(cli.label, "alice");
        assert_eq!(cli.cascade, PathBuf::from(DEFAULT_CASCADE_PATH));
        assert_eq!(cli.backend, Backend::Cpu);
        assert_eq!(cli.output_dir, PathBuf::from("."));
        assert!(!cli.debug);
        assert_eq!(cli.detection_config().unwrap(), DetectionConfig::default());
    }

    #[rstest]
    #[case::no_arguments(&["facecrop"])]
    #[case::one_argument(&["facecrop", "clip.mp4"])]
    #[case::three_arguments(&["facecrop", "clip.mp4", "alice", "extra"])]
    fn test_wrong_argument_count_is_usage_error(#[case] args: &[&str]) {
        let err = Cli::try_parse_from(args).unwrap_err();
        assert_ne!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_options_override_defaults() {
        let cli = Cli::try_parse_from([
            "facecrop",
            "clip.mp4",
            "bob",
            "--backend",
            "cuda",
            "--scale-factor",
            "1.3",
            "--min-neighbors",
            "5",
            "--min-size",
            "80x80",
            "--max-size",
            "none",
            "--debug",
        ])
        .unwrap();

        assert_eq!(cli.backend, Backend::Cuda);
        assert!(cli.debug);
        let config = cli.detection_config().unwrap();
        assert_eq!(config.scale_factor, 1.3);
        assert_eq!(config.min_neighbors, Some(5));
        assert_eq!(config.min_size, (80, 80));
        assert_eq!(config.max_size, None);
    }

    #[test]
    fn test_missing_cascade_is_a_model_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = match load_detector(Backend::Cpu, &dir.path().join("missing.xml")) {
            Ok(_) => panic!("loading a missing cascade should fail"),
            Err(e) => e,
        };
        assert!(matches!(err, ExtractionError::ModelLoad(_)));
        assert!(err.to_string().contains("missing.xml"));
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        assert!(Cli::try_parse_from(["facecrop", "clip.mp4", "x", "--backend", "tpu"]).is_err());
    }

    #[test]
    fn test_validate_rejects_missing_output_dir() {
        let cli = Cli::try_parse_from([
            "facecrop",
            "clip.mp4",
            "x",
            "--output-dir",
            "/nonexistent/facecrop-out",
        ])
        .unwrap();
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_detection_knobs() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_str().unwrap();
        let cli = Cli::try_parse_from([
            "facecrop",
            "clip.mp4",
            "x",
            "--output-dir",
            out,
            "--scale-factor",
            "1.0",
        ])
        .unwrap();
        assert!(validate(&cli).is_err());

        let cli = Cli::try_parse_from([
            "facecrop",
            "clip.mp4",
            "x",
            "--output-dir",
            out,
            "--min-size",
            "500x500",
            "--max-size",
            "100x100",
        ])
        .unwrap();
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_label() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "facecrop",
            "clip.mp4",
            "",
            "--output-dir",
            dir.path().to_str().unwrap(),
        ])
        .unwrap();
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_validate_accepts_defaults_in_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "facecrop",
            "clip.mp4",
            "alice",
            "--output-dir",
            dir.path().to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(validate(&cli).unwrap(), DetectionConfig::default());
    }
}
