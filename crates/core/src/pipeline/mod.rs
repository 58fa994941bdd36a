pub mod extract_faces_use_case;
pub mod extraction_error;
pub mod frame_annotator;
pub mod pipeline_logger;
pub mod sequential_writer;
