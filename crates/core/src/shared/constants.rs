pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

pub const EMBEDDING_MODEL_NAME: &str = "w600k_r50.onnx";
pub const EMBEDDING_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/w600k_r50.onnx";

/// Only every Nth decoded frame (1-indexed) is compared against the reference.
pub const DEFAULT_SAMPLE_INTERVAL: usize = 10;

/// Maximum cosine distance (1 - similarity) at which two faces count as the
/// same person.
pub const DEFAULT_TOLERANCE: f32 = 0.6;

/// Matched frames needed for a positive verdict.
pub const DEFAULT_MATCH_THRESHOLD: usize = 3;

pub const DEFAULT_IMAGE_EXTENSION: &str = "jpg";
pub const DEFAULT_VIDEO_EXTENSION: &str = "mp4";

pub const TEMP_FILE_PREFIX: &str = "faceverify-";
