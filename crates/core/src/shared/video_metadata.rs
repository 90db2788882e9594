use std::path::PathBuf;

/// What a reader learned about its source when it was opened.
///
/// `total_frames` is the container's estimate and may be 0 when unknown;
/// the verification tally counts decoded frames itself. Still images report
/// one frame at `fps == 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: usize,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}
