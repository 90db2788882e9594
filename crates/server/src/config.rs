use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use faceverify_core::detection::infrastructure::onnx_yolo_detector::DEFAULT_CONFIDENCE;
use faceverify_core::shared::constants::{
    DEFAULT_MATCH_THRESHOLD, DEFAULT_SAMPLE_INTERVAL, DEFAULT_TOLERANCE,
};
use faceverify_core::verification::domain::verification_policy::{
    PolicyError, ReferenceFacePolicy, VerificationPolicy,
};

const BYTES_PER_MB: usize = 1024 * 1024;

/// Verifies that the face in a profile photo appears in a video clip.
#[derive(Parser, Debug)]
#[command(name = "faceverify")]
pub struct Cli {
    /// Address to listen on.
    #[arg(long, env = "FACEVERIFY_BIND", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// Compare every Nth video frame (1-indexed).
    #[arg(long, env = "FACEVERIFY_SAMPLE_INTERVAL", default_value_t = DEFAULT_SAMPLE_INTERVAL)]
    pub sample_interval: usize,

    /// Largest cosine distance (1 - similarity) still counted as the same person.
    #[arg(long, env = "FACEVERIFY_TOLERANCE", default_value_t = DEFAULT_TOLERANCE)]
    pub tolerance: f32,

    /// Matched frames needed for a positive verdict.
    #[arg(long, env = "FACEVERIFY_MATCH_THRESHOLD", default_value_t = DEFAULT_MATCH_THRESHOLD)]
    pub match_threshold: usize,

    /// Reject profile images that show more than one face.
    #[arg(long, env = "FACEVERIFY_REJECT_MULTIPLE_FACES")]
    pub reject_multiple_faces: bool,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, env = "FACEVERIFY_CONFIDENCE", default_value_t = DEFAULT_CONFIDENCE)]
    pub confidence: f64,

    /// Directory with bundled ONNX models, checked before the cache.
    #[arg(long, env = "FACEVERIFY_MODEL_DIR")]
    pub model_dir: Option<PathBuf>,

    /// Maximum request body size in megabytes.
    #[arg(long, env = "FACEVERIFY_MAX_UPLOAD_MB", default_value = "100")]
    pub max_upload_mb: usize,
}

impl Cli {
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!(
                "Confidence must be between 0.0 and 1.0, got {}",
                self.confidence
            )
            .into());
        }
        if self.max_upload_mb == 0 {
            return Err("Max upload size must be at least 1 MB".into());
        }
        if let Some(dir) = &self.model_dir {
            if !dir.is_dir() {
                return Err(format!("Model directory not found: {}", dir.display()).into());
            }
        }
        self.policy()?;
        Ok(())
    }

    pub fn policy(&self) -> Result<VerificationPolicy, PolicyError> {
        let reference_faces = if self.reject_multiple_faces {
            ReferenceFacePolicy::RejectMultiple
        } else {
            ReferenceFacePolicy::First
        };
        VerificationPolicy::new(
            self.sample_interval,
            self.tolerance,
            self.match_threshold,
            reference_faces,
        )
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(BYTES_PER_MB)
    }
}
