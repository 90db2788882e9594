use crate::encoding::domain::face_encoding::FaceEncoding;
use crate::shared::frame::Frame;

/// Detect-and-encode: one encoding per face found in the frame.
///
/// Encodings come back in detector order (most confident face first).
/// An empty vector means no face was found, which is not an error.
pub trait FaceEncoder: Send + Sync {
    fn encode(&self, frame: &Frame) -> Result<Vec<FaceEncoding>, Box<dyn std::error::Error>>;
}
