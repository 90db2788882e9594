use crate::detection::domain::face_box::FaceBox;
use crate::shared::frame::Frame;

/// Domain interface for face detection.
///
/// Takes `&self` so one loaded model can serve concurrent requests;
/// implementations that need mutation guard it internally.
///
/// Returned boxes are ordered by descending confidence. "The first face"
/// of an image therefore means the most confident detection.
pub trait FaceDetector: Send + Sync {
    fn detect(&self, frame: &Frame) -> Result<Vec<FaceBox>, Box<dyn std::error::Error>>;
}
