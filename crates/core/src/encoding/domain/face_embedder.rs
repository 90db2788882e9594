use crate::encoding::domain::face_encoding::FaceEncoding;

/// Turns one face chip (RGB, aligned or cropped) into an encoding.
pub trait FaceEmbedder: Send + Sync {
    fn embed(&self, face: &image::RgbImage) -> Result<FaceEncoding, Box<dyn std::error::Error>>;
}
