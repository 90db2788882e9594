use crate::detection::domain::face_box::FaceBox;
use crate::detection::domain::face_detector::FaceDetector;
use crate::encoding::domain::face_embedder::FaceEmbedder;
use crate::encoding::domain::face_encoder::FaceEncoder;
use crate::encoding::domain::face_encoding::FaceEncoding;
use crate::encoding::infrastructure::face_aligner::align_face;
use crate::shared::frame::Frame;

/// Extra context around each detected box when it has to be cropped
/// instead of aligned, as a fraction of the box size.
pub const DEFAULT_CROP_MARGIN: f64 = 0.1;

/// Detect, align, embed: the detect-and-encode step built from a detector
/// and an embedder.
///
/// Faces with all five landmarks are warped onto the ArcFace template; the
/// rest fall back to a margin-expanded box crop.
pub struct DetectingFaceEncoder {
    detector: Box<dyn FaceDetector>,
    embedder: Box<dyn FaceEmbedder>,
    crop_margin: f64,
}

impl DetectingFaceEncoder {
    pub fn new(detector: Box<dyn FaceDetector>, embedder: Box<dyn FaceEmbedder>) -> Self {
        Self {
            detector,
            embedder,
            crop_margin: DEFAULT_CROP_MARGIN,
        }
    }

    pub fn with_crop_margin(mut self, margin: f64) -> Self {
        self.crop_margin = margin.max(0.0);
        self
    }

    fn face_chip(&self, rgb: &image::RgbImage, face: &FaceBox) -> Option<image::RgbImage> {
        if let Some(landmarks) = face.landmarks.as_ref().filter(|l| l.is_complete()) {
            if let Some(aligned) = align_face(rgb, landmarks) {
                return Some(aligned);
            }
        }
        let (x, y, w, h) = face.crop_bounds(self.crop_margin, rgb.width(), rgb.height())?;
        Some(image::imageops::crop_imm(rgb, x, y, w, h).to_image())
    }
}

impl FaceEncoder for DetectingFaceEncoder {
    fn encode(&self, frame: &Frame) -> Result<Vec<FaceEncoding>, Box<dyn std::error::Error>> {
        let boxes = self.detector.detect(frame)?;
        if boxes.is_empty() {
            return Ok(Vec::new());
        }

        let rgb = frame
            .to_rgb_image()
            .ok_or("Frame buffer does not match its dimensions")?;

        let mut encodings = Vec::with_capacity(boxes.len());
        for face in &boxes {
            let Some(chip) = self.face_chip(&rgb, face) else {
                continue;
            };
            encodings.push(self.embedder.embed(&chip)?);
        }
        Ok(encodings)
    }
}
