use crate::detection::domain::face_landmarks::FaceLandmarks;

/// A detected face in frame pixel coordinates, `[x1, y1)` to `[x2, y2)`.
///
/// `landmarks` is set when the model has a keypoint head.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub confidence: f64,
    pub landmarks: Option<FaceLandmarks>,
}

impl FaceBox {
    pub fn width(&self) -> f64 {
        (self.x2 - self.x1).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.y2 - self.y1).max(0.0)
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    /// Grows the box by `margin` (fraction of its size) on every side and
    /// clamps it to the frame. Returns integer pixel bounds `(x, y, w, h)`,
    /// or `None` if nothing of the box lies inside the frame.
    pub fn crop_bounds(
        &self,
        margin: f64,
        frame_width: u32,
        frame_height: u32,
    ) -> Option<(u32, u32, u32, u32)> {
        let dx = self.width() * margin;
        let dy = self.height() * margin;
        let x1 = (self.x1 - dx).max(0.0).floor();
        let y1 = (self.y1 - dy).max(0.0).floor();
        let x2 = (self.x2 + dx).min(frame_width as f64).ceil();
        let y2 = (self.y2 + dy).min(frame_height as f64).ceil();
        if x2 - x1 < 1.0 || y2 - y1 < 1.0 {
            return None;
        }
        Some((x1 as u32, y1 as u32, (x2 - x1) as u32, (y2 - y1) as u32))
    }
}
