//! Five facial keypoints from the pose head of the detector.

/// Order: left eye, right eye, nose, left mouth corner, right mouth corner.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceLandmarks {
    /// Frame pixel coordinates. Points with x <= 0 were not confidently
    /// detected.
    points: [(f64, f64); 5],
}

impl FaceLandmarks {
    pub fn new(points: [(f64, f64); 5]) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[(f64, f64); 5] {
        &self.points
    }

    /// True when every keypoint was detected, which alignment needs.
    pub fn is_complete(&self) -> bool {
        self.points.iter().all(|(x, _)| *x > 0.0)
    }
}
