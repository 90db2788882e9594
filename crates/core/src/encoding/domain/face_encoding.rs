/// Fixed-length embedding summarizing one detected face.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceEncoding(Vec<f32>);

impl FaceEncoding {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Cosine similarity in `[-1, 1]`.
    ///
    /// `None` when the dimensions differ or either vector has zero length,
    /// since the angle is undefined then.
    pub fn cosine_similarity(&self, other: &FaceEncoding) -> Option<f32> {
        if self.len() != other.len() {
            return None;
        }
        let dot: f64 = self
            .0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (*a as f64) * (*b as f64))
            .sum();
        let norm_a = norm(&self.0);
        let norm_b = norm(&other.0);
        if norm_a == 0.0 || norm_b == 0.0 {
            return None;
        }
        Some((dot / (norm_a * norm_b)).clamp(-1.0, 1.0) as f32)
    }

    /// `1 - cosine_similarity`: 0 for the same direction, 2 for opposite ones.
    pub fn cosine_distance(&self, other: &FaceEncoding) -> Option<f32> {
        self.cosine_similarity(other).map(|s| 1.0 - s)
    }
}

fn norm(v: &[f32]) -> f64 {
    v.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt()
}
