use crate::encoding::domain::face_encoding::FaceEncoding;

/// Decides whether a candidate face belongs to the reference person.
///
/// `tolerance` is the largest embedding distance still treated as a match;
/// how distance is measured is up to the implementation.
pub trait FaceComparator: Send + Sync {
    fn matches(&self, reference: &FaceEncoding, candidate: &FaceEncoding, tolerance: f32) -> bool;
}
