use crate::encoding::domain::face_comparator::FaceComparator;
use crate::encoding::domain::face_encoding::FaceEncoding;

/// Matches when the cosine distance `1 - cos(a, b)` is at most the tolerance.
///
/// ArcFace embeddings live on the unit sphere, so a tolerance of 0.6 accepts
/// pairs with cosine similarity of 0.4 or more. Encodings of different length,
/// or with zero magnitude, never match.
#[derive(Clone, Copy, Debug, Default)]
pub struct CosineComparator;

impl FaceComparator for CosineComparator {
    fn matches(&self, reference: &FaceEncoding, candidate: &FaceEncoding, tolerance: f32) -> bool {
        reference
            .cosine_distance(candidate)
            .is_some_and(|d| d <= tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn enc(values: &[f32]) -> FaceEncoding {
        FaceEncoding::new(values.to_vec())
    }

    /// Unit vector at the given cosine similarity to `[1, 0]`.
    fn at_cosine(cos: f32) -> FaceEncoding {
        enc(&[cos, (1.0 - cos * cos).sqrt()])
    }

    #[rstest]
    #[case::identical(at_cosine(1.0), true)]
    #[case::same_person(at_cosine(0.7), true)]
    #[case::half(at_cosine(0.5), true)]
    #[case::just_inside(at_cosine(0.41), true)]
    #[case::just_outside(at_cosine(0.39), false)]
    #[case::weak(at_cosine(0.3), false)]
    #[case::orthogonal(at_cosine(0.0), false)]
    #[case::opposite(enc(&[-1.0, 0.0]), false)]
    #[case::length_mismatch(enc(&[1.0]), false)]
    #[case::zero_vector(enc(&[0.0, 0.0]), false)]
    fn test_matches_at_default_tolerance(#[case] candidate: FaceEncoding, #[case] expected: bool) {
        let reference = enc(&[1.0, 0.0]);
        assert_eq!(
            CosineComparator.matches(&reference, &candidate, 0.6),
            expected
        );
    }

    #[test]
    fn test_tolerance_bound_is_inclusive() {
        let reference = enc(&[1.0, 0.0]);
        assert!(CosineComparator.matches(&reference, &enc(&[0.0, 1.0]), 1.0));
        assert!(!CosineComparator.matches(&reference, &enc(&[0.0, 1.0]), 0.99));
    }

    #[test]
    fn test_magnitude_does_not_matter() {
        let reference = enc(&[10.0, 0.0]);
        assert!(CosineComparator.matches(&reference, &enc(&[0.05, 0.0]), 0.01));
    }
}
