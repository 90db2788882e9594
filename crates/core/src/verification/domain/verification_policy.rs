use thiserror::Error;

use crate::shared::constants::{
    DEFAULT_MATCH_THRESHOLD, DEFAULT_SAMPLE_INTERVAL, DEFAULT_TOLERANCE,
};

#[derive(Error, Debug, PartialEq)]
pub enum PolicyError {
    #[error("sample interval must be >= 1, got {0}")]
    SampleInterval(usize),
    #[error("tolerance must be a positive finite number, got {0}")]
    Tolerance(f32),
    #[error("match threshold must be >= 1, got {0}")]
    MatchThreshold(usize),
}

/// What to do when the reference image shows more than one face.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReferenceFacePolicy {
    /// Use the detector's first face, i.e. the most confident one.
    #[default]
    First,
    /// Treat several faces as ambiguous input and reject the request.
    RejectMultiple,
}

/// The knobs of the decision rule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VerificationPolicy {
    sample_interval: usize,
    tolerance: f32,
    match_threshold: usize,
    reference_faces: ReferenceFacePolicy,
}

impl VerificationPolicy {
    pub fn new(
        sample_interval: usize,
        tolerance: f32,
        match_threshold: usize,
        reference_faces: ReferenceFacePolicy,
    ) -> Result<Self, PolicyError> {
        if sample_interval < 1 {
            return Err(PolicyError::SampleInterval(sample_interval));
        }
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(PolicyError::Tolerance(tolerance));
        }
        if match_threshold < 1 {
            return Err(PolicyError::MatchThreshold(match_threshold));
        }
        Ok(Self {
            sample_interval,
            tolerance,
            match_threshold,
            reference_faces,
        })
    }

    pub fn sample_interval(&self) -> usize {
        self.sample_interval
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    pub fn match_threshold(&self) -> usize {
        self.match_threshold
    }

    pub fn reference_faces(&self) -> ReferenceFacePolicy {
        self.reference_faces
    }
}

impl Default for VerificationPolicy {
    fn default() -> Self {
        Self {
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            tolerance: DEFAULT_TOLERANCE,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            reference_faces: ReferenceFacePolicy::First,
        }
    }
}
