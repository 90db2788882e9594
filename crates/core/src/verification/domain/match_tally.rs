/// Per-request counters for one verification run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchTally {
    pub total_frames: usize,
    pub sampled_frames: usize,
    pub matched_frames: usize,
}

impl MatchTally {
    pub fn record_sampled(&mut self, matched: bool) {
        self.sampled_frames += 1;
        if matched {
            self.matched_frames += 1;
        }
    }
}

/// The outcome handed back to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub verified: bool,
    pub tally: MatchTally,
}

impl Verdict {
    /// Applies the decision rule: verified iff matched frames reach the threshold.
    pub fn decide(tally: MatchTally, match_threshold: usize) -> Self {
        Self {
            verified: tally.matched_frames >= match_threshold,
            tally,
        }
    }
}
