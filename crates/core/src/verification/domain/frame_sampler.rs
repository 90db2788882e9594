/// Selects every Nth frame in decode order.
///
/// The counter is bumped before the test, so with interval 10 the frames at
/// ordinals 10, 20, 30 ... are sampled and the very first frame never is
/// (unless the interval is 1).
#[derive(Debug)]
pub struct FrameSampler {
    interval: usize,
    seen: usize,
}

impl FrameSampler {
    /// An interval of 0 is treated as 1.
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
            seen: 0,
        }
    }

    /// Registers one decoded frame; returns whether it should be examined.
    pub fn admit(&mut self) -> bool {
        self.seen += 1;
        self.seen % self.interval == 0
    }

    /// Frames registered so far.
    pub fn seen(&self) -> usize {
        self.seen
    }
}
