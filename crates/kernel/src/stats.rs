/// Rolling frame-time history plus session counters.
#[derive(Debug, Clone)]
pub struct FrameStats {
    history: Vec<f32>,
    capacity: usize,
    index: usize,
    filled: bool,
    frames: u64,
    failures: u64,
    blocked_axes: u64,
    transitions: u64,
}

impl FrameStats {
    /// Keep the last `capacity` frame deltas (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: vec![0.0; capacity],
            capacity,
            index: 0,
            filled: false,
            frames: 0,
            failures: 0,
            blocked_axes: 0,
            transitions: 0,
        }
    }

    pub fn record(&mut self, dt: f32) {
        self.history[self.index] = dt;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
        self.frames += 1;
    }

    pub(crate) fn record_failure(&mut self) {
        self.failures += 1;
    }

    pub(crate) fn record_blocked(&mut self, axes: u64) {
        self.blocked_axes += axes;
    }

    pub(crate) fn record_transition(&mut self) {
        self.transitions += 1;
    }

    fn window(&self) -> &[f32] {
        let count = if self.filled { self.capacity } else { self.index };
        &self.history[..count]
    }

    /// Mean delta over the window, seconds.
    pub fn average(&self) -> f32 {
        let window = self.window();
        if window.is_empty() {
            return 0.0;
        }
        window.iter().sum::<f32>() / window.len() as f32
    }

    pub fn max(&self) -> f32 {
        self.window().iter().copied().fold(0.0, f32::max)
    }

    /// Frames completed successfully.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames that failed and were skipped.
    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Total axis moves refused by collision.
    pub fn blocked_axes(&self) -> u64 {
        self.blocked_axes
    }

    pub fn transitions(&self) -> u64 {
        self.transitions
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(120)
    }
}
