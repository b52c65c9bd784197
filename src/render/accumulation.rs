//! Ping-pong sample bookkeeping for the accumulation buffer pair.
//!
//! After `N` calls to [`AccumulationState::advance`] since the last reset,
//! buffer `N % 2` holds the estimate over `N` samples and the other buffer
//! holds the estimate over `N - 1`. The trace for sample `N + 1` reads the
//! former and writes the latter, so no buffer is read and written in the
//! same pass.

/// Buffer role selection over a running sample index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccumulationState {
    sample_index: u32,
}

impl AccumulationState {
    pub const fn new() -> Self {
        Self { sample_index: 0 }
    }

    pub fn sample_index(&self) -> u32 {
        self.sample_index
    }

    /// Buffer holding the newest estimate.
    pub fn current_index(&self) -> usize {
        (self.sample_index % 2) as usize
    }

    /// Buffer holding the estimate one sample older.
    pub fn previous_index(&self) -> usize {
        1 - self.current_index()
    }

    /// Buffer the next trace reads as history.
    pub fn read_index(&self) -> usize {
        self.current_index()
    }

    /// Buffer the next trace writes; becomes current after [`Self::advance`].
    pub fn write_index(&self) -> usize {
        self.previous_index()
    }

    /// Record one traced sample. Call exactly once per traced frame.
    pub fn advance(&mut self) {
        self.sample_index = self.sample_index.wrapping_add(1);
    }

    /// Discard accumulated history.
    pub fn reset(&mut self) {
        self.sample_index = 0;
    }

    /// Blend weight the shader gives the new sample: `1 / (n + 1)`.
    pub fn blend_weight(&self) -> f32 {
        1.0 / (self.sample_index as f32 + 1.0)
    }
}
