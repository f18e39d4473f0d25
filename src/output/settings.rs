use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

/// The shape of the blocks pushed to an output
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Frames in one block
    pub frames_per_buffer: usize,

    /// Frames per second
    pub sample_rate: usize,

    /// Interleaved channels per frame
    pub channel_count: usize,
}

impl OutputSettings {
    /// Create output settings
    pub fn new(frames_per_buffer: usize, sample_rate: usize, channel_count: usize) -> Self {
        Self {
            frames_per_buffer,
            sample_rate,
            channel_count,
        }
    }

    /// The length of one interleaved block
    pub fn samples_per_buffer(&self) -> usize {
        self.frames_per_buffer * self.channel_count
    }
}

/// Identifies an output for the lifetime of the process
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OutputId(usize);

impl OutputId {
    /// Generate a new unique id
    pub fn generate() -> Self {
        static NEXT_ID: AtomicUsize = AtomicUsize::new(0);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw value of the id
    pub fn value(&self) -> usize {
        self.0
    }
}
