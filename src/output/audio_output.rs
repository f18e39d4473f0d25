use std::time::Duration;

use super::{OutputError, OutputId, OutputSettings, OutputState};

/// A destination for rendered audio
///
/// Outputs are created closed. They must be opened and started before pushed
/// blocks are used, and should be closed to release the device or finish the
/// file.
pub trait AudioOutput {
    /// The id of this output
    fn id(&self) -> OutputId;

    /// The shape of the blocks this output accepts
    fn settings(&self) -> &OutputSettings;

    /// Where the output is in its lifecycle
    fn state(&self) -> OutputState;

    /// Whether the output can accept another block now
    fn is_ready(&self) -> bool;

    /// Push one interleaved block of `frames_per_buffer * channel_count` samples
    ///
    /// Blocks pushed while the output isn't running are ignored.
    fn push(&mut self, data: &[f32]) -> Result<(), OutputError>;

    /// Acquire the device or file
    fn open(&mut self) -> Result<(), OutputError>;

    /// Start accepting blocks
    fn start(&mut self) -> Result<(), OutputError>;

    /// Stop accepting blocks
    fn stop(&mut self) -> Result<(), OutputError>;

    /// Release the device or finish the file
    fn close(&mut self) -> Result<(), OutputError>;

    /// The average time between pushed blocks
    fn latency(&self) -> Option<Duration>;
}
