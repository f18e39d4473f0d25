use crate::{Command, Timestamp};

/// Delivers commands to the audio side
pub trait CommandQueue {
    /// Queue `command` for the next block
    fn send(&self, command: Command);
}

/// The control side of the engine
///
/// Nodes are created against a context and send their changes through it.
pub trait Context {
    /// Start the audio context
    ///
    /// Before this is called, audio will not be processed and time will not
    /// advance
    fn start(&mut self);

    /// Stop the audio context
    fn stop(&mut self);

    /// Get the current time in the audio context
    ///
    /// If the audio process runs on a different thread, the time may advance
    /// between asking for the time and using it.
    fn current_time(&self) -> Timestamp;

    /// Get the sample rate of the audio context
    fn get_sample_rate(&self) -> usize;

    /// The largest number of frames a node renders at once
    fn maximum_frame_count(&self) -> usize;

    /// Get the command queue to send commands to the context
    fn get_command_queue(&self) -> Box<dyn CommandQueue>;
}
