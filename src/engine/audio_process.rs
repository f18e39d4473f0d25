use crate::AudioBuffer;

/// The audio side of an engine
pub trait AudioProcess {
    /// Render the graph into `output_buffer`
    ///
    /// Pending commands are applied first. Until the context is started the
    /// output is silent and time does not advance.
    fn process(&mut self, output_buffer: &mut dyn AudioBuffer);
}
