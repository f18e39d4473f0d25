mod event_processor;
mod fade;

pub use event_processor::EventProcessor;
pub use event_processor::EventProcessorEvent;
pub use event_processor::next_sequence_number;
pub use fade::Fade;
