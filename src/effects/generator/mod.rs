mod generator_event;
mod generator_node;
mod generator_processor;
mod source;
mod waveform;

pub use generator_node::Generator;
pub use source::GeneratorSource;
pub use waveform::Waveform;
