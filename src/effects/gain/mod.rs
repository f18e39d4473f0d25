mod gain_node;
mod gain_processor;

pub use gain_node::Gain;
