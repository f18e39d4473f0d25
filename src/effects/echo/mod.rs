mod echo_node;
mod echo_processor;

pub use echo_node::Echo;
