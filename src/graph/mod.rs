mod connection;
mod dsp;
mod dsp_graph;
mod dsp_parameters;
mod garbage_collector;
mod graph_node;
mod topological_sort;

pub use connection::Connection;
pub use dsp::{Dsp, DspProcessor};
pub use dsp_graph::DspGraph;
pub use dsp_parameters::DspParameters;
pub use garbage_collector::{run_garbage_collector, GarbageCollectionCommand};
pub use graph_node::GraphNode;
