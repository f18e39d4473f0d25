use crate::{commands::Id, Command, CommandQueue, Context};

use super::{Connection, Dsp, DspParameters, DspProcessor};

/// A handle to a node in the render graph
///
/// Dropping the handle removes the node from the graph.
pub struct GraphNode {
    id: Id,
    command_queue: Box<dyn CommandQueue>,
}

impl GraphNode {
    pub(crate) fn new(
        id: Id,
        context: &dyn Context,
        input_count: usize,
        output_count: usize,
        processor: Box<dyn DspProcessor + Send>,
        parameters: DspParameters,
    ) -> Self {
        let command_queue = context.get_command_queue();

        let dsp = Dsp::new(
            id,
            input_count,
            output_count,
            processor,
            parameters,
            context.maximum_frame_count(),
            context.get_sample_rate(),
        );

        dsp.add_to_audio_process(command_queue.as_ref());

        Self { id, command_queue }
    }

    /// Send the output of this node to the input of `node`
    ///
    /// Connections that would create a cycle are ignored.
    pub fn connect_to(&self, node: &GraphNode) {
        self.command_queue
            .send(Command::AddConnection(Connection::new(self.id, node.id)));
    }

    /// Remove a connection made with [`GraphNode::connect_to`]
    pub fn disconnect_from(&self, node: &GraphNode) {
        self.command_queue
            .send(Command::RemoveConnection(Connection::new(self.id, node.id)));
    }

    /// Mix the output of this node into the graph output
    pub fn connect_to_output(&self) {
        self.command_queue.send(Command::ConnectToOutput(self.id));
    }

    /// Stop mixing this node into the graph output
    pub fn disconnect_from_output(&self) {
        self.command_queue.send(Command::DisconnectFromOutput(self.id));
    }
}

impl Drop for GraphNode {
    fn drop(&mut self) {
        Dsp::remove_from_audio_process(self.id, self.command_queue.as_ref());
    }
}
