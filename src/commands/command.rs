use crate::{
    graph::{Connection, Dsp},
    parameter::ParameterChange,
};

use super::Id;

/// Asks the node `dsp_id` to schedule a change to one of its parameters
pub struct ParameterChangeRequest {
    pub dsp_id: Id,
    pub parameter_id: Id,
    pub change: ParameterChange,
}

/// A change to the render graph, applied on the audio side before the next block
pub enum Command {
    Start,
    Stop,

    AddDsp(Box<Dsp>),
    RemoveDsp(Id),

    AddConnection(Connection),
    RemoveConnection(Connection),

    ConnectToOutput(Id),
    DisconnectFromOutput(Id),

    ParameterValueChange(ParameterChangeRequest),
}
