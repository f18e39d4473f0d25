use crate::{
    commands::Id,
    graph::{DspParameters, GraphNode},
    parameter::AudioParameter,
    Context, Level,
};

use super::gain_processor::GainProcessor;

/// A bus that scales everything connected to it
///
/// A mono input is copied to every output channel.
pub struct Gain {
    /// The node to connect to the graph
    pub node: GraphNode,

    /// Linear gain, defaults to unity
    pub gain: AudioParameter,
}

const MIN_GAIN: f64 = 0.0;
const MAX_GAIN: f64 = 16.0;
const DEFAULT_GAIN: f64 = 1.0;

impl Gain {
    /// Create a bus with `channel_count` inputs and outputs
    pub fn new(context: &dyn Context, channel_count: usize) -> Self {
        let id = Id::generate();

        let (gain, realtime_gain) = AudioParameter::new(
            id,
            DEFAULT_GAIN,
            MIN_GAIN,
            MAX_GAIN,
            context.maximum_frame_count(),
            context.get_command_queue(),
        );

        let processor = Box::new(GainProcessor::new(gain.get_id()));

        Self {
            node: GraphNode::new(
                id,
                context,
                channel_count,
                channel_count,
                processor,
                DspParameters::new([realtime_gain]),
            ),
            gain,
        }
    }

    /// Change the gain, starting at the next block
    pub fn set_level(&mut self, level: Level) {
        self.gain.set_value_now(level.as_linear());
    }

    /// The gain applied to the last rendered frame
    pub fn level(&self) -> Level {
        Level::from_linear(self.gain.get_value())
    }
}
