use crate::{
    commands::Id,
    graph::{DspParameters, GraphNode},
    parameter::AudioParameter,
    Context,
};

use super::echo_processor::{EchoProcessor, MAX_DELAY_SECONDS, MAX_ECHO_COUNT};

/// Repeats its input a number of times, each repeat quieter than the last
///
/// The n-th repeat arrives `n * delay` seconds after the input and is scaled
/// by `decay` raised to the power n.
pub struct Echo {
    /// The node to connect to the graph
    pub node: GraphNode,

    /// Seconds between repeats, up to one second
    pub delay: AudioParameter,

    /// Gain applied once per repeat, between 0 and 1
    pub decay: AudioParameter,

    /// The number of repeats, rounded to a whole number
    pub echo_count: AudioParameter,
}

const DEFAULT_DELAY_SECONDS: f64 = 0.5;
const DEFAULT_DECAY: f64 = 0.5;
const DEFAULT_ECHO_COUNT: f64 = 5.0;

impl Echo {
    /// Create an echo with `channel_count` inputs and outputs
    pub fn new(context: &dyn Context, channel_count: usize) -> Self {
        let id = Id::generate();
        let frame_count = context.maximum_frame_count();

        let (delay, realtime_delay) = AudioParameter::new(
            id,
            DEFAULT_DELAY_SECONDS,
            0.0,
            MAX_DELAY_SECONDS,
            frame_count,
            context.get_command_queue(),
        );

        let (decay, realtime_decay) = AudioParameter::new(
            id,
            DEFAULT_DECAY,
            0.0,
            1.0,
            frame_count,
            context.get_command_queue(),
        );

        let (echo_count, realtime_echo_count) = AudioParameter::new(
            id,
            DEFAULT_ECHO_COUNT,
            0.0,
            MAX_ECHO_COUNT as f64,
            frame_count,
            context.get_command_queue(),
        );

        let processor = Box::new(EchoProcessor::new(
            delay.get_id(),
            decay.get_id(),
            echo_count.get_id(),
            context.get_sample_rate(),
            channel_count,
        ));

        let node = GraphNode::new(
            id,
            context,
            channel_count,
            channel_count,
            processor,
            DspParameters::new([realtime_delay, realtime_decay, realtime_echo_count]),
        );

        Self {
            node,
            delay,
            decay,
            echo_count,
        }
    }
}
