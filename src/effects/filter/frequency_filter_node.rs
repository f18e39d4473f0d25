use crate::{
    commands::Id,
    graph::{DspParameters, GraphNode},
    parameter::AudioParameter,
    Context,
};

use super::frequency_filter_processor::FrequencyFilterProcessor;

/// Removes frequencies outside a band
///
/// A high-pass stage removes everything below `high_pass`, then a low-pass
/// stage removes everything above `low_pass`. Both stages share the
/// `resonance`, which boosts frequencies near the cutoffs as it rises.
pub struct FrequencyFilter {
    /// The node to connect to the graph
    pub node: GraphNode,

    /// Cutoff of the low-pass stage in Hz, defaults to 20 kHz
    pub low_pass: AudioParameter,

    /// Cutoff of the high-pass stage in Hz, defaults to 20 Hz
    pub high_pass: AudioParameter,

    /// Q of both stages, defaults to a flat response
    pub resonance: AudioParameter,
}

pub const MIN_FREQUENCY: f64 = 20.0;
pub const MAX_FREQUENCY: f64 = 20_000.0;
pub const FLAT_RESONANCE: f64 = std::f64::consts::FRAC_1_SQRT_2;

const MIN_RESONANCE: f64 = 0.1;
const MAX_RESONANCE: f64 = 10.0;

impl FrequencyFilter {
    /// Create a filter with `channel_count` inputs and outputs
    pub fn new(context: &dyn Context, channel_count: usize) -> Self {
        let id = Id::generate();
        let frame_count = context.maximum_frame_count();

        let (low_pass, realtime_low_pass) = AudioParameter::new(
            id,
            MAX_FREQUENCY,
            MIN_FREQUENCY,
            MAX_FREQUENCY,
            frame_count,
            context.get_command_queue(),
        );

        let (high_pass, realtime_high_pass) = AudioParameter::new(
            id,
            MIN_FREQUENCY,
            MIN_FREQUENCY,
            MAX_FREQUENCY,
            frame_count,
            context.get_command_queue(),
        );

        let (resonance, realtime_resonance) = AudioParameter::new(
            id,
            FLAT_RESONANCE,
            MIN_RESONANCE,
            MAX_RESONANCE,
            frame_count,
            context.get_command_queue(),
        );

        let processor = Box::new(FrequencyFilterProcessor::new(
            low_pass.get_id(),
            high_pass.get_id(),
            resonance.get_id(),
            context.get_sample_rate(),
            channel_count,
        ));

        let node = GraphNode::new(
            id,
            context,
            channel_count,
            channel_count,
            processor,
            DspParameters::new([realtime_low_pass, realtime_high_pass, realtime_resonance]),
        );

        Self {
            node,
            low_pass,
            high_pass,
            resonance,
        }
    }
}
