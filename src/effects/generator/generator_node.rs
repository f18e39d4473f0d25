use crate::{
    commands::Id,
    effects::Channel,
    graph::{DspParameters, GraphNode},
    parameter::AudioParameter,
    Context, OwnedAudioBuffer, Timestamp, MAXIMUM_CHANNEL_COUNT, MIDDLE_C,
};

use super::{
    generator_event::GeneratorEvent,
    generator_processor::{EventTransmitter, GeneratorProcessor},
    GeneratorSource, Waveform,
};

/// A node that plays a sample or a waveform at a given tone
///
/// Play and stop events are sample accurate. Stopping fades the output out
/// over 10 ms.
pub struct Generator {
    /// The node to connect to the graph
    pub node: GraphNode,

    /// Linear output gain, defaults to unity
    pub gain: AudioParameter,

    /// Frequency in Hz, defaults to middle C
    pub tone: AudioParameter,

    event_transmitter: EventTransmitter,
}

const MIN_GAIN: f64 = 0.0;
const MAX_GAIN: f64 = 16.0;
const DEFAULT_GAIN: f64 = 1.0;

const MIN_TONE: f64 = 0.0;
const MAX_TONE: f64 = 20_000.0;

impl Generator {
    /// Create a generator for `source`
    ///
    /// The generator is silent until it is played.
    pub fn new(context: &dyn Context, source: GeneratorSource) -> Self {
        let id = Id::generate();

        let (gain, realtime_gain) = AudioParameter::new(
            id,
            DEFAULT_GAIN,
            MIN_GAIN,
            MAX_GAIN,
            context.maximum_frame_count(),
            context.get_command_queue(),
        );

        let (tone, realtime_tone) = AudioParameter::new(
            id,
            MIDDLE_C,
            MIN_TONE,
            MAX_TONE,
            context.maximum_frame_count(),
            context.get_command_queue(),
        );

        let (event_transmitter, event_receiver) = Channel::unbounded();

        let processor = Box::new(GeneratorProcessor::new(
            gain.get_id(),
            tone.get_id(),
            source,
            context.get_sample_rate(),
            event_receiver,
        ));

        let node = GraphNode::new(
            id,
            context,
            0,
            MAXIMUM_CHANNEL_COUNT,
            processor,
            DspParameters::new([realtime_gain, realtime_tone]),
        );

        Self {
            node,
            gain,
            tone,
            event_transmitter,
        }
    }

    /// Create a generator that plays a waveform
    pub fn from_waveform(context: &dyn Context, waveform: Waveform) -> Self {
        Self::new(context, GeneratorSource::Waveform(waveform))
    }

    /// Create a generator that plays a sample recorded at `root_frequency`
    pub fn from_sample(
        context: &dyn Context,
        buffer: OwnedAudioBuffer,
        root_frequency: f64,
    ) -> Self {
        Self::new(
            context,
            GeneratorSource::Sample {
                buffer,
                root_frequency,
            },
        )
    }

    /// Play from the beginning at the start of the next block
    pub fn play_now(&mut self) {
        self.play_at_time(Timestamp::zero());
    }

    /// Play from the beginning at `time`
    pub fn play_at_time(&mut self, time: Timestamp) {
        let _ = self.event_transmitter.send(GeneratorEvent::play(time));
    }

    /// Fade out at the start of the next block
    pub fn stop_now(&mut self) {
        self.stop_at_time(Timestamp::zero());
    }

    /// Fade out at `time`
    pub fn stop_at_time(&mut self, time: Timestamp) {
        let _ = self.event_transmitter.send(GeneratorEvent::stop(time));
    }

    /// Discard every event that hasn't happened yet
    pub fn cancel_all(&mut self) {
        let _ = self.event_transmitter.send(GeneratorEvent::cancel_all());
    }
}
