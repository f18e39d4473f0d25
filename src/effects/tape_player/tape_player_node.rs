use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{
    commands::Id,
    effects::Channel,
    graph::{DspParameters, GraphNode},
    parameter::AudioParameter,
    AudioTape, Context, Timestamp, MAXIMUM_CHANNEL_COUNT,
};

use super::{tape_player_event::TapePlayerEvent, tape_player_processor::TapePlayerProcessor};

/// Plays the frames held on an [`AudioTape`] back into the graph
///
/// The player takes a copy of the tape when it is created, so recording more
/// onto the tape afterwards doesn't change what is played. Positions are tape
/// frames, counted the same way as [`AudioTape::playback`]. A tape recorded
/// at another sample rate is resampled.
pub struct TapePlayer {
    /// The node to connect to the graph
    pub node: GraphNode,

    /// Linear output gain, defaults to unity
    pub gain: AudioParameter,

    event_transmitter: Channel::Sender<TapePlayerEvent>,
    playing: Arc<AtomicBool>,
    first_frame: usize,
    end_frame: usize,
}

const MIN_GAIN: f64 = 0.0;
const MAX_GAIN: f64 = 16.0;
const DEFAULT_GAIN: f64 = 1.0;

impl TapePlayer {
    /// Create a stopped player for the frames currently on `tape`
    pub fn new(context: &dyn Context, tape: &AudioTape) -> Self {
        let id = Id::generate();

        let (gain, realtime_gain) = AudioParameter::new(
            id,
            DEFAULT_GAIN,
            MIN_GAIN,
            MAX_GAIN,
            context.maximum_frame_count(),
            context.get_command_queue(),
        );

        let first_frame = tape.first_frame();
        let recording = tape.playback(first_frame, tape.len());

        let (event_transmitter, event_receiver) = Channel::unbounded();
        let playing = Arc::new(AtomicBool::new(false));

        let processor = Box::new(TapePlayerProcessor::new(
            gain.get_id(),
            recording,
            first_frame,
            context.get_sample_rate(),
            event_receiver,
            Arc::clone(&playing),
        ));

        let node = GraphNode::new(
            id,
            context,
            0,
            MAXIMUM_CHANNEL_COUNT,
            processor,
            DspParameters::new([realtime_gain]),
        );

        Self {
            node,
            gain,
            event_transmitter,
            playing,
            first_frame,
            end_frame: first_frame + tape.len(),
        }
    }

    /// Play from `tape_frame` at the start of the next block
    pub fn play_from(&mut self, tape_frame: usize) {
        self.play_from_at_time(tape_frame, Timestamp::zero());
    }

    /// Play from `tape_frame` at `time`
    ///
    /// A frame that has slid off the start of a bounded tape plays from the
    /// oldest frame held.
    pub fn play_from_at_time(&mut self, tape_frame: usize, time: Timestamp) {
        let _ = self
            .event_transmitter
            .send(TapePlayerEvent::play(tape_frame, time));
    }

    /// Stop at the start of the next block
    pub fn stop_now(&mut self) {
        self.stop_at_time(Timestamp::zero());
    }

    /// Stop at `time`
    pub fn stop_at_time(&mut self, time: Timestamp) {
        let _ = self.event_transmitter.send(TapePlayerEvent::stop(time));
    }

    /// Whether the last rendered block was playing
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }

    /// The first tape frame the player holds
    pub fn first_frame(&self) -> usize {
        self.first_frame
    }

    /// The tape frame after the last one the player holds
    pub fn end_frame(&self) -> usize {
        self.end_frame
    }
}
