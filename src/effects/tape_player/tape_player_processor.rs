use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{
    commands::Id,
    effects::{utility::EventProcessor, Channel},
    graph::{DspParameters, DspProcessor},
    AudioBuffer, OwnedAudioBuffer, SampleLocation, Timestamp,
};

use super::tape_player_event::{TapePlayerEvent, TapePlayerEventType};

const MAX_PENDING_EVENTS: usize = 16;

pub struct TapePlayerProcessor {
    gain_id: Id,
    recording: OwnedAudioBuffer,
    first_frame: usize,
    increment: f64,
    event_processor: EventProcessor<TapePlayerEvent>,
    position: Option<f64>,
    playing: Arc<AtomicBool>,
}

impl TapePlayerProcessor {
    pub fn new(
        gain_id: Id,
        recording: OwnedAudioBuffer,
        first_frame: usize,
        sample_rate: usize,
        event_receiver: Channel::Receiver<TapePlayerEvent>,
        playing: Arc<AtomicBool>,
    ) -> Self {
        Self {
            gain_id,
            increment: recording.sample_rate() as f64 / sample_rate as f64,
            recording,
            first_frame,
            event_processor: EventProcessor::with_capacity(
                MAX_PENDING_EVENTS,
                event_receiver,
                sample_rate,
            ),
            position: None,
            playing,
        }
    }

    fn process_event(&mut self, event: &TapePlayerEvent) {
        self.position = match event.event_type() {
            TapePlayerEventType::Play(tape_frame) => {
                Some(tape_frame.saturating_sub(self.first_frame) as f64)
            }
            TapePlayerEventType::Stop => None,
        };
    }

    fn render(
        &mut self,
        output_buffer: &mut dyn AudioBuffer,
        frames: std::ops::Range<usize>,
        gain: &[f64],
    ) {
        let recording = &self.recording;
        let frame_count = recording.frame_count();

        let Some(last_channel) = recording.channel_count().checked_sub(1) else {
            self.position = None;
            return;
        };

        for frame in frames {
            let Some(position) = self.position else {
                return;
            };

            let index = position.floor() as usize;
            if index >= frame_count {
                self.position = None;
                return;
            }

            let fraction = (position - index as f64) as f32;
            let amplitude = gain[frame] as f32;

            for channel in 0..output_buffer.channel_count() {
                let source_channel = channel.min(last_channel);
                let current = recording.get_sample(SampleLocation::new(source_channel, index));
                let next = if index + 1 < frame_count {
                    recording.get_sample(SampleLocation::new(source_channel, index + 1))
                } else {
                    current
                };

                let value = current + (next - current) * fraction;
                output_buffer.set_sample(SampleLocation::new(channel, frame), value * amplitude);
            }

            self.position = Some(position + self.increment);
        }
    }
}

impl DspProcessor for TapePlayerProcessor {
    fn process_audio(
        &mut self,
        _input_buffer: &dyn AudioBuffer,
        output_buffer: &mut dyn AudioBuffer,
        start_time: &Timestamp,
        parameters: &DspParameters,
    ) {
        self.event_processor.receive_events();

        let frame_count = output_buffer.frame_count();
        let gain = parameters.get_parameter_values(self.gain_id, frame_count);

        let mut position = 0;

        while position < frame_count {
            let (end_frame, event) =
                self.event_processor
                    .next_event(start_time, position, frame_count);

            self.render(output_buffer, position..end_frame, gain);
            position = end_frame;

            if let Some(event) = event {
                self.process_event(&event);
            }
        }

        self.playing
            .store(self.position.is_some(), Ordering::Release);
    }
}
