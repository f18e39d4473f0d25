use std::time::Duration;

use rand::{rngs::StdRng, SeedableRng};

use crate::{
    commands::Id,
    effects::{
        utility::{EventProcessor, Fade},
        Channel,
    },
    graph::{DspParameters, DspProcessor},
    AudioBuffer, OwnedAudioBuffer, SampleLocation, Timestamp,
};

use super::{
    generator_event::{GeneratorEvent, GeneratorEventType},
    GeneratorSource, Waveform,
};

pub type EventReceiver = Channel::Receiver<GeneratorEvent>;
pub type EventTransmitter = Channel::Sender<GeneratorEvent>;

const FADE_OUT_LENGTH: Duration = Duration::from_millis(10);
const MAX_PENDING_EVENTS: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Stopped,
    Playing,
    FadingOut(usize),
}

enum RealtimeSource {
    Sample {
        buffer: OwnedAudioBuffer,
        increment_per_hz: f64,
    },
    Waveform(Waveform),
}

pub struct GeneratorProcessor {
    gain_id: Id,
    tone_id: Id,
    source: RealtimeSource,
    sample_rate: usize,
    event_processor: EventProcessor<GeneratorEvent>,
    phase: Phase,
    position: f64,
    fade: Fade,
    random_generator: StdRng,
}

impl DspProcessor for GeneratorProcessor {
    fn process_audio(
        &mut self,
        _input_buffer: &dyn AudioBuffer,
        output_buffer: &mut dyn AudioBuffer,
        start_time: &Timestamp,
        parameters: &DspParameters,
    ) {
        debug_assert_eq!(self.sample_rate, output_buffer.sample_rate());

        self.event_processor.receive_events();

        let frame_count = output_buffer.frame_count();
        let gain = parameters.get_parameter_values(self.gain_id, frame_count);
        let tone = parameters.get_parameter_values(self.tone_id, frame_count);

        let mut position = 0;

        while position < frame_count {
            let (end_frame, event) =
                self.event_processor
                    .next_event(start_time, position, frame_count);

            self.render(output_buffer, position..end_frame, gain, tone);
            position = end_frame;

            if let Some(event) = event {
                self.process_event(&event);
            }
        }
    }
}

impl GeneratorProcessor {
    pub fn new(
        gain_id: Id,
        tone_id: Id,
        source: GeneratorSource,
        sample_rate: usize,
        event_receiver: EventReceiver,
    ) -> Self {
        let source = match source {
            GeneratorSource::Sample {
                buffer,
                root_frequency,
            } => {
                let increment_per_hz =
                    buffer.sample_rate() as f64 / (sample_rate as f64 * root_frequency);
                RealtimeSource::Sample {
                    buffer,
                    increment_per_hz,
                }
            }
            GeneratorSource::Waveform(waveform) => RealtimeSource::Waveform(waveform),
        };

        Self {
            gain_id,
            tone_id,
            source,
            sample_rate,
            event_processor: EventProcessor::with_capacity(
                MAX_PENDING_EVENTS,
                event_receiver,
                sample_rate,
            ),
            phase: Phase::Stopped,
            position: 0.0,
            fade: Fade::new(FADE_OUT_LENGTH, sample_rate),
            random_generator: StdRng::from_rng(&mut rand::rng()),
        }
    }

    fn process_event(&mut self, event: &GeneratorEvent) {
        match event.get_event_type() {
            GeneratorEventType::Play => {
                self.phase = Phase::Playing;
                self.position = 0.0;
            }
            GeneratorEventType::Stop => {
                if self.phase == Phase::Playing {
                    self.phase = Phase::FadingOut(0);
                }
            }
            GeneratorEventType::CancelAll => (),
        }
    }

    fn render(
        &mut self,
        output_buffer: &mut dyn AudioBuffer,
        frames: std::ops::Range<usize>,
        gain: &[f64],
        tone: &[f64],
    ) {
        for frame in frames {
            let envelope = match self.phase {
                Phase::Stopped => return,
                Phase::Playing => 1.0,
                Phase::FadingOut(fade_position) => {
                    if fade_position >= self.fade.len() {
                        self.phase = Phase::Stopped;
                        return;
                    }

                    self.phase = Phase::FadingOut(fade_position + 1);
                    self.fade.fade_out_value(fade_position)
                }
            };

            let amplitude = envelope * gain[frame] as f32;

            if !self.render_frame(output_buffer, frame, tone[frame], amplitude) {
                self.phase = Phase::Stopped;
                return;
            }
        }
    }

    /// Returns false once a sample has played to its end
    fn render_frame(
        &mut self,
        output_buffer: &mut dyn AudioBuffer,
        frame: usize,
        tone: f64,
        amplitude: f32,
    ) -> bool {
        match &self.source {
            RealtimeSource::Waveform(waveform) => {
                let value =
                    waveform.value(self.position, &mut self.random_generator) as f32 * amplitude;

                for channel in 0..output_buffer.channel_count() {
                    output_buffer.set_sample(SampleLocation::new(channel, frame), value);
                }

                self.position = (self.position + tone / self.sample_rate as f64).fract();
                true
            }
            RealtimeSource::Sample {
                buffer,
                increment_per_hz,
            } => {
                let index = self.position.floor() as usize;

                if index >= buffer.frame_count() || buffer.channel_count() == 0 {
                    return false;
                }

                let fraction = (self.position - index as f64) as f32;
                let last_channel = buffer.channel_count() - 1;

                for channel in 0..output_buffer.channel_count() {
                    let source_channel = channel.min(last_channel);
                    let current = buffer.get_sample(SampleLocation::new(source_channel, index));
                    let next = if index + 1 < buffer.frame_count() {
                        buffer.get_sample(SampleLocation::new(source_channel, index + 1))
                    } else {
                        current
                    };

                    let value = current + (next - current) * fraction;
                    let location = SampleLocation::new(channel, frame);
                    output_buffer.set_sample(location, value * amplitude);
                }

                self.position += tone * increment_per_hz;
                true
            }
        }
    }
}
