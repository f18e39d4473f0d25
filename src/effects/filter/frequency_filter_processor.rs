use crate::{
    commands::Id,
    graph::{DspParameters, DspProcessor},
    AudioBuffer, SampleLocation, Timestamp,
};

use super::{
    biquad::{BiquadCoefficients, BiquadState},
    frequency_filter_node::{FLAT_RESONANCE, MAX_FREQUENCY, MIN_FREQUENCY},
};

#[derive(Clone, Copy, PartialEq)]
struct Settings {
    low_pass: f64,
    high_pass: f64,
    resonance: f64,
}

struct Stages {
    high_pass: BiquadCoefficients,
    low_pass: BiquadCoefficients,
}

impl Stages {
    fn new(settings: &Settings, sample_rate: usize) -> Self {
        let sample_rate = sample_rate as f64;

        Self {
            high_pass: BiquadCoefficients::high_pass(
                settings.high_pass,
                sample_rate,
                settings.resonance,
            ),
            low_pass: BiquadCoefficients::low_pass(
                settings.low_pass,
                sample_rate,
                settings.resonance,
            ),
        }
    }
}

pub struct FrequencyFilterProcessor {
    low_pass_id: Id,
    high_pass_id: Id,
    resonance_id: Id,
    sample_rate: usize,
    settings: Settings,
    stages: Stages,
    states: Vec<[BiquadState; 2]>,
}

impl FrequencyFilterProcessor {
    pub fn new(
        low_pass_id: Id,
        high_pass_id: Id,
        resonance_id: Id,
        sample_rate: usize,
        channel_count: usize,
    ) -> Self {
        let settings = Settings {
            low_pass: MAX_FREQUENCY,
            high_pass: MIN_FREQUENCY,
            resonance: FLAT_RESONANCE,
        };

        Self {
            low_pass_id,
            high_pass_id,
            resonance_id,
            sample_rate,
            stages: Stages::new(&settings, sample_rate),
            settings,
            states: vec![[BiquadState::default(); 2]; channel_count],
        }
    }
}

impl DspProcessor for FrequencyFilterProcessor {
    fn process_audio(
        &mut self,
        input_buffer: &dyn AudioBuffer,
        output_buffer: &mut dyn AudioBuffer,
        _start_time: &Timestamp,
        parameters: &DspParameters,
    ) {
        let frame_count = output_buffer.frame_count().min(input_buffer.frame_count());
        let channel_count = output_buffer.channel_count().min(self.states.len());

        let low_pass = parameters.get_parameter_values(self.low_pass_id, frame_count);
        let high_pass = parameters.get_parameter_values(self.high_pass_id, frame_count);
        let resonance = parameters.get_parameter_values(self.resonance_id, frame_count);

        let Some(last_input_channel) = input_buffer.channel_count().checked_sub(1) else {
            return;
        };

        for frame in 0..frame_count {
            let settings = Settings {
                low_pass: low_pass[frame],
                high_pass: high_pass[frame],
                resonance: resonance[frame],
            };

            if settings != self.settings {
                self.stages = Stages::new(&settings, self.sample_rate);
                self.settings = settings;
            }

            for channel in 0..channel_count {
                let input = input_buffer.get_sample(SampleLocation::new(
                    channel.min(last_input_channel),
                    frame,
                )) as f64;

                let [high_pass_state, low_pass_state] = &mut self.states[channel];
                let high_passed = high_pass_state.process(&self.stages.high_pass, input);
                let output = low_pass_state.process(&self.stages.low_pass, high_passed);

                output_buffer.set_sample(SampleLocation::new(channel, frame), output as f32);
            }
        }
    }
}
