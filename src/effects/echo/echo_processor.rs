use crate::{
    commands::Id,
    graph::{DspParameters, DspProcessor},
    AudioBuffer, SampleLocation, Timestamp,
};

pub const MAX_DELAY_SECONDS: f64 = 1.0;
pub const MAX_ECHO_COUNT: usize = 8;

pub struct EchoProcessor {
    delay_id: Id,
    decay_id: Id,
    echo_count_id: Id,
    sample_rate: usize,
    history: Vec<Vec<f32>>,
    write_position: usize,
}

impl EchoProcessor {
    pub fn new(
        delay_id: Id,
        decay_id: Id,
        echo_count_id: Id,
        sample_rate: usize,
        channel_count: usize,
    ) -> Self {
        let max_delay_frames = (MAX_DELAY_SECONDS * sample_rate as f64).ceil() as usize;
        let history_length = MAX_ECHO_COUNT * max_delay_frames + 1;

        Self {
            delay_id,
            decay_id,
            echo_count_id,
            sample_rate,
            history: vec![vec![0.0; history_length]; channel_count],
            write_position: 0,
        }
    }

    fn echoes(&self, channel: usize, delay_frames: usize, decay: f32, echo_count: usize) -> f32 {
        let history = &self.history[channel];
        let length = history.len();

        let mut sum = 0.0;
        let mut gain = 1.0;

        for echo in 1..=echo_count {
            gain *= decay;
            let read_position = (self.write_position + length - echo * delay_frames) % length;
            sum += gain * history[read_position];
        }

        sum
    }
}

impl DspProcessor for EchoProcessor {
    fn process_audio(
        &mut self,
        input_buffer: &dyn AudioBuffer,
        output_buffer: &mut dyn AudioBuffer,
        _start_time: &Timestamp,
        parameters: &DspParameters,
    ) {
        let frame_count = output_buffer.frame_count().min(input_buffer.frame_count());
        let channel_count = output_buffer.channel_count().min(self.history.len());

        let delay = parameters.get_parameter_values(self.delay_id, frame_count);
        let decay = parameters.get_parameter_values(self.decay_id, frame_count);
        let echo_count = parameters.get_parameter_values(self.echo_count_id, frame_count);

        let Some(last_input_channel) = input_buffer.channel_count().checked_sub(1) else {
            return;
        };

        let Some(history_length) = self.history.first().map(Vec::len) else {
            return;
        };

        for frame in 0..frame_count {
            let delay_frames = (delay[frame] * self.sample_rate as f64).round() as usize;
            let echo_count = if delay_frames == 0 {
                0
            } else {
                (echo_count[frame].round() as usize).min(MAX_ECHO_COUNT)
            };

            for channel in 0..channel_count {
                let input = input_buffer.get_sample(SampleLocation::new(
                    channel.min(last_input_channel),
                    frame,
                ));

                self.history[channel][self.write_position] = input;

                let echoes = self.echoes(channel, delay_frames, decay[frame] as f32, echo_count);
                output_buffer.set_sample(SampleLocation::new(channel, frame), input + echoes);
            }

            self.write_position = (self.write_position + 1) % history_length;
        }
    }
}
