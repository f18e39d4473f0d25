use crate::{
    commands::Id,
    graph::{DspParameters, DspProcessor},
    AudioBuffer, SampleLocation, Timestamp,
};

/// Scales its input by the gain parameter
///
/// Output channels beyond the input's channel count repeat the last input
/// channel, so a mono input fills a stereo output.
pub struct GainProcessor {
    gain_id: Id,
}

impl GainProcessor {
    pub fn new(gain_id: Id) -> Self {
        Self { gain_id }
    }
}

impl DspProcessor for GainProcessor {
    fn process_audio(
        &mut self,
        input_buffer: &dyn AudioBuffer,
        output_buffer: &mut dyn AudioBuffer,
        _start_time: &Timestamp,
        parameters: &DspParameters,
    ) {
        let frame_count = output_buffer.frame_count().min(input_buffer.frame_count());
        let gain = parameters.get_parameter_values(self.gain_id, frame_count);

        let Some(last_input_channel) = input_buffer.channel_count().checked_sub(1) else {
            return;
        };

        for channel in 0..output_buffer.channel_count() {
            let input = input_buffer
                .get_channel_data(SampleLocation::channel(channel.min(last_input_channel)));
            let output = output_buffer.get_channel_data_mut(SampleLocation::channel(channel));

            for ((output, input), gain) in output.iter_mut().zip(input).zip(gain).take(frame_count)
            {
                *output = *input * *gain as f32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use atomic_float::AtomicF64;

    use crate::{parameter::RealtimeAudioParameter, OwnedAudioBuffer};

    use super::*;

    #[test]
    fn mono_input_fills_every_output_channel() {
        let gain_id = Id::generate();
        let parameters = DspParameters::new([RealtimeAudioParameter::new(
            gain_id,
            Arc::new(AtomicF64::new(0.5)),
            0.0,
            1.0,
            2,
        )]);

        let input = OwnedAudioBuffer::from_channels(&[vec![1.0, 0.5]], 44_100);
        let mut output = OwnedAudioBuffer::new(2, 2, 44_100);

        let mut processor = GainProcessor::new(gain_id);
        processor.process_audio(&input, &mut output, &Timestamp::zero(), &parameters);

        assert_eq!(output.get_channel_data(SampleLocation::channel(0)), &[0.5, 0.25]);
        assert_eq!(output.get_channel_data(SampleLocation::channel(1)), &[0.5, 0.25]);
    }
}
