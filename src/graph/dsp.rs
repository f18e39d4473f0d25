use crate::{
    commands::{Id, ParameterChangeRequest},
    AudioBuffer, Command, CommandQueue, MutableBorrowedAudioBuffer, OwnedAudioBuffer, Timestamp,
};

use super::DspParameters;

/// Renders one block of audio for a node in the graph
pub trait DspProcessor {
    /// Write `output_buffer.frame_count()` frames into `output_buffer`
    ///
    /// The output buffer is silent when this is called.
    fn process_audio(
        &mut self,
        input_buffer: &dyn AudioBuffer,
        output_buffer: &mut dyn AudioBuffer,
        start_time: &Timestamp,
        parameters: &DspParameters,
    );
}

/// The audio-side state of a node
pub struct Dsp {
    id: Id,
    input_count: usize,
    output_count: usize,
    processor: Box<dyn DspProcessor + Send>,
    parameters: DspParameters,
    output_buffer: OwnedAudioBuffer,
}

impl Dsp {
    pub fn new(
        id: Id,
        input_count: usize,
        output_count: usize,
        processor: Box<dyn DspProcessor + Send>,
        parameters: DspParameters,
        maximum_frame_count: usize,
        sample_rate: usize,
    ) -> Self {
        Self {
            id,
            input_count,
            output_count,
            processor,
            parameters,
            output_buffer: OwnedAudioBuffer::new(maximum_frame_count, output_count, sample_rate),
        }
    }

    pub fn add_to_audio_process(self, command_queue: &dyn CommandQueue) {
        command_queue.send(Command::AddDsp(Box::new(self)));
    }

    pub fn remove_from_audio_process(id: Id, command_queue: &dyn CommandQueue) {
        command_queue.send(Command::RemoveDsp(id));
    }

    pub fn get_id(&self) -> Id {
        self.id
    }

    pub fn input_count(&self) -> usize {
        self.input_count
    }

    pub fn output_count(&self) -> usize {
        self.output_count
    }

    /// The output rendered by the last call to [`Dsp::process_audio`]
    pub fn output_buffer(&self) -> &dyn AudioBuffer {
        &self.output_buffer
    }

    pub fn process_audio(
        &mut self,
        input_buffer: &dyn AudioBuffer,
        frame_count: usize,
        start_time: &Timestamp,
    ) {
        let frame_count = frame_count.min(self.output_buffer.frame_count());
        let sample_rate = self.output_buffer.sample_rate();

        for parameter in self.parameters.iter_mut() {
            parameter.process(start_time, frame_count, sample_rate);
        }

        let mut output_buffer =
            MutableBorrowedAudioBuffer::slice_frames(&mut self.output_buffer, 0, frame_count);
        output_buffer.clear();

        self.processor.process_audio(
            input_buffer,
            &mut output_buffer,
            start_time,
            &self.parameters,
        );
    }

    pub fn request_parameter_change(&mut self, request: ParameterChangeRequest) -> bool {
        match self.parameters.get_parameter_mut(request.parameter_id) {
            Some(parameter) => {
                parameter.add_parameter_change(request.change);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::SampleLocation;

    use super::*;

    struct PassThrough;

    impl DspProcessor for PassThrough {
        fn process_audio(
            &mut self,
            input_buffer: &dyn AudioBuffer,
            output_buffer: &mut dyn AudioBuffer,
            _start_time: &Timestamp,
            _parameters: &DspParameters,
        ) {
            let channel_count = input_buffer.channel_count().min(output_buffer.channel_count());
            output_buffer.copy_from(
                input_buffer,
                SampleLocation::origin(),
                SampleLocation::origin(),
                channel_count,
                output_buffer.frame_count(),
            );
        }
    }

    #[test]
    fn processes_into_its_own_output_buffer() {
        let mut dsp = Dsp::new(
            Id::generate(),
            1,
            1,
            Box::new(PassThrough),
            DspParameters::empty(),
            64,
            44_100,
        );

        let mut input = OwnedAudioBuffer::new(32, 1, 44_100);
        input.fill_with_value(0.5);

        dsp.process_audio(&input, 32, &Timestamp::zero());

        let output = dsp.output_buffer();
        assert_relative_eq!(output.get_sample(SampleLocation::frame(31)), 0.5);
        assert_relative_eq!(output.get_sample(SampleLocation::frame(32)), 0.0);
    }

    #[test]
    fn unknown_parameter_changes_are_rejected() {
        let mut dsp = Dsp::new(
            Id::generate(),
            0,
            1,
            Box::new(PassThrough),
            DspParameters::empty(),
            64,
            44_100,
        );

        let accepted = dsp.request_parameter_change(ParameterChangeRequest {
            dsp_id: dsp.get_id(),
            parameter_id: Id::generate(),
            change: crate::parameter::ParameterChange::immediate(1.0, Timestamp::zero()),
        });

        assert!(!accepted);
    }
}
