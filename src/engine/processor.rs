use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

use crossbeam::channel::{Receiver, Sender};

use crate::{
    graph::{DspGraph, GarbageCollectionCommand},
    AudioBuffer, AudioProcess, Command, MutableBorrowedAudioBuffer, Timestamp,
};

pub struct Processor {
    started: bool,
    sample_rate: usize,
    maximum_frame_count: usize,
    sample_position: usize,
    command_rx: Receiver<Command>,
    timestamp: Arc<AtomicI64>,
    graph: DspGraph,
}

impl Processor {
    pub fn new(
        sample_rate: usize,
        maximum_frame_count: usize,
        command_rx: Receiver<Command>,
        garbage_collector: Sender<GarbageCollectionCommand>,
        timestamp: Arc<AtomicI64>,
    ) -> Self {
        Self {
            started: false,
            sample_rate,
            maximum_frame_count,
            sample_position: 0,
            command_rx,
            timestamp,
            graph: DspGraph::new(maximum_frame_count, sample_rate, garbage_collector),
        }
    }

    fn process_commands(&mut self) {
        while let Ok(command) = self.command_rx.try_recv() {
            match command {
                Command::Start => self.started = true,
                Command::Stop => self.started = false,
                Command::AddDsp(dsp) => self.graph.add_dsp(dsp),
                Command::RemoveDsp(id) => self.graph.remove_dsp(id),
                Command::AddConnection(connection) => self.graph.add_connection(connection),
                Command::RemoveConnection(connection) => self.graph.remove_connection(connection),
                Command::ConnectToOutput(id) => self.graph.connect_to_output(id),
                Command::DisconnectFromOutput(id) => self.graph.disconnect_from_output(id),
                Command::ParameterValueChange(request) => {
                    self.graph.request_parameter_change(request)
                }
            }
        }
    }

    fn current_time(&self) -> Timestamp {
        Timestamp::from_samples(self.sample_position as f64, self.sample_rate)
    }
}

impl AudioProcess for Processor {
    fn process(&mut self, output_buffer: &mut dyn AudioBuffer) {
        self.process_commands();

        if !self.started {
            output_buffer.clear();
            return;
        }

        let frame_count = output_buffer.frame_count();
        let mut offset = 0;

        while offset < frame_count {
            let frames_this_time = self.maximum_frame_count.min(frame_count - offset);

            let mut block =
                MutableBorrowedAudioBuffer::slice_frames(output_buffer, offset, frames_this_time);

            let start_time = self.current_time();
            self.graph.process(&mut block, &start_time);

            self.sample_position += frames_this_time;
            self.timestamp
                .store(self.current_time().as_raw_i64(), Ordering::Release);

            offset += frames_this_time;
        }
    }
}
