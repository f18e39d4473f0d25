use std::collections::HashMap;

use crossbeam::channel::Sender;

use crate::{
    commands::{Id, ParameterChangeRequest},
    AudioBuffer, MutableBorrowedAudioBuffer, OwnedAudioBuffer, SampleLocation, Timestamp,
    MAXIMUM_CHANNEL_COUNT,
};

use super::{
    topological_sort::TopologicalSort, Connection, Dsp, GarbageCollectionCommand,
};

const INITIAL_DSP_CAPACITY: usize = 128;

/// The audio-side render graph
pub struct DspGraph {
    dsps: HashMap<Id, Box<Dsp>>,
    connections: Vec<Connection>,
    output_connections: Vec<Id>,
    order: Vec<Id>,
    topological_sort: TopologicalSort,
    input_buffer: OwnedAudioBuffer,
    maximum_frame_count: usize,
    garbage_collector: Sender<GarbageCollectionCommand>,
}

impl DspGraph {
    pub fn new(
        maximum_frame_count: usize,
        sample_rate: usize,
        garbage_collector: Sender<GarbageCollectionCommand>,
    ) -> Self {
        Self {
            dsps: HashMap::with_capacity(INITIAL_DSP_CAPACITY),
            connections: Vec::with_capacity(INITIAL_DSP_CAPACITY),
            output_connections: Vec::with_capacity(INITIAL_DSP_CAPACITY),
            order: Vec::with_capacity(INITIAL_DSP_CAPACITY),
            topological_sort: TopologicalSort::with_capacity(INITIAL_DSP_CAPACITY),
            input_buffer: OwnedAudioBuffer::new(
                maximum_frame_count,
                MAXIMUM_CHANNEL_COUNT,
                sample_rate,
            ),
            maximum_frame_count,
            garbage_collector,
        }
    }

    #[cfg(test)]
    pub fn dsp_count(&self) -> usize {
        self.dsps.len()
    }

    pub fn add_dsp(&mut self, dsp: Box<Dsp>) {
        let id = dsp.get_id();
        if let Some(previous) = self.dsps.insert(id, dsp) {
            tracing::warn!(?id, "Replacing a DSP with the same id");
            self.dispose(previous);
        }

        self.update_order();
    }

    pub fn remove_dsp(&mut self, id: Id) {
        match self.dsps.remove(&id) {
            Some(dsp) => {
                self.connections.retain(|connection| !connection.involves(id));
                self.output_connections.retain(|output_id| *output_id != id);
                self.update_order();
                self.dispose(dsp);
            }
            None => tracing::warn!(?id, "Attempt to remove an unknown DSP"),
        }
    }

    pub fn add_connection(&mut self, connection: Connection) {
        if !self.dsps.contains_key(&connection.source)
            || !self.dsps.contains_key(&connection.destination)
        {
            tracing::warn!(?connection, "Connection refers to an unknown DSP");
            return;
        }

        if self.connections.contains(&connection) {
            return;
        }

        self.connections.push(connection);

        if !self.update_order() {
            tracing::warn!(?connection, "Connection would create a cycle");
            self.connections.pop();
            self.update_order();
        }
    }

    pub fn remove_connection(&mut self, connection: Connection) {
        self.connections.retain(|existing| *existing != connection);
        self.update_order();
    }

    pub fn connect_to_output(&mut self, id: Id) {
        if !self.dsps.contains_key(&id) {
            tracing::warn!(?id, "Attempt to connect an unknown DSP to the output");
            return;
        }

        if !self.output_connections.contains(&id) {
            self.output_connections.push(id);
        }
    }

    pub fn disconnect_from_output(&mut self, id: Id) {
        self.output_connections.retain(|output_id| *output_id != id);
    }

    pub fn request_parameter_change(&mut self, request: ParameterChangeRequest) {
        let dsp_id = request.dsp_id;
        let parameter_id = request.parameter_id;

        match self.dsps.get_mut(&dsp_id) {
            Some(dsp) => {
                if !dsp.request_parameter_change(request) {
                    tracing::warn!(?dsp_id, ?parameter_id, "Unknown parameter");
                }
            }
            None => tracing::warn!(?dsp_id, "Parameter change for an unknown DSP"),
        }
    }

    /// Render every DSP and mix the ones connected to the output into `output_buffer`
    pub fn process(&mut self, output_buffer: &mut dyn AudioBuffer, start_time: &Timestamp) {
        output_buffer.clear();

        let frame_count = output_buffer.frame_count().min(self.maximum_frame_count);

        for index in 0..self.order.len() {
            let id = self.order[index];

            let mut dsp = match self.dsps.remove(&id) {
                Some(dsp) => dsp,
                None => continue,
            };

            let channel_count = dsp.input_count().min(self.input_buffer.channel_count());
            let mut input_buffer = MutableBorrowedAudioBuffer::slice(
                &mut self.input_buffer,
                0,
                channel_count,
                0,
                frame_count,
            );
            input_buffer.clear();

            for connection in self
                .connections
                .iter()
                .filter(|connection| connection.destination == id)
            {
                if let Some(source) = self.dsps.get(&connection.source) {
                    let source_channels = source.output_count().min(channel_count);
                    input_buffer.add_from(
                        source.output_buffer(),
                        SampleLocation::origin(),
                        SampleLocation::origin(),
                        source_channels,
                        frame_count,
                    );
                }
            }

            dsp.process_audio(&input_buffer, frame_count, start_time);

            self.dsps.insert(id, dsp);
        }

        for id in self.output_connections.iter() {
            if let Some(dsp) = self.dsps.get(id) {
                let channel_count = dsp.output_count().min(output_buffer.channel_count());
                output_buffer.add_from(
                    dsp.output_buffer(),
                    SampleLocation::origin(),
                    SampleLocation::origin(),
                    channel_count,
                    frame_count,
                );
            }
        }
    }

    fn update_order(&mut self) -> bool {
        match self
            .topological_sort
            .sort(self.dsps.keys().copied(), &self.connections)
        {
            Some(order) => {
                self.order.clear();
                self.order.extend_from_slice(order);
                true
            }
            None => false,
        }
    }

    fn dispose(&self, dsp: Box<Dsp>) {
        if let Err(error) = self
            .garbage_collector
            .try_send(GarbageCollectionCommand::DisposeDsp(dsp))
        {
            tracing::warn!("Garbage collector unavailable, dropping DSP on the audio thread");
            drop(error.into_inner());
        }
    }
}
