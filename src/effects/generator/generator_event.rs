use crate::{
    effects::utility::{next_sequence_number, EventProcessorEvent},
    Timestamp,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeneratorEventType {
    Play,
    Stop,
    CancelAll,
}

#[derive(Debug)]
pub struct GeneratorEvent {
    sequence_number: usize,
    time: Timestamp,
    event_type: GeneratorEventType,
}

impl GeneratorEvent {
    fn new(time: Timestamp, event_type: GeneratorEventType) -> Self {
        Self {
            sequence_number: next_sequence_number(),
            time,
            event_type,
        }
    }

    pub fn play(time: Timestamp) -> Self {
        Self::new(time, GeneratorEventType::Play)
    }

    pub fn stop(time: Timestamp) -> Self {
        Self::new(time, GeneratorEventType::Stop)
    }

    pub fn cancel_all() -> Self {
        Self::new(Timestamp::zero(), GeneratorEventType::CancelAll)
    }

    pub fn get_event_type(&self) -> GeneratorEventType {
        self.event_type
    }
}

impl EventProcessorEvent for GeneratorEvent {
    fn get_time(&self) -> Timestamp {
        self.time
    }

    fn should_clear_queue(&self) -> bool {
        self.event_type == GeneratorEventType::CancelAll
    }

    fn sequence_number(&self) -> usize {
        self.sequence_number
    }
}
