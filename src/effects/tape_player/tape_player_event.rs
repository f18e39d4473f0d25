use crate::{
    effects::utility::{next_sequence_number, EventProcessorEvent},
    Timestamp,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapePlayerEventType {
    /// Play from a tape frame
    Play(usize),
    Stop,
}

#[derive(Debug)]
pub struct TapePlayerEvent {
    sequence_number: usize,
    time: Timestamp,
    event_type: TapePlayerEventType,
}

impl TapePlayerEvent {
    pub fn play(tape_frame: usize, time: Timestamp) -> Self {
        Self {
            sequence_number: next_sequence_number(),
            time,
            event_type: TapePlayerEventType::Play(tape_frame),
        }
    }

    pub fn stop(time: Timestamp) -> Self {
        Self {
            sequence_number: next_sequence_number(),
            time,
            event_type: TapePlayerEventType::Stop,
        }
    }

    pub fn event_type(&self) -> TapePlayerEventType {
        self.event_type
    }
}

impl EventProcessorEvent for TapePlayerEvent {
    fn get_time(&self) -> Timestamp {
        self.time
    }

    fn should_clear_queue(&self) -> bool {
        false
    }

    fn sequence_number(&self) -> usize {
        self.sequence_number
    }
}
