use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{effects::Channel, Timestamp};

/// Orders events sent for the same time
pub fn next_sequence_number() -> usize {
    static SEQUENCE_NUMBER: AtomicUsize = AtomicUsize::new(0);
    SEQUENCE_NUMBER.fetch_add(1, Ordering::Relaxed)
}

pub trait EventProcessorEvent {
    fn get_time(&self) -> Timestamp;
    fn should_clear_queue(&self) -> bool;
    fn sequence_number(&self) -> usize;
}

/// Holds timed events until the block they fall in is rendered
pub struct EventProcessor<Event>
where
    Event: EventProcessorEvent,
{
    pending_events: Vec<Event>,
    receive_channel: Channel::Receiver<Event>,
    sample_rate: usize,
}

impl<Event> EventProcessor<Event>
where
    Event: EventProcessorEvent,
{
    pub fn with_capacity(
        capacity: usize,
        receive_channel: Channel::Receiver<Event>,
        sample_rate: usize,
    ) -> Self {
        Self {
            pending_events: Vec::with_capacity(capacity),
            receive_channel,
            sample_rate,
        }
    }

    pub fn receive_events(&mut self) {
        let mut sort_required = false;

        while let Ok(event) = self.receive_channel.try_recv() {
            if event.should_clear_queue() {
                self.pending_events.clear();
                continue;
            }

            self.pending_events.push(event);
            sort_required = true;
        }

        if sort_required {
            self.pending_events.sort_by(|a, b| {
                a.get_time()
                    .cmp(&b.get_time())
                    .then(a.sequence_number().cmp(&b.sequence_number()))
            });
        }
    }

    #[cfg(test)]
    pub fn pending_event_count(&self) -> usize {
        self.pending_events.len()
    }

    /// Find the next event that falls in the block starting at `frame_start_time`
    ///
    /// Returns the frame the event should be applied at, or `frame_count` when
    /// there are no more events in this block. Events in the past are applied
    /// at `current_frame`.
    pub fn next_event(
        &mut self,
        frame_start_time: &Timestamp,
        current_frame: usize,
        frame_count: usize,
    ) -> (usize, Option<Event>) {
        let frame_end_time = frame_start_time.incremented_by_samples(frame_count, self.sample_rate);

        match self.pending_events.first() {
            Some(next_event) if next_event.get_time() < frame_end_time => {
                let event = self.pending_events.remove(0);

                let position_in_frame = (event.get_time() - *frame_start_time)
                    .as_samples(self.sample_rate)
                    .round()
                    .max(0.0) as usize;

                (
                    position_in_frame.clamp(current_frame, frame_count),
                    Some(event),
                )
            }
            _ => (frame_count, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestEvent {
        time: Timestamp,
        sequence_number: usize,
        clears: bool,
    }

    impl EventProcessorEvent for TestEvent {
        fn get_time(&self) -> Timestamp {
            self.time
        }

        fn should_clear_queue(&self) -> bool {
            self.clears
        }

        fn sequence_number(&self) -> usize {
            self.sequence_number
        }
    }

    fn event(seconds: f64, sequence_number: usize) -> TestEvent {
        TestEvent {
            time: Timestamp::from_seconds(seconds),
            sequence_number,
            clears: false,
        }
    }

    const SAMPLE_RATE: usize = 1_000;

    fn make_processor() -> (Channel::Sender<TestEvent>, EventProcessor<TestEvent>) {
        let (sender, receiver) = Channel::unbounded();
        (sender, EventProcessor::with_capacity(8, receiver, SAMPLE_RATE))
    }

    #[test]
    fn events_are_placed_at_their_frame() {
        let (sender, mut processor) = make_processor();
        sender.send(event(0.025, 0)).unwrap();
        processor.receive_events();

        let (frame, found) = processor.next_event(&Timestamp::zero(), 0, 100);
        assert_eq!(frame, 25);
        assert!(found.is_some());

        let (frame, found) = processor.next_event(&Timestamp::zero(), 25, 100);
        assert_eq!(frame, 100);
        assert!(found.is_none());
    }

    #[test]
    fn future_events_wait_for_their_block() {
        let (sender, mut processor) = make_processor();
        sender.send(event(0.5, 0)).unwrap();
        processor.receive_events();

        let (frame, found) = processor.next_event(&Timestamp::zero(), 0, 100);
        assert_eq!(frame, 100);
        assert!(found.is_none());
        assert_eq!(processor.pending_event_count(), 1);
    }

    #[test]
    fn past_events_apply_immediately() {
        let (sender, mut processor) = make_processor();
        sender.send(event(0.0, 0)).unwrap();
        processor.receive_events();

        let block_start = Timestamp::from_seconds(2.0);
        let (frame, found) = processor.next_event(&block_start, 10, 100);
        assert_eq!(frame, 10);
        assert!(found.is_some());
    }

    #[test]
    fn simultaneous_events_keep_their_order() {
        let (sender, mut processor) = make_processor();
        sender.send(event(0.01, 7)).unwrap();
        sender.send(event(0.01, 3)).unwrap();
        processor.receive_events();

        let (_, first) = processor.next_event(&Timestamp::zero(), 0, 100);
        assert_eq!(first.map(|event| event.sequence_number), Some(3));
    }

    #[test]
    fn clearing_event_drops_pending_events() {
        let (sender, mut processor) = make_processor();
        sender.send(event(0.5, 0)).unwrap();
        sender
            .send(TestEvent {
                time: Timestamp::zero(),
                sequence_number: 1,
                clears: true,
            })
            .unwrap();
        sender.send(event(0.6, 2)).unwrap();
        processor.receive_events();

        assert_eq!(processor.pending_event_count(), 1);
    }
}
