use std::sync::{atomic::Ordering, Arc};

use atomic_float::AtomicF64;

use crate::{
    commands::{Command, Id, ParameterChangeRequest},
    CommandQueue, Timestamp,
};

use super::{ParameterChange, RealtimeAudioParameter};

/// A parameter that can be automated from the control side
///
/// Changes are sent to the audio side and applied sample accurately. The
/// value reported by [`AudioParameter::get_value`] is the last value the
/// audio side rendered.
pub struct AudioParameter {
    dsp_id: Id,
    parameter_id: Id,
    value: Arc<AtomicF64>,
    minimum_value: f64,
    maximum_value: f64,
    command_queue: Box<dyn CommandQueue>,
}

impl AudioParameter {
    pub(crate) fn new(
        dsp_id: Id,
        initial_value: f64,
        minimum_value: f64,
        maximum_value: f64,
        maximum_frame_count: usize,
        command_queue: Box<dyn CommandQueue>,
    ) -> (Self, RealtimeAudioParameter) {
        assert!(minimum_value < maximum_value);
        assert!((minimum_value..=maximum_value).contains(&initial_value));

        let parameter_id = Id::generate();
        let value = Arc::new(AtomicF64::new(initial_value));
        let realtime_parameter = RealtimeAudioParameter::new(
            parameter_id,
            Arc::clone(&value),
            minimum_value,
            maximum_value,
            maximum_frame_count,
        );

        (
            Self {
                dsp_id,
                parameter_id,
                value,
                minimum_value,
                maximum_value,
                command_queue,
            },
            realtime_parameter,
        )
    }

    pub(crate) fn get_id(&self) -> Id {
        self.parameter_id
    }

    /// The most recent value rendered on the audio side
    pub fn get_value(&self) -> f64 {
        self.value.load(Ordering::Acquire)
    }

    /// Jump to `value` at `at_time`
    pub fn set_value_at_time(&mut self, value: f64, at_time: Timestamp) {
        self.send_change(ParameterChange::immediate(value, at_time));
    }

    /// Jump to `value` at the start of the next rendered block
    pub fn set_value_now(&mut self, value: f64) {
        self.send_change(ParameterChange::immediate(value, Timestamp::zero()));
    }

    /// Ramp linearly from the previous change to `value`, arriving at `end_time`
    pub fn linear_ramp_to_value(&mut self, value: f64, end_time: Timestamp) {
        self.send_change(ParameterChange::ramp(value, end_time));
    }

    fn send_change(&mut self, mut change: ParameterChange) {
        change.value = change.value.clamp(self.minimum_value, self.maximum_value);

        self.command_queue
            .send(Command::ParameterValueChange(ParameterChangeRequest {
                dsp_id: self.dsp_id,
                parameter_id: self.parameter_id,
                change,
            }));
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crossbeam::channel as Channel;

    use super::*;

    struct CapturingQueue {
        sender: Channel::Sender<Command>,
    }

    impl CommandQueue for CapturingQueue {
        fn send(&self, command: Command) {
            let _ = self.sender.send(command);
        }
    }

    fn make_parameter() -> (AudioParameter, Channel::Receiver<Command>) {
        let (sender, receiver) = Channel::unbounded();
        let (parameter, _) = AudioParameter::new(
            Id::generate(),
            0.5,
            0.0,
            1.0,
            64,
            Box::new(CapturingQueue { sender }),
        );
        (parameter, receiver)
    }

    fn received_change(receiver: &Channel::Receiver<Command>) -> ParameterChange {
        match receiver.try_recv() {
            Ok(Command::ParameterValueChange(request)) => request.change,
            _ => panic!("Expected a parameter change"),
        }
    }

    #[test]
    fn reports_initial_value() {
        let (parameter, _receiver) = make_parameter();
        assert_relative_eq!(parameter.get_value(), 0.5);
    }

    #[test]
    fn clamps_requested_values() {
        let (mut parameter, receiver) = make_parameter();

        parameter.set_value_now(4.0);
        assert_relative_eq!(received_change(&receiver).value, 1.0);

        parameter.linear_ramp_to_value(-2.0, Timestamp::from_seconds(1.0));
        let change = received_change(&receiver);
        assert_relative_eq!(change.value, 0.0);
        assert_eq!(change.method, crate::parameter::ValueChangeMethod::Linear);
    }

    #[test]
    fn immediate_change_now_is_scheduled_at_time_zero() {
        let (mut parameter, receiver) = make_parameter();
        parameter.set_value_now(0.25);
        assert_eq!(received_change(&receiver).end_time, Timestamp::zero());
    }
}
