use std::sync::{atomic::Ordering, Arc};

use atomic_float::AtomicF64;

use crate::{commands::Id, Timestamp};

use super::{ParameterChange, ValueChangeMethod};

const MAXIMUM_PENDING_PARAMETER_CHANGES: usize = 16;

/// The audio-side half of an [`crate::AudioParameter`]
///
/// Produces one value per frame for the block being processed.
pub struct RealtimeAudioParameter {
    parameter_id: Id,
    value: Arc<AtomicF64>,
    minimum_value: f64,
    maximum_value: f64,
    parameter_changes: Vec<ParameterChange>,
    value_buffer: Vec<f64>,
    increment: f64,
    current_change: ParameterChange,
}

impl RealtimeAudioParameter {
    pub fn new(
        parameter_id: Id,
        value: Arc<AtomicF64>,
        minimum_value: f64,
        maximum_value: f64,
        maximum_frame_count: usize,
    ) -> Self {
        let initial_value = value.load(Ordering::Acquire);

        Self {
            parameter_id,
            value,
            minimum_value,
            maximum_value,
            parameter_changes: Vec::with_capacity(MAXIMUM_PENDING_PARAMETER_CHANGES),
            value_buffer: vec![initial_value; maximum_frame_count],
            increment: 0.0,
            current_change: ParameterChange::immediate(initial_value, Timestamp::zero()),
        }
    }

    pub fn get_id(&self) -> Id {
        self.parameter_id
    }

    pub fn get_value(&self) -> f64 {
        self.value.load(Ordering::Acquire)
    }

    fn set_value(&mut self, value: f64) {
        self.value.store(value, Ordering::Release)
    }

    pub fn process(&mut self, start_time: &Timestamp, frame_count: usize, sample_rate: usize) {
        debug_assert!(frame_count <= self.value_buffer.len());
        let frame_count = frame_count.min(self.value_buffer.len());

        let mut value = self.get_value();

        for frame in 0..frame_count {
            let frame_time = start_time.incremented_by_samples(frame, sample_rate);
            value = self
                .next_value(&frame_time, sample_rate, value)
                .clamp(self.minimum_value, self.maximum_value);
            self.value_buffer[frame] = value;
        }

        self.set_value(value);
    }

    fn next_value(&mut self, time: &Timestamp, sample_rate: usize, mut value: f64) -> f64 {
        while let Some(next_change) = self.parameter_changes.first() {
            if !next_change.is_due(*time, self.current_change.end_time) {
                break;
            }

            let change = self.parameter_changes.remove(0);

            self.increment = match change.method {
                ValueChangeMethod::Linear if change.end_time > *time => {
                    let remaining_samples = (change.end_time - *time).as_samples(sample_rate);
                    (change.value - value) / remaining_samples.max(1.0)
                }
                _ => 0.0,
            };

            if change.end_time <= *time {
                value = change.value;
            }

            self.current_change = change;
        }

        if self.current_change.end_time <= *time {
            return self.current_change.value;
        }

        value + self.increment
    }

    /// Values for each frame in the last processed block
    pub fn get_values(&self) -> &[f64] {
        &self.value_buffer
    }

    pub fn add_parameter_change(&mut self, parameter_change: ParameterChange) {
        self.parameter_changes.push(parameter_change);
        self.parameter_changes
            .sort_by(|a, b| a.end_time.cmp(&b.end_time));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const BLOCK_SIZE: usize = 512;

    fn make_parameter(initial_value: f64) -> RealtimeAudioParameter {
        RealtimeAudioParameter::new(
            Id::generate(),
            Arc::new(AtomicF64::new(initial_value)),
            -100.0,
            100.0,
            BLOCK_SIZE,
        )
    }

    fn process_parameter_values(
        parameter: &mut RealtimeAudioParameter,
        to_time: Timestamp,
        sample_rate: usize,
    ) -> Vec<f64> {
        let mut values = Vec::new();
        let end_sample = to_time.as_samples(sample_rate).ceil() as usize;

        for frame in (0..end_sample).step_by(BLOCK_SIZE) {
            let frame_count = (frame + BLOCK_SIZE).min(end_sample) - frame;
            let block_time = Timestamp::from_samples(frame as f64, sample_rate);

            parameter.process(&block_time, frame_count, sample_rate);
            values.extend_from_slice(&parameter.get_values()[..frame_count]);
        }

        values
    }

    #[test]
    fn immediate_parameter_changes() {
        let mut parameter = make_parameter(0.0);

        for (value, time) in [(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)] {
            let time = Timestamp::from_seconds(time);
            parameter.add_parameter_change(ParameterChange::immediate(value, time));
        }

        let sample_rate = 48_000;
        let values =
            process_parameter_values(&mut parameter, Timestamp::from_seconds(3.5), sample_rate);

        let value_at = |time: f64| values[(time * sample_rate as f64).ceil() as usize];

        assert_relative_eq!(value_at(0.9), 0.0);
        assert_relative_eq!(value_at(1.001), 1.0);
        assert_relative_eq!(value_at(1.9), 1.0);
        assert_relative_eq!(value_at(2.001), 2.0);
        assert_relative_eq!(value_at(3.001), 3.0);
    }

    #[test]
    fn ramped_parameter_changes() {
        let mut parameter = make_parameter(0.0);

        for (value, time) in [(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)] {
            let time = Timestamp::from_seconds(time);
            parameter.add_parameter_change(ParameterChange::ramp(value, time));
        }

        let sample_rate = 48_000;
        let values =
            process_parameter_values(&mut parameter, Timestamp::from_seconds(3.5), sample_rate);

        let value_at = |time: f64| values[(time * sample_rate as f64).ceil() as usize];

        assert_relative_eq!(value_at(0.5), 0.5, epsilon = 1e-3);
        assert_relative_eq!(value_at(1.0), 1.0, epsilon = 1e-3);
        assert_relative_eq!(value_at(1.5), 1.5, epsilon = 1e-3);
        assert_relative_eq!(value_at(2.5), 2.5, epsilon = 1e-3);
        assert_relative_eq!(value_at(3.2), 3.0, epsilon = 1e-3);
    }

    #[test]
    fn changes_in_the_past_apply_at_the_start_of_the_block() {
        let mut parameter = make_parameter(0.0);
        let sample_rate = 44_100;

        parameter.process(&Timestamp::from_seconds(2.0), BLOCK_SIZE, sample_rate);

        parameter.add_parameter_change(ParameterChange::immediate(0.75, Timestamp::zero()));

        parameter.process(&Timestamp::from_seconds(3.0), BLOCK_SIZE, sample_rate);

        assert!(parameter
            .get_values()
            .iter()
            .all(|value| (value - 0.75).abs() < 1e-9));
        assert_relative_eq!(parameter.get_value(), 0.75);
    }

    #[test]
    fn values_are_clamped_to_range() {
        let mut parameter = make_parameter(0.0);

        parameter.add_parameter_change(ParameterChange::immediate(500.0, Timestamp::zero()));

        parameter.process(&Timestamp::zero(), 16, 44_100);
        assert_relative_eq!(parameter.get_value(), 100.0);
    }
}
