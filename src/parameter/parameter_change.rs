use crate::Timestamp;

/// How a parameter moves towards a new value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueChangeMethod {
    /// Jump at the change time
    Immediate,

    /// Ramp from the previous change, arriving at the change time
    Linear,
}

/// A value a parameter should hold from `end_time` on
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterChange {
    pub value: f64,
    pub end_time: Timestamp,
    pub method: ValueChangeMethod,
}

impl ParameterChange {
    pub fn immediate(value: f64, at_time: Timestamp) -> Self {
        Self {
            value,
            end_time: at_time,
            method: ValueChangeMethod::Immediate,
        }
    }

    pub fn ramp(value: f64, end_time: Timestamp) -> Self {
        Self {
            value,
            end_time,
            method: ValueChangeMethod::Linear,
        }
    }

    /// Whether this change should be applied by `time`
    ///
    /// A ramp starts once the change before it has finished, which the caller
    /// passes as `previous_end`.
    pub fn is_due(&self, time: Timestamp, previous_end: Timestamp) -> bool {
        match self.method {
            ValueChangeMethod::Immediate => self.end_time <= time,
            ValueChangeMethod::Linear => previous_end <= time,
        }
    }
}
