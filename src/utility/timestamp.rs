use std::{
    fmt,
    ops::{Add, Sub},
};

type Seconds = fixed::types::I32F32;

/// A point on the engine's clock, in seconds
///
/// Held as 32.32 fixed point so that adding up block lengths never drifts.
/// Arithmetic saturates instead of overflowing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(Seconds);

impl Timestamp {
    /// The moment the engine started
    pub fn zero() -> Self {
        Self(Seconds::ZERO)
    }

    pub fn from_seconds(seconds: f64) -> Self {
        Self(Seconds::saturating_from_num(seconds))
    }

    /// The time of frame `samples` at `sample_rate`
    pub fn from_samples(samples: f64, sample_rate: usize) -> Self {
        Self::from_seconds(samples / sample_rate as f64)
    }

    pub fn as_seconds(&self) -> f64 {
        self.0.to_num()
    }

    /// The frame position of this time at `sample_rate`, possibly fractional
    pub fn as_samples(&self, sample_rate: usize) -> f64 {
        self.as_seconds() * sample_rate as f64
    }

    /// This time moved on by `sample_count` frames
    pub fn incremented_by_samples(&self, sample_count: usize, sample_rate: usize) -> Self {
        *self + Self::from_samples(sample_count as f64, sample_rate)
    }

    // The engine publishes its clock through an atomic integer
    pub(crate) fn from_raw_i64(raw_value: i64) -> Self {
        Self(Seconds::from_bits(raw_value))
    }

    pub(crate) fn as_raw_i64(&self) -> i64 {
        self.0.to_bits()
    }
}

impl Add for Timestamp {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Timestamp {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.as_seconds())
    }
}
