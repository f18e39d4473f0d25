use std::{fmt, ops::Mul};

use serde::{Deserialize, Serialize};

/// Anything at or below this many decibels is silence
const SILENCE_DB: f64 = -100.0;

/// A gain, stored linearly and convertible to and from decibels
///
/// Levels serialize as decibels, so a config file can say `-6.0` rather than
/// `0.501`.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Level {
    linear: f64,
}

impl Level {
    /// 0 dB
    pub fn unity() -> Self {
        Self { linear: 1.0 }
    }

    /// Silence
    pub fn zero() -> Self {
        Self { linear: 0.0 }
    }

    /// A level of `db` decibels
    pub fn from_db(db: f64) -> Self {
        if db <= SILENCE_DB {
            return Self::zero();
        }

        Self {
            linear: 10.0_f64.powf(db / 20.0),
        }
    }

    /// A level that multiplies samples by `linear`
    pub fn from_linear(linear: f64) -> Self {
        Self {
            linear: linear.max(0.0),
        }
    }

    /// The level in decibels, floored at -100 dB
    pub fn as_db(&self) -> f64 {
        if self.is_zero() {
            return SILENCE_DB;
        }

        (20.0 * self.linear.log10()).max(SILENCE_DB)
    }

    pub fn as_linear(&self) -> f64 {
        self.linear
    }

    pub fn is_zero(&self) -> bool {
        self.linear < 1e-9
    }
}

impl Mul for Level {
    type Output = Level;

    fn mul(self, rhs: Level) -> Level {
        Level::from_linear(self.linear * rhs.linear)
    }
}

impl From<f64> for Level {
    fn from(db: f64) -> Self {
        Level::from_db(db)
    }
}

impl From<Level> for f64 {
    fn from(level: Level) -> Self {
        level.as_db()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            write!(f, "-inf dB")
        } else {
            write!(f, "{:.1} dB", self.as_db())
        }
    }
}
