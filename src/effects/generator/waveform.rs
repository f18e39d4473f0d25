use rand::Rng;
use serde::{Deserialize, Serialize};

/// A periodic shape a generator can play
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    /// A pure tone
    Sine,
    /// +1 for the first half of the period, -1 for the second
    Square,
    /// Rises from -1 to +1 over the period
    Sawtooth,
    /// Rises from -1 to +1 and back again over the period
    Triangle,
    /// Uniform white noise, ignores the phase
    Noise,
}

impl Waveform {
    /// The value at `phase`, where one period spans 0.0 to 1.0
    pub(crate) fn value(&self, phase: f64, random_generator: &mut impl Rng) -> f64 {
        match self {
            Waveform::Sine => (std::f64::consts::TAU * phase).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
            Waveform::Noise => random_generator.random_range(-1.0..=1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn periodic_shapes() {
        let mut random_generator = rand::rng();
        let mut value =
            |waveform: Waveform, phase: f64| waveform.value(phase, &mut random_generator);

        assert_relative_eq!(value(Waveform::Sine, 0.25), 1.0);
        assert_relative_eq!(value(Waveform::Square, 0.1), 1.0);
        assert_relative_eq!(value(Waveform::Square, 0.6), -1.0);
        assert_relative_eq!(value(Waveform::Sawtooth, 0.0), -1.0);
        assert_relative_eq!(value(Waveform::Sawtooth, 0.75), 0.5);
        assert_relative_eq!(value(Waveform::Triangle, 0.0), -1.0);
        assert_relative_eq!(value(Waveform::Triangle, 0.5), 1.0);
        assert_relative_eq!(value(Waveform::Triangle, 0.25), 0.0);
    }

    #[test]
    fn noise_stays_in_range() {
        let mut random_generator = rand::rng();
        for _ in 0..1_000 {
            let value = Waveform::Noise.value(0.0, &mut random_generator);
            assert!((-1.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn deserializes_from_lowercase_names() {
        let waveform: Waveform = serde_json::from_str("\"sawtooth\"").unwrap();
        assert_eq!(waveform, Waveform::Sawtooth);
    }
}
