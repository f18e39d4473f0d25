use std::time::Duration;

/// A raised-sine gain curve
pub struct Fade {
    values: Vec<f32>,
}

impl Fade {
    pub fn new(length: Duration, sample_rate: usize) -> Self {
        let length_samples = (sample_rate as f64 * length.as_secs_f64()).ceil() as usize;

        let values = (0..length_samples)
            .map(|position| {
                let t = position as f64 / length_samples as f64 - 0.5;
                (0.5 + 0.5 * (t * std::f64::consts::PI).sin()) as f32
            })
            .collect();

        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Gain at `position` frames into a fade in
    pub fn fade_in_value(&self, position: usize) -> f32 {
        self.values.get(position).copied().unwrap_or(1.0)
    }

    /// Gain at `position` frames into a fade out
    pub fn fade_out_value(&self, position: usize) -> f32 {
        if position >= self.len() {
            return 0.0;
        }

        1.0 - self.fade_in_value(position)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn has_expected_length() {
        let fade = Fade::new(Duration::from_millis(10), 44_100);
        assert_eq!(fade.len(), 441);
    }

    #[test]
    fn fade_out_falls_from_unity_to_silence() {
        let fade = Fade::new(Duration::from_millis(10), 48_000);
        let length = fade.len();

        assert_relative_eq!(fade.fade_out_value(0), 1.0);
        assert_relative_eq!(fade.fade_out_value(length / 2), 0.5, epsilon = 1e-6);
        assert!(fade.fade_out_value(length - 1) < 1e-3);
        assert_relative_eq!(fade.fade_out_value(length), 0.0);

        for position in 1..length {
            assert!(fade.fade_out_value(position) <= fade.fade_out_value(position - 1));
        }
    }
}
