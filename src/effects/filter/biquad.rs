use std::f64::consts::PI;

const DENORMAL_THRESHOLD: f64 = 1e-8;

/// Normalised second order filter coefficients, with `a0` divided out
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiquadCoefficients {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl BiquadCoefficients {
    pub fn low_pass(cutoff: f64, sample_rate: f64, q: f64) -> Self {
        let (cos_omega, alpha) = angular_terms(cutoff, sample_rate, q);
        let b1 = 1.0 - cos_omega;

        Self::normalised([b1 / 2.0, b1, b1 / 2.0], cos_omega, alpha)
    }

    pub fn high_pass(cutoff: f64, sample_rate: f64, q: f64) -> Self {
        let (cos_omega, alpha) = angular_terms(cutoff, sample_rate, q);
        let b1 = -(1.0 + cos_omega);

        Self::normalised([-b1 / 2.0, b1, -b1 / 2.0], cos_omega, alpha)
    }

    fn normalised([b0, b1, b2]: [f64; 3], cos_omega: f64, alpha: f64) -> Self {
        let a0 = 1.0 + alpha;

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: -2.0 * cos_omega / a0,
            a2: (1.0 - alpha) / a0,
        }
    }
}

/// `cutoff` is kept just below Nyquist so the filter stays stable
fn angular_terms(cutoff: f64, sample_rate: f64, q: f64) -> (f64, f64) {
    let cutoff = cutoff.clamp(1.0, 0.49 * sample_rate);
    let omega = 2.0 * PI * cutoff / sample_rate;
    (omega.cos(), omega.sin() / (2.0 * q))
}

/// The last two inputs and outputs of one filtered channel
#[derive(Clone, Copy, Debug, Default)]
pub struct BiquadState {
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl BiquadState {
    pub fn process(&mut self, coefficients: &BiquadCoefficients, input: f64) -> f64 {
        let c = coefficients;
        let output = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2
            - c.a1 * self.y1
            - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = flush_denormal(input);
        self.y2 = self.y1;
        self.y1 = flush_denormal(output);

        output
    }
}

fn flush_denormal(value: f64) -> f64 {
    if value.abs() <= DENORMAL_THRESHOLD {
        0.0
    } else {
        value
    }
}
