/// Multichannel biquad section
///
/// Coefficient formulas follow the RBJ Audio EQ Cookbook. One set of
/// coefficients is shared by all channels; each channel keeps its own
/// direct-form-I state. Runtime coefficient changes are smoothed per frame
/// to prevent clicks and zipper noise.
use dogtv_core::MAX_CHANNELS;
use std::f32::consts::PI;

/// Fraction of the distance to the target coefficients covered per frame.
/// 0.002 at 48kHz gives a ~10ms time constant.
const SMOOTH_COEFF: f32 = 0.002;

/// Highest corner frequency as a fraction of the sample rate.
/// Corners closer to Nyquist make the bilinear transform unstable.
pub(crate) const MAX_CORNER_RATIO: f32 = 0.45;

/// Butterworth Q for a single second-order section
pub(crate) const BUTTERWORTH_Q: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Normalized biquad coefficients (a0 = 1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BiquadCoefficients {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

/// Shared trigonometric terms for a corner frequency
struct Corner {
    sin_omega: f32,
    cos_omega: f32,
}

impl Corner {
    fn new(sample_rate: f32, frequency: f32) -> Self {
        let clamped = frequency.clamp(1.0, sample_rate * MAX_CORNER_RATIO);
        let omega = 2.0 * PI * clamped / sample_rate;
        Self {
            sin_omega: omega.sin(),
            cos_omega: omega.cos(),
        }
    }
}

impl BiquadCoefficients {
    /// Pass-through
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    fn normalized(b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) -> Self {
        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    /// Peaking EQ
    pub fn peaking(sample_rate: f32, frequency: f32, q: f32, gain_db: f32) -> Self {
        if sample_rate < 1.0 || gain_db.abs() < 0.01 {
            return Self::IDENTITY;
        }

        let a = 10.0_f32.powf(gain_db / 40.0);
        let c = Corner::new(sample_rate, frequency);
        let alpha = c.sin_omega / (2.0 * q);

        Self::normalized(
            1.0 + alpha * a,
            -2.0 * c.cos_omega,
            1.0 - alpha * a,
            1.0 + alpha / a,
            -2.0 * c.cos_omega,
            1.0 - alpha / a,
        )
    }

    /// Low shelf: boosts/cuts below frequency
    pub fn low_shelf(sample_rate: f32, frequency: f32, q: f32, gain_db: f32) -> Self {
        if sample_rate < 1.0 || gain_db.abs() < 0.01 {
            return Self::IDENTITY;
        }

        let a = 10.0_f32.powf(gain_db / 40.0);
        let c = Corner::new(sample_rate, frequency);
        let alpha = c.sin_omega / 2.0 * ((a + 1.0 / a) * (1.0 / q - 1.0) + 2.0).sqrt();
        let beta = 2.0 * a.sqrt() * alpha;

        Self::normalized(
            a * ((a + 1.0) - (a - 1.0) * c.cos_omega + beta),
            2.0 * a * ((a - 1.0) - (a + 1.0) * c.cos_omega),
            a * ((a + 1.0) - (a - 1.0) * c.cos_omega - beta),
            (a + 1.0) + (a - 1.0) * c.cos_omega + beta,
            -2.0 * ((a - 1.0) + (a + 1.0) * c.cos_omega),
            (a + 1.0) + (a - 1.0) * c.cos_omega - beta,
        )
    }

    /// High shelf: boosts/cuts above frequency
    pub fn high_shelf(sample_rate: f32, frequency: f32, q: f32, gain_db: f32) -> Self {
        if sample_rate < 1.0 || gain_db.abs() < 0.01 {
            return Self::IDENTITY;
        }

        let a = 10.0_f32.powf(gain_db / 40.0);
        let c = Corner::new(sample_rate, frequency);
        let alpha = c.sin_omega / 2.0 * ((a + 1.0 / a) * (1.0 / q - 1.0) + 2.0).sqrt();
        let beta = 2.0 * a.sqrt() * alpha;

        Self::normalized(
            a * ((a + 1.0) + (a - 1.0) * c.cos_omega + beta),
            -2.0 * a * ((a - 1.0) + (a + 1.0) * c.cos_omega),
            a * ((a + 1.0) + (a - 1.0) * c.cos_omega - beta),
            (a + 1.0) - (a - 1.0) * c.cos_omega + beta,
            2.0 * ((a - 1.0) - (a + 1.0) * c.cos_omega),
            (a + 1.0) - (a - 1.0) * c.cos_omega - beta,
        )
    }

    /// Second-order high-pass
    pub fn high_pass(sample_rate: f32, frequency: f32, q: f32) -> Self {
        if sample_rate < 1.0 {
            return Self::IDENTITY;
        }

        let c = Corner::new(sample_rate, frequency);
        let alpha = c.sin_omega / (2.0 * q);

        Self::normalized(
            (1.0 + c.cos_omega) / 2.0,
            -(1.0 + c.cos_omega),
            (1.0 + c.cos_omega) / 2.0,
            1.0 + alpha,
            -2.0 * c.cos_omega,
            1.0 - alpha,
        )
    }

    /// Second-order low-pass
    pub fn low_pass(sample_rate: f32, frequency: f32, q: f32) -> Self {
        if sample_rate < 1.0 {
            return Self::IDENTITY;
        }

        let c = Corner::new(sample_rate, frequency);
        let alpha = c.sin_omega / (2.0 * q);

        Self::normalized(
            (1.0 - c.cos_omega) / 2.0,
            1.0 - c.cos_omega,
            (1.0 - c.cos_omega) / 2.0,
            1.0 + alpha,
            -2.0 * c.cos_omega,
            1.0 - alpha,
        )
    }
}

/// Per-channel filter memory
#[derive(Debug, Clone, Copy, Default)]
struct ChannelState {
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

/// Biquad filter with coefficient smoothing
#[derive(Debug, Clone)]
pub(crate) struct Biquad {
    target: BiquadCoefficients,
    active: BiquadCoefficients,
    state: [ChannelState; MAX_CHANNELS],
}

impl Biquad {
    /// Create a pass-through filter
    pub fn new() -> Self {
        Self {
            target: BiquadCoefficients::IDENTITY,
            active: BiquadCoefficients::IDENTITY,
            state: [ChannelState::default(); MAX_CHANNELS],
        }
    }

    /// Set coefficients to approach gradually
    pub fn set_target(&mut self, coefficients: BiquadCoefficients) {
        self.target = coefficients;
    }

    /// Jump straight to new coefficients
    pub fn snap_to(&mut self, coefficients: BiquadCoefficients) {
        self.target = coefficients;
        self.active = coefficients;
    }

    /// Whether active and target coefficients are both pass-through
    pub fn is_identity(&self) -> bool {
        self.active == BiquadCoefficients::IDENTITY && self.target == BiquadCoefficients::IDENTITY
    }

    /// Coefficients currently used for processing
    pub fn active(&self) -> BiquadCoefficients {
        self.active
    }

    /// Move active coefficients one step toward the target
    ///
    /// Called once per frame.
    #[inline]
    pub fn smooth(&mut self) {
        if self.active == self.target {
            return;
        }
        let a = &mut self.active;
        let t = &self.target;
        a.b0 += SMOOTH_COEFF * (t.b0 - a.b0);
        a.b1 += SMOOTH_COEFF * (t.b1 - a.b1);
        a.b2 += SMOOTH_COEFF * (t.b2 - a.b2);
        a.a1 += SMOOTH_COEFF * (t.a1 - a.a1);
        a.a2 += SMOOTH_COEFF * (t.a2 - a.a2);

        // Settle exactly once the remaining distance is negligible
        let close = (t.b0 - a.b0).abs() < 1e-7
            && (t.b1 - a.b1).abs() < 1e-7
            && (t.b2 - a.b2).abs() < 1e-7
            && (t.a1 - a.a1).abs() < 1e-7
            && (t.a2 - a.a2).abs() < 1e-7;
        if close {
            self.active = self.target;
        }
    }

    /// Filter one sample of `channel`
    #[inline]
    pub fn process_sample(&mut self, channel: usize, input: f32) -> f32 {
        let c = self.active;
        let s = &mut self.state[channel];

        let mut output = c.b0 * input + c.b1 * s.x1 + c.b2 * s.x2 - c.a1 * s.y1 - c.a2 * s.y2;

        // Flush denormals
        if output.abs() < 1e-15 {
            output = 0.0;
        }

        s.x2 = s.x1;
        s.x1 = input;
        s.y2 = s.y1;
        s.y1 = output;

        output
    }

    /// Reset filter memory and snap to the target coefficients
    pub fn reset(&mut self) {
        self.state = [ChannelState::default(); MAX_CHANNELS];
        self.active = self.target;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}
