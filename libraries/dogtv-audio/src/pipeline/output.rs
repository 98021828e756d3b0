//! Final gain and sanitization

/// Per-frame step of the output gain glide (~10ms at 48kHz)
const GAIN_SMOOTH: f32 = 0.002;

/// Applies volume and mute, then guarantees finite samples in [-1, 1]
#[derive(Debug, Clone)]
pub(crate) struct OutputStage {
    gain: f32,
    target: f32,
}

impl OutputStage {
    pub fn new(gain: f32) -> Self {
        Self { gain, target: gain }
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.target = gain;
    }

    /// Jump to the target gain
    pub fn settle(&mut self) {
        self.gain = self.target;
    }

    pub fn process(&mut self, buffer: &mut [f32], channels: usize) {
        for frame in buffer.chunks_exact_mut(channels) {
            if self.gain != self.target {
                self.gain += GAIN_SMOOTH * (self.target - self.gain);
                if (self.target - self.gain).abs() < 1e-6 {
                    self.gain = self.target;
                }
            }
            for sample in frame.iter_mut() {
                let value = *sample * self.gain;
                // NaN and infinities collapse to silence
                *sample = if value.is_finite() {
                    value.clamp(-1.0, 1.0)
                } else {
                    0.0
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_becomes_silence() {
        let mut stage = OutputStage::new(1.0);
        let mut buffer = [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, 0.5];
        stage.process(&mut buffer, 2);
        assert_eq!(buffer, [0.0, 0.0, 0.0, 0.5]);
    }

    #[test]
    fn output_is_clamped() {
        let mut stage = OutputStage::new(1.0);
        let mut buffer = [3.0, -2.0];
        stage.process(&mut buffer, 2);
        assert_eq!(buffer, [1.0, -1.0]);
    }

    #[test]
    fn gain_glides_to_target() {
        let mut stage = OutputStage::new(1.0);
        stage.set_gain(0.0);
        let mut buffer = vec![0.5_f32; 2];
        stage.process(&mut buffer, 2);
        assert!(buffer[0] > 0.49);

        let mut long = vec![0.5_f32; 48_000];
        stage.process(&mut long, 2);
        assert_eq!(*long.last().unwrap(), 0.0);
    }

    #[test]
    fn settle_jumps() {
        let mut stage = OutputStage::new(1.0);
        stage.set_gain(0.25);
        stage.settle();
        let mut buffer = [1.0, 1.0];
        stage.process(&mut buffer, 2);
        assert_eq!(buffer, [0.25, 0.25]);
    }
}
