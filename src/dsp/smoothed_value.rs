//! One-pole parameter smoothing for the output level.

/// A value that glides exponentially toward its target.
#[derive(Clone, Debug)]
pub struct SmoothedValue {
    current: f32,
    target: f32,
    smoothing_factor: f32,
    time_constant_ms: f32,
}

impl SmoothedValue {
    pub const DEFAULT_TIME_CONSTANT_MS: f32 = 20.0;

    /// Creates a smoothed value that reaches ~63% of a step after
    /// `time_constant_ms`.
    pub fn new(initial: f32, time_constant_ms: f32, sample_rate: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            smoothing_factor: Self::calc_smoothing_factor(time_constant_ms, sample_rate),
            time_constant_ms,
        }
    }

    fn calc_smoothing_factor(time_constant_ms: f32, sample_rate: f32) -> f32 {
        let samples = time_constant_ms * 0.001 * sample_rate;
        if samples < 1.0 {
            0.0
        } else {
            (-1.0 / samples).exp()
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.smoothing_factor = Self::calc_smoothing_factor(self.time_constant_ms, sample_rate);
    }

    #[inline]
    pub fn set_target(&mut self, value: f32) {
        self.target = value;
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Advances one sample.
    #[inline]
    pub fn next(&mut self) -> f32 {
        let diff = self.current - self.target;
        self.current = if diff.abs() <= 1e-5 {
            self.target
        } else {
            self.target + self.smoothing_factor * diff
        };
        self.current
    }

    /// Jumps straight to `value`.
    pub fn reset(&mut self, value: f32) {
        self.current = value;
        self.target = value;
    }
}
