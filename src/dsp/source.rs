//! Test signals for auditioning the EQ.

use std::f32::consts::TAU;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Which test signal feeds the EQ chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestSource {
    #[default]
    PinkNoise,
    WhiteNoise,
    Tone,
}

impl TestSource {
    pub const ALL: [TestSource; 3] = [
        TestSource::PinkNoise,
        TestSource::WhiteNoise,
        TestSource::Tone,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TestSource::PinkNoise => "Pink noise",
            TestSource::WhiteNoise => "White noise",
            TestSource::Tone => "Tone",
        }
    }
}

impl fmt::Display for TestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub const DEFAULT_TONE_HZ: f32 = 1000.0;

/// Generates the selected test signal, one sample at a time.
///
/// Noise comes from a xorshift generator, so no allocation or locking
/// happens on the audio thread.
#[derive(Clone, Debug)]
pub struct SignalGenerator {
    source: TestSource,
    sample_rate: f32,
    tone_hz: f32,
    phase: f32,
    rng: u32,
    /// Pink filter state (Paul Kellett's refined method).
    pink: [f32; 7],
}

impl SignalGenerator {
    pub fn new(source: TestSource, sample_rate: f32) -> Self {
        Self {
            source,
            sample_rate,
            tone_hz: DEFAULT_TONE_HZ,
            phase: 0.0,
            rng: 0x9E37_79B9,
            pink: [0.0; 7],
        }
    }

    pub fn source(&self) -> TestSource {
        self.source
    }

    pub fn set_source(&mut self, source: TestSource) {
        if source != self.source {
            self.source = source;
            self.phase = 0.0;
            self.pink = [0.0; 7];
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    pub fn tone_hz(&self) -> f32 {
        self.tone_hz
    }

    /// Sets the tone frequency, kept below Nyquist.
    pub fn set_tone_hz(&mut self, hz: f32) {
        if hz.is_finite() {
            self.tone_hz = hz.clamp(1.0, self.sample_rate * 0.49);
        }
    }

    #[inline]
    fn white(&mut self) -> f32 {
        let mut x = self.rng;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng = x;
        (x as f32 / u32::MAX as f32) * 2.0 - 1.0
    }

    /// Next sample, roughly within [-1, 1].
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        match self.source {
            TestSource::WhiteNoise => self.white(),
            TestSource::PinkNoise => {
                let w = self.white();
                let b = &mut self.pink;
                b[0] = 0.99886 * b[0] + w * 0.0555179;
                b[1] = 0.99332 * b[1] + w * 0.0750759;
                b[2] = 0.96900 * b[2] + w * 0.1538520;
                b[3] = 0.86650 * b[3] + w * 0.3104856;
                b[4] = 0.55000 * b[4] + w * 0.5329522;
                b[5] = -0.7616 * b[5] - w * 0.0168980;
                let out = b[0] + b[1] + b[2] + b[3] + b[4] + b[5] + b[6] + w * 0.5362;
                b[6] = w * 0.115926;
                out * 0.11
            }
            TestSource::Tone => {
                let out = (self.phase * TAU).sin();
                self.phase = (self.phase + self.tone_hz / self.sample_rate).fract();
                out
            }
        }
    }

    pub fn fill(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }
}
