//! Real-time spectrum analyzer.
//!
//! Samples are collected into a sliding window. Every `hop` samples a
//! Hann-windowed FFT produces a new set of magnitudes, which are smoothed with
//! fast attack and slow release.

use std::sync::Arc;

use realfft::num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};

pub const DEFAULT_FFT_SIZE: usize = 2048;
pub const DEFAULT_HOP: usize = 1024;

/// Level reported for silent bins.
pub const SILENCE_DB: f32 = -120.0;

/// Per-frame release coefficient applied while a bin falls.
const RELEASE: f32 = 0.8;

pub struct SpectrumAnalyzer {
    fft: Arc<dyn RealToComplex<f32>>,
    fft_size: usize,
    hop: usize,
    window: Vec<f32>,
    /// Circular history of the last `fft_size` samples.
    history: Vec<f32>,
    write_pos: usize,
    since_last: usize,
    scratch_in: Vec<f32>,
    scratch_out: Vec<Complex<f32>>,
    fft_scratch: Vec<Complex<f32>>,
    magnitudes_db: Vec<f32>,
}

impl SpectrumAnalyzer {
    /// Creates an analyzer. `fft_size` is rounded up to a power of two.
    pub fn new(fft_size: usize, hop: usize) -> Self {
        let fft_size = fft_size.max(64).next_power_of_two();
        let hop = hop.clamp(1, fft_size);

        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(fft_size);

        let window = (0..fft_size)
            .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / fft_size as f32).cos()))
            .collect();

        let scratch_in = fft.make_input_vec();
        let scratch_out = fft.make_output_vec();
        let fft_scratch = fft.make_scratch_vec();

        Self {
            fft,
            fft_size,
            hop,
            window,
            history: vec![0.0; fft_size],
            write_pos: 0,
            since_last: 0,
            scratch_in,
            scratch_out,
            fft_scratch,
            magnitudes_db: vec![SILENCE_DB; fft_size / 2],
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of magnitude bins (half the FFT size).
    pub fn bins(&self) -> usize {
        self.magnitudes_db.len()
    }

    /// Latest smoothed magnitudes in dBFS.
    pub fn magnitudes_db(&self) -> &[f32] {
        &self.magnitudes_db
    }

    /// Feeds samples, returning true if at least one new frame was analysed.
    pub fn push_samples(&mut self, samples: &[f32]) -> bool {
        let mut updated = false;
        for &sample in samples {
            self.history[self.write_pos] = sample;
            self.write_pos = (self.write_pos + 1) % self.fft_size;
            self.since_last += 1;
            if self.since_last >= self.hop {
                self.since_last = 0;
                self.analyze();
                updated = true;
            }
        }
        updated
    }

    fn analyze(&mut self) {
        // Oldest sample sits at write_pos.
        for i in 0..self.fft_size {
            let sample = self.history[(self.write_pos + i) % self.fft_size];
            self.scratch_in[i] = sample * self.window[i];
        }

        if self
            .fft
            .process_with_scratch(
                &mut self.scratch_in,
                &mut self.scratch_out,
                &mut self.fft_scratch,
            )
            .is_err()
        {
            return;
        }

        // Hann window has a coherent gain of 0.5.
        let normalization = 4.0 / self.fft_size as f32;
        for (smoothed, bin) in self.magnitudes_db.iter_mut().zip(&self.scratch_out) {
            let magnitude = bin.norm() * normalization;
            let db = if magnitude > 1e-6 {
                (20.0 * magnitude.log10()).max(SILENCE_DB)
            } else {
                SILENCE_DB
            };
            *smoothed = if db > *smoothed {
                db
            } else {
                *smoothed * RELEASE + db * (1.0 - RELEASE)
            };
        }
    }

    pub fn reset(&mut self) {
        self.history.iter_mut().for_each(|s| *s = 0.0);
        self.magnitudes_db.iter_mut().for_each(|m| *m = SILENCE_DB);
        self.write_pos = 0;
        self.since_last = 0;
    }
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_FFT_SIZE, DEFAULT_HOP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::TAU;

    #[test]
    fn test_sizes() {
        let analyzer = SpectrumAnalyzer::new(1000, 4096);
        assert_eq!(analyzer.fft_size(), 1024);
        assert_eq!(analyzer.bins(), 512);
    }

    #[test]
    fn test_peak_bin_location() {
        let sample_rate = 48000.0;
        let mut analyzer = SpectrumAnalyzer::new(2048, 2048);
        // Centered on bin 64.
        let freq = 64.0 * sample_rate / 2048.0;
        let signal: Vec<f32> = (0..2048)
            .map(|i| (TAU * freq * i as f32 / sample_rate).sin())
            .collect();

        assert!(analyzer.push_samples(&signal));
        let mags = analyzer.magnitudes_db();
        let peak = mags
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i);
        assert_eq!(peak, Some(64));
        // Full-scale sine reads close to 0 dBFS.
        assert_abs_diff_eq!(mags[64], 0.0, epsilon = 0.5);
        assert!(mags[300] < -60.0);
    }

    #[test]
    fn test_hop_controls_frame_rate() {
        let mut analyzer = SpectrumAnalyzer::new(256, 128);
        assert!(!analyzer.push_samples(&[0.1; 100]));
        assert!(analyzer.push_samples(&[0.1; 28]));
    }

    #[test]
    fn test_silence_and_release() {
        let mut analyzer = SpectrumAnalyzer::new(256, 256);
        analyzer.push_samples(&[0.0; 256]);
        assert!(analyzer.magnitudes_db().iter().all(|&m| m <= SILENCE_DB + 1e-3));

        let tone: Vec<f32> = (0..256).map(|i| (TAU * 16.0 * i as f32 / 256.0).sin()).collect();
        analyzer.push_samples(&tone);
        let loud = analyzer.magnitudes_db()[16];

        analyzer.push_samples(&[0.0; 256]);
        let released = analyzer.magnitudes_db()[16];
        assert!(released < loud);
        assert!(released > SILENCE_DB);

        analyzer.reset();
        assert!(analyzer.magnitudes_db().iter().all(|&m| m <= SILENCE_DB + 1e-3));
    }
}
