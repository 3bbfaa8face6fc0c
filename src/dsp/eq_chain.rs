//! Cascade of biquad sections driven by the editor's effective bands.

use crate::editor::{Band, MAX_BANDS};

use super::biquad::{BiquadCoeffs, BiquadState};

#[derive(Clone, Copy, Debug, Default)]
struct Section {
    coeffs: BiquadCoeffs,
    state: BiquadState,
}

/// Up to [`MAX_BANDS`] biquads in series.
///
/// Updating the bands never allocates, so it is safe to call from the audio
/// callback. Sections keep their delay lines across updates to avoid clicks
/// while a node is being dragged.
#[derive(Clone, Debug)]
pub struct EqChain {
    sample_rate: f32,
    sections: [Section; MAX_BANDS],
    bands: [Option<Band>; MAX_BANDS],
    active: usize,
}

impl EqChain {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            sections: [Section::default(); MAX_BANDS],
            bands: [None; MAX_BANDS],
            active: 0,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Number of sections currently in use.
    pub fn active_sections(&self) -> usize {
        self.active
    }

    /// Replaces the band set. Bands past the section limit are ignored.
    pub fn set_bands(&mut self, bands: &[Band]) {
        let count = bands.len().min(MAX_BANDS);
        for (i, band) in bands.iter().take(count).enumerate() {
            if self.bands[i] != Some(*band) {
                self.sections[i].coeffs = BiquadCoeffs::for_band(band, self.sample_rate);
                self.bands[i] = Some(*band);
            }
        }
        for i in count..self.active {
            self.sections[i] = Section::default();
            self.bands[i] = None;
        }
        self.active = count;
    }

    /// Recomputes coefficients for a new sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate == self.sample_rate {
            return;
        }
        self.sample_rate = sample_rate;
        for i in 0..self.active {
            if let Some(band) = self.bands[i] {
                self.sections[i].coeffs = BiquadCoeffs::for_band(&band, sample_rate);
            }
        }
        self.reset();
    }

    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        self.sections[..self.active]
            .iter_mut()
            .fold(input, |x, section| section.state.process(x, &section.coeffs))
    }

    /// Filters a mono block in place.
    pub fn process_block(&mut self, samples: &mut [f32]) {
        for sample in samples.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    /// Summed magnitude response of the active sections, in dB.
    pub fn magnitude_db(&self, freq: f32) -> f32 {
        self.sections[..self.active]
            .iter()
            .map(|s| s.coeffs.magnitude_db(freq, self.sample_rate))
            .sum()
    }

    /// Clears every delay line.
    pub fn reset(&mut self) {
        for section in self.sections.iter_mut() {
            section.state.reset();
        }
    }
}
