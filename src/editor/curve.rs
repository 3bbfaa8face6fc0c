//! Frequency-response curve evaluation.
//!
//! A simplified visual model of each filter kind, not a biquad transfer
//! function. The audio path in [`crate::dsp`] does the real filtering.

use super::band::{Band, FilterKind};
use super::coords::x_to_freq;

/// Logistic function.
#[inline]
fn sigmoid(z: f32) -> f32 {
    1.0 / (1.0 + (-z).exp())
}

/// Gain contribution of a single band at `freq`, in dB.
pub fn band_contribution(band: &Band, freq: f32) -> f32 {
    let log_f = freq.log10();
    let log_center = band.frequency.log10();
    let distance = log_f - log_center;
    let bandwidth = 1.0 / (2.0 * band.q);

    match band.kind {
        FilterKind::Peaking => {
            band.gain * (-(distance * distance) / (2.0 * bandwidth * bandwidth)).exp()
        }
        FilterKind::LowShelf => band.gain * sigmoid(-distance * 5.0 * band.q),
        FilterKind::HighShelf => band.gain * sigmoid(distance * 5.0 * band.q),
        FilterKind::LowPass => {
            if freq <= band.frequency {
                0.0
            } else {
                -12.0 * (freq / band.frequency).log2() * band.q.max(0.1)
            }
        }
        FilterKind::HighPass => {
            if freq >= band.frequency {
                0.0
            } else {
                -12.0 * (band.frequency / freq).log2() * band.q.max(0.1)
            }
        }
        FilterKind::Notch => {
            if distance.abs() >= bandwidth {
                0.0
            } else {
                -48.0 * (1.0 - distance.abs() / bandwidth)
            }
        }
        FilterKind::BandPass => {
            if distance.abs() < bandwidth {
                0.0
            } else {
                -12.0 * (distance.abs() - bandwidth)
            }
        }
    }
}

/// Summed gain of all bands at `freq`, in dB. Not clamped.
///
/// An empty band list is flat (0 dB everywhere).
pub fn evaluate(bands: &[Band], freq: f32) -> f32 {
    bands
        .iter()
        .fold(0.0, |sum, band| sum + band_contribution(band, freq))
}

/// A single evaluated point of the response curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveSample {
    /// Surface x position the sample was taken at.
    pub x: f32,
    /// Frequency in Hz at that position.
    pub frequency: f32,
    /// Summed gain in dB (unclamped).
    pub gain: f32,
}

/// Samples the curve across a surface of the given width.
///
/// One sample is taken every `step` units, and the right edge is always
/// included so the polyline spans the full surface.
pub fn sample_curve(bands: &[Band], width: f32, step: f32) -> Vec<CurveSample> {
    if width <= 0.0 {
        return Vec::new();
    }
    let step = step.max(0.5);
    let count = (width / step).ceil() as usize + 1;

    (0..count)
        .map(|i| {
            let x = (i as f32 * step).min(width);
            let frequency = x_to_freq(x, width);
            CurveSample {
                x,
                frequency,
                gain: evaluate(bands, frequency),
            }
        })
        .collect()
}
