//! Engine Commands and Events
//!
//! Messages between the UI thread and the audio callback. Everything here is
//! Send + 'static.

use crate::dsp::TestSource;
use crate::editor::{Band, MAX_BANDS};

/// A fixed-capacity copy of the effective bands.
///
/// Sized for the editor's band limit so band updates reach the audio thread
/// without a heap allocation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandSet {
    bands: [Band; MAX_BANDS],
    len: usize,
}

impl BandSet {
    /// Copies up to [`MAX_BANDS`] bands.
    pub fn from_slice(bands: &[Band]) -> Self {
        let mut set = Self::default();
        for (slot, band) in set.bands.iter_mut().zip(bands) {
            *slot = *band;
        }
        set.len = bands.len().min(MAX_BANDS);
        set
    }

    pub fn as_slice(&self) -> &[Band] {
        &self.bands[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for BandSet {
    fn default() -> Self {
        Self {
            bands: [Band::peaking_default(0); MAX_BANDS],
            len: 0,
        }
    }
}

/// Commands sent from the UI thread to the audio engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineCommand {
    /// Replace the EQ chain's bands.
    SetBands(BandSet),
    /// Start or stop the preview signal.
    SetPlaying(bool),
    SetSource(TestSource),
    /// Tone frequency in Hz.
    SetToneFrequency(f32),
    /// Output level in dB.
    SetLevel(f32),
    /// Enable or disable spectrum events.
    SetAnalyzerEnabled(bool),
}

/// Events sent from the audio engine to the UI thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    /// Peak output level since the last report, linear.
    OutputLevel { left: f32, right: f32 },
    /// Smoothed callback load in percent.
    CpuLoad(f32),
    Started,
    Stopped,
    /// `bins` analyzer magnitudes in dBFS are waiting on the spectrum queue.
    /// Bin `i` of `n` covers `i * sample_rate / (2n)`.
    Spectrum { bins: usize, sample_rate: f32 },
}
