//! Sweep and solo inspection modes.
//!
//! The overlay turns the stored bands into the *effective* bands: the set that
//! is both drawn and sent to the audio chain. It never touches the stored
//! bands, so leaving a mode restores the previous sound exactly.

use super::band::{Band, BandId, FilterKind};

/// Q applied to the selected band while sweeping.
pub const SWEEP_Q: f32 = 15.0;
/// Gain applied to the selected band while sweeping.
pub const SWEEP_GAIN: f32 = 18.0;
/// Q of the band-pass used to audition a soloed band.
pub const SOLO_Q: f32 = 5.0;

/// Inspection mode flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InspectionModes {
    pub sweep: bool,
    pub solo: bool,
}

impl InspectionModes {
    /// Whether any mode is active.
    pub fn any(&self) -> bool {
        self.sweep || self.solo
    }
}

/// Builds the effective band set for the given selection and modes.
///
/// With no selection or no active mode this is a plain copy. Solo wins over
/// sweep on the selected band, and solo mutes every other band.
pub fn effective_bands(
    bands: &[Band],
    selected: Option<BandId>,
    modes: InspectionModes,
) -> Vec<Band> {
    let Some(selected) = selected else {
        return bands.to_vec();
    };
    if !modes.any() {
        return bands.to_vec();
    }

    bands
        .iter()
        .map(|band| {
            let mut band = *band;
            if band.id == selected {
                if modes.solo {
                    band.kind = FilterKind::BandPass;
                    band.q = SOLO_Q;
                    band.gain = 0.0;
                } else {
                    band.q = SWEEP_Q;
                    band.gain = SWEEP_GAIN;
                }
            } else if modes.solo {
                band.gain = 0.0;
            }
            band
        })
        .collect()
}
