//! Filter band model.
//!
//! A band is one filter stage of the equalizer: a kind, a center or cutoff
//! frequency, a gain and a Q. Ranges and the default preset live here so that
//! every input path clamps against the same bounds.

use std::fmt;

/// Stable identifier of a band for the lifetime of an editing session.
pub type BandId = u32;

/// Lowest frequency on the editor axis (Hz).
pub const MIN_FREQ: f32 = 20.0;
/// Highest frequency on the editor axis (Hz).
pub const MAX_FREQ: f32 = 20000.0;

/// Half-height of the gain display, in dB.
pub const DB_SCALE: f32 = 24.0;
/// Gain bound applied while dragging a node.
pub const DRAG_GAIN_LIMIT: f32 = 20.0;
/// Gain bound applied to typed values.
pub const FIELD_GAIN_LIMIT: f32 = 18.0;

/// Lowest allowed Q.
pub const MIN_Q: f32 = 0.1;
/// Highest allowed Q.
pub const MAX_Q: f32 = 100.0;

/// Maximum number of bands an editor may hold.
pub const MAX_BANDS: usize = 10;

/// Filter shape of a band.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FilterKind {
    LowShelf,
    #[default]
    Peaking,
    HighShelf,
    LowPass,
    HighPass,
    Notch,
    BandPass,
}

impl FilterKind {
    /// All kinds in menu order.
    pub const ALL: [FilterKind; 7] = [
        FilterKind::LowShelf,
        FilterKind::Peaking,
        FilterKind::HighShelf,
        FilterKind::LowPass,
        FilterKind::HighPass,
        FilterKind::Notch,
        FilterKind::BandPass,
    ];

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            FilterKind::LowShelf => "Low Shelf",
            FilterKind::Peaking => "Peaking",
            FilterKind::HighShelf => "High Shelf",
            FilterKind::LowPass => "Low Pass",
            FilterKind::HighPass => "High Pass",
            FilterKind::Notch => "Notch",
            FilterKind::BandPass => "Band Pass",
        }
    }

    /// Whether the gain parameter affects this kind's curve.
    pub fn uses_gain(&self) -> bool {
        matches!(
            self,
            FilterKind::LowShelf | FilterKind::Peaking | FilterKind::HighShelf
        )
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One filter stage of the equalizer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Band {
    pub id: BandId,
    pub kind: FilterKind,
    /// Center or cutoff frequency in Hz.
    pub frequency: f32,
    /// Gain in dB.
    pub gain: f32,
    pub q: f32,
}

impl Band {
    /// Creates a band with the given parameters.
    pub fn new(id: BandId, kind: FilterKind, frequency: f32, gain: f32, q: f32) -> Self {
        Self {
            id,
            kind,
            frequency,
            gain,
            q,
        }
    }

    /// Creates a flat peaking band at 1 kHz, the shape used for newly added bands.
    pub fn peaking_default(id: BandId) -> Self {
        Self::new(id, FilterKind::Peaking, 1000.0, 0.0, 1.0)
    }
}

/// Numeric band fields that can be edited directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BandField {
    Frequency,
    Gain,
    Q,
}

impl BandField {
    /// Clamps a typed value to this field's range.
    ///
    /// Gain uses the narrower text-entry bound, not the drag bound.
    pub fn clamp(&self, value: f32) -> f32 {
        match self {
            BandField::Frequency => clamp_frequency(value),
            BandField::Gain => value.clamp(-FIELD_GAIN_LIMIT, FIELD_GAIN_LIMIT),
            BandField::Q => clamp_q(value),
        }
    }

    /// Reads this field from a band.
    pub fn get(&self, band: &Band) -> f32 {
        match self {
            BandField::Frequency => band.frequency,
            BandField::Gain => band.gain,
            BandField::Q => band.q,
        }
    }

    /// Writes this field on a band, clamping to the field range.
    pub fn set(&self, band: &mut Band, value: f32) {
        let value = self.clamp(value);
        match self {
            BandField::Frequency => band.frequency = value,
            BandField::Gain => band.gain = value,
            BandField::Q => band.q = value,
        }
    }
}

/// Clamps a frequency to the editor axis range.
#[inline]
pub fn clamp_frequency(freq: f32) -> f32 {
    freq.clamp(MIN_FREQ, MAX_FREQ)
}

/// Clamps a Q value to its allowed range.
#[inline]
pub fn clamp_q(q: f32) -> f32 {
    q.clamp(MIN_Q, MAX_Q)
}

/// Clamps a gain to the drag bound.
#[inline]
pub fn clamp_drag_gain(gain: f32) -> f32 {
    gain.clamp(-DRAG_GAIN_LIMIT, DRAG_GAIN_LIMIT)
}

/// Clamps a gain to the display range.
#[inline]
pub fn clamp_display_gain(gain: f32) -> f32 {
    gain.clamp(-DB_SCALE, DB_SCALE)
}

/// The five-band preset loaded at startup and on reset.
pub fn default_bands() -> Vec<Band> {
    vec![
        Band::new(1, FilterKind::LowShelf, 60.0, 0.0, 1.0),
        Band::new(2, FilterKind::Peaking, 250.0, 0.0, 1.0),
        Band::new(3, FilterKind::Peaking, 1000.0, 0.0, 1.0),
        Band::new(4, FilterKind::Peaking, 4000.0, 0.0, 1.0),
        Band::new(5, FilterKind::HighShelf, 12000.0, 0.0, 1.0),
    ]
}
