//! Mapping between (frequency, gain) and drawing-surface coordinates.
//!
//! The frequency axis is logarithmic over 20 Hz – 20 kHz, the gain axis is
//! linear and centered on 0 dB. These functions never clamp: pointer positions
//! can leave the surface during a drag, so callers clamp before inverting.

use super::band::{DB_SCALE, MAX_FREQ, MIN_FREQ};

/// Size of the drawing surface in surface units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Clamps a surface position to the viewport bounds.
    pub fn clamp_point(&self, x: f32, y: f32) -> (f32, f32) {
        (x.clamp(0.0, self.width.max(0.0)), y.clamp(0.0, self.height.max(0.0)))
    }
}

/// A position on the drawing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfacePoint {
    pub x: f32,
    pub y: f32,
}

impl SurfacePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: SurfacePoint) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Distance kept between node markers and the top/bottom surface edges.
pub const NODE_EDGE_MARGIN: f32 = 10.0;

/// Position of a band's node marker.
///
/// The y position is pulled inside the surface so markers stay grabbable even
/// when the gain is beyond the visible range.
pub fn node_position(frequency: f32, gain: f32, viewport: Viewport) -> SurfacePoint {
    let top = NODE_EDGE_MARGIN;
    let bottom = (viewport.height - NODE_EDGE_MARGIN).max(top);
    SurfacePoint::new(
        freq_to_x(frequency, viewport.width),
        gain_to_y(gain, viewport.height).clamp(top, bottom),
    )
}

#[inline]
fn log_span() -> f32 {
    MAX_FREQ.log10() - MIN_FREQ.log10()
}

/// Converts a frequency in Hz to an x position.
pub fn freq_to_x(freq: f32, width: f32) -> f32 {
    (freq.log10() - MIN_FREQ.log10()) / log_span() * width
}

/// Converts an x position to a frequency in Hz.
pub fn x_to_freq(x: f32, width: f32) -> f32 {
    10.0_f32.powf(x / width * log_span() + MIN_FREQ.log10())
}

/// Converts a gain in dB to a y position (positive gain is up).
pub fn gain_to_y(gain: f32, height: f32) -> f32 {
    height / 2.0 - (gain / DB_SCALE) * height
}

/// Converts a y position to a gain in dB.
pub fn y_to_gain(y: f32, height: f32) -> f32 {
    -((y - height / 2.0) / height) * DB_SCALE
}
