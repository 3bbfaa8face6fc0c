//! Spectrum magnitudes supplied to the editor for background display.

use super::band::{MAX_FREQ, MIN_FREQ};
use super::coords::{freq_to_x, SurfacePoint, Viewport};

/// Level drawn at the bottom of the surface.
pub const SPECTRUM_FLOOR_DB: f32 = -90.0;
/// Level drawn at the top of the surface.
pub const SPECTRUM_CEILING_DB: f32 = -10.0;

/// One analysis frame: magnitude per bin, tagged with its sample rate.
///
/// Bin `i` of `n` is centered on `i * sample_rate / (2 * n)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpectrumFrame {
    pub magnitudes_db: Vec<f32>,
    pub sample_rate: f32,
}

impl SpectrumFrame {
    pub fn new(magnitudes_db: Vec<f32>, sample_rate: f32) -> Self {
        Self {
            magnitudes_db,
            sample_rate,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes_db.is_empty()
    }

    /// Center frequency of bin `index` in Hz.
    pub fn bin_frequency(&self, index: usize) -> f32 {
        let n = self.magnitudes_db.len().max(1) as f32;
        index as f32 * self.sample_rate / (2.0 * n)
    }

    /// Fill outline for the spectrum, left to right.
    ///
    /// Bins outside the editor's frequency axis are skipped. Bins that land in
    /// the same pixel column are merged, keeping the loudest.
    pub fn fill_points(&self, viewport: Viewport) -> Vec<SurfacePoint> {
        let mut points: Vec<SurfacePoint> = Vec::new();
        if viewport.width <= 0.0 || viewport.height <= 0.0 || self.sample_rate <= 0.0 {
            return points;
        }

        let mut last_column = None;
        for (index, &db) in self.magnitudes_db.iter().enumerate() {
            let frequency = self.bin_frequency(index);
            if !(MIN_FREQ..=MAX_FREQ).contains(&frequency) {
                continue;
            }
            let x = freq_to_x(frequency, viewport.width);
            let y = level_to_y(db, viewport.height);
            let column = x.floor() as i64;

            match points.last_mut() {
                Some(last) if last_column == Some(column) => last.y = last.y.min(y),
                _ => points.push(SurfacePoint::new(x, y)),
            }
            last_column = Some(column);
        }
        points
    }
}

/// Maps a spectrum level to a y position, clamped to the surface.
pub fn level_to_y(db: f32, height: f32) -> f32 {
    let db = if db.is_finite() { db } else { SPECTRUM_FLOOR_DB };
    let normalized =
        ((db - SPECTRUM_FLOOR_DB) / (SPECTRUM_CEILING_DB - SPECTRUM_FLOOR_DB)).clamp(0.0, 1.0);
    height - normalized * height
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bin_frequency() {
        let frame = SpectrumFrame::new(vec![-60.0; 1024], 48000.0);
        assert_eq!(frame.bin_frequency(0), 0.0);
        assert_relative_eq!(frame.bin_frequency(512), 12000.0);
        assert_relative_eq!(frame.bin_frequency(1), 48000.0 / 2048.0);
    }

    #[test]
    fn test_level_to_y() {
        assert_eq!(level_to_y(SPECTRUM_FLOOR_DB, 200.0), 200.0);
        assert_eq!(level_to_y(SPECTRUM_CEILING_DB, 200.0), 0.0);
        assert_eq!(level_to_y(-200.0, 200.0), 200.0);
        assert_eq!(level_to_y(20.0, 200.0), 0.0);
        assert_eq!(level_to_y(f32::NEG_INFINITY, 200.0), 200.0);
        assert_relative_eq!(level_to_y(-50.0, 200.0), 100.0);
    }

    #[test]
    fn test_fill_points_skip_out_of_range_bins() {
        let frame = SpectrumFrame::new(vec![-50.0; 2048], 96000.0);
        let points = frame.fill_points(Viewport::new(800.0, 200.0));
        assert!(!points.is_empty());
        assert!(points.iter().all(|p| p.x >= 0.0 && p.x <= 800.0 + 1e-3));
        assert!(points.windows(2).all(|w| w[0].x < w[1].x));
    }

    #[test]
    fn test_fill_points_merge_columns() {
        // High bins are dense on a log axis, so many share a column.
        let mut mags = vec![-80.0; 4096];
        mags[3000] = -20.0;
        let frame = SpectrumFrame::new(mags.clone(), 44100.0);
        let points = frame.fill_points(Viewport::new(100.0, 100.0));
        assert!(points.len() < mags.len());
        let loudest = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        assert_relative_eq!(loudest, level_to_y(-20.0, 100.0));
    }

    #[test]
    fn test_empty_frame() {
        let frame = SpectrumFrame::default();
        assert!(frame.is_empty());
        assert!(frame.fill_points(Viewport::new(800.0, 200.0)).is_empty());
    }
}
