//! Per-redraw assembly of drawable primitives.
//!
//! [`FrameProducer::tick`] turns the editor state into plain geometry in
//! surface coordinates. Painting it is left to the host widget.

use super::band::{clamp_display_gain, BandId, FilterKind};
use super::controller::EditorState;
use super::coords::{freq_to_x, gain_to_y, node_position, SurfacePoint, Viewport};
use super::curve::sample_curve;
use super::overlay::effective_bands;
use super::spectrum::SpectrumFrame;

/// Frequencies that get a vertical grid line.
pub const GRID_FREQUENCIES: [f32; 10] = [
    20.0, 50.0, 100.0, 200.0, 500.0, 1000.0, 2000.0, 5000.0, 10000.0, 20000.0,
];

/// Spacing of the horizontal gain grid, in dB.
pub const GRID_GAIN_STEP: f32 = 6.0;

/// Default curve sampling step in surface units.
pub const DEFAULT_CURVE_STEP: f32 = 2.0;

/// A vertical (frequency) or horizontal (gain) grid line.
#[derive(Clone, Debug, PartialEq)]
pub struct GridLine {
    /// x for frequency lines, y for gain lines.
    pub position: f32,
    pub label: Option<String>,
    /// Set on the 0 dB line.
    pub emphasized: bool,
}

/// A band's draggable node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeMarker {
    pub id: BandId,
    pub kind: FilterKind,
    pub position: SurfacePoint,
    pub selected: bool,
}

/// Everything needed to draw one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FramePrimitives {
    pub viewport: Option<Viewport>,
    pub frequency_lines: Vec<GridLine>,
    pub gain_lines: Vec<GridLine>,
    /// Spectrum outline, empty when no frame was supplied.
    pub spectrum: Vec<SurfacePoint>,
    /// Response curve polyline.
    pub curve: Vec<SurfacePoint>,
    pub nodes: Vec<NodeMarker>,
}

/// Produces [`FramePrimitives`] from editor state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameProducer {
    pub curve_step: f32,
    pub show_labels: bool,
}

impl Default for FrameProducer {
    fn default() -> Self {
        Self {
            curve_step: DEFAULT_CURVE_STEP,
            show_labels: true,
        }
    }
}

impl FrameProducer {
    pub fn new(curve_step: f32, show_labels: bool) -> Self {
        Self {
            curve_step,
            show_labels,
        }
    }

    /// Builds the primitives for one redraw.
    ///
    /// Effective bands are recomputed on every call, so viewport changes and
    /// mode toggles show up on the next tick without any invalidation.
    pub fn tick(
        &self,
        state: &EditorState,
        viewport: Viewport,
        spectrum: Option<&SpectrumFrame>,
    ) -> FramePrimitives {
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return FramePrimitives::default();
        }

        let bands = effective_bands(&state.bands, state.selected, state.modes());

        let curve = sample_curve(&bands, viewport.width, self.curve_step)
            .into_iter()
            .map(|s| SurfacePoint::new(s.x, gain_to_y(clamp_display_gain(s.gain), viewport.height)))
            .collect();

        let nodes = bands
            .iter()
            .map(|band| NodeMarker {
                id: band.id,
                kind: band.kind,
                position: node_position(band.frequency, band.gain, viewport),
                selected: state.selected == Some(band.id),
            })
            .collect();

        FramePrimitives {
            viewport: Some(viewport),
            frequency_lines: self.frequency_lines(viewport),
            gain_lines: self.gain_lines(viewport),
            spectrum: spectrum.map(|s| s.fill_points(viewport)).unwrap_or_default(),
            curve,
            nodes,
        }
    }

    fn frequency_lines(&self, viewport: Viewport) -> Vec<GridLine> {
        GRID_FREQUENCIES
            .iter()
            .map(|&freq| GridLine {
                position: freq_to_x(freq, viewport.width),
                label: self.show_labels.then(|| frequency_label(freq)),
                emphasized: false,
            })
            .collect()
    }

    /// Lines every 6 dB across the visible half-scale.
    fn gain_lines(&self, viewport: Viewport) -> Vec<GridLine> {
        let steps = (super::band::DB_SCALE / 2.0 / GRID_GAIN_STEP).floor() as i32;
        (-steps..=steps)
            .rev()
            .map(|i| {
                let gain = i as f32 * GRID_GAIN_STEP;
                GridLine {
                    position: gain_to_y(gain, viewport.height),
                    label: self.show_labels.then(|| gain_label(gain)),
                    emphasized: i == 0,
                }
            })
            .collect()
    }
}

/// Axis label for a grid frequency, e.g. `500` or `2k`.
pub fn frequency_label(freq: f32) -> String {
    if freq >= 1000.0 {
        format!("{}k", (freq / 1000.0).round() as i64)
    } else {
        format!("{}", freq.round() as i64)
    }
}

/// Axis label for a grid gain, e.g. `+6` or `-12`.
pub fn gain_label(gain: f32) -> String {
    if gain == 0.0 {
        "0".to_string()
    } else {
        format!("{:+}", gain.round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::band::{Band, DB_SCALE};
    use crate::editor::coords::NODE_EDGE_MARGIN;
    use approx::assert_relative_eq;

    const VP: Viewport = Viewport {
        width: 800.0,
        height: 400.0,
    };

    #[test]
    fn test_default_state_frame() {
        let frame = FrameProducer::default().tick(&EditorState::default(), VP, None);

        assert_eq!(frame.frequency_lines.len(), GRID_FREQUENCIES.len());
        assert_eq!(frame.gain_lines.len(), 5);
        assert_eq!(frame.nodes.len(), 5);
        assert!(frame.spectrum.is_empty());
        assert_eq!(frame.curve.len(), 401);
        assert!(frame.curve.iter().all(|p| p.y == 200.0));
    }

    #[test]
    fn test_grid_labels() {
        let frame = FrameProducer::default().tick(&EditorState::default(), VP, None);
        let labels: Vec<_> = frame
            .frequency_lines
            .iter()
            .filter_map(|l| l.label.clone())
            .collect();
        assert_eq!(
            labels,
            ["20", "50", "100", "200", "500", "1k", "2k", "5k", "10k", "20k"]
        );

        let zero: Vec<_> = frame.gain_lines.iter().filter(|l| l.emphasized).collect();
        assert_eq!(zero.len(), 1);
        assert_eq!(zero[0].position, 200.0);
        assert_eq!(zero[0].label.as_deref(), Some("0"));
        assert_eq!(frame.gain_lines[0].label.as_deref(), Some("+12"));
    }

    #[test]
    fn test_labels_can_be_hidden() {
        let producer = FrameProducer::new(4.0, false);
        let frame = producer.tick(&EditorState::default(), VP, None);
        assert!(frame.frequency_lines.iter().all(|l| l.label.is_none()));
        assert!(frame.gain_lines.iter().all(|l| l.label.is_none()));
        assert_eq!(frame.curve.len(), 201);
    }

    #[test]
    fn test_nodes_are_clamped_and_flag_selection() {
        let mut state = EditorState::with_bands(vec![
            Band::new(1, FilterKind::Peaking, 1000.0, 24.0, 1.0),
            Band::new(2, FilterKind::Notch, 3000.0, 0.0, 2.0),
        ]);
        state.selected = Some(2);
        let frame = FrameProducer::default().tick(&state, VP, None);

        assert_eq!(frame.nodes[0].position.y, NODE_EDGE_MARGIN);
        assert!(!frame.nodes[0].selected);
        assert!(frame.nodes[1].selected);
        assert_eq!(frame.nodes[1].kind, FilterKind::Notch);
    }

    #[test]
    fn test_curve_uses_display_clamp() {
        let state =
            EditorState::with_bands(vec![Band::new(1, FilterKind::Notch, 1000.0, 0.0, 1.0)]);
        let frame = FrameProducer::new(1.0, true).tick(&state, VP, None);
        let lowest = frame.curve.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        assert_relative_eq!(lowest, gain_to_y(-DB_SCALE, VP.height));
    }

    #[test]
    fn test_frame_reflects_modes() {
        let mut state = EditorState::default();
        state.selected = Some(3);
        state.solo_active = true;
        let frame = FrameProducer::default().tick(&state, VP, None);
        let soloed = frame.nodes.iter().find(|n| n.id == 3).copied();
        assert_eq!(soloed.map(|n| n.kind), Some(FilterKind::BandPass));
    }

    #[test]
    fn test_spectrum_included_when_supplied() {
        let spectrum = SpectrumFrame::new(vec![-40.0; 512], 48000.0);
        let frame = FrameProducer::default().tick(&EditorState::default(), VP, Some(&spectrum));
        assert!(!frame.spectrum.is_empty());
    }

    #[test]
    fn test_empty_inputs() {
        let state = EditorState::with_bands(Vec::new());
        let frame = FrameProducer::default().tick(&state, VP, None);
        assert!(frame.nodes.is_empty());
        assert!(frame.curve.iter().all(|p| p.y == 200.0));

        let frame = FrameProducer::default().tick(&state, Viewport::new(0.0, 0.0), None);
        assert_eq!(frame, FramePrimitives::default());
    }
}
