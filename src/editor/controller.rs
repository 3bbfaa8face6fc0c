//! Interactive band editing.
//!
//! [`InteractionController`] owns the editor state and is the only place it is
//! mutated. Every edit is available both as a method and as an
//! [`EditorCommand`] value, so hosts can queue input and replay it through
//! [`InteractionController::apply`].
//!
//! None of the commands fail: out-of-range values are clamped, malformed text
//! is ignored and commands that need a selection do nothing without one.

use super::band::{
    clamp_drag_gain, clamp_frequency, clamp_q, default_bands, Band, BandField, BandId,
    FilterKind, MAX_BANDS,
};
use super::coords::{node_position, x_to_freq, y_to_gain, SurfacePoint, Viewport};
use super::export::export_summary;
use super::overlay::{effective_bands, InspectionModes};

/// Pointer distance within which a node can be grabbed.
pub const NODE_HIT_RADIUS: f32 = 20.0;

/// Q change per unit of wheel delta.
pub const WHEEL_Q_SENSITIVITY: f32 = 0.001;

/// Complete editing state.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorState {
    pub bands: Vec<Band>,
    pub selected: Option<BandId>,
    pub sweep_active: bool,
    pub solo_active: bool,
    /// Only ever true while `selected` is set.
    pub drag_active: bool,
}

impl EditorState {
    /// Creates a state holding the given bands with nothing selected.
    pub fn with_bands(bands: Vec<Band>) -> Self {
        Self {
            bands,
            selected: None,
            sweep_active: false,
            solo_active: false,
            drag_active: false,
        }
    }

    /// The currently active inspection modes.
    pub fn modes(&self) -> InspectionModes {
        InspectionModes {
            sweep: self.sweep_active,
            solo: self.solo_active,
        }
    }

    /// Looks up a band by id.
    pub fn band(&self, id: BandId) -> Option<&Band> {
        self.bands.iter().find(|b| b.id == id)
    }

    /// The selected band, if any.
    pub fn selected_band(&self) -> Option<&Band> {
        self.selected.and_then(|id| self.band(id))
    }

    fn selected_band_mut(&mut self) -> Option<&mut Band> {
        let id = self.selected?;
        self.bands.iter_mut().find(|b| b.id == id)
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::with_bands(default_bands())
    }
}

/// An edit request, applied with [`InteractionController::apply`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EditorCommand {
    /// Pointer pressed at a surface position.
    SelectAt { x: f32, y: f32, viewport: Viewport },
    /// Start dragging the selected band.
    BeginDrag,
    /// Pointer moved while dragging.
    DragTo { x: f32, y: f32, viewport: Viewport },
    /// Pointer released.
    EndDrag,
    /// Mouse wheel moved over the surface.
    AdjustQ { wheel_delta: f32 },
    AddBand,
    DeleteSelected,
    /// Numeric edit of the selected band.
    UpdateField { field: BandField, value: f32 },
    /// Change the selected band's filter kind.
    SetKind(FilterKind),
    /// Select a band directly, e.g. from a band list.
    SelectBand(BandId),
    ClearSelection,
    SetSweep(bool),
    SetSolo(bool),
    Reset,
}

/// Owner of the editor state.
#[derive(Clone, Debug)]
pub struct InteractionController {
    state: EditorState,
    /// Bumped on every change that can affect the effective bands.
    revision: u64,
    /// Revision last handed out by `take_changed_effective`.
    published: Option<u64>,
}

impl InteractionController {
    /// Creates a controller with the default five-band preset.
    pub fn new() -> Self {
        Self::with_state(EditorState::default())
    }

    /// Creates a controller around an existing state.
    pub fn with_state(state: EditorState) -> Self {
        Self {
            state,
            revision: 0,
            published: None,
        }
    }

    /// Creates a controller holding the given bands.
    pub fn with_bands(bands: Vec<Band>) -> Self {
        Self::with_state(EditorState::with_bands(bands))
    }

    /// Read access to the editor state.
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// The stored bands.
    pub fn bands(&self) -> &[Band] {
        &self.state.bands
    }

    /// The selected band id.
    pub fn selected(&self) -> Option<BandId> {
        self.state.selected
    }

    /// Current change counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The band set after sweep/solo are applied.
    pub fn effective_bands(&self) -> Vec<Band> {
        effective_bands(&self.state.bands, self.state.selected, self.state.modes())
    }

    /// Returns the effective bands if anything changed since the last call.
    ///
    /// The first call always returns the current set so consumers start in sync.
    pub fn take_changed_effective(&mut self) -> Option<Vec<Band>> {
        if self.published == Some(self.revision) {
            return None;
        }
        self.published = Some(self.revision);
        Some(self.effective_bands())
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Applies a command, returning whether the state changed.
    pub fn apply(&mut self, command: EditorCommand) -> bool {
        match command {
            EditorCommand::SelectAt { x, y, viewport } => {
                let before = (self.state.selected, self.state.drag_active);
                self.select_at(x, y, viewport);
                before != (self.state.selected, self.state.drag_active)
            }
            EditorCommand::BeginDrag => self.begin_drag(),
            EditorCommand::DragTo { x, y, viewport } => self.drag_to(x, y, viewport),
            EditorCommand::EndDrag => self.end_drag(),
            EditorCommand::AdjustQ { wheel_delta } => self.adjust_q(wheel_delta),
            EditorCommand::AddBand => self.add_band().is_some(),
            EditorCommand::DeleteSelected => self.delete_selected(),
            EditorCommand::UpdateField { field, value } => self.update_field(field, value),
            EditorCommand::SetKind(kind) => self.set_kind(kind),
            EditorCommand::SelectBand(id) => self.select_band(id),
            EditorCommand::ClearSelection => self.clear_selection(),
            EditorCommand::SetSweep(on) => self.set_sweep(on),
            EditorCommand::SetSolo(on) => self.set_solo(on),
            EditorCommand::Reset => {
                self.reset();
                true
            }
        }
    }

    /// Selects the node nearest to the pointer and starts dragging it.
    ///
    /// Nodes are hit-tested at their drawn (effective) positions. Ties go to
    /// the band that comes first. A miss clears the selection.
    pub fn select_at(&mut self, x: f32, y: f32, viewport: Viewport) -> Option<BandId> {
        let pointer = SurfacePoint::new(x, y);
        let mut best: Option<(BandId, f32)> = None;

        for band in self.effective_bands() {
            let node = node_position(band.frequency, band.gain, viewport);
            let distance = node.distance(pointer);
            if distance > NODE_HIT_RADIUS {
                continue;
            }
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((band.id, distance)),
            }
        }

        let previous = self.state.selected;
        match best {
            Some((id, _)) => {
                self.state.selected = Some(id);
                self.state.drag_active = true;
                log::debug!("[editor] grabbed band {}", id);
            }
            None => {
                self.state.selected = None;
                self.state.drag_active = false;
            }
        }
        if previous != self.state.selected {
            self.touch();
        }
        self.state.selected
    }

    /// Starts dragging the selected band. Does nothing without a selection.
    pub fn begin_drag(&mut self) -> bool {
        if self.state.selected_band().is_none() || self.state.drag_active {
            return false;
        }
        self.state.drag_active = true;
        true
    }

    /// Moves the dragged band to the pointer.
    ///
    /// Frequency always follows the pointer. Gain follows too, limited to the
    /// drag range, except in sweep mode where only frequency moves.
    pub fn drag_to(&mut self, x: f32, y: f32, viewport: Viewport) -> bool {
        if !self.state.drag_active || viewport.width <= 0.0 || viewport.height <= 0.0 {
            return false;
        }
        let (x, y) = viewport.clamp_point(x, y);
        let sweeping = self.state.sweep_active;
        let Some(band) = self.state.selected_band_mut() else {
            return false;
        };

        band.frequency = clamp_frequency(x_to_freq(x, viewport.width));
        if !sweeping {
            band.gain = clamp_drag_gain(y_to_gain(y, viewport.height));
        }
        self.touch();
        true
    }

    /// Stops dragging. The selection is kept.
    pub fn end_drag(&mut self) -> bool {
        let was_dragging = self.state.drag_active;
        self.state.drag_active = false;
        was_dragging
    }

    /// Adjusts the selected band's Q from a wheel delta.
    ///
    /// Scrolling down (negative delta) raises Q. Ignored while sweeping.
    pub fn adjust_q(&mut self, wheel_delta: f32) -> bool {
        if self.state.sweep_active || !wheel_delta.is_finite() {
            return false;
        }
        let Some(band) = self.state.selected_band_mut() else {
            return false;
        };
        band.q = clamp_q(band.q - wheel_delta * WHEEL_Q_SENSITIVITY);
        self.touch();
        true
    }

    /// Appends a flat peaking band at 1 kHz, unless the editor is full.
    pub fn add_band(&mut self) -> Option<BandId> {
        if self.state.bands.len() >= MAX_BANDS {
            return None;
        }
        let id = self
            .state
            .bands
            .iter()
            .map(|b| b.id)
            .max()
            .map_or(1, |max| max + 1);
        self.state.bands.push(Band::peaking_default(id));
        self.touch();
        log::debug!("[editor] added band {} ({} total)", id, self.state.bands.len());
        Some(id)
    }

    /// Removes the selected band.
    ///
    /// Does nothing without a selection or when it is the last band.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.state.selected else {
            return false;
        };
        if self.state.bands.len() <= 1 {
            return false;
        }
        self.state.bands.retain(|b| b.id != id);
        self.state.selected = None;
        self.state.drag_active = false;
        self.touch();
        log::debug!("[editor] deleted band {}", id);
        true
    }

    /// Sets a field of the selected band, clamped to the field's range.
    pub fn update_field(&mut self, field: BandField, value: f32) -> bool {
        if !value.is_finite() {
            return false;
        }
        let Some(band) = self.state.selected_band_mut() else {
            return false;
        };
        field.set(band, value);
        self.touch();
        true
    }

    /// Parses `text` and sets a field of the selected band.
    ///
    /// Text that does not parse to a finite number leaves the value as it was.
    pub fn update_field_text(&mut self, field: BandField, text: &str) -> bool {
        match text.trim().parse::<f32>() {
            Ok(value) if value.is_finite() => self.update_field(field, value),
            _ => false,
        }
    }

    /// Changes the filter kind of the selected band.
    pub fn set_kind(&mut self, kind: FilterKind) -> bool {
        let Some(band) = self.state.selected_band_mut() else {
            return false;
        };
        if band.kind == kind {
            return false;
        }
        band.kind = kind;
        self.touch();
        true
    }

    /// Selects a band by id. Unknown ids are ignored.
    pub fn select_band(&mut self, id: BandId) -> bool {
        if self.state.band(id).is_none() || self.state.selected == Some(id) {
            return false;
        }
        self.state.selected = Some(id);
        self.state.drag_active = false;
        self.touch();
        true
    }

    /// Clears the selection and ends any drag.
    pub fn clear_selection(&mut self) -> bool {
        self.state.drag_active = false;
        if self.state.selected.take().is_none() {
            return false;
        }
        self.touch();
        true
    }

    /// Turns sweep mode on or off.
    pub fn set_sweep(&mut self, on: bool) -> bool {
        if self.state.sweep_active == on {
            return false;
        }
        self.state.sweep_active = on;
        self.touch();
        log::debug!("[editor] sweep {}", if on { "on" } else { "off" });
        true
    }

    /// Turns solo mode on or off.
    pub fn set_solo(&mut self, on: bool) -> bool {
        if self.state.solo_active == on {
            return false;
        }
        self.state.solo_active = on;
        self.touch();
        log::debug!("[editor] solo {}", if on { "on" } else { "off" });
        true
    }

    pub fn toggle_sweep(&mut self) -> bool {
        self.set_sweep(!self.state.sweep_active)
    }

    pub fn toggle_solo(&mut self) -> bool {
        self.set_solo(!self.state.solo_active)
    }

    /// Restores the default preset, leaves sweep mode and clears the selection.
    ///
    /// Solo mode is left as it is.
    pub fn reset(&mut self) {
        self.state.bands = default_bands();
        self.state.sweep_active = false;
        self.state.selected = None;
        self.state.drag_active = false;
        self.touch();
        log::debug!("[editor] reset to default preset");
    }

    /// Summary of the stored bands for review notes; `None` when flat.
    pub fn export_summary(&self) -> Option<String> {
        export_summary(&self.state.bands)
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::band::{DB_SCALE, DRAG_GAIN_LIMIT, FIELD_GAIN_LIMIT, MAX_Q, MIN_FREQ, MIN_Q};
    use crate::editor::coords::{freq_to_x, gain_to_y};
    use crate::editor::overlay::{SOLO_Q, SWEEP_GAIN};
    use approx::assert_relative_eq;

    const VP: Viewport = Viewport {
        width: 800.0,
        height: 400.0,
    };

    fn node_of(ctrl: &InteractionController, id: BandId) -> SurfacePoint {
        let band = ctrl.state().band(id).copied().unwrap();
        node_position(band.frequency, band.gain, VP)
    }

    fn select(ctrl: &mut InteractionController, id: BandId) {
        assert!(ctrl.select_band(id));
    }

    #[test]
    fn test_new_controller_has_preset() {
        let ctrl = InteractionController::new();
        assert_eq!(ctrl.bands(), default_bands().as_slice());
        assert_eq!(ctrl.selected(), None);
        assert!(!ctrl.state().drag_active);
    }

    #[test]
    fn test_select_at_hits_node() {
        let mut ctrl = InteractionController::new();
        let node = node_of(&ctrl, 3);

        let hit = ctrl.select_at(node.x + 5.0, node.y - 5.0, VP);
        assert_eq!(hit, Some(3));
        assert!(ctrl.state().drag_active);
    }

    #[test]
    fn test_select_at_miss_clears_selection() {
        let mut ctrl = InteractionController::new();
        let node = node_of(&ctrl, 3);
        ctrl.select_at(node.x, node.y, VP);

        let miss = ctrl.select_at(node.x, node.y + 100.0, VP);
        assert_eq!(miss, None);
        assert_eq!(ctrl.selected(), None);
        assert!(!ctrl.state().drag_active);
    }

    #[test]
    fn test_select_at_outside_radius() {
        let mut ctrl = InteractionController::new();
        let node = node_of(&ctrl, 2);
        assert_eq!(ctrl.select_at(node.x + NODE_HIT_RADIUS + 1.0, node.y, VP), None);
    }

    #[test]
    fn test_select_at_prefers_nearest() {
        let bands = vec![
            Band::new(1, FilterKind::Peaking, 1000.0, 0.0, 1.0),
            Band::new(2, FilterKind::Peaking, 1100.0, 0.0, 1.0),
        ];
        let mut ctrl = InteractionController::with_bands(bands);
        let x2 = freq_to_x(1100.0, VP.width);
        assert_eq!(ctrl.select_at(x2 - 1.0, 200.0, VP), Some(2));
    }

    #[test]
    fn test_select_at_tie_goes_to_first() {
        let bands = vec![
            Band::new(7, FilterKind::Peaking, 1000.0, 0.0, 1.0),
            Band::new(3, FilterKind::Notch, 1000.0, 0.0, 4.0),
        ];
        let mut ctrl = InteractionController::with_bands(bands);
        let x = freq_to_x(1000.0, VP.width);
        assert_eq!(ctrl.select_at(x, 200.0, VP), Some(7));
    }

    #[test]
    fn test_select_at_uses_clamped_marker() {
        // A band at +24 dB is drawn at the top margin, not off-surface.
        let bands = vec![Band::new(1, FilterKind::Peaking, 1000.0, 24.0, 1.0)];
        let mut ctrl = InteractionController::with_bands(bands);
        let x = freq_to_x(1000.0, VP.width);
        assert_eq!(ctrl.select_at(x, 12.0, VP), Some(1));
    }

    #[test]
    fn test_select_at_uses_effective_position_while_sweeping() {
        let mut ctrl = InteractionController::new();
        select(&mut ctrl, 3);
        ctrl.set_sweep(true);

        // The swept band is drawn at +18 dB, so it is grabbed there.
        let marker = node_position(1000.0, SWEEP_GAIN, VP);
        assert_eq!(ctrl.select_at(marker.x, marker.y, VP), Some(3));
    }

    #[test]
    fn test_drag_updates_frequency_and_gain() {
        let mut ctrl = InteractionController::new();
        let node = node_of(&ctrl, 3);
        ctrl.select_at(node.x, node.y, VP);

        let target_x = freq_to_x(2000.0, VP.width);
        let target_y = gain_to_y(6.0, VP.height);
        assert!(ctrl.drag_to(target_x, target_y, VP));

        let band = ctrl.state().band(3).copied().unwrap();
        assert_relative_eq!(band.frequency, 2000.0, max_relative = 1e-3);
        assert_relative_eq!(band.gain, 6.0, epsilon = 1e-3);
    }

    #[test]
    fn test_drag_clamps_gain_and_pointer() {
        let mut ctrl = InteractionController::new();
        let node = node_of(&ctrl, 3);
        ctrl.select_at(node.x, node.y, VP);

        // The pointer is pulled back onto the surface, whose edges sit at +-12 dB.
        ctrl.drag_to(-300.0, -500.0, VP);
        let band = ctrl.state().band(3).copied().unwrap();
        assert_relative_eq!(band.frequency, MIN_FREQ, max_relative = 1e-4);
        assert_relative_eq!(band.gain, DB_SCALE / 2.0);

        ctrl.drag_to(400.0, 10_000.0, VP);
        let band = ctrl.state().band(3).copied().unwrap();
        assert_relative_eq!(band.gain, -DB_SCALE / 2.0);
        assert!(band.gain.abs() <= DRAG_GAIN_LIMIT);
    }

    #[test]
    fn test_drag_in_sweep_moves_frequency_only() {
        let mut ctrl = InteractionController::new();
        select(&mut ctrl, 2);
        ctrl.set_sweep(true);
        assert!(ctrl.begin_drag());

        ctrl.drag_to(freq_to_x(500.0, VP.width), 20.0, VP);
        let band = ctrl.state().band(2).copied().unwrap();
        assert_relative_eq!(band.frequency, 500.0, max_relative = 1e-3);
        assert_eq!(band.gain, 0.0);
    }

    #[test]
    fn test_drag_requires_active_drag() {
        let mut ctrl = InteractionController::new();
        select(&mut ctrl, 2);
        assert!(!ctrl.drag_to(100.0, 100.0, VP));
        assert_eq!(ctrl.state().band(2).map(|b| b.frequency), Some(250.0));
    }

    #[test]
    fn test_begin_drag_needs_selection() {
        let mut ctrl = InteractionController::new();
        assert!(!ctrl.begin_drag());
        assert!(!ctrl.state().drag_active);
    }

    #[test]
    fn test_end_drag_keeps_selection() {
        let mut ctrl = InteractionController::new();
        let node = node_of(&ctrl, 4);
        ctrl.select_at(node.x, node.y, VP);
        assert!(ctrl.end_drag());
        assert_eq!(ctrl.selected(), Some(4));
        assert!(!ctrl.state().drag_active);
    }

    #[test]
    fn test_adjust_q_scroll_down_raises_q() {
        let mut ctrl = InteractionController::new();
        select(&mut ctrl, 3);
        assert!(ctrl.adjust_q(-1000.0));
        assert_relative_eq!(ctrl.state().band(3).unwrap().q, 2.0, epsilon = 1e-5);

        ctrl.adjust_q(500.0);
        assert_relative_eq!(ctrl.state().band(3).unwrap().q, 1.5, epsilon = 1e-5);
    }

    #[test]
    fn test_adjust_q_clamps() {
        let mut ctrl = InteractionController::new();
        select(&mut ctrl, 3);
        ctrl.adjust_q(-1_000_000.0);
        assert_eq!(ctrl.state().band(3).unwrap().q, MAX_Q);
        ctrl.adjust_q(1_000_000.0);
        assert_eq!(ctrl.state().band(3).unwrap().q, MIN_Q);
    }

    #[test]
    fn test_adjust_q_ignored_without_selection_or_in_sweep() {
        let mut ctrl = InteractionController::new();
        assert!(!ctrl.adjust_q(-1000.0));

        select(&mut ctrl, 3);
        ctrl.set_sweep(true);
        assert!(!ctrl.adjust_q(-1000.0));
        assert_eq!(ctrl.state().band(3).unwrap().q, 1.0);
    }

    #[test]
    fn test_add_band_appends_peaking() {
        let mut ctrl = InteractionController::new();
        assert_eq!(ctrl.add_band(), Some(6));
        let added = ctrl.bands().last().copied().unwrap();
        assert_eq!(added, Band::new(6, FilterKind::Peaking, 1000.0, 0.0, 1.0));
    }

    #[test]
    fn test_add_band_caps_at_ten() {
        let mut ctrl = InteractionController::with_bands(vec![Band::new(
            1,
            FilterKind::Peaking,
            500.0,
            0.0,
            1.0,
        )]);
        for _ in 0..20 {
            ctrl.add_band();
        }
        assert_eq!(ctrl.bands().len(), MAX_BANDS);

        let mut ids: Vec<BandId> = ctrl.bands().iter().map(|b| b.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), MAX_BANDS);
    }

    #[test]
    fn test_add_band_fresh_id_after_delete() {
        let mut ctrl = InteractionController::new();
        select(&mut ctrl, 2);
        ctrl.delete_selected();
        assert_eq!(ctrl.add_band(), Some(6));
    }

    #[test]
    fn test_add_band_from_empty() {
        let mut ctrl = InteractionController::with_bands(Vec::new());
        assert_eq!(ctrl.add_band(), Some(1));
    }

    #[test]
    fn test_delete_selected() {
        let mut ctrl = InteractionController::new();
        select(&mut ctrl, 2);
        assert!(ctrl.delete_selected());
        assert_eq!(ctrl.bands().len(), 4);
        assert!(ctrl.state().band(2).is_none());
        assert_eq!(ctrl.selected(), None);

        // No selection: nothing happens.
        assert!(!ctrl.delete_selected());
        assert_eq!(ctrl.bands().len(), 4);
    }

    #[test]
    fn test_delete_never_empties() {
        let mut ctrl = InteractionController::new();
        for _ in 0..10 {
            if let Some(first) = ctrl.bands().first().map(|b| b.id) {
                ctrl.select_band(first);
            }
            ctrl.delete_selected();
        }
        assert_eq!(ctrl.bands().len(), 1);
    }

    #[test]
    fn test_update_field_clamps_gain() {
        let mut ctrl = InteractionController::new();
        select(&mut ctrl, 3);
        ctrl.update_field(BandField::Gain, 50.0);
        assert_eq!(ctrl.state().band(3).unwrap().gain, FIELD_GAIN_LIMIT);
        ctrl.update_field(BandField::Gain, -50.0);
        assert_eq!(ctrl.state().band(3).unwrap().gain, -FIELD_GAIN_LIMIT);
    }

    #[test]
    fn test_update_field_frequency_and_q() {
        let mut ctrl = InteractionController::new();
        select(&mut ctrl, 1);
        ctrl.update_field(BandField::Frequency, 5.0);
        ctrl.update_field(BandField::Q, 250.0);
        let band = ctrl.state().band(1).copied().unwrap();
        assert_eq!(band.frequency, 20.0);
        assert_eq!(band.q, 100.0);
    }

    #[test]
    fn test_update_field_without_selection() {
        let mut ctrl = InteractionController::new();
        assert!(!ctrl.update_field(BandField::Gain, 3.0));
        assert_eq!(ctrl.bands(), default_bands().as_slice());
    }

    #[test]
    fn test_update_field_text_fallback() {
        let mut ctrl = InteractionController::new();
        select(&mut ctrl, 3);
        assert!(ctrl.update_field_text(BandField::Gain, " 4.5 "));
        assert!(!ctrl.update_field_text(BandField::Gain, "loud"));
        assert!(!ctrl.update_field_text(BandField::Gain, ""));
        assert!(!ctrl.update_field_text(BandField::Gain, "NaN"));
        assert!(!ctrl.update_field_text(BandField::Gain, "inf"));
        assert_eq!(ctrl.state().band(3).unwrap().gain, 4.5);
    }

    #[test]
    fn test_set_kind() {
        let mut ctrl = InteractionController::new();
        assert!(!ctrl.set_kind(FilterKind::Notch));
        select(&mut ctrl, 3);
        assert!(ctrl.set_kind(FilterKind::Notch));
        assert_eq!(ctrl.state().band(3).unwrap().kind, FilterKind::Notch);
        assert!(!ctrl.set_kind(FilterKind::Notch));
    }

    #[test]
    fn test_reset_keeps_solo() {
        let mut ctrl = InteractionController::new();
        select(&mut ctrl, 3);
        ctrl.update_field(BandField::Gain, 9.0);
        ctrl.add_band();
        ctrl.set_sweep(true);
        ctrl.set_solo(true);

        ctrl.reset();
        assert_eq!(ctrl.bands(), default_bands().as_slice());
        assert!(!ctrl.state().sweep_active);
        assert!(ctrl.state().solo_active);
        assert_eq!(ctrl.selected(), None);
        assert!(!ctrl.state().drag_active);
    }

    #[test]
    fn test_effective_bands_follow_modes() {
        let mut ctrl = InteractionController::new();
        select(&mut ctrl, 2);
        ctrl.update_field(BandField::Gain, 5.0);
        select(&mut ctrl, 3);
        ctrl.set_sweep(true);
        ctrl.set_solo(true);

        let effective = ctrl.effective_bands();
        let soloed = effective.iter().find(|b| b.id == 3).copied().unwrap();
        assert_eq!(soloed.kind, FilterKind::BandPass);
        assert_eq!(soloed.q, SOLO_Q);
        assert!(effective.iter().filter(|b| b.id != 3).all(|b| b.gain == 0.0));

        // Stored state is untouched.
        assert_eq!(ctrl.state().band(2).unwrap().gain, 5.0);
        assert_eq!(ctrl.state().band(3).unwrap().kind, FilterKind::Peaking);
    }

    #[test]
    fn test_take_changed_effective() {
        let mut ctrl = InteractionController::new();
        assert!(ctrl.take_changed_effective().is_some());
        assert!(ctrl.take_changed_effective().is_none());

        ctrl.add_band();
        let pushed = ctrl.take_changed_effective();
        assert_eq!(pushed.map(|b| b.len()), Some(6));
        assert!(ctrl.take_changed_effective().is_none());

        // Rejected edits do not count as changes.
        ctrl.update_field(BandField::Gain, 1.0);
        assert!(ctrl.take_changed_effective().is_none());
    }

    #[test]
    fn test_apply_dispatches() {
        let mut ctrl = InteractionController::new();
        let node = node_of(&ctrl, 4);

        assert!(ctrl.apply(EditorCommand::SelectAt {
            x: node.x,
            y: node.y,
            viewport: VP
        }));
        assert!(ctrl.apply(EditorCommand::DragTo {
            x: node.x,
            y: gain_to_y(-3.0, VP.height),
            viewport: VP
        }));
        assert!(ctrl.apply(EditorCommand::EndDrag));
        assert!(ctrl.apply(EditorCommand::AdjustQ { wheel_delta: -1000.0 }));
        assert!(ctrl.apply(EditorCommand::UpdateField {
            field: BandField::Frequency,
            value: 3000.0
        }));
        assert!(ctrl.apply(EditorCommand::SetKind(FilterKind::HighPass)));

        let band = ctrl.state().band(4).copied().unwrap();
        assert_relative_eq!(band.gain, -3.0, epsilon = 1e-3);
        assert_relative_eq!(band.q, 2.0, epsilon = 1e-5);
        assert_eq!(band.frequency, 3000.0);
        assert_eq!(band.kind, FilterKind::HighPass);

        assert!(ctrl.apply(EditorCommand::DeleteSelected));
        assert!(ctrl.apply(EditorCommand::AddBand));
        assert!(ctrl.apply(EditorCommand::SetSolo(true)));
        assert!(!ctrl.apply(EditorCommand::SetSolo(true)));
        assert!(ctrl.apply(EditorCommand::Reset));
        assert!(!ctrl.apply(EditorCommand::ClearSelection));
        assert!(!ctrl.apply(EditorCommand::BeginDrag));
    }

    #[test]
    fn test_export_uses_stored_bands() {
        let mut ctrl = InteractionController::new();
        assert_eq!(ctrl.export_summary(), None);

        select(&mut ctrl, 2);
        ctrl.update_field(BandField::Frequency, 100.0);
        ctrl.update_field(BandField::Gain, 3.2);
        ctrl.set_solo(true);
        assert_eq!(ctrl.export_summary().as_deref(), Some("- 100Hz: +3.2dB (Q1.00)"));
    }

    #[test]
    fn test_empty_controller_does_not_panic() {
        let mut ctrl = InteractionController::with_bands(Vec::new());
        assert_eq!(ctrl.select_at(100.0, 100.0, VP), None);
        assert!(!ctrl.delete_selected());
        assert!(!ctrl.adjust_q(10.0));
        assert!(ctrl.effective_bands().is_empty());
        assert_eq!(ctrl.export_summary(), None);
    }
}
