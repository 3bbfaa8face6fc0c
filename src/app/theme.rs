//! Theme definitions for the EQ editor UI
//!
//! Color constants and the dark style applied at startup.

use eframe::egui::{self, Color32, Stroke, Rounding, Vec2};

use crate::editor::FilterKind;

/// Background colors
pub mod background {
    use super::Color32;

    /// Main window background - deep dark blue
    pub const MAIN: Color32 = Color32::from_rgb(26, 26, 46);

    /// Grid line color - subtle
    pub const GRID: Color32 = Color32::from_rgb(40, 40, 60);

    /// Panel background - slightly lighter than main
    pub const PANEL: Color32 = Color32::from_rgb(35, 35, 55);

    /// Widget background (buttons, inputs)
    pub const WIDGET: Color32 = Color32::from_rgb(45, 45, 70);

    /// Widget background when hovered
    pub const WIDGET_HOVERED: Color32 = Color32::from_rgb(55, 55, 85);

    /// Widget background when active/pressed
    pub const WIDGET_ACTIVE: Color32 = Color32::from_rgb(65, 65, 100);
}

/// EQ display colors
pub mod display {
    use super::Color32;

    /// Plot background
    pub const BACKGROUND: Color32 = Color32::from_rgb(20, 22, 30);

    /// Plot border
    pub const BORDER: Color32 = Color32::from_rgb(50, 55, 70);

    /// Grid lines
    pub const GRID: Color32 = Color32::from_rgba_premultiplied(15, 15, 15, 15);

    /// The 0 dB line
    pub const GRID_ZERO: Color32 = Color32::from_rgba_premultiplied(45, 45, 45, 45);

    /// Axis labels
    pub const LABEL: Color32 = Color32::from_rgba_premultiplied(70, 70, 70, 70);

    /// Summed response curve - blue
    pub const CURVE: Color32 = Color32::from_rgb(66, 165, 245);

    /// Spectrum fill - teal, translucent
    pub const SPECTRUM: Color32 = Color32::from_rgba_premultiplied(30, 80, 86, 110);

    /// Ring around the selected node
    pub const SELECTION: Color32 = Color32::from_rgb(240, 240, 245);
}

/// Node colors by filter kind
pub mod kind {
    use super::Color32;

    /// Shelves - orange
    pub const SHELF: Color32 = Color32::from_rgb(255, 183, 77);

    /// Peaking - green
    pub const PEAKING: Color32 = Color32::from_rgb(129, 199, 132);

    /// Low/high pass - purple
    pub const PASS: Color32 = Color32::from_rgb(186, 104, 200);

    /// Notch - red
    pub const NOTCH: Color32 = Color32::from_rgb(239, 83, 80);

    /// Band pass - cyan
    pub const BAND_PASS: Color32 = Color32::from_rgb(77, 208, 225);
}

/// Node color for a filter kind.
pub fn kind_color(filter: FilterKind) -> Color32 {
    match filter {
        FilterKind::LowShelf | FilterKind::HighShelf => kind::SHELF,
        FilterKind::Peaking => kind::PEAKING,
        FilterKind::LowPass | FilterKind::HighPass => kind::PASS,
        FilterKind::Notch => kind::NOTCH,
        FilterKind::BandPass => kind::BAND_PASS,
    }
}

/// Text colors
pub mod text {
    use super::Color32;

    /// Primary text - bright white
    pub const PRIMARY: Color32 = Color32::from_rgb(240, 240, 245);

    /// Secondary text - dimmed
    pub const SECONDARY: Color32 = Color32::from_rgb(160, 160, 175);

    /// Disabled text
    pub const DISABLED: Color32 = Color32::from_rgb(100, 100, 115);

    /// Accent/highlight text
    pub const ACCENT: Color32 = Color32::from_rgb(130, 180, 255);
}

/// UI accent colors
pub mod accent {
    use super::Color32;

    /// Primary accent - blue
    pub const PRIMARY: Color32 = Color32::from_rgb(66, 165, 245);

    /// Success/active - green
    pub const SUCCESS: Color32 = Color32::from_rgb(129, 199, 132);

    /// Warning - orange
    pub const WARNING: Color32 = Color32::from_rgb(255, 183, 77);

    /// Error - red
    pub const ERROR: Color32 = Color32::from_rgb(239, 83, 80);
}

/// Standard rounding for UI elements
pub const ROUNDING: Rounding = Rounding {
    nw: 6.0,
    ne: 6.0,
    sw: 6.0,
    se: 6.0,
};

/// Smaller rounding for compact elements
pub const ROUNDING_SMALL: Rounding = Rounding {
    nw: 4.0,
    ne: 4.0,
    sw: 4.0,
    se: 4.0,
};

/// Apply the dark editor theme to an egui context
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    // Visuals
    let visuals = &mut style.visuals;
    visuals.dark_mode = true;

    // Window styling
    visuals.window_fill = background::PANEL;
    visuals.window_stroke = Stroke::new(1.0, Color32::from_rgb(60, 60, 80));
    visuals.window_rounding = ROUNDING;

    // Panel styling
    visuals.panel_fill = background::MAIN;

    // Widget styling
    visuals.widgets.noninteractive.bg_fill = background::WIDGET;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, text::SECONDARY);
    visuals.widgets.noninteractive.rounding = ROUNDING_SMALL;

    visuals.widgets.inactive.bg_fill = background::WIDGET;
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, text::PRIMARY);
    visuals.widgets.inactive.rounding = ROUNDING_SMALL;

    visuals.widgets.hovered.bg_fill = background::WIDGET_HOVERED;
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, text::PRIMARY);
    visuals.widgets.hovered.rounding = ROUNDING_SMALL;

    visuals.widgets.active.bg_fill = background::WIDGET_ACTIVE;
    visuals.widgets.active.fg_stroke = Stroke::new(1.5, accent::PRIMARY);
    visuals.widgets.active.rounding = ROUNDING_SMALL;

    visuals.widgets.open.bg_fill = background::WIDGET_ACTIVE;
    visuals.widgets.open.fg_stroke = Stroke::new(1.0, text::PRIMARY);
    visuals.widgets.open.rounding = ROUNDING_SMALL;

    // Selection styling
    visuals.selection.bg_fill = accent::PRIMARY.gamma_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, accent::PRIMARY);

    // Hyperlink color
    visuals.hyperlink_color = text::ACCENT;

    // Extreme background (for things like text edit backgrounds)
    visuals.extreme_bg_color = Color32::from_rgb(20, 20, 35);

    // Faint background for code/monospace
    visuals.code_bg_color = Color32::from_rgb(35, 35, 50);

    // Spacing
    style.spacing.item_spacing = Vec2::new(8.0, 6.0);
    style.spacing.button_padding = Vec2::new(12.0, 6.0);
    style.spacing.window_margin = egui::Margin::same(12.0);

    ctx.set_style(style);
}
