//! Status bar meters for the preview engine: output peak level and CPU load.

use eframe::egui::{self, Color32, Rect, Response, Sense, Ui, Vec2};

use crate::app::theme;
use crate::dsp::linear_to_db;

/// Lowest level shown on the meter, in dBFS.
pub const METER_FLOOR_DB: f32 = -60.0;
/// Level above which the meter turns amber.
pub const METER_HOT_DB: f32 = -6.0;
/// Level above which the meter turns red.
pub const METER_CLIP_DB: f32 = -0.5;

/// CPU load thresholds, in percent.
pub const CPU_MODERATE: f32 = 50.0;
pub const CPU_HIGH: f32 = 80.0;

const BAR_WIDTH: f32 = 60.0;
const BAR_HEIGHT: f32 = 10.0;
const LABEL_WIDTH: f32 = 30.0;
const TEXT_WIDTH: f32 = 45.0;

/// Fraction of the bar filled for a linear peak value.
pub fn level_fraction(peak: f32) -> f32 {
    let db = linear_to_db(peak.abs());
    ((db - METER_FLOOR_DB) / -METER_FLOOR_DB).clamp(0.0, 1.0)
}

pub fn level_color(peak: f32) -> Color32 {
    let db = linear_to_db(peak.abs());
    if db >= METER_CLIP_DB {
        theme::accent::ERROR
    } else if db >= METER_HOT_DB {
        theme::accent::WARNING
    } else {
        theme::accent::SUCCESS
    }
}

pub fn cpu_load_color(load: f32) -> Color32 {
    if load >= CPU_HIGH {
        theme::accent::ERROR
    } else if load >= CPU_MODERATE {
        theme::accent::WARNING
    } else {
        theme::accent::SUCCESS
    }
}

/// Label, track, filled portion and readout.
fn paint_bar(ui: &mut Ui, label: &str, fraction: f32, color: Color32, readout: &str) -> Response {
    let total_width = LABEL_WIDTH + BAR_WIDTH + TEXT_WIDTH + 8.0;
    let (rect, response) =
        ui.allocate_exact_size(Vec2::new(total_width, BAR_HEIGHT), Sense::hover());

    if ui.is_rect_visible(rect) {
        let painter = ui.painter();

        painter.text(
            egui::pos2(rect.min.x, rect.center().y),
            egui::Align2::LEFT_CENTER,
            label,
            egui::FontId::proportional(BAR_HEIGHT * 0.85),
            theme::text::SECONDARY,
        );

        let bar_rect = Rect::from_min_size(
            egui::pos2(rect.min.x + LABEL_WIDTH, rect.min.y + 1.0),
            Vec2::new(BAR_WIDTH, BAR_HEIGHT - 2.0),
        );
        painter.rect_filled(bar_rect, 2.0, theme::background::WIDGET);

        let fill_width = fraction.clamp(0.0, 1.0) * bar_rect.width();
        if fill_width > 0.0 {
            let fill_rect =
                Rect::from_min_size(bar_rect.min, Vec2::new(fill_width, bar_rect.height()));
            painter.rect_filled(fill_rect, 2.0, color);
        }

        painter.rect_stroke(
            bar_rect,
            2.0,
            egui::Stroke::new(1.0, theme::background::WIDGET_HOVERED),
        );

        painter.text(
            egui::pos2(bar_rect.right() + 4.0, rect.center().y),
            egui::Align2::LEFT_CENTER,
            readout,
            egui::FontId::proportional(BAR_HEIGHT * 0.9),
            color,
        );
    }

    response
}

/// Peak meter for one stereo output. Shows the louder channel.
pub fn level_meter(ui: &mut Ui, left: f32, right: f32) -> Response {
    let peak = left.abs().max(right.abs());
    let db = linear_to_db(peak);
    let readout = if db <= METER_FLOOR_DB {
        "-inf".to_string()
    } else {
        format!("{:.1}", db)
    };
    paint_bar(
        ui,
        "OUT:",
        level_fraction(peak),
        level_color(peak),
        &readout,
    )
    .on_hover_text(format!(
        "Output peak\nL {:.1} dBFS\nR {:.1} dBFS",
        linear_to_db(left.abs()),
        linear_to_db(right.abs())
    ))
}

/// Audio callback time as a share of the buffer period.
pub fn cpu_meter(ui: &mut Ui, load: f32) -> Response {
    paint_bar(
        ui,
        "CPU:",
        load / 100.0,
        cpu_load_color(load),
        &format!("{:.0}%", load),
    )
    .on_hover_text(format!(
        "Audio CPU: {:.1}%\n{}",
        load,
        if load >= CPU_HIGH {
            "High load - risk of audio glitches!"
        } else if load >= CPU_MODERATE {
            "Moderate load"
        } else {
            "Healthy"
        }
    ))
}
