//! Interactive EQ display.
//!
//! Paints the editor's [`FramePrimitives`] (grid, spectrum, response curve and
//! band nodes) and turns pointer and wheel input into controller commands.

use eframe::egui::{
    self, Align2, Color32, CursorIcon, FontId, Pos2, Rect, Response, Sense, Shape, Stroke, Ui,
    Vec2,
};

use crate::app::theme;
use crate::editor::controller::NODE_HIT_RADIUS;
use crate::editor::{
    EditorCommand, FramePrimitives, FrameProducer, InteractionController, NodeMarker, SpectrumFrame,
    SurfacePoint, Viewport,
};

/// Wheel units per egui scroll point. One wheel notch scrolls about 50 points,
/// which maps to a delta of 100.
pub const WHEEL_DELTA_PER_POINT: f32 = 2.0;

/// Smallest size the display is laid out at.
pub const MIN_SIZE: Vec2 = Vec2::new(320.0, 200.0);

const NODE_RADIUS: f32 = 6.0;
const SELECTED_NODE_RADIUS: f32 = 8.0;

/// Converts a surface point to screen space.
#[inline]
pub fn to_screen(rect: Rect, point: SurfacePoint) -> Pos2 {
    Pos2::new(rect.left() + point.x, rect.top() + point.y)
}

/// Converts a screen position to surface coordinates.
#[inline]
pub fn to_surface(rect: Rect, pos: Pos2) -> SurfacePoint {
    SurfacePoint::new(pos.x - rect.left(), pos.y - rect.top())
}

/// Converts egui's vertical scroll (positive = up) to a wheel delta
/// (positive = down).
#[inline]
pub fn wheel_delta(scroll_y: f32) -> f32 {
    -scroll_y * WHEEL_DELTA_PER_POINT
}

/// Node under the pointer, if any.
pub fn hovered_node(frame: &FramePrimitives, point: SurfacePoint) -> Option<&NodeMarker> {
    frame
        .nodes
        .iter()
        .filter(|node| node.position.distance(point) <= NODE_HIT_RADIUS)
        .min_by(|a, b| a.position.distance(point).total_cmp(&b.position.distance(point)))
}

/// Shows the EQ display, filling the available space.
pub fn eq_display(
    ui: &mut Ui,
    controller: &mut InteractionController,
    producer: &FrameProducer,
    spectrum: Option<&SpectrumFrame>,
) -> Response {
    let size = ui.available_size().max(MIN_SIZE);
    let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());
    let viewport = Viewport::new(rect.width(), rect.height());

    handle_pointer(ui, &response, rect, viewport, controller);

    let frame = producer.tick(controller.state(), viewport, spectrum);

    if let Some(pos) = response.hover_pos() {
        if controller.state().drag_active {
            ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
        } else if hovered_node(&frame, to_surface(rect, pos)).is_some() {
            ui.ctx().set_cursor_icon(CursorIcon::Grab);
        }
    }

    if ui.is_rect_visible(rect) {
        let painter = ui.painter_at(rect);
        paint_background(&painter, rect, &frame);
        paint_spectrum(&painter, rect, &frame.spectrum);
        paint_curve(&painter, rect, &frame.curve);
        paint_nodes(&painter, rect, &frame.nodes);
        paint_mode_badge(&painter, rect, controller);
    }

    response
}

fn handle_pointer(
    ui: &mut Ui,
    response: &Response,
    rect: Rect,
    viewport: Viewport,
    controller: &mut InteractionController,
) {
    if response.drag_started() {
        // Hit-test where the button went down, not where the drag was recognised.
        let origin = ui
            .input(|i| i.pointer.press_origin())
            .or_else(|| response.interact_pointer_pos());
        if let Some(pos) = origin {
            let p = to_surface(rect, pos);
            controller.apply(EditorCommand::SelectAt {
                x: p.x,
                y: p.y,
                viewport,
            });
        }
    }

    if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            let p = to_surface(rect, pos);
            controller.apply(EditorCommand::DragTo {
                x: p.x,
                y: p.y,
                viewport,
            });
        }
    }

    if response.drag_stopped() {
        controller.apply(EditorCommand::EndDrag);
    }

    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            let p = to_surface(rect, pos);
            controller.apply(EditorCommand::SelectAt {
                x: p.x,
                y: p.y,
                viewport,
            });
            controller.apply(EditorCommand::EndDrag);
        }
    }

    if response.hovered() && controller.selected().is_some() {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll != 0.0 {
            controller.apply(EditorCommand::AdjustQ {
                wheel_delta: wheel_delta(scroll),
            });
            // The display owns the wheel while a band is selected.
            ui.input_mut(|i| {
                i.raw_scroll_delta = Vec2::ZERO;
                i.smooth_scroll_delta = Vec2::ZERO;
            });
        }
    }
}

fn paint_background(painter: &egui::Painter, rect: Rect, frame: &FramePrimitives) {
    painter.rect_filled(rect, 2.0, theme::display::BACKGROUND);

    let label_font = FontId::proportional(10.0);

    for line in &frame.frequency_lines {
        let x = rect.left() + line.position;
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            Stroke::new(0.5, theme::display::GRID),
        );
        if let Some(label) = &line.label {
            painter.text(
                Pos2::new(x + 3.0, rect.bottom() - 3.0),
                Align2::LEFT_BOTTOM,
                label,
                label_font.clone(),
                theme::display::LABEL,
            );
        }
    }

    for line in &frame.gain_lines {
        let y = rect.top() + line.position;
        let stroke = if line.emphasized {
            Stroke::new(1.0, theme::display::GRID_ZERO)
        } else {
            Stroke::new(0.5, theme::display::GRID)
        };
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        if let Some(label) = &line.label {
            painter.text(
                Pos2::new(rect.left() + 3.0, y - 2.0),
                Align2::LEFT_BOTTOM,
                label,
                label_font.clone(),
                theme::display::LABEL,
            );
        }
    }

    painter.rect_stroke(rect, 2.0, Stroke::new(1.0, theme::display::BORDER));
}

/// Fills the area under the spectrum outline, one quad per segment.
fn paint_spectrum(painter: &egui::Painter, rect: Rect, points: &[SurfacePoint]) {
    let base_y = rect.bottom();
    for pair in points.windows(2) {
        let prev = to_screen(rect, pair[0]);
        let curr = to_screen(rect, pair[1]);
        painter.add(Shape::convex_polygon(
            vec![Pos2::new(prev.x, base_y), prev, curr, Pos2::new(curr.x, base_y)],
            theme::display::SPECTRUM,
            Stroke::NONE,
        ));
    }
}

fn paint_curve(painter: &egui::Painter, rect: Rect, curve: &[SurfacePoint]) {
    if curve.len() < 2 {
        return;
    }
    let points: Vec<Pos2> = curve.iter().map(|p| to_screen(rect, *p)).collect();
    let glow = theme::display::CURVE.gamma_multiply(0.25);
    painter.add(Shape::line(points.clone(), Stroke::new(5.0, glow)));
    painter.add(Shape::line(points, Stroke::new(2.0, theme::display::CURVE)));
}

fn paint_nodes(painter: &egui::Painter, rect: Rect, nodes: &[NodeMarker]) {
    for node in nodes {
        let center = to_screen(rect, node.position);
        let color = theme::kind_color(node.kind);
        if node.selected {
            painter.circle_filled(center, SELECTED_NODE_RADIUS, color);
            painter.circle_stroke(
                center,
                SELECTED_NODE_RADIUS + 3.0,
                Stroke::new(1.5, theme::display::SELECTION),
            );
        } else {
            painter.circle_filled(center, NODE_RADIUS, color.gamma_multiply(0.85));
        }
        painter.text(
            center + Vec2::new(0.0, -SELECTED_NODE_RADIUS - 6.0),
            Align2::CENTER_BOTTOM,
            node.id.to_string(),
            FontId::proportional(10.0),
            theme::text::SECONDARY,
        );
    }
}

fn paint_mode_badge(painter: &egui::Painter, rect: Rect, controller: &InteractionController) {
    let state = controller.state();
    let (text, color): (&str, Color32) = match (state.solo_active, state.sweep_active) {
        (true, _) => ("SOLO", theme::accent::WARNING),
        (false, true) => ("SWEEP", theme::accent::SUCCESS),
        (false, false) => return,
    };
    painter.text(
        Pos2::new(rect.right() - 8.0, rect.top() + 8.0),
        Align2::RIGHT_TOP,
        text,
        FontId::proportional(12.0),
        color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{EditorState, FilterKind};

    #[test]
    fn test_screen_surface_round_trip() {
        let rect = Rect::from_min_size(Pos2::new(40.0, 60.0), Vec2::new(800.0, 400.0));
        let p = SurfacePoint::new(123.0, 45.0);
        assert_eq!(to_surface(rect, to_screen(rect, p)), p);
        assert_eq!(to_screen(rect, SurfacePoint::new(0.0, 0.0)), rect.min);
    }

    #[test]
    fn test_wheel_delta_direction() {
        // Scrolling down in egui is negative y; the controller expects positive.
        assert_eq!(wheel_delta(-50.0), 100.0);
        assert_eq!(wheel_delta(50.0), -100.0);
    }

    #[test]
    fn test_hovered_node() {
        let frame = FrameProducer::default().tick(
            &EditorState::default(),
            Viewport::new(800.0, 400.0),
            None,
        );
        let target = frame.nodes[2];
        let hit = hovered_node(
            &frame,
            SurfacePoint::new(target.position.x + 3.0, target.position.y),
        );
        assert_eq!(hit.map(|n| n.id), Some(target.id));
        assert_eq!(hit.map(|n| n.kind), Some(FilterKind::Peaking));

        assert!(hovered_node(&frame, SurfacePoint::new(target.position.x, 390.0)).is_none());
    }
}
