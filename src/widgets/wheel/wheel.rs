//! Roulette face drawn with the egui painter.
//!
//! Screen angles follow egui's y-down convention: 0° points east and angles
//! grow clockwise, which matches how the face turns. The pointer sits on the
//! east rim, the reference the winner mapping assumes.

use eframe::egui::{self, Color32, FontId, Pos2, Sense, Shape, Stroke, Vec2};
use egui::emath::Rot2;
use egui::epaint::TextShape;

use crate::core::layout::{LabelScale, WheelLayout};
use crate::entities::Item;

/// Slice fills, cycled by index
const SLICE_COLORS: [Color32; 10] = [
    Color32::from_rgb(0xFF, 0x6B, 0x6B),
    Color32::from_rgb(0x4E, 0xCD, 0xC4),
    Color32::from_rgb(0x45, 0xB7, 0xD1),
    Color32::from_rgb(0xFF, 0xA0, 0x7A),
    Color32::from_rgb(0x98, 0xD8, 0xC8),
    Color32::from_rgb(0xF7, 0xDC, 0x6F),
    Color32::from_rgb(0xBB, 0x8F, 0xCE),
    Color32::from_rgb(0x82, 0xE0, 0xAA),
    Color32::from_rgb(0xF1, 0x94, 0x8A),
    Color32::from_rgb(0x85, 0xC1, 0xE9),
];

const RIM_COLOR: Color32 = Color32::from_rgb(0xFA, 0xCC, 0x15);
const POINTER_COLOR: Color32 = Color32::from_rgb(0xDC, 0x26, 0x26);
const WINNER_STROKE: Color32 = Color32::WHITE;

/// Arc points per 360°, fewer for small slices
const ARC_RESOLUTION: f64 = 180.0;

/// Label sits this far out along the slice bisector (fraction of radius)
const LABEL_RADIUS: f32 = 0.56;

/// Draw the wheel into the available square.
///
/// `winner` outlines that slice once the wheel has settled.
pub fn render_wheel(ui: &mut egui::Ui, items: &[Item], rotation: f64, winner: Option<usize>) -> egui::Response {
    let side = ui.available_width().min(ui.available_height()).max(120.0);
    let (rect, response) = ui.allocate_exact_size(Vec2::splat(side), Sense::hover());
    let painter = ui.painter_at(rect);

    let center = rect.center();
    let rim = side * 0.035;
    let radius = side / 2.0 - rim - side * 0.04;

    painter.circle_filled(center, radius + rim, RIM_COLOR);

    if items.is_empty() {
        painter.circle_filled(center, radius, ui.visuals().extreme_bg_color);
        painter.text(
            center,
            egui::Align2::CENTER_CENTER,
            "Add menu items to spin",
            FontId::proportional(16.0),
            ui.visuals().weak_text_color(),
        );
        draw_pointer(&painter, center, radius + rim);
        return response;
    }

    let layout = WheelLayout::new(items.len());
    let font = FontId::proportional(match layout.label_scale() {
        LabelScale::Large => side * 0.05,
        LabelScale::Medium => side * 0.037,
        LabelScale::Small => side * 0.025,
    });

    for (i, item) in items.iter().enumerate() {
        let (start, end) = layout.slice_bounds(i);
        let fill = SLICE_COLORS[i % SLICE_COLORS.len()];
        let points = slice_points(center, radius, start + rotation, end + rotation);
        if items.len() == 1 {
            painter.circle_filled(center, radius, fill);
        } else {
            painter.add(Shape::convex_polygon(points.clone(), fill, Stroke::new(1.0, Color32::WHITE)));
        }
        if winner == Some(i) {
            let mut outline = points;
            outline.push(center);
            painter.add(Shape::closed_line(outline, Stroke::new(3.0, WINNER_STROKE)));
        }

        let angle = (layout.label_angle(i) + rotation).to_radians() as f32;
        let galley = painter.layout_no_wrap(item.wheel_label(), font.clone(), Color32::WHITE);
        let rot = Rot2::from_angle(angle);
        let anchor = center + rot * Vec2::new(radius * LABEL_RADIUS, 0.0);
        let pos = anchor - rot * (galley.size() / 2.0);
        painter.add(TextShape::new(pos, galley, Color32::WHITE).with_angle(angle));
    }

    // Hub
    painter.circle_filled(center, side * 0.08, RIM_COLOR);
    painter.circle_filled(center, side * 0.05, Color32::WHITE);

    draw_pointer(&painter, center, radius + rim);
    response
}

/// Fan of rim points for a slice between two screen angles (degrees),
/// starting at the center.
fn slice_points(center: Pos2, radius: f32, start: f64, end: f64) -> Vec<Pos2> {
    let steps = (((end - start) / 360.0 * ARC_RESOLUTION).ceil() as usize).max(2);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for s in 0..=steps {
        let a = (start + (end - start) * s as f64 / steps as f64).to_radians() as f32;
        points.push(center + Vec2::angled(a) * radius);
    }
    points
}

/// Red arrow on the east rim pointing at the wheel
fn draw_pointer(painter: &egui::Painter, center: Pos2, outer: f32) {
    let tip = Pos2::new(center.x + outer - outer * 0.06, center.y);
    let back = center.x + outer + outer * 0.08;
    let half = outer * 0.08;
    painter.add(Shape::convex_polygon(
        vec![tip, Pos2::new(back, center.y - half), Pos2::new(back, center.y + half)],
        POINTER_COLOR,
        Stroke::new(1.5, Color32::WHITE),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_points_span_arc() {
        let center = Pos2::new(100.0, 100.0);
        let points = slice_points(center, 50.0, 0.0, 90.0);
        assert_eq!(points[0], center);
        let first = points[1];
        let last = *points.last().unwrap();
        assert!((first - Pos2::new(150.0, 100.0)).length() < 1e-3);
        // clockwise on screen: 90° is straight down
        assert!((last - Pos2::new(100.0, 150.0)).length() < 1e-3);
    }

    #[test]
    fn test_slice_points_min_steps() {
        let points = slice_points(Pos2::ZERO, 10.0, 0.0, 0.5);
        assert_eq!(points.len(), 4);
    }
}
