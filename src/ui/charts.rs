//! Painted charts for the financial overview.

use std::f32::consts::TAU;

use eframe::egui::{self, Color32, Mesh, Pos2, RichText, Sense, Shape, Stroke, Ui, Vec2};

use super::components::{colors, hex_color};
use crate::finance::TrendBar;
use crate::finance::pie::{PieSlice, slice_at};

/// Triangles per full turn.
const PIE_SEGMENTS: f32 = 120.0;

/// Cost breakdown pie with legend. Returns the hovered slice.
pub fn pie_chart(ui: &mut Ui, slices: &[PieSlice], currency: &str, diameter: f32) -> Option<usize> {
    if slices.is_empty() {
        ui.label(RichText::new("No expenses recorded yet").weak());
        return None;
    }

    let mut hovered = None;
    ui.horizontal(|ui| {
        let (rect, response) = ui.allocate_exact_size(Vec2::splat(diameter), Sense::hover());
        let center = rect.center();
        let radius = diameter / 2.0;

        if let Some(pos) = response.hover_pos() {
            let offset = pos - center;
            if offset.length() <= radius {
                hovered = slice_at(slices, turn_fraction(offset) as f64);
            }
        }

        if ui.is_rect_visible(rect) {
            for (idx, slice) in slices.iter().enumerate() {
                let mut color = hex_color(slice.color);
                if hovered.is_some() && hovered != Some(idx) {
                    color = color.gamma_multiply(0.5);
                }
                ui.painter()
                    .add(fan(center, radius, slice.start as f32, slice.end as f32, color));
            }
            ui.painter()
                .circle_stroke(center, radius, Stroke::new(1.0, ui.visuals().weak_text_color()));
        }

        ui.add_space(20.0);

        ui.vertical(|ui| {
            for (idx, slice) in slices.iter().enumerate() {
                ui.horizontal(|ui| {
                    let (swatch, _) = ui.allocate_exact_size(Vec2::splat(12.0), Sense::hover());
                    ui.painter().rect_filled(swatch, 2.0, hex_color(slice.color));
                    let text = RichText::new(format!("{} ({:.1}%)", slice.label, slice.pct));
                    ui.label(if hovered == Some(idx) { text.strong() } else { text });
                });
            }

            if let Some(slice) = hovered.and_then(|i| slices.get(i)) {
                ui.add_space(10.0);
                ui.label(RichText::new(slice.label).strong());
                ui.label(format!("{currency} {:.2}", slice.cost));
            }
        });
    });

    hovered
}

/// Fraction of a turn for a screen offset, matching the unit-circle
/// geometry of the slice paths (y grows downward).
fn turn_fraction(offset: Vec2) -> f32 {
    let angle = offset.y.atan2(offset.x);
    let angle = if angle < 0.0 { angle + TAU } else { angle };
    angle / TAU
}

/// Filled wedge from `start` to `end` (fractions of a turn).
fn fan(center: Pos2, radius: f32, start: f32, end: f32, color: Color32) -> Shape {
    let steps = ((end - start) * PIE_SEGMENTS).ceil().max(1.0) as u32;
    let point = |fraction: f32| {
        let angle = fraction * TAU;
        center + Vec2::new(angle.cos(), angle.sin()) * radius
    };

    let mut mesh = Mesh::default();
    mesh.colored_vertex(center, color);
    for step in 0..=steps {
        let fraction = start + (end - start) * step as f32 / steps as f32;
        mesh.colored_vertex(point(fraction), color);
    }
    for i in 1..=steps {
        mesh.add_triangle(0, i, i + 1);
    }
    Shape::mesh(mesh)
}

/// Seven-day revenue bars.
pub fn trend_chart(ui: &mut Ui, bars: &[TrendBar], currency: &str, height: f32) {
    if bars.is_empty() {
        ui.label(RichText::new("No revenue data").weak());
        return;
    }

    let bar_width = 36.0;
    let gap = 14.0;
    let label_height = 18.0;
    let width = bars.len() as f32 * (bar_width + gap);
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, height + label_height), Sense::hover());
    let painter = ui.painter_at(rect);
    let baseline = rect.top() + height;

    for (idx, bar) in bars.iter().enumerate() {
        let left = rect.left() + idx as f32 * (bar_width + gap);
        let top = baseline - height * (bar.height_pct as f32 / 100.0);
        let bar_rect = egui::Rect::from_min_max(egui::pos2(left, top), egui::pos2(left + bar_width, baseline));

        let response = ui.interact(bar_rect, ui.id().with(("trend_bar", idx)), Sense::hover());
        let fill = if response.hovered() {
            colors::SUCCESS
        } else {
            colors::SUCCESS.gamma_multiply(0.7)
        };
        painter.rect_filled(bar_rect, 3.0, fill);
        response.on_hover_text(format!("{currency} {:.2}", bar.amount));

        painter.text(
            egui::pos2(left + bar_width / 2.0, baseline + 2.0),
            egui::Align2::CENTER_TOP,
            &bar.label,
            egui::FontId::proportional(11.0),
            ui.visuals().weak_text_color(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_fraction_quadrants() {
        assert!((turn_fraction(Vec2::new(1.0, 0.0)) - 0.0).abs() < 1e-6);
        assert!((turn_fraction(Vec2::new(0.0, 1.0)) - 0.25).abs() < 1e-6);
        assert!((turn_fraction(Vec2::new(-1.0, 0.0)) - 0.5).abs() < 1e-6);
        assert!((turn_fraction(Vec2::new(0.0, -1.0)) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_fan_vertex_count() {
        let Shape::Mesh(mesh) = fan(Pos2::ZERO, 10.0, 0.0, 0.5, Color32::RED) else {
            panic!("expected mesh");
        };
        // center + 61 rim points, 60 triangles
        assert_eq!(mesh.vertices.len(), 62);
        assert_eq!(mesh.indices.len(), 180);
    }
}
