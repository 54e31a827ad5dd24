//! Pie chart of a folder's line counts, painted with egui shapes

use eframe::egui;
use gms2_project::Breakdown;
use std::f32::consts::TAU;

/// Slice colours, cycled
pub const PALETTE: [(u8, u8, u8); 10] = [
    (0x1f, 0x77, 0xb4),
    (0xff, 0x7f, 0x0e),
    (0x2c, 0xa0, 0x2c),
    (0xd6, 0x27, 0x28),
    (0x94, 0x67, 0xbd),
    (0x8c, 0x56, 0x4b),
    (0xe3, 0x77, 0xc2),
    (0x7f, 0x7f, 0x7f),
    (0xbc, 0xbd, 0x22),
    (0x17, 0xbe, 0xcf),
];

/// First slice starts here, slices run counter-clockwise
const START_ANGLE_DEG: f32 = 140.0;
/// Slices at or below this share get no count label
const MIN_LABELLED_PERCENT: f64 = 1.0;
const LABEL_DISTANCE: f32 = 1.1;
const PCT_DISTANCE: f32 = 0.6;

/// Count and share shown inside a slice, or nothing for tiny slices
pub fn slice_label(lines: usize, total: usize) -> String {
    if total == 0 {
        return String::new();
    }
    let percent = lines as f64 * 100.0 / total as f64;
    if percent > MIN_LABELLED_PERCENT {
        format!("{}\n({:.1}%)", lines, percent)
    } else {
        String::new()
    }
}

/// Start and end angle of every slice, in radians, counter-clockwise
pub fn slice_angles(breakdown: &Breakdown) -> Vec<(f32, f32)> {
    let start = START_ANGLE_DEG.to_radians();
    if breakdown.total == 0 {
        return vec![(start, start); breakdown.slices.len()];
    }

    let mut cumulative = 0usize;
    breakdown
        .slices
        .iter()
        .map(|slice| {
            let a0 = start + cumulative as f32 / breakdown.total as f32 * TAU;
            cumulative += slice.lines;
            let a1 = start + cumulative as f32 / breakdown.total as f32 * TAU;
            (a0, a1)
        })
        .collect()
}

fn slice_color(index: usize) -> egui::Color32 {
    let (r, g, b) = PALETTE[index % PALETTE.len()];
    egui::Color32::from_rgb(r, g, b)
}

/// Screen point at `angle` (counter-clockwise, y up) and `distance` from `center`
fn polar(center: egui::Pos2, angle: f32, distance: f32) -> egui::Pos2 {
    center + egui::vec2(angle.cos(), -angle.sin()) * distance
}

/// Title above, pie filling the rest of the panel
pub fn pie(ui: &mut egui::Ui, breakdown: &Breakdown, title: &str) {
    ui.vertical_centered(|ui| {
        ui.heading(title);
    });
    ui.add_space(8.0);

    let size = ui.available_size();
    let (rect, _response) = ui.allocate_exact_size(size, egui::Sense::hover());
    if breakdown.total == 0 {
        return;
    }

    let painter = ui.painter_at(rect);
    let center = rect.center();
    let radius = (rect.width().min(rect.height()) * 0.5 - 48.0).max(16.0);
    let text_color = ui.visuals().text_color();
    let edge = egui::Stroke::new(1.0, ui.visuals().panel_fill);
    let font = egui::TextStyle::Small.resolve(ui.style());

    let angles = slice_angles(breakdown);
    for (i, (slice, &(a0, a1))) in breakdown.slices.iter().zip(&angles).enumerate() {
        if a1 <= a0 {
            continue;
        }
        let color = slice_color(i);

        // Fan of thin triangles so large slices stay convex
        let steps = (((a1 - a0) / TAU) * 120.0).ceil().clamp(1.0, 120.0) as usize;
        for j in 0..steps {
            let t0 = a0 + (a1 - a0) * j as f32 / steps as f32;
            let t1 = a0 + (a1 - a0) * (j + 1) as f32 / steps as f32;
            painter.add(egui::Shape::convex_polygon(
                vec![center, polar(center, t0, radius), polar(center, t1, radius)],
                color,
                egui::Stroke::NONE,
            ));
        }
        painter.line_segment([center, polar(center, a0, radius)], edge);

        let mid = (a0 + a1) * 0.5;
        let anchor = if mid.cos() >= 0.0 {
            egui::Align2::LEFT_CENTER
        } else {
            egui::Align2::RIGHT_CENTER
        };
        painter.text(
            polar(center, mid, radius * LABEL_DISTANCE),
            anchor,
            &slice.label,
            font.clone(),
            text_color,
        );

        let pct = slice_label(slice.lines, breakdown.total);
        if !pct.is_empty() {
            painter.text(
                polar(center, mid, radius * PCT_DISTANCE),
                egui::Align2::CENTER_CENTER,
                pct,
                font.clone(),
                egui::Color32::WHITE,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gms2_project::Slice;

    fn breakdown(lines: &[usize]) -> Breakdown {
        Breakdown {
            path: Vec::new(),
            slices: lines
                .iter()
                .enumerate()
                .map(|(i, &lines)| Slice { label: format!("s{}", i), lines })
                .collect(),
            total: lines.iter().sum(),
        }
    }

    #[test]
    fn test_slice_label() {
        assert_eq!(slice_label(30, 40), "30\n(75.0%)");
        assert_eq!(slice_label(1, 1000), "");
        assert_eq!(slice_label(1, 100), "");
        assert_eq!(slice_label(2, 100), "2\n(2.0%)");
        assert_eq!(slice_label(0, 0), "");
    }

    #[test]
    fn test_slice_angles_cover_full_turn() {
        let angles = slice_angles(&breakdown(&[1, 3, 0]));
        let start = START_ANGLE_DEG.to_radians();
        assert_eq!(angles[0].0, start);
        assert!((angles[0].1 - (start + TAU * 0.25)).abs() < 1e-5);
        assert_eq!(angles[1].0, angles[0].1);
        assert!((angles[1].1 - (start + TAU)).abs() < 1e-5);
        assert_eq!(angles[2].0, angles[2].1);
    }

    #[test]
    fn test_zero_total_has_empty_slices() {
        let angles = slice_angles(&breakdown(&[0, 0]));
        assert!(angles.iter().all(|(a0, a1)| a0 == a1));
    }
}
