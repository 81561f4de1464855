//! Expense breakdown pie geometry.
//!
//! Slices are laid out on the unit circle starting at angle 0 and running
//! counter-clockwise in fixed category order. Each slice carries its SVG
//! path so the chart can be exported or rendered outside egui.

use std::f64::consts::TAU;

use super::summary::FinancialSummary;

/// Path used when one category holds (almost) the whole total.
pub const FULL_CIRCLE_PATH: &str = "M 1 0 A 1 1 0 1 1 -1 0 A 1 1 0 1 1 1 0";

/// One category of the expense pie.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: &'static str,
    /// `#rrggbb`
    pub color: &'static str,
    pub cost: f64,
    /// Share of the total, 0..=100.
    pub pct: f64,
    /// Fraction of the circle where the slice starts, 0..=1.
    pub start: f64,
    pub end: f64,
    pub path: String,
}

/// Category order and colors.
const CATEGORIES: [(&str, &str); 4] = [
    ("Raw Materials", "#15803d"),
    ("Packaging", "#16a34a"),
    ("Labor", "#3b82f6"),
    ("Wastage (Loss)", "#ef4444"),
];

/// Point on the unit circle for a fraction of a full turn.
pub fn coordinates_for_percent(fraction: f64) -> (f64, f64) {
    let angle = TAU * fraction;
    (angle.cos(), angle.sin())
}

fn coord(value: f64) -> String {
    // avoid "-0.0000" for values that round to zero
    if value.abs() < 0.00005 {
        "0.0000".to_string()
    } else {
        format!("{value:.4}")
    }
}

fn slice_path(start: f64, end: f64, pct: f64) -> String {
    if pct > 99.9 {
        return FULL_CIRCLE_PATH.to_string();
    }
    let (sx, sy) = coordinates_for_percent(start);
    let (ex, ey) = coordinates_for_percent(end);
    let large_arc = if pct / 100.0 > 0.5 { 1 } else { 0 };
    format!(
        "M 0 0 L {} {} A 1 1 0 {large_arc} 1 {} {} L 0 0",
        coord(sx),
        coord(sy),
        coord(ex),
        coord(ey)
    )
}

/// Build the non-empty slices for a summary.
pub fn build_slices(summary: &FinancialSummary) -> Vec<PieSlice> {
    let costs = [summary.raw_material, summary.procurement, summary.labor, summary.wastage];
    let total = summary.total_expense();

    let mut cumulative = 0.0;
    CATEGORIES
        .iter()
        .zip(costs)
        .filter_map(|(&(label, color), cost)| {
            let pct = if total > 0.0 { cost / total * 100.0 } else { 0.0 };
            if pct.is_nan() || pct <= 0.0 {
                return None;
            }
            let start = cumulative;
            cumulative += pct / 100.0;
            let end = cumulative.min(1.0);
            Some(PieSlice {
                label,
                color,
                cost,
                pct,
                start,
                end,
                path: slice_path(start, end, pct),
            })
        })
        .collect()
}

/// Index of the slice covering `fraction` of the circle.
pub fn slice_at(slices: &[PieSlice], fraction: f64) -> Option<usize> {
    slices
        .iter()
        .position(|s| fraction >= s.start && fraction < s.end)
        .or_else(|| {
            // the last slice owns the closing edge
            match slices.last() {
                Some(last) if (fraction - last.end).abs() < f64::EPSILON => Some(slices.len() - 1),
                _ => None,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(raw: f64, procurement: f64, labor: f64, wastage: f64) -> FinancialSummary {
        FinancialSummary {
            raw_material: raw,
            procurement,
            labor,
            wastage,
            ..Default::default()
        }
    }

    #[test]
    fn test_single_category_full_circle() {
        let slices = build_slices(&summary(0.0, 0.0, 120.0, 0.0));

        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].label, "Labor");
        assert_eq!(slices[0].pct, 100.0);
        assert_eq!(slices[0].path, FULL_CIRCLE_PATH);
        assert!(!slices[0].path.contains("NaN"));
    }

    #[test]
    fn test_zero_total_has_no_slices() {
        assert!(build_slices(&summary(0.0, 0.0, 0.0, 0.0)).is_empty());
    }

    #[test]
    fn test_order_and_colors() {
        let slices = build_slices(&summary(10.0, 20.0, 30.0, 40.0));
        let labels: Vec<_> = slices.iter().map(|s| s.label).collect();
        let colors: Vec<_> = slices.iter().map(|s| s.color).collect();

        assert_eq!(labels, vec!["Raw Materials", "Packaging", "Labor", "Wastage (Loss)"]);
        assert_eq!(colors, vec!["#15803d", "#16a34a", "#3b82f6", "#ef4444"]);
    }

    #[test]
    fn test_half_split_paths() {
        let slices = build_slices(&summary(50.0, 0.0, 50.0, 0.0));

        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].path, "M 0 0 L 1.0000 0.0000 A 1 1 0 0 1 -1.0000 0.0000 L 0 0");
        assert_eq!(slices[1].path, "M 0 0 L -1.0000 0.0000 A 1 1 0 0 1 1.0000 0.0000 L 0 0");
    }

    #[test]
    fn test_large_arc_flag() {
        let slices = build_slices(&summary(75.0, 25.0, 0.0, 0.0));
        assert!(slices[0].path.contains("A 1 1 0 1 1"));
        assert!(slices[1].path.contains("A 1 1 0 0 1"));
    }

    #[test]
    fn test_percentages_bounded() {
        let cases = [
            summary(1.0, 2.0, 3.0, 4.0),
            summary(0.01, 1e6, 0.0, 0.0),
            summary(1e-9, 0.0, 0.0, 1e-9),
            summary(99.95, 0.05, 0.0, 0.0),
        ];
        for case in &cases {
            let slices = build_slices(case);
            let total: f64 = slices.iter().map(|s| s.pct).sum();
            assert!(total <= 100.0 + 1e-9, "total {total}");
            for slice in &slices {
                assert!(slice.pct > 0.0);
                assert!(slice.end <= 1.0);
                assert!(!slice.path.contains("NaN"));
            }
        }
    }

    #[test]
    fn test_slice_at() {
        let slices = build_slices(&summary(25.0, 25.0, 50.0, 0.0));

        assert_eq!(slice_at(&slices, 0.0), Some(0));
        assert_eq!(slice_at(&slices, 0.3), Some(1));
        assert_eq!(slice_at(&slices, 0.9), Some(2));
        assert_eq!(slice_at(&slices, 1.0), Some(2));
        assert_eq!(slice_at(&[], 0.5), None);
    }
}
