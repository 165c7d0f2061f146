use eframe::egui::Color32;
use palette::{named, Srgb};

use crate::encode::fields::StyleColor;

// ---------------------------------------------------------------------------
// Named colours → Color32
// ---------------------------------------------------------------------------

fn to_color32(rgb: Srgb<u8>) -> Color32 {
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// CSS colour for a field's importance style.
pub fn style_color(color: StyleColor) -> Color32 {
    to_color32(match color {
        StyleColor::Green => named::GREEN,
        StyleColor::Red => named::RED,
        StyleColor::Black => named::BLACK,
    })
}

/// Histogram bars.
pub fn bar_color() -> Color32 {
    to_color32(named::STEELBLUE).gamma_multiply(0.6)
}

/// Density overlay.
pub fn density_color() -> Color32 {
    to_color32(named::STEELBLUE)
}

/// Median reference line and label.
pub fn median_color() -> Color32 {
    to_color32(named::RED)
}

/// Selected patient's line and label.
pub fn marker_color() -> Color32 {
    to_color32(named::GREEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_colors_match_css_names() {
        assert_eq!(style_color(StyleColor::Green), Color32::from_rgb(0, 128, 0));
        assert_eq!(style_color(StyleColor::Red), Color32::from_rgb(255, 0, 0));
        assert_eq!(style_color(StyleColor::Black), Color32::from_rgb(0, 0, 0));
    }

    #[test]
    fn reference_lines_are_distinct() {
        assert_ne!(median_color(), marker_color());
    }
}
