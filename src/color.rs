use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Interpolate between two sRGB colours in linear space.
fn lerp(from: Srgb, to: Srgb, t: f32) -> Color32 {
    let a: LinSrgb = from.into_linear();
    let b: LinSrgb = to.into_linear();
    to_color32(Srgb::from_linear(a.mix(b, t.clamp(0.0, 1.0))))
}

// ---------------------------------------------------------------------------
// Continuous scales
// ---------------------------------------------------------------------------

/// Sequential white → dark blue scale for heatmap cells, `t` in `[0, 1]`.
pub fn blues(t: f32) -> Color32 {
    lerp(
        Srgb::new(0.969, 0.984, 1.0),
        Srgb::new(0.031, 0.188, 0.420),
        t,
    )
}

/// Diverging red → grey → blue scale for correlations in `[-1, 1]`.
pub fn diverging(value: f64) -> Color32 {
    let v = value.clamp(-1.0, 1.0) as f32;
    let mid = Srgb::new(0.85, 0.85, 0.85);
    if v < 0.0 {
        lerp(mid, Srgb::new(0.80, 0.15, 0.15), -v)
    } else {
        lerp(mid, Srgb::new(0.13, 0.35, 0.80), v)
    }
}

/// Black or white, whichever reads better on `background`.
pub fn contrast_text(background: Color32) -> Color32 {
    let luma = 0.299 * background.r() as f32
        + 0.587 * background.g() as f32
        + 0.114 * background.b() as f32;
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

// ---------------------------------------------------------------------------
// Color mapping: series name → Color32
// ---------------------------------------------------------------------------

/// Maps series names (graduation status labels, model names) to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from the given names, in order.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let palette = generate_palette(names.len());
        let mapping = names.into_iter().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given name.
    pub fn color_for(&self, name: &str) -> Color32 {
        self.mapping
            .get(name)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_distinct() {
        let p = generate_palette(3);
        assert_eq!(p.len(), 3);
        assert_ne!(p[0], p[1]);
        assert_ne!(p[1], p[2]);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_color_map_default() {
        let cm = ColorMap::new(["0", "1"]);
        assert_ne!(cm.color_for("0"), cm.color_for("1"));
        assert_eq!(cm.color_for("missing"), Color32::GRAY);
    }

    #[test]
    fn test_blues_endpoints() {
        assert!(blues(0.0).b() > 240);
        assert!(blues(1.0).r() < 20);
        assert_eq!(contrast_text(blues(0.0)), Color32::BLACK);
        assert_eq!(contrast_text(blues(1.0)), Color32::WHITE);
    }

    #[test]
    fn test_diverging_sign() {
        let neg = diverging(-1.0);
        let pos = diverging(1.0);
        assert!(neg.r() > neg.b());
        assert!(pos.b() > pos.r());
    }
}
