//! Colour maps for heatmaps and group colours for scatter plots

use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

const VIRIDIS: [(u8, u8, u8); 9] = [
    (0x44, 0x01, 0x54),
    (0x47, 0x2d, 0x7b),
    (0x3b, 0x52, 0x8b),
    (0x2c, 0x72, 0x8e),
    (0x21, 0x91, 0x8c),
    (0x28, 0xae, 0x80),
    (0x5e, 0xc9, 0x62),
    (0xad, 0xdc, 0x30),
    (0xfd, 0xe7, 0x25),
];

// dark to light; reversed at lookup time
const ROCKET: [(u8, u8, u8); 8] = [
    (0x03, 0x05, 0x1a),
    (0x36, 0x19, 0x3e),
    (0x70, 0x1f, 0x57),
    (0xad, 0x17, 0x59),
    (0xe1, 0x33, 0x42),
    (0xf3, 0x76, 0x51),
    (0xf6, 0xb4, 0x8f),
    (0xfa, 0xeb, 0xdd),
];

const BLUES: [(u8, u8, u8); 5] = [
    (0xde, 0xeb, 0xf7),
    (0x9e, 0xca, 0xe1),
    (0x42, 0x92, 0xc6),
    (0x21, 0x71, 0xb5),
    (0x08, 0x30, 0x6b),
];

/// Sequential colour map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colormap {
    /// Perceptually uniform purple → yellow
    Viridis,
    /// Light cream → near black
    RocketReversed,
    /// Light → dark blue, used for 2-D histograms
    Blues,
}

impl Colormap {
    /// Colour at position `t` in [0, 1] (clamped)
    pub fn color(&self, t: f64) -> Srgb<u8> {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Colormap::Viridis => interpolate(&VIRIDIS, t),
            Colormap::RocketReversed => interpolate(&ROCKET, 1.0 - t),
            Colormap::Blues => interpolate(&BLUES, t),
        }
    }

    pub fn hex(&self, t: f64) -> String {
        to_hex(self.color(t))
    }
}

fn interpolate(stops: &[(u8, u8, u8)], t: f64) -> Srgb<u8> {
    let scaled = t * (stops.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(stops.len() - 1);
    let upper = (lower + 1).min(stops.len() - 1);
    let frac = (scaled - lower as f64) as f32;

    let a = linear(stops[lower]);
    let b = linear(stops[upper]);
    Srgb::<f32>::from_linear(a.mix(b, frac)).into_format::<u8>()
}

fn linear((r, g, b): (u8, u8, u8)) -> LinSrgb<f32> {
    Srgb::new(r, g, b).into_format::<f32>().into_linear()
}

pub fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// Text colour readable on top of `background`
pub fn contrast_text(background: Srgb<u8>) -> &'static str {
    let lin: LinSrgb<f32> = background.into_format::<f32>().into_linear();
    let luminance = 0.2126 * lin.red + 0.7152 * lin.green + 0.0722 * lin.blue;
    if luminance < 0.3 {
        "#ffffff"
    } else {
        "#262626"
    }
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_hex(rgb.into_format::<u8>())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_match_stops() {
        assert_eq!(Colormap::Viridis.hex(0.0), "#440154");
        assert_eq!(Colormap::Viridis.hex(1.0), "#fde725");
        assert_eq!(Colormap::RocketReversed.hex(0.0), "#faebdd");
        assert_eq!(Colormap::RocketReversed.hex(1.0), "#03051a");
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(Colormap::Viridis.hex(-3.0), Colormap::Viridis.hex(0.0));
        assert_eq!(Colormap::Viridis.hex(f64::NAN), Colormap::Viridis.hex(0.0));
    }

    #[test]
    fn test_contrast_text() {
        assert_eq!(contrast_text(Srgb::new(0x44, 0x01, 0x54)), "#ffffff");
        assert_eq!(contrast_text(Srgb::new(0xfd, 0xe7, 0x25)), "#262626");
    }

    #[test]
    fn test_palette_is_distinct() {
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        let unique: std::collections::HashSet<_> = colors.iter().collect();
        assert_eq!(unique.len(), 4);
    }
}
