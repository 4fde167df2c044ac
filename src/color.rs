use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

use crate::data::filter::DisplayValue;

// ---------------------------------------------------------------------------
// Continuous colour scale
// ---------------------------------------------------------------------------

/// Stops of the "Turbo" scale, dark blue → dark red.
const TURBO: [(u8, u8, u8); 15] = [
    (0x30, 0x12, 0x3b),
    (0x41, 0x45, 0xab),
    (0x46, 0x75, 0xed),
    (0x39, 0xa2, 0xfc),
    (0x1b, 0xcf, 0xd4),
    (0x24, 0xec, 0xa6),
    (0x61, 0xfc, 0x6c),
    (0xa4, 0xfc, 0x3b),
    (0xd1, 0xe8, 0x34),
    (0xf3, 0xc6, 0x3a),
    (0xfe, 0x9b, 0x2d),
    (0xf3, 0x63, 0x15),
    (0xd9, 0x38, 0x06),
    (0xb1, 0x19, 0x01),
    (0x7a, 0x04, 0x02),
];

/// Maps a number inside `domain` onto a continuous palette.
/// Values outside the domain take the nearest end colour.
#[derive(Debug, Clone)]
pub struct ColorScale {
    domain: (f64, f64),
    stops: Vec<LinSrgb>,
}

impl ColorScale {
    pub fn turbo(domain: (f64, f64)) -> Self {
        let stops: Vec<LinSrgb> = TURBO
            .iter()
            .map(|&(r, g, b)| Srgb::new(r, g, b).into_format::<f32>().into_linear())
            .collect();
        ColorScale { domain, stops }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Position of `value` within the domain, clamped to `[0, 1]`.
    pub fn normalise(&self, value: f64) -> f32 {
        let (lo, hi) = self.domain;
        let span = hi - lo;
        if span.abs() < f64::EPSILON {
            return 0.0;
        }
        ((value - lo) / span).clamp(0.0, 1.0) as f32
    }

    /// Colour at position `t` (`0.0..=1.0`) along the palette.
    pub fn color_at(&self, t: f32) -> Color32 {
        let Some(last) = self.stops.len().checked_sub(1) else {
            return Color32::GRAY;
        };
        let scaled = t.clamp(0.0, 1.0) * last as f32;
        let i = (scaled.floor() as usize).min(last.saturating_sub(1));
        let mixed = if last == 0 {
            self.stops[0]
        } else {
            self.stops[i].mix(self.stops[i + 1], scaled - i as f32)
        };
        let rgb: Srgb<u8> = Srgb::from_linear(mixed);
        Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
    }

    /// Fill colour for a county, `None` for counties that get no fill.
    pub fn color_for(&self, value: &DisplayValue) -> Option<Color32> {
        value.value().map(|v| self.color_at(self.normalise(v)))
    }

    /// `n` evenly spaced (value, colour) pairs across the domain, for the legend.
    pub fn legend_entries(&self, n: usize) -> Vec<(f64, Color32)> {
        if n < 2 {
            return Vec::new();
        }
        let (lo, hi) = self.domain;
        (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                (lo + t * (hi - lo), self.color_at(t as f32))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale() -> ColorScale {
        ColorScale::turbo((100_000.0, 1_500_000.0))
    }

    fn close(a: Color32, b: Color32) -> bool {
        let d = |x: u8, y: u8| (x as i16 - y as i16).abs() <= 1;
        d(a.r(), b.r()) && d(a.g(), b.g()) && d(a.b(), b.b())
    }

    #[test]
    fn ends_match_palette_ends() {
        let s = scale();
        assert!(close(s.color_at(0.0), Color32::from_rgb(0x30, 0x12, 0x3b)));
        assert!(close(s.color_at(1.0), Color32::from_rgb(0x7a, 0x04, 0x02)));
    }

    #[test]
    fn out_of_domain_values_clamp() {
        let s = scale();
        assert_eq!(s.normalise(30_000.0), 0.0);
        assert_eq!(s.normalise(2_000_000.0), 1.0);
        assert_eq!(s.normalise(800_000.0), 0.5);
        assert_eq!(
            s.color_for(&DisplayValue::Eligible(30_000.0)),
            s.color_for(&DisplayValue::Eligible(100_000.0))
        );
    }

    #[test]
    fn ineligible_has_no_fill_but_zero_does() {
        let s = scale();
        assert_eq!(s.color_for(&DisplayValue::Ineligible), None);
        assert!(s.color_for(&DisplayValue::Eligible(0.0)).is_some());
    }

    #[test]
    fn legend_spans_domain() {
        let entries = scale().legend_entries(5);
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].0, 100_000.0);
        assert_eq!(entries[4].0, 1_500_000.0);
    }
}
