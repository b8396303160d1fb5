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
            let hsl = Hsl::new(hue, 0.65, 0.68);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Continuous colour scales: value → Color32
// ---------------------------------------------------------------------------

/// Piecewise-linear gradient over `[0, 1]`, blended in linear RGB.
#[derive(Debug, Clone)]
pub struct ColorScale {
    stops: Vec<(f32, Color32)>,
}

impl ColorScale {
    /// `stops` must be sorted by position and non-empty.
    pub fn new(stops: &[(f32, Color32)]) -> Self {
        ColorScale {
            stops: stops.to_vec(),
        }
    }

    /// Low-to-high poverty bubbles: blue, green, yellow, orange, red.
    pub fn poverty_map() -> Self {
        Self::new(&[
            (0.0, Color32::from_rgb(0x74, 0xb9, 0xff)),
            (0.25, Color32::from_rgb(0x00, 0xb8, 0x94)),
            (0.5, Color32::from_rgb(0xfd, 0xcb, 0x6e)),
            (0.75, Color32::from_rgb(0xe1, 0x70, 0x55)),
            (1.0, Color32::from_rgb(0xd6, 0x30, 0x31)),
        ])
    }

    pub fn reds() -> Self {
        Self::new(&[
            (0.0, Color32::from_rgb(0xfe, 0xe0, 0xd2)),
            (0.5, Color32::from_rgb(0xfb, 0x6a, 0x4a)),
            (1.0, Color32::from_rgb(0x99, 0x00, 0x0d)),
        ])
    }

    pub fn blues() -> Self {
        Self::new(&[
            (0.0, Color32::from_rgb(0xde, 0xeb, 0xf7)),
            (0.5, Color32::from_rgb(0x6b, 0xae, 0xd6)),
            (1.0, Color32::from_rgb(0x08, 0x30, 0x6b)),
        ])
    }

    /// Colour at position `t`, clamped to `[0, 1]`.
    pub fn at(&self, t: f32) -> Color32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let Some(&(first_pos, first)) = self.stops.first() else {
            return Color32::GRAY;
        };
        if t <= first_pos {
            return first;
        }
        for pair in self.stops.windows(2) {
            let ((p0, c0), (p1, c1)) = (pair[0], pair[1]);
            if t < p1 {
                let f = (t - p0) / (p1 - p0);
                return from_linear(to_linear(c0).mix(to_linear(c1), f));
            }
            if t == p1 {
                return c1;
            }
        }
        self.stops.last().map_or(first, |&(_, c)| c)
    }

    /// Colour of `value` within `[min, max]`.
    pub fn for_value(&self, value: f64, min: f64, max: f64) -> Color32 {
        let span = max - min;
        let t = if span.abs() < f64::EPSILON {
            1.0
        } else {
            (value - min) / span
        };
        self.at(t as f32)
    }
}

fn to_linear(c: Color32) -> LinSrgb {
    Srgb::new(c.r(), c.g(), c.b())
        .into_format::<f32>()
        .into_linear()
}

fn from_linear(c: LinSrgb) -> Color32 {
    let s: Srgb<f32> = Srgb::from_linear(c);
    let s: Srgb<u8> = s.into_format();
    Color32::from_rgb(s.red, s.green, s.blue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_hits_stops_exactly() {
        let scale = ColorScale::poverty_map();
        assert_eq!(scale.at(0.0), Color32::from_rgb(0x74, 0xb9, 0xff));
        assert_eq!(scale.at(1.0), Color32::from_rgb(0xd6, 0x30, 0x31));
        assert_eq!(scale.at(-3.0), scale.at(0.0));
        assert_eq!(scale.at(7.0), scale.at(1.0));
    }

    #[test]
    fn degenerate_range_maps_to_top() {
        let scale = ColorScale::reds();
        assert_eq!(scale.for_value(5.0, 5.0, 5.0), scale.at(1.0));
    }

    #[test]
    fn palette_is_distinct() {
        let p = generate_palette(6);
        assert_eq!(p.len(), 6);
        for (i, a) in p.iter().enumerate() {
            for b in &p[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }
}
