//! Gradient recipes used by the effects

pub use splash_core::{Gradient, GradientShape, GradientStop};

use crate::{Color, Point};

/// Two-color gradient along the segment `start` to `end`
pub fn linear_simple(start: Point, end: Point, from: Color, to: Color) -> Gradient {
    Gradient::two_stop(GradientShape::Linear { start, end }, from, to)
}

/// A soft blob: `color` at the center fading to fully transparent at `radius`
///
/// The rim keeps the center's hue so screen blending never darkens the edge.
pub fn soft_glow(center: Point, radius: f32, color: Color) -> Gradient {
    Gradient::two_stop(
        GradientShape::Radial { center, radius },
        color,
        color.with_alpha(0.0),
    )
}

/// Three-stop horizontal band: `edge`, `middle`, `edge`
///
/// Spans `width` pixels starting at `x`, on the line `y`.
pub fn horizontal_band(x: f32, width: f32, y: f32, edge: Color, middle: Color) -> Gradient {
    Gradient::new(
        GradientShape::Linear {
            start: Point::new(x, y),
            end: Point::new(x + width, y),
        },
        vec![
            GradientStop::new(0.0, edge),
            GradientStop::new(0.5, middle),
            GradientStop::new(1.0, edge),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_glow_rim_keeps_hue() {
        let glow = soft_glow(Point::new(1.0, 2.0), 4.0, Color::WHITE.with_alpha(0.6));
        assert!(glow.is_radial());
        assert_eq!(glow.start_color().a, 0.6);
        assert_eq!(glow.end_color().a, 0.0);
        assert_eq!(glow.end_color().r, 1.0);
    }

    #[test]
    fn test_horizontal_band_spans_width() {
        let band = horizontal_band(10.0, 100.0, 1.0, Color::TRANSPARENT, Color::WHITE);
        assert_eq!(band.stops.len(), 3);
        assert_eq!(band.stops[1].color, Color::WHITE);
        assert_eq!(
            band.shape,
            GradientShape::Linear {
                start: Point::new(10.0, 1.0),
                end: Point::new(110.0, 1.0),
            }
        );
    }

    #[test]
    fn test_linear_simple_ends() {
        let g = linear_simple(Point::ZERO, Point::new(0.0, 5.0), Color::BLACK, Color::WHITE);
        assert_eq!(g.start_color(), Color::BLACK);
        assert_eq!(g.end_color(), Color::WHITE);
    }
}
