//! Fill styles and compositing modes

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::geometry::Point;

/// A color pinned at a position along a gradient
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// `0.0` at the start (or center), `1.0` at the end (or rim)
    pub offset: f32,
    pub color: Color,
}

impl GradientStop {
    pub fn new(offset: f32, color: Color) -> Self {
        Self {
            offset: offset.clamp(0.0, 1.0),
            color,
        }
    }
}

/// Geometry a gradient's offsets are measured along
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GradientShape {
    /// Along the segment from `start` to `end`
    Linear { start: Point, end: Point },
    /// Outward from `center` to `radius`
    Radial { center: Point, radius: f32 },
}

/// A gradient fill
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    pub shape: GradientShape,
    /// Ordered by offset
    pub stops: Vec<GradientStop>,
}

impl Gradient {
    /// Gradient over `shape`; stops are put in offset order
    pub fn new(shape: GradientShape, mut stops: Vec<GradientStop>) -> Self {
        stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        Self { shape, stops }
    }

    /// `from` at offset 0 blending to `to` at offset 1
    pub fn two_stop(shape: GradientShape, from: Color, to: Color) -> Self {
        Self {
            shape,
            stops: vec![GradientStop::new(0.0, from), GradientStop::new(1.0, to)],
        }
    }

    pub fn is_radial(&self) -> bool {
        matches!(self.shape, GradientShape::Radial { .. })
    }

    /// Color at offset 0, transparent if there are no stops
    pub fn start_color(&self) -> Color {
        self.stops.first().map_or(Color::TRANSPARENT, |s| s.color)
    }

    /// Color at offset 1, transparent if there are no stops
    pub fn end_color(&self) -> Color {
        self.stops.last().map_or(Color::TRANSPARENT, |s| s.color)
    }
}

/// How a shape is filled
#[derive(Clone, Debug, PartialEq)]
pub enum Brush {
    Solid(Color),
    Gradient(Gradient),
}

impl From<Color> for Brush {
    fn from(color: Color) -> Self {
        Brush::Solid(color)
    }
}

impl From<Gradient> for Brush {
    fn from(gradient: Gradient) -> Self {
        Brush::Gradient(gradient)
    }
}

/// How a layer composites over what is beneath it
///
/// Serialized with CSS `mix-blend-mode` names (`"screen"`, `"color-dodge"`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
}
