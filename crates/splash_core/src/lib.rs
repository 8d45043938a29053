//! Splash Core
//!
//! Foundational types shared by every Splash crate:
//!
//! - **Geometry**: points, vectors, sizes and rectangles in logical pixels
//! - **Color**: RGBA colors with CSS `hsla()` and hex construction
//! - **Brushes**: solid fills, linear/radial gradients, blend modes
//! - **Draw Context**: the canvas-style drawing seam and a recording
//!   implementation for deferred execution

pub mod brush;
pub mod color;
pub mod draw;
pub mod geometry;

pub use brush::{BlendMode, Brush, Gradient, GradientShape, GradientStop};
pub use color::{Color, ColorParseError};
pub use draw::{
    DrawCommand, DrawContext, DrawContextExt, DrawState, RecordingContext, TextAlign, TextStyle,
    Transform,
};
pub use geometry::{Point, Rect, Size, Vec2};
