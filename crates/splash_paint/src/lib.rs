//! Splash Paint/Canvas API
//!
//! A 2D drawing API for decorative effects, similar to HTML Canvas.
//! All core types are unified with splash_core.
//!
//! # Features
//!
//! - Per-frame `PaintContext` drawing in logical pixels over the device scale
//! - Gradient helpers (soft glows, highlight bands)
//! - `Surface` abstraction over the host's drawing target
//! - `Canvas` sizing with device-pixel-ratio handling and resolution downgrade
//!
//! # Example
//!
//! ```
//! use splash_paint::{Canvas, CanvasOptions, Color, DrawContextExt, HeadlessSurface, Rect, Surface};
//!
//! let mut surface = HeadlessSurface::new(Rect::new(0.0, 0.0, 800.0, 600.0), 2.0);
//! let mut canvas = Canvas::attach(&surface, CanvasOptions::default()).unwrap();
//!
//! let frame = canvas.record(|ctx| {
//!     ctx.fill_viewport(Color::BLACK.with_alpha(0.03));
//! });
//! surface.present(frame);
//! assert_eq!(surface.presented_frames(), 1);
//! ```

pub mod canvas;
pub mod context;
pub mod gradient;
pub mod surface;

// ─────────────────────────────────────────────────────────────────────────────
// Core type re-exports from splash_core (unified type system)
// ─────────────────────────────────────────────────────────────────────────────

pub use splash_core::{
    BlendMode, Brush, Color, DrawCommand, DrawContext, DrawContextExt, DrawState, Gradient,
    GradientShape, GradientStop, Point, Rect, Size, TextAlign, TextStyle, Transform, Vec2,
};

// ─────────────────────────────────────────────────────────────────────────────
// splash_paint specific exports
// ─────────────────────────────────────────────────────────────────────────────

pub use canvas::{Canvas, CanvasOptions};
pub use context::PaintContext;
pub use surface::{
    CompositeStyle, Frame, HeadlessSurface, PixelSize, Result, Surface, SurfaceError,
};
