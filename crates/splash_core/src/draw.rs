//! Drawing interface
//!
//! Effects draw through [`DrawContext`], a small canvas-style API. The
//! [`RecordingContext`] implementation captures every call as a
//! [`DrawCommand`] so a host can replay the frame later: a browser canvas,
//! a GPU backend, or a test asserting on the list.
//!
//! # Example
//!
//! ```
//! use splash_core::{Color, DrawContext, Rect, RecordingContext, Size};
//!
//! let mut ctx = RecordingContext::new(Size::new(800.0, 600.0));
//! ctx.fill_rect(Rect::new(0.0, 0.0, 800.0, 600.0), Color::BLACK.with_alpha(0.03).into());
//! assert_eq!(ctx.commands().len(), 1);
//! ```

use crate::brush::Brush;
use crate::color::Color;
use crate::geometry::{Point, Rect, Size};

// ─────────────────────────────────────────────────────────────────────────────
// Transform
// ─────────────────────────────────────────────────────────────────────────────

/// 2D affine transform
///
/// Maps `(x, y)` to `(a*x + c*y + tx, b*x + d*y + ty)`, the same layout as
/// a canvas `setTransform(a, b, c, d, e, f)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform::scale(1.0, 1.0);

    pub const fn translate(tx: f32, ty: f32) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            tx,
            ty,
        }
    }

    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: sy,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// `inner` applied first, then `self`
    pub fn compose(&self, inner: &Transform) -> Transform {
        Transform {
            a: self.a * inner.a + self.c * inner.b,
            b: self.b * inner.a + self.d * inner.b,
            c: self.a * inner.c + self.c * inner.d,
            d: self.b * inner.c + self.d * inner.d,
            tx: self.a * inner.tx + self.c * inner.ty + self.tx,
            ty: self.b * inner.tx + self.d * inner.ty + self.ty,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text
// ─────────────────────────────────────────────────────────────────────────────

/// Where a text origin sits on the line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in logical pixels
    pub size: f32,
    pub color: Color,
    pub align: TextAlign,
    /// Fixed-width digits, for counters that should not jitter
    pub monospace: bool,
}

impl TextStyle {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            color: Color::WHITE,
            align: TextAlign::Left,
            monospace: false,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn monospace(mut self) -> Self {
        self.monospace = true;
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(14.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DrawContext
// ─────────────────────────────────────────────────────────────────────────────

/// Transform and opacity in effect for the next draw call
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawState {
    pub transform: Transform,
    pub opacity: f32,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Transform::IDENTITY,
            opacity: 1.0,
        }
    }
}

/// Canvas-style drawing surface for effects
///
/// Transforms and opacities nest: each push composes with what is already
/// in effect and the matching pop restores it. Unbalanced pops are ignored.
pub trait DrawContext {
    fn push_transform(&mut self, transform: Transform);
    fn pop_transform(&mut self);

    /// Multiply every following draw's alpha by `opacity`
    fn push_opacity(&mut self, opacity: f32);
    fn pop_opacity(&mut self);

    /// Overwrite every pixel with `color`, as resizing a canvas bitmap does
    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, rect: Rect, brush: Brush);
    fn fill_circle(&mut self, center: Point, radius: f32, brush: Brush);
    fn draw_text(&mut self, text: &str, origin: Point, style: &TextStyle);

    /// Drawable area in logical pixels
    fn viewport_size(&self) -> Size;

    fn state(&self) -> DrawState;
}

/// Conveniences taking anything that converts into a [`Brush`]
pub trait DrawContextExt: DrawContext {
    fn fill<B: Into<Brush>>(&mut self, rect: Rect, brush: B) {
        self.fill_rect(rect, brush.into());
    }

    fn fill_disc<B: Into<Brush>>(&mut self, center: Point, radius: f32, brush: B) {
        self.fill_circle(center, radius, brush.into());
    }

    /// Cover the whole viewport, e.g. with a translucent fade
    fn fill_viewport<B: Into<Brush>>(&mut self, brush: B) {
        let area = self.viewport_size().to_rect();
        self.fill_rect(area, brush.into());
    }
}

impl<T: DrawContext + ?Sized> DrawContextExt for T {}

// ─────────────────────────────────────────────────────────────────────────────
// Recording
// ─────────────────────────────────────────────────────────────────────────────

/// One recorded drawing operation
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    PushTransform(Transform),
    PopTransform,
    PushOpacity(f32),
    PopOpacity,
    Clear(Color),
    FillRect {
        rect: Rect,
        brush: Brush,
    },
    FillCircle {
        center: Point,
        radius: f32,
        brush: Brush,
    },
    DrawText {
        text: String,
        origin: Point,
        style: TextStyle,
    },
}

/// Nested values over a fixed root that can never be popped
#[derive(Clone, Debug)]
struct StateStack<T> {
    root: T,
    pushed: Vec<T>,
}

impl<T: Copy> StateStack<T> {
    fn new(root: T) -> Self {
        Self {
            root,
            pushed: Vec::new(),
        }
    }

    fn top(&self) -> T {
        self.pushed.last().copied().unwrap_or(self.root)
    }

    fn push(&mut self, value: T) {
        self.pushed.push(value);
    }

    /// `false` when only the root is left
    fn pop(&mut self) -> bool {
        self.pushed.pop().is_some()
    }
}

/// Records draw calls for deferred replay
///
/// Pushes and pops are recorded as given, including unbalanced pops; only
/// the tracked state ignores them.
#[derive(Clone, Debug)]
pub struct RecordingContext {
    commands: Vec<DrawCommand>,
    transforms: StateStack<Transform>,
    opacities: StateStack<f32>,
    viewport: Size,
}

impl RecordingContext {
    pub fn new(viewport: Size) -> Self {
        Self {
            commands: Vec::new(),
            transforms: StateStack::new(Transform::IDENTITY),
            opacities: StateStack::new(1.0),
            viewport,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Hand over the recorded list, leaving the context empty
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self::new(Size::default())
    }
}

impl DrawContext for RecordingContext {
    fn push_transform(&mut self, transform: Transform) {
        let combined = self.transforms.top().compose(&transform);
        self.transforms.push(combined);
        self.commands.push(DrawCommand::PushTransform(transform));
    }

    fn pop_transform(&mut self) {
        if !self.transforms.pop() {
            tracing::trace!("unbalanced pop_transform");
        }
        self.commands.push(DrawCommand::PopTransform);
    }

    fn push_opacity(&mut self, opacity: f32) {
        let combined = self.opacities.top() * opacity;
        self.opacities.push(combined);
        self.commands.push(DrawCommand::PushOpacity(opacity));
    }

    fn pop_opacity(&mut self) {
        if !self.opacities.pop() {
            tracing::trace!("unbalanced pop_opacity");
        }
        self.commands.push(DrawCommand::PopOpacity);
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, brush: Brush) {
        self.commands.push(DrawCommand::FillRect { rect, brush });
    }

    fn fill_circle(&mut self, center: Point, radius: f32, brush: Brush) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            brush,
        });
    }

    fn draw_text(&mut self, text: &str, origin: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::DrawText {
            text: text.to_owned(),
            origin,
            style: style.clone(),
        });
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn state(&self) -> DrawState {
        DrawState {
            transform: self.transforms.top(),
            opacity: self.opacities.top(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_transforms_compose_inner_first() {
        let mut ctx = RecordingContext::new(Size::new(800.0, 600.0));
        assert_eq!(ctx.state().transform, Transform::IDENTITY);

        // Device scale outside, a local offset inside
        ctx.push_transform(Transform::scale(2.0, 2.0));
        ctx.push_transform(Transform::translate(10.0, 20.0));
        assert_eq!(
            ctx.state().transform.apply(Point::new(1.0, 1.0)),
            Point::new(22.0, 42.0)
        );

        ctx.pop_transform();
        assert_eq!(
            ctx.state().transform.apply(Point::new(1.0, 1.0)),
            Point::new(2.0, 2.0)
        );
    }

    #[test]
    fn test_unbalanced_pops_are_recorded_but_ignored() {
        let mut ctx = RecordingContext::new(Size::new(10.0, 10.0));
        ctx.pop_transform();
        ctx.pop_opacity();
        assert_eq!(ctx.state(), DrawState::default());
        assert_eq!(
            ctx.commands(),
            &[DrawCommand::PopTransform, DrawCommand::PopOpacity]
        );
    }

    #[test]
    fn test_opacity_multiplies() {
        let mut ctx = RecordingContext::new(Size::new(800.0, 600.0));
        ctx.push_opacity(0.4);
        ctx.push_opacity(0.5);
        assert!((ctx.state().opacity - 0.2).abs() < 1e-6);
        ctx.pop_opacity();
        assert_eq!(ctx.state().opacity, 0.4);
    }

    #[test]
    fn test_fill_viewport_covers_viewport() {
        let mut ctx = RecordingContext::new(Size::new(320.0, 200.0));
        ctx.fill_viewport(Color::BLACK.with_alpha(0.03));
        ctx.fill_disc(Point::new(5.0, 5.0), 2.0, Color::WHITE);

        assert_eq!(ctx.len(), 2);
        match &ctx.commands()[0] {
            DrawCommand::FillRect { rect, .. } => assert_eq!(rect.size, Size::new(320.0, 200.0)),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_take_commands_leaves_state() {
        let mut ctx = RecordingContext::new(Size::new(1.0, 1.0));
        ctx.push_opacity(0.5);
        ctx.clear(Color::BLACK);
        assert_eq!(ctx.take_commands().len(), 2);
        assert!(ctx.is_empty());
        assert_eq!(ctx.state().opacity, 0.5);
    }
}
