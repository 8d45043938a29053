//! Host rendering surfaces
//!
//! A `Surface` is whatever the host gives an effect to draw into: a browser
//! canvas element, a GPU swapchain, or the off-screen `HeadlessSurface` used
//! by the CLI and tests. Effects never rasterize themselves; they hand each
//! finished `Frame` to the surface.

use std::cell::RefCell;
use std::rc::Rc;

use splash_core::{BlendMode, DrawCommand, Rect};
use thiserror::Error;

/// Surface-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// No 2D drawing context could be acquired
    #[error("2D drawing context unavailable")]
    ContextUnavailable,

    /// The surface has no area to draw into
    #[error("surface has zero area ({width}x{height})")]
    ZeroArea { width: u32, height: u32 },
}

/// Result type for surface operations
pub type Result<T> = std::result::Result<T, SurfaceError>;

/// Backing-store size in physical pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// How a surface composites over the content beneath it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositeStyle {
    pub blend_mode: BlendMode,
    pub opacity: f32,
}

impl Default for CompositeStyle {
    fn default() -> Self {
        Self {
            blend_mode: BlendMode::Normal,
            opacity: 1.0,
        }
    }
}

/// A finished frame ready for presentation
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Recorded drawing operations, in logical coordinates under a
    /// leading scale transform
    pub commands: Vec<DrawCommand>,
    /// Backing-store size the commands target
    pub pixel_size: PixelSize,
    /// Effective device pixel ratio used for this frame
    pub scale_factor: f32,
    /// Compositing over the page
    pub composite: CompositeStyle,
}

/// A host drawing surface
pub trait Surface {
    /// Logical rectangle of the surface in window coordinates
    fn bounds(&self) -> Rect;

    /// Device pixel ratio the host reports
    fn scale_factor(&self) -> f32;

    /// Largest backing-store dimension the host supports, if limited
    fn max_texture_dimension(&self) -> Option<u32> {
        None
    }

    /// Whether a 2D drawing context can be acquired at all
    fn supports_2d(&self) -> bool {
        true
    }

    /// Receive a finished frame
    fn present(&mut self, frame: Frame);
}

// ─────────────────────────────────────────────────────────────────────────────
// Headless surface
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct HeadlessState {
    bounds: Rect,
    scale_factor: f32,
    max_texture_dimension: Option<u32>,
    supports_2d: bool,
    presented: u64,
    commands_presented: u64,
    last_frame: Option<Frame>,
}

/// An off-screen surface that keeps presentation statistics
///
/// Clones share state, so a test can keep one clone while the effect owns
/// another.
#[derive(Clone, Debug)]
pub struct HeadlessSurface {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessSurface {
    /// Create a surface covering `bounds` at the given pixel ratio
    pub fn new(bounds: Rect, scale_factor: f32) -> Self {
        Self {
            state: Rc::new(RefCell::new(HeadlessState {
                bounds,
                scale_factor,
                max_texture_dimension: None,
                supports_2d: true,
                presented: 0,
                commands_presented: 0,
                last_frame: None,
            })),
        }
    }

    /// A surface on which no drawing context can be acquired
    pub fn unavailable(bounds: Rect) -> Self {
        let surface = Self::new(bounds, 1.0);
        surface.state.borrow_mut().supports_2d = false;
        surface
    }

    /// Limit the backing-store dimension
    pub fn with_max_texture_dimension(self, max: u32) -> Self {
        self.state.borrow_mut().max_texture_dimension = Some(max);
        self
    }

    /// Simulate the container changing size or position
    pub fn set_bounds(&self, bounds: Rect) {
        self.state.borrow_mut().bounds = bounds;
    }

    /// Simulate the display pixel ratio changing
    pub fn set_scale_factor(&self, scale_factor: f32) {
        self.state.borrow_mut().scale_factor = scale_factor;
    }

    /// Number of frames presented so far
    pub fn presented_frames(&self) -> u64 {
        self.state.borrow().presented
    }

    /// Total draw commands across all presented frames
    pub fn presented_commands(&self) -> u64 {
        self.state.borrow().commands_presented
    }

    /// The most recently presented frame
    pub fn last_frame(&self) -> Option<Frame> {
        self.state.borrow().last_frame.clone()
    }
}

impl Surface for HeadlessSurface {
    fn bounds(&self) -> Rect {
        self.state.borrow().bounds
    }

    fn scale_factor(&self) -> f32 {
        self.state.borrow().scale_factor
    }

    fn max_texture_dimension(&self) -> Option<u32> {
        self.state.borrow().max_texture_dimension
    }

    fn supports_2d(&self) -> bool {
        self.state.borrow().supports_2d
    }

    fn present(&mut self, frame: Frame) {
        let mut state = self.state.borrow_mut();
        state.presented += 1;
        state.commands_presented += frame.commands.len() as u64;
        state.last_frame = Some(frame);
    }
}
