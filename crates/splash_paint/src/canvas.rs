//! Persistent canvas state
//!
//! `Canvas` tracks what a browser canvas element would: its logical bounds,
//! its backing-store pixel size, and whether the bitmap was just reset by a
//! resize. It does not own pixels; every frame is recorded into a fresh
//! `PaintContext` and handed to the `Surface`.

use splash_core::{Color, Rect, Size};

use crate::context::PaintContext;
use crate::surface::{CompositeStyle, Frame, PixelSize, Surface, SurfaceError};

/// Lowest fraction of the requested pixel ratio a downgrade may reach
const MIN_SCALE_FRACTION: f32 = 0.25;

/// Options fixed at canvas creation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasOptions {
    /// Upper bound on the device pixel ratio
    pub max_pixel_ratio: f32,
    /// Color the bitmap is reset to on creation and resize
    pub background: Color,
    /// When true the bitmap resets to transparent instead of `background`
    pub transparent: bool,
    /// How the canvas composites over the page
    pub composite: CompositeStyle,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            max_pixel_ratio: 2.0,
            background: Color::BLACK,
            transparent: true,
            composite: CompositeStyle::default(),
        }
    }
}

/// Canvas sizing and per-frame recording
#[derive(Debug)]
pub struct Canvas {
    bounds: Rect,
    requested_scale: f32,
    effective_scale: f32,
    pixel_size: PixelSize,
    max_texture_dimension: Option<u32>,
    options: CanvasOptions,
    needs_reset: bool,
}

impl Canvas {
    /// Bind a canvas to a host surface
    ///
    /// Fails only when no 2D context can be acquired. A zero-area surface is
    /// accepted; it simply draws nothing until resized.
    pub fn attach(surface: &dyn Surface, options: CanvasOptions) -> Result<Self, SurfaceError> {
        if !surface.supports_2d() {
            return Err(SurfaceError::ContextUnavailable);
        }

        let mut canvas = Self {
            bounds: Rect::ZERO,
            requested_scale: 1.0,
            effective_scale: 1.0,
            pixel_size: PixelSize::default(),
            max_texture_dimension: surface.max_texture_dimension(),
            options,
            needs_reset: true,
        };
        canvas.resize(surface.bounds(), surface.scale_factor());
        Ok(canvas)
    }

    /// Match the canvas to new container bounds and pixel ratio
    ///
    /// Like assigning `canvas.width`, this resets the bitmap.
    pub fn resize(&mut self, bounds: Rect, scale_factor: f32) {
        self.bounds = bounds;
        self.requested_scale = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor
        } else {
            1.0
        };
        self.effective_scale = self.downgraded_scale();
        self.pixel_size = PixelSize::new(
            (bounds.width().max(0.0) * self.effective_scale).round() as u32,
            (bounds.height().max(0.0) * self.effective_scale).round() as u32,
        );
        self.needs_reset = true;

        tracing::debug!(
            "canvas resized to {}x{} logical, {}x{} px (ratio {} of requested {})",
            bounds.width(),
            bounds.height(),
            self.pixel_size.width,
            self.pixel_size.height,
            self.effective_scale,
            self.requested_scale
        );
    }

    fn downgraded_scale(&self) -> f32 {
        let mut scale = self.requested_scale.min(self.options.max_pixel_ratio.max(0.0));
        if scale <= 0.0 {
            scale = 1.0;
        }

        if let Some(max) = self.max_texture_dimension {
            let longest = self.bounds.width().max(self.bounds.height());
            if longest > 0.0 && longest * scale > max as f32 {
                let fitted = max as f32 / longest;
                let floor = self.requested_scale * MIN_SCALE_FRACTION;
                tracing::debug!(
                    "downgrading canvas resolution: ratio {} exceeds texture limit {}",
                    scale,
                    max
                );
                scale = fitted.max(floor);
            }
        }

        scale
    }

    /// Logical bounds in window coordinates
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Logical size (what effects draw in)
    pub fn logical_size(&self) -> Size {
        self.bounds.size
    }

    /// Backing-store size in physical pixels
    pub fn pixel_size(&self) -> PixelSize {
        self.pixel_size
    }

    /// Pixel ratio actually in use after any downgrade
    pub fn scale_factor(&self) -> f32 {
        self.effective_scale
    }

    /// Whether the resolution was reduced below what the host asked for
    pub fn is_downgraded(&self) -> bool {
        self.effective_scale < self.requested_scale
    }

    /// Record one frame
    ///
    /// The closure draws in logical coordinates; the device scale transform
    /// and any pending bitmap reset are applied around it.
    pub fn record<F>(&mut self, draw: F) -> Frame
    where
        F: FnOnce(&mut PaintContext),
    {
        let reset = self.needs_reset.then(|| {
            if self.options.transparent {
                Color::TRANSPARENT
            } else {
                self.options.background.with_alpha(1.0)
            }
        });
        self.needs_reset = false;

        let mut ctx = PaintContext::begin(self.logical_size(), self.effective_scale, reset);
        draw(&mut ctx);

        Frame {
            commands: ctx.finish(),
            pixel_size: self.pixel_size,
            scale_factor: self.effective_scale,
            composite: self.options.composite,
        }
    }
}
