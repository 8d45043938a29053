//! Frame paint context
//!
//! A `PaintContext` lives for one canvas frame. It starts with the device
//! scale already applied, so effect code draws in logical pixels, and it
//! refuses to let that scale be popped. `finish` closes the frame and hands
//! back the command list.

use splash_core::{
    Brush, Color, DrawCommand, DrawContext, DrawState, Point, Rect, RecordingContext, Size,
    TextStyle, Transform,
};

/// Drawing context for one canvas frame
#[derive(Debug)]
pub struct PaintContext {
    recording: RecordingContext,
    device_scale: f32,
    /// Transforms pushed by the caller, above the device scale
    user_transforms: usize,
}

impl PaintContext {
    /// Open a frame over `logical` pixels at `device_scale`
    ///
    /// `reset` clears the bitmap first, as resizing a canvas does.
    pub fn begin(logical: Size, device_scale: f32, reset: Option<Color>) -> Self {
        let mut recording = RecordingContext::new(logical);
        if let Some(color) = reset {
            recording.clear(color);
        }
        recording.push_transform(Transform::scale(device_scale, device_scale));
        Self {
            recording,
            device_scale,
            user_transforms: 0,
        }
    }

    pub fn device_scale(&self) -> f32 {
        self.device_scale
    }

    /// Commands recorded so far, including the device scale
    pub fn commands(&self) -> &[DrawCommand] {
        self.recording.commands()
    }

    /// Close any transforms the caller left open, then the device scale
    pub fn finish(mut self) -> Vec<DrawCommand> {
        for _ in 0..self.user_transforms {
            self.recording.pop_transform();
        }
        self.recording.pop_transform();
        self.recording.take_commands()
    }
}

impl DrawContext for PaintContext {
    fn push_transform(&mut self, transform: Transform) {
        self.user_transforms += 1;
        self.recording.push_transform(transform);
    }

    fn pop_transform(&mut self) {
        if self.user_transforms == 0 {
            tracing::trace!("pop_transform would remove the device scale; ignored");
            return;
        }
        self.user_transforms -= 1;
        self.recording.pop_transform();
    }

    fn push_opacity(&mut self, opacity: f32) {
        self.recording.push_opacity(opacity);
    }

    fn pop_opacity(&mut self) {
        self.recording.pop_opacity();
    }

    fn clear(&mut self, color: Color) {
        self.recording.clear(color);
    }

    fn fill_rect(&mut self, rect: Rect, brush: Brush) {
        self.recording.fill_rect(rect, brush);
    }

    fn fill_circle(&mut self, center: Point, radius: f32, brush: Brush) {
        self.recording.fill_circle(center, radius, brush);
    }

    fn draw_text(&mut self, text: &str, origin: Point, style: &TextStyle) {
        self.recording.draw_text(text, origin, style);
    }

    fn viewport_size(&self) -> Size {
        self.recording.viewport_size()
    }

    fn state(&self) -> DrawState {
        self.recording.state()
    }
}
