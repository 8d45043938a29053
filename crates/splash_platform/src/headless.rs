//! Headless platform
//!
//! An event loop with no display. It replays a scripted list of events,
//! each pinned to a frame number, and emits `Event::Frame` after each
//! frame's events. The CLI and integration tests drive effects with it.

use std::cell::Cell;

use crate::error::{PlatformError, Result};
use crate::event::{ControlFlow, Event, EventLoop, WindowEvent};
use crate::window::{Window, WindowConfig};

/// A window that exists only in memory
#[derive(Debug)]
pub struct HeadlessWindow {
    title: String,
    size: Cell<(f32, f32)>,
    scale_factor: Cell<f64>,
}

impl HeadlessWindow {
    pub fn new(config: &WindowConfig) -> Self {
        Self {
            title: config.title.clone(),
            size: Cell::new((config.width, config.height)),
            scale_factor: Cell::new(config.scale_factor),
        }
    }

    /// Apply window events the way a real window would before reporting them
    fn apply(&self, event: &Event) {
        match event {
            Event::Window(WindowEvent::Resized { width, height }) => {
                self.size.set((*width, *height));
            }
            Event::Window(WindowEvent::ScaleFactorChanged { scale_factor }) => {
                self.scale_factor.set(*scale_factor);
            }
            _ => {}
        }
    }
}

impl Window for HeadlessWindow {
    fn logical_size(&self) -> (f32, f32) {
        self.size.get()
    }

    fn scale_factor(&self) -> f64 {
        self.scale_factor.get()
    }

    fn title(&self) -> String {
        self.title.clone()
    }
}

/// An event pinned to the frame before which it is delivered
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptedEvent {
    /// 1-based frame number
    pub frame: u64,
    pub event: Event,
}

/// Replays scripted events interleaved with frame ticks
#[derive(Debug)]
pub struct HeadlessEventLoop {
    window: HeadlessWindow,
    frames: u64,
    frame_interval_ms: f64,
    script: Vec<ScriptedEvent>,
}

impl HeadlessEventLoop {
    /// Create a loop that runs `frames` frames at `fps`
    pub fn new(config: &WindowConfig, frames: u64, fps: f64) -> Result<Self> {
        if !(config.width >= 0.0 && config.height >= 0.0) {
            return Err(PlatformError::InvalidWindowSize {
                width: config.width,
                height: config.height,
            });
        }
        if !(fps.is_finite() && fps > 0.0) {
            return Err(PlatformError::EventLoop(format!(
                "frame rate must be positive, got {}",
                fps
            )));
        }

        Ok(Self {
            window: HeadlessWindow::new(config),
            frames,
            frame_interval_ms: 1000.0 / fps,
            script: Vec::new(),
        })
    }

    /// Queue an event before frame `frame`
    ///
    /// Events for the same frame are delivered in the order queued.
    pub fn push(&mut self, frame: u64, event: Event) -> Result<()> {
        if frame == 0 || frame > self.frames {
            return Err(PlatformError::ScriptOutOfRange {
                frame,
                frames: self.frames,
            });
        }
        self.script.push(ScriptedEvent { frame, event });
        Ok(())
    }

    /// Milliseconds between frames
    pub fn frame_interval_ms(&self) -> f64 {
        self.frame_interval_ms
    }

    /// Number of frames the loop will run
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn window(&self) -> &HeadlessWindow {
        &self.window
    }
}

impl EventLoop for HeadlessEventLoop {
    type Window = HeadlessWindow;

    fn run<F>(self, mut handler: F) -> Result<()>
    where
        F: FnMut(Event, &Self::Window) -> ControlFlow,
    {
        let HeadlessEventLoop {
            window,
            frames,
            mut script,
            ..
        } = self;
        // Stable: same-frame events keep their queue order
        script.sort_by_key(|scripted| scripted.frame);

        tracing::debug!(
            "headless loop: {} frames, {} scripted events",
            frames,
            script.len()
        );

        let mut pending = script.into_iter().peekable();
        for frame in 1..=frames {
            while let Some(scripted) = pending.next_if(|s| s.frame == frame) {
                window.apply(&scripted.event);
                if handler(scripted.event, &window) == ControlFlow::Exit {
                    tracing::debug!("headless loop exited before frame {}", frame);
                    return Ok(());
                }
            }

            if handler(Event::Frame, &window) == ControlFlow::Exit {
                tracing::debug!("headless loop exited at frame {}", frame);
                return Ok(());
            }
        }

        Ok(())
    }
}
