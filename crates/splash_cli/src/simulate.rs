//! Headless cursor simulation
//!
//! Builds a host out of the headless pieces (event loop, event bus, frame
//! scheduler, manual clock, off-screen surface), scripts a pointer path
//! through it, and reports what the effect did.

use std::fmt;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use splash_animation::{FrameScheduler, ManualClock};
use splash_cursor::{seeded_rng, SplashConfig, SplashCursor};
use splash_paint::{HeadlessSurface, Rect};
use splash_platform::{
    ControlFlow, Event, EventBus, EventLoop, HeadlessEventLoop, InputEvent, MouseEvent,
    TouchEvent, TouchPoint, WindowConfig,
};

/// Shape of the scripted pointer movement
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PointerPath {
    /// Left to right across the middle
    Line,
    /// One loop around the center
    Circle,
    /// Back and forth down the canvas
    Zigzag,
    /// A circle traced with a finger
    Touch,
}

impl PointerPath {
    /// Position at `t` in `0.0..=1.0` along the path
    fn point(self, t: f32, width: f32, height: f32) -> (f32, f32) {
        let (cx, cy) = (width * 0.5, height * 0.5);
        match self {
            PointerPath::Line => (width * (0.1 + 0.8 * t), cy),
            PointerPath::Circle | PointerPath::Touch => {
                let angle = t * std::f32::consts::TAU;
                let radius = width.min(height) * 0.35;
                (cx + radius * angle.cos(), cy + radius * angle.sin())
            }
            PointerPath::Zigzag => {
                let legs = 4.0;
                let leg = (t * legs).min(legs - f32::EPSILON);
                let along = leg.fract();
                let x = if (leg as u32) % 2 == 0 { along } else { 1.0 - along };
                (width * (0.1 + 0.8 * x), height * (0.1 + 0.8 * t))
            }
        }
    }

    fn event(self, frame: u64, x: f32, y: f32) -> Event {
        match self {
            PointerPath::Touch => Event::Input(InputEvent::Touch(TouchEvent::moved([
                TouchPoint::new(1, x, y),
            ]))),
            _ if frame == 1 => Event::Input(InputEvent::Mouse(MouseEvent::Entered { x, y })),
            _ => Event::mouse_moved(x, y),
        }
    }
}

pub struct SimulateOptions {
    pub config: SplashConfig,
    pub frames: u64,
    pub fps: f64,
    pub move_frames: u64,
    pub path: PointerPath,
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    pub max_texture: Option<u32>,
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct CanvasReport {
    pub width: u32,
    pub height: u32,
    pub scale_factor: f32,
    pub downgraded: bool,
}

/// What one simulation run produced
#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub frames: u64,
    pub frames_rendered: u64,
    pub pointer_events: u64,
    pub active: bool,
    pub canvas: Option<CanvasReport>,
    pub emitted: u64,
    pub expired: u64,
    pub evicted: u64,
    pub rejected: u64,
    pub peak_live: usize,
    pub final_live: usize,
    pub blobs_drawn: u64,
    pub commands_presented: u64,
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Frames:            {} ({} rendered)", self.frames, self.frames_rendered)?;
        match &self.canvas {
            Some(canvas) => writeln!(
                f,
                "Canvas:            {}x{} px @ {}x{}",
                canvas.width,
                canvas.height,
                canvas.scale_factor,
                if canvas.downgraded { " (downgraded)" } else { "" }
            )?,
            None => writeln!(f, "Canvas:            unavailable (effect inert)")?,
        }
        writeln!(f, "Pointer events:    {}", self.pointer_events)?;
        writeln!(
            f,
            "Particles:         {} emitted, {} expired, {} evicted",
            self.emitted, self.expired, self.evicted
        )?;
        writeln!(f, "Rejected events:   {}", self.rejected)?;
        writeln!(
            f,
            "Live particles:    {} peak, {} at end",
            self.peak_live, self.final_live
        )?;
        writeln!(f, "Blobs drawn:       {}", self.blobs_drawn)?;
        writeln!(f, "Draw commands:     {}", self.commands_presented)
    }
}

/// Run the effect for `options.frames` frames
pub fn run(options: SimulateOptions) -> Result<SimulationReport> {
    let clock = ManualClock::new(0.0);
    let scheduler = FrameScheduler::new(Rc::new(clock.clone()));
    let bus = EventBus::new();

    let mut surface = HeadlessSurface::new(
        Rect::new(0.0, 0.0, options.width, options.height),
        options.scale,
    );
    if let Some(max) = options.max_texture {
        surface = surface.with_max_texture_dimension(max);
    }

    let cursor = SplashCursor::mount(
        surface.clone(),
        &scheduler.handle(),
        &bus.handle(),
        &options.config,
        seeded_rng(options.seed),
        Rc::new(clock.clone()),
    );

    let window = WindowConfig::new("splash")
        .size(options.width, options.height)
        .scale_factor(options.scale as f64);
    let mut event_loop = HeadlessEventLoop::new(&window, options.frames, options.fps)
        .context("Failed to create headless event loop")?;

    let moving = options.move_frames.min(options.frames);
    for frame in 1..=moving {
        let t = if moving > 1 {
            (frame - 1) as f32 / (moving - 1) as f32
        } else {
            0.0
        };
        let (x, y) = options.path.point(t, options.width, options.height);
        event_loop.push(frame, options.path.event(frame, x, y))?;
    }

    let interval = event_loop.frame_interval_ms();
    let mut peak_live = 0;
    event_loop.run(|event, _window| {
        match event {
            Event::Frame => {
                clock.advance(interval);
                scheduler.tick();
                peak_live = peak_live.max(cursor.live_count());
            }
            other => {
                bus.dispatch(&other);
            }
        }
        ControlFlow::Continue
    })?;

    let stats = cursor.stats();
    let canvas = cursor.canvas_size().map(|size| CanvasReport {
        width: size.width,
        height: size.height,
        scale_factor: surface
            .last_frame()
            .map(|frame| frame.scale_factor)
            .unwrap_or(options.scale),
        downgraded: cursor.is_downgraded(),
    });

    Ok(SimulationReport {
        frames: options.frames,
        frames_rendered: cursor.frames_rendered(),
        pointer_events: moving,
        active: cursor.is_active(),
        canvas,
        emitted: stats.emitted,
        expired: stats.expired,
        evicted: stats.evicted,
        rejected: stats.rejected,
        peak_live,
        final_live: cursor.live_count(),
        blobs_drawn: cursor.blobs_drawn(),
        commands_presented: surface.presented_commands(),
    })
}
