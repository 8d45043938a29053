//! Loading screen with a counting progress bar
//!
//! Progress climbs by a random step on a fixed interval. Once it reaches
//! 100 the screen holds briefly, fades out, and then reports completion.
//!
//! Phases:
//!
//! ```text
//! Loading --(progress seen at 100)--> Holding --(hold_ms)--> Exiting --(exit_ms)--> Complete
//! ```

use rand::{Rng, RngCore};
use splash_animation::Easing;
use splash_core::{Color, DrawContext, DrawContextExt, Point, Rect, Size, TextAlign, TextStyle};
use splash_paint::gradient::linear_simple;

/// Shortest step interval a preloader will run at
pub const MIN_TICK_MS: f64 = 1.0;

/// Preloader phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreloaderPhase {
    Loading,
    Holding,
    Exiting,
    Complete,
}

/// Preloader configuration
#[derive(Clone, Debug, PartialEq)]
pub struct PreloaderConfig {
    /// Interval between progress steps
    pub tick_ms: f64,
    /// Smallest progress step
    pub min_step: f32,
    /// Random extra added to each step, `0..step_jitter`
    pub step_jitter: f32,
    /// Pause at 100 before the exit starts
    pub hold_ms: f64,
    /// Exit fade duration
    pub exit_ms: f64,
    pub exit_easing: Easing,
    pub background: Color,
    pub accent: Color,
    pub track_color: Color,
    pub text_color: Color,
    pub bar_width: f32,
    pub bar_height: f32,
    pub counter_size: f32,
    pub title: String,
    pub caption: String,
}

impl Default for PreloaderConfig {
    fn default() -> Self {
        Self {
            tick_ms: 50.0,
            min_step: 1.0,
            step_jitter: 3.0,
            hold_ms: 500.0,
            exit_ms: 800.0,
            exit_easing: Easing::EaseInOut,
            background: Color::from_hex(0x0A0A0A),
            accent: Color::from_hex(0x00FFB2),
            track_color: Color::from_hex(0x060606),
            text_color: Color::WHITE,
            bar_width: 256.0,
            bar_height: 4.0,
            counter_size: 60.0,
            title: "Shopify Dev Studio".to_string(),
            caption: "Preparing your experience...".to_string(),
        }
    }
}

impl PreloaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the step interval
    pub fn tick_ms(mut self, tick_ms: f64) -> Self {
        self.tick_ms = tick_ms;
        self
    }

    /// Set the hold and exit durations
    pub fn timings(mut self, hold_ms: f64, exit_ms: f64) -> Self {
        self.hold_ms = hold_ms;
        self.exit_ms = exit_ms;
        self
    }

    /// Set the heading text
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Loading screen state
pub struct Preloader {
    config: PreloaderConfig,
    progress: f32,
    phase: PreloaderPhase,
    next_tick_ms: f64,
    phase_started_ms: f64,
    rng: Box<dyn RngCore>,
    on_complete: Option<Box<dyn FnOnce()>>,
}

impl Preloader {
    /// Start loading at `now_ms`; the first step lands one tick later
    pub fn new<R: RngCore + 'static>(config: PreloaderConfig, rng: R, now_ms: f64) -> Self {
        let tick = config.tick_ms.max(MIN_TICK_MS);
        Self {
            config,
            progress: 0.0,
            phase: PreloaderPhase::Loading,
            next_tick_ms: now_ms + tick,
            phase_started_ms: now_ms,
            rng: Box::new(rng),
            on_complete: None,
        }
    }

    /// Register the completion callback, fired once on entering `Complete`
    pub fn on_complete<F: FnOnce() + 'static>(mut self, callback: F) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Run every step, hold and exit transition due by `now_ms`
    pub fn advance(&mut self, now_ms: f64) {
        let tick = self.tick_ms();

        while self.phase == PreloaderPhase::Loading && now_ms >= self.next_tick_ms {
            if self.progress >= 100.0 {
                self.progress = 100.0;
                self.enter(PreloaderPhase::Holding, self.next_tick_ms);
            } else {
                let step = self.config.min_step + self.rng.gen::<f32>() * self.config.step_jitter;
                self.progress = (self.progress + step).min(100.0);
            }
            self.next_tick_ms += tick;
        }

        if self.phase == PreloaderPhase::Holding
            && now_ms >= self.phase_started_ms + self.config.hold_ms
        {
            let at = self.phase_started_ms + self.config.hold_ms;
            self.enter(PreloaderPhase::Exiting, at);
        }

        if self.phase == PreloaderPhase::Exiting
            && now_ms >= self.phase_started_ms + self.config.exit_ms
        {
            let at = self.phase_started_ms + self.config.exit_ms;
            self.enter(PreloaderPhase::Complete, at);
            if let Some(callback) = self.on_complete.take() {
                callback();
            }
        }
    }

    fn enter(&mut self, phase: PreloaderPhase, at_ms: f64) {
        tracing::debug!("preloader {:?} -> {:?} at {}ms", self.phase, phase, at_ms);
        self.phase = phase;
        self.phase_started_ms = at_ms;
    }

    /// Step interval in use, never below [`MIN_TICK_MS`]
    pub fn tick_ms(&self) -> f64 {
        self.config.tick_ms.max(MIN_TICK_MS)
    }

    pub fn phase(&self) -> PreloaderPhase {
        self.phase
    }

    /// Progress in `0.0..=100.0`
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// The counter value shown on screen
    pub fn display_percent(&self) -> u32 {
        self.progress.floor() as u32
    }

    pub fn is_complete(&self) -> bool {
        self.phase == PreloaderPhase::Complete
    }

    /// Screen opacity at `now_ms`
    pub fn opacity(&self, now_ms: f64) -> f32 {
        match self.phase {
            PreloaderPhase::Loading | PreloaderPhase::Holding => 1.0,
            PreloaderPhase::Exiting => {
                if self.config.exit_ms <= 0.0 {
                    return 0.0;
                }
                let t = ((now_ms - self.phase_started_ms) / self.config.exit_ms) as f32;
                1.0 - self.config.exit_easing.apply(t)
            }
            PreloaderPhase::Complete => 0.0,
        }
    }

    /// Draw the screen over `viewport`
    pub fn paint(&self, ctx: &mut dyn DrawContext, viewport: Size, now_ms: f64) {
        let opacity = self.opacity(now_ms);
        if opacity <= 0.0 {
            return;
        }
        let config = &self.config;
        let center = viewport.to_rect().center();

        ctx.push_opacity(opacity);
        ctx.fill(viewport.to_rect(), config.background);

        ctx.draw_text(
            &config.title,
            Point::new(center.x, center.y - config.counter_size * 1.5),
            &TextStyle::new(24.0)
                .with_color(config.text_color)
                .with_align(TextAlign::Center),
        );
        ctx.draw_text(
            &format!("{}%", self.display_percent()),
            Point::new(center.x, center.y - config.counter_size * 0.5),
            &TextStyle::new(config.counter_size)
                .with_color(config.accent)
                .with_align(TextAlign::Center)
                .monospace(),
        );

        let track = Rect::new(
            center.x - config.bar_width * 0.5,
            center.y + config.counter_size * 0.5,
            config.bar_width,
            config.bar_height,
        );
        ctx.fill(track, config.track_color);

        let filled = config.bar_width * self.progress / 100.0;
        if filled > 0.0 {
            let start = Point::new(track.x(), track.y());
            let end = Point::new(track.x() + filled, track.y());
            ctx.fill(
                Rect::new(track.x(), track.y(), filled, config.bar_height),
                linear_simple(start, end, config.accent, config.accent.with_alpha(0.8)),
            );
        }

        ctx.draw_text(
            &config.caption,
            Point::new(center.x, track.y() + config.bar_height + 24.0),
            &TextStyle::new(14.0)
                .with_color(config.text_color.with_alpha(0.7))
                .with_align(TextAlign::Center),
        );
        ctx.pop_opacity();
    }
}

impl std::fmt::Debug for Preloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preloader")
            .field("phase", &self.phase)
            .field("progress", &self.progress)
            .finish()
    }
}
