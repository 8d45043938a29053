//! Scroll progress bar
//!
//! A thin bar pinned to the top of the page whose length follows how far
//! the page has been scrolled. The length is smoothed by a spring, the bar
//! fades in after a delay, and a highlight sweeps across it on a loop.

use splash_animation::{Easing, Spring, SpringConfig};
use splash_core::{Color, DrawContext, DrawContextExt, Rect};
use splash_paint::gradient::horizontal_band;
use splash_platform::{Event, InputEvent};

/// Scroll progress configuration
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollProgressConfig {
    /// Bar thickness in pixels
    pub height: f32,
    pub track_color: Color,
    /// Bar gradient ends
    pub edge_color: Color,
    /// Bar gradient middle
    pub middle_color: Color,
    /// Peak color of the sweeping highlight
    pub shimmer_color: Color,
    /// Delay before the bar fades in
    pub fade_delay_ms: f64,
    pub fade_duration_ms: f64,
    /// Time for one highlight sweep
    pub shimmer_duration_ms: f64,
    /// Pause between sweeps
    pub shimmer_repeat_delay_ms: f64,
    pub spring: SpringConfig,
}

impl Default for ScrollProgressConfig {
    fn default() -> Self {
        Self {
            height: 2.0,
            track_color: Color::from_hex(0x1B1B1F).with_alpha(0.3),
            edge_color: Color::from_hex(0xFFD580),
            middle_color: Color::from_hex(0xFF5E5B),
            shimmer_color: Color::WHITE.with_alpha(0.4),
            fade_delay_ms: 3000.0,
            fade_duration_ms: 300.0,
            shimmer_duration_ms: 2000.0,
            shimmer_repeat_delay_ms: 1000.0,
            spring: SpringConfig::scroll_progress(),
        }
    }
}

impl ScrollProgressConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bar thickness
    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Set the fade-in delay
    pub fn fade_delay_ms(mut self, delay: f64) -> Self {
        self.fade_delay_ms = delay;
        self
    }

    /// Set the smoothing spring
    pub fn spring(mut self, spring: SpringConfig) -> Self {
        self.spring = spring;
        self
    }
}

/// Scroll-linked progress bar state
#[derive(Clone, Debug)]
pub struct ScrollProgress {
    config: ScrollProgressConfig,
    spring: Spring,
    started_at_ms: f64,
}

impl ScrollProgress {
    /// Create a bar that starts its fade-in clock at `started_at_ms`
    pub fn new(config: ScrollProgressConfig, started_at_ms: f64) -> Self {
        let spring = Spring::new(config.spring, 0.0);
        Self {
            config,
            spring,
            started_at_ms,
        }
    }

    pub fn config(&self) -> &ScrollProgressConfig {
        &self.config
    }

    /// Update the target from the page's scroll position
    ///
    /// Content that fits in the viewport counts as no progress.
    pub fn on_scroll(&mut self, scroll_y: f32, content_height: f32, viewport_height: f32) {
        let scrollable = content_height - viewport_height;
        let target = if scrollable > 0.0 && scroll_y.is_finite() {
            (scroll_y / scrollable).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.spring.set_target(target);
    }

    /// Route a platform scroll event
    pub fn handle_event(&mut self, event: &Event, viewport_height: f32) {
        if let Event::Input(InputEvent::Scroll {
            scroll_y,
            content_height,
        }) = event
        {
            self.on_scroll(*scroll_y, *content_height, viewport_height);
        }
    }

    /// Step the smoothing spring
    pub fn advance(&mut self, dt_seconds: f32) {
        if dt_seconds > 0.0 {
            self.spring.step(dt_seconds);
        }
    }

    /// Where the bar is heading
    pub fn target(&self) -> f32 {
        self.spring.target()
    }

    /// Smoothed fraction of the page scrolled
    pub fn progress(&self) -> f32 {
        self.spring.value().clamp(0.0, 1.0)
    }

    pub fn is_settled(&self) -> bool {
        self.spring.is_settled()
    }

    /// Bar opacity at `now_ms`
    pub fn opacity(&self, now_ms: f64) -> f32 {
        let visible_for = now_ms - self.started_at_ms - self.config.fade_delay_ms;
        if visible_for <= 0.0 {
            return 0.0;
        }
        if self.config.fade_duration_ms <= 0.0 {
            return 1.0;
        }
        let t = (visible_for / self.config.fade_duration_ms) as f32;
        Easing::EaseOut.apply(t)
    }

    /// Highlight position as a fraction of the bar length
    ///
    /// Sweeps linearly from -1 to 2, then is hidden for the repeat delay.
    pub fn shimmer_offset(&self, now_ms: f64) -> Option<f32> {
        let sweep = self.config.shimmer_duration_ms;
        if sweep <= 0.0 {
            return None;
        }
        let cycle = sweep + self.config.shimmer_repeat_delay_ms.max(0.0);
        let elapsed = (now_ms - self.started_at_ms).max(0.0);
        let phase = elapsed % cycle;
        if phase >= sweep {
            return None;
        }
        Some(-1.0 + 3.0 * (phase / sweep) as f32)
    }

    /// Draw the track, bar and highlight across `width`
    pub fn paint(&self, ctx: &mut dyn DrawContext, width: f32, now_ms: f64) {
        let opacity = self.opacity(now_ms);
        if opacity <= 0.0 || width <= 0.0 {
            return;
        }
        let height = self.config.height;

        ctx.push_opacity(opacity);
        ctx.fill(Rect::new(0.0, 0.0, width, height), self.config.track_color);

        let bar = width * self.progress();
        if bar > 0.0 {
            ctx.fill(
                Rect::new(0.0, 0.0, bar, height),
                horizontal_band(
                    0.0,
                    bar,
                    height * 0.5,
                    self.config.edge_color,
                    self.config.middle_color,
                ),
            );

            if let Some(offset) = self.shimmer_offset(now_ms) {
                // Highlight is one bar long; only the overlap with the bar shows
                let start = offset * bar;
                let visible_start = start.max(0.0);
                let visible_end = (start + bar).min(bar);
                if visible_end > visible_start {
                    ctx.fill(
                        Rect::new(visible_start, 0.0, visible_end - visible_start, height),
                        horizontal_band(
                            start,
                            bar,
                            height * 0.5,
                            Color::TRANSPARENT,
                            self.config.shimmer_color,
                        ),
                    );
                }
            }
        }
        ctx.pop_opacity();
    }
}
