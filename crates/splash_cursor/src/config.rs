//! Cursor effect configuration
//!
//! The top-level knobs use the names and defaults of the fluid-style prop
//! surface (`density_dissipation`, `splat_force`, ...). Each one scales a
//! particle constant relative to its default, so an empty config reproduces
//! the stock trail exactly. The `[particles]` table exposes the base
//! constants themselves.
//!
//! ```toml
//! density_dissipation = 2.5
//! splat_force = 6000
//! back_color = "#000000"
//!
//! [particles]
//! per_splat = 5
//!
//! [timestep]
//! mode = "scaled"
//! reference_fps = 60
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use splash_core::{BlendMode, Color};
use splash_paint::{CanvasOptions, CompositeStyle};

use crate::error::{Result, SplashError};

const DEFAULT_DENSITY_DISSIPATION: f32 = 2.5;
const DEFAULT_VELOCITY_DISSIPATION: f32 = 1.8;
const DEFAULT_SPLAT_RADIUS: f32 = 0.15;
const DEFAULT_SPLAT_FORCE: f32 = 4000.0;
const DEFAULT_COLOR_UPDATE_SPEED: f32 = 5.0;

/// Hue drift in degrees per millisecond per unit of `color_update_speed`
const HUE_RATE_PER_SPEED: f64 = 0.002;

/// How per-frame quantities relate to elapsed time
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Timestep {
    /// One fixed step per rendered frame, whatever the refresh rate
    #[default]
    PerFrame,
    /// Steps scaled by elapsed time against a reference frame rate
    Scaled { reference_fps: f32 },
}

impl Timestep {
    /// Longest catch-up a single scaled frame may apply
    pub const MAX_STEPS_PER_FRAME: f32 = 4.0;

    /// Number of reference steps a frame `delta_ms` long represents
    ///
    /// The first frame has no delta and counts as one step.
    pub fn steps(&self, delta_ms: f64) -> f32 {
        match *self {
            Timestep::PerFrame => 1.0,
            Timestep::Scaled { reference_fps } => {
                if delta_ms <= 0.0 || reference_fps <= 0.0 {
                    return 1.0;
                }
                let interval_ms = 1000.0 / reference_fps as f64;
                ((delta_ms / interval_ms) as f32).min(Self::MAX_STEPS_PER_FRAME)
            }
        }
    }
}

/// Base particle constants
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParticleConfig {
    /// Particles appended per pointer event
    pub per_splat: u32,
    /// Full width of the spawn jitter square, in pixels
    pub jitter: f32,
    /// Velocity spread per unit of force, pixels per frame
    pub velocity_spread: f32,
    /// Lifetime lost per frame
    pub decay: f32,
    /// Velocity multiplier per frame
    pub damping: f32,
    /// Blob radius at full lifetime
    pub max_radius: f32,
    /// Blob center alpha at full lifetime
    pub peak_alpha: f32,
    /// Random hue offset range, degrees
    pub hue_spread: f32,
    pub saturation: f32,
    pub lightness: f32,
    /// Alpha of the per-frame fade fill
    pub fade_alpha: f32,
    /// Live particles kept at most; the oldest go first
    pub max_particles: usize,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            per_splat: 3,
            jitter: 20.0,
            velocity_spread: 8.0,
            decay: 0.008,
            damping: 0.98,
            max_radius: 4.0,
            peak_alpha: 0.6,
            hue_spread: 60.0,
            saturation: 0.7,
            lightness: 0.6,
            fade_alpha: 0.03,
            max_particles: 4096,
        }
    }
}

/// Cursor effect configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplashConfig {
    /// Scales how fast particles fade out
    pub density_dissipation: f32,
    /// Scales how fast particles slow down
    pub velocity_dissipation: f32,
    /// Scales the spawn jitter
    pub splat_radius: f32,
    /// Scales the spawn velocity
    pub splat_force: f32,
    /// Scales how fast the base hue rotates over time
    pub color_update_speed: f32,
    /// Fade color, and reset color of an opaque canvas
    pub back_color: Color,
    /// Reset the canvas to transparent rather than `back_color`
    pub transparent: bool,
    /// Upper bound on the device pixel ratio
    pub max_pixel_ratio: f32,
    /// Opacity of the canvas layer over the page
    pub layer_opacity: f32,
    /// Blend mode of the canvas layer over the page
    pub blend_mode: BlendMode,
    pub timestep: Timestep,
    pub particles: ParticleConfig,
}

impl Default for SplashConfig {
    fn default() -> Self {
        Self {
            density_dissipation: DEFAULT_DENSITY_DISSIPATION,
            velocity_dissipation: DEFAULT_VELOCITY_DISSIPATION,
            splat_radius: DEFAULT_SPLAT_RADIUS,
            splat_force: DEFAULT_SPLAT_FORCE,
            color_update_speed: DEFAULT_COLOR_UPDATE_SPEED,
            back_color: Color::BLACK,
            transparent: true,
            max_pixel_ratio: 2.0,
            layer_opacity: 0.4,
            blend_mode: BlendMode::Screen,
            timestep: Timestep::PerFrame,
            particles: ParticleConfig::default(),
        }
    }
}

/// Resolved per-particle constants the emitter runs on
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmitterParams {
    pub per_splat: u32,
    /// Half-width of the jitter square
    pub jitter_half: f32,
    /// Velocity spread per unit of force
    pub velocity_spread: f32,
    pub decay_step: f32,
    pub damping: f32,
    pub max_radius: f32,
    pub peak_alpha: f32,
    /// Base hue drift, degrees per millisecond
    pub hue_rate: f64,
    pub hue_spread: f32,
    pub saturation: f32,
    pub lightness: f32,
    pub fade_color: Color,
    pub max_particles: usize,
    pub timestep: Timestep,
}

impl Default for EmitterParams {
    fn default() -> Self {
        SplashConfig::default().resolve()
    }
}

impl SplashConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: SplashConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| SplashError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!("loaded splash config from {}", path.display());
        Ok(config)
    }

    /// Render as a TOML document
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every value is in range
    pub fn validate(&self) -> Result<()> {
        let result = self.check();
        if let Err(SplashError::InvalidConfig { field, reason }) = &result {
            tracing::warn!("rejected splash config: {}: {}", field, reason);
        }
        result
    }

    fn check(&self) -> Result<()> {
        positive("density_dissipation", self.density_dissipation)?;
        non_negative("velocity_dissipation", self.velocity_dissipation)?;
        non_negative("splat_radius", self.splat_radius)?;
        non_negative("splat_force", self.splat_force)?;
        finite("color_update_speed", self.color_update_speed)?;
        positive("max_pixel_ratio", self.max_pixel_ratio)?;
        unit("layer_opacity", self.layer_opacity)?;
        unit("back_color.alpha", self.back_color.a)?;

        if let Timestep::Scaled { reference_fps } = self.timestep {
            positive("timestep.reference_fps", reference_fps)?;
        }

        let p = &self.particles;
        if p.per_splat == 0 {
            return Err(invalid("particles.per_splat", "must be at least 1"));
        }
        if p.max_particles < p.per_splat as usize {
            return Err(invalid(
                "particles.max_particles",
                format!(
                    "{} cannot hold one splat of {} particles",
                    p.max_particles, p.per_splat
                ),
            ));
        }
        non_negative("particles.jitter", p.jitter)?;
        non_negative("particles.velocity_spread", p.velocity_spread)?;
        positive("particles.decay", p.decay)?;
        unit("particles.damping", p.damping)?;
        non_negative("particles.max_radius", p.max_radius)?;
        unit("particles.peak_alpha", p.peak_alpha)?;
        non_negative("particles.hue_spread", p.hue_spread)?;
        unit("particles.saturation", p.saturation)?;
        unit("particles.lightness", p.lightness)?;
        unit("particles.fade_alpha", p.fade_alpha)?;

        let damping = self.resolved_damping();
        if !(0.0..=1.0).contains(&damping) {
            return Err(invalid(
                "velocity_dissipation",
                format!("scales per-frame damping to {}, outside 0..=1", damping),
            ));
        }

        Ok(())
    }

    fn resolved_damping(&self) -> f32 {
        let loss = 1.0 - self.particles.damping;
        1.0 - loss * (self.velocity_dissipation / DEFAULT_VELOCITY_DISSIPATION)
    }

    /// Fold the knobs into concrete per-particle constants
    pub fn resolve(&self) -> EmitterParams {
        let p = &self.particles;
        EmitterParams {
            per_splat: p.per_splat.max(1),
            jitter_half: p.jitter * 0.5 * (self.splat_radius / DEFAULT_SPLAT_RADIUS),
            velocity_spread: p.velocity_spread * (self.splat_force / DEFAULT_SPLAT_FORCE),
            decay_step: p.decay * (self.density_dissipation / DEFAULT_DENSITY_DISSIPATION),
            damping: self.resolved_damping().clamp(0.0, 1.0),
            max_radius: p.max_radius,
            peak_alpha: p.peak_alpha,
            hue_rate: self.color_update_speed as f64 * HUE_RATE_PER_SPEED,
            hue_spread: p.hue_spread,
            saturation: p.saturation,
            lightness: p.lightness,
            fade_color: self.back_color.with_alpha(p.fade_alpha),
            max_particles: p.max_particles.max(1),
            timestep: self.timestep,
        }
    }

    /// Canvas setup for this effect
    pub fn canvas_options(&self) -> CanvasOptions {
        CanvasOptions {
            max_pixel_ratio: self.max_pixel_ratio,
            background: self.back_color,
            transparent: self.transparent,
            composite: CompositeStyle {
                blend_mode: self.blend_mode,
                opacity: self.layer_opacity,
            },
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Range checks
// ─────────────────────────────────────────────────────────────────────────────

fn invalid(field: &'static str, reason: impl Into<String>) -> SplashError {
    SplashError::InvalidConfig {
        field,
        reason: reason.into(),
    }
}

fn finite(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("must be finite, got {}", value)))
    }
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be greater than 0, got {}", value)))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<()> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must not be negative, got {}", value)))
    }
}

fn unit(field: &'static str, value: f32) -> Result<()> {
    finite(field, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("must be within 0..=1, got {}", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reproduce_stock_constants() {
        let params = SplashConfig::default().resolve();
        assert_eq!(params.per_splat, 3);
        assert_eq!(params.jitter_half, 10.0);
        assert_eq!(params.velocity_spread, 8.0);
        assert_eq!(params.decay_step, 0.008);
        assert_eq!(params.damping, 0.98);
        assert_eq!(params.max_radius, 4.0);
        assert_eq!(params.peak_alpha, 0.6);
        assert!((params.hue_rate - 0.01).abs() < 1e-12);
        assert_eq!(params.fade_color, Color::rgba(0.0, 0.0, 0.0, 0.03));
        assert_eq!(params.timestep, Timestep::PerFrame);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = SplashConfig::from_toml_str("").unwrap();
        assert_eq!(config, SplashConfig::default());
    }

    #[test]
    fn test_knobs_scale_relative_to_defaults() {
        let config = SplashConfig::from_toml_str(
            r#"
            density_dissipation = 5.0
            splat_force = 8000.0
            splat_radius = 0.3
            color_update_speed = 10.0
            "#,
        )
        .unwrap();
        let params = config.resolve();
        assert!((params.decay_step - 0.016).abs() < 1e-7);
        assert!((params.velocity_spread - 16.0).abs() < 1e-4);
        assert!((params.jitter_half - 20.0).abs() < 1e-4);
        assert!((params.hue_rate - 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_velocity_dissipation_scales_loss() {
        let config = SplashConfig {
            velocity_dissipation: 3.6,
            ..Default::default()
        };
        assert!((config.resolve().damping - 0.96).abs() < 1e-6);
    }

    #[test]
    fn test_parse_tables_and_colors() {
        let config = SplashConfig::from_toml_str(
            r##"
            back_color = "#1B1B1F"
            transparent = false
            blend_mode = "lighten"

            [particles]
            per_splat = 5

            [timestep]
            mode = "scaled"
            reference_fps = 120.0
            "##,
        )
        .unwrap();
        assert_eq!(config.back_color, Color::from_hex(0x1B1B1F));
        assert!(!config.transparent);
        assert_eq!(config.blend_mode, BlendMode::Lighten);
        assert_eq!(config.particles.per_splat, 5);
        assert_eq!(config.particles.decay, 0.008);
        assert_eq!(
            config.timestep,
            Timestep::Scaled {
                reference_fps: 120.0
            }
        );
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let err = SplashConfig::from_toml_str("density_dissipation = 0.0").unwrap_err();
        assert!(matches!(
            err,
            SplashError::InvalidConfig {
                field: "density_dissipation",
                ..
            }
        ));

        let err = SplashConfig::from_toml_str("[particles]\nper_splat = 0").unwrap_err();
        assert!(matches!(
            err,
            SplashError::InvalidConfig {
                field: "particles.per_splat",
                ..
            }
        ));

        // A cap smaller than one splat would evict part of every splat
        let err = SplashConfig::from_toml_str("[particles]\nper_splat = 5\nmax_particles = 4")
            .unwrap_err();
        assert!(matches!(
            err,
            SplashError::InvalidConfig {
                field: "particles.max_particles",
                ..
            }
        ));
        let exact = "[particles]\nper_splat = 5\nmax_particles = 5";
        assert!(SplashConfig::from_toml_str(exact).is_ok());

        // Loss of 0.02 * (100 / 1.8) would push damping below zero
        let err = SplashConfig::from_toml_str("velocity_dissipation = 100.0").unwrap_err();
        assert!(matches!(
            err,
            SplashError::InvalidConfig {
                field: "velocity_dissipation",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_unknown_keys_and_bad_colors() {
        assert!(matches!(
            SplashConfig::from_toml_str("splat_forse = 1.0"),
            Err(SplashError::Toml(_))
        ));
        assert!(matches!(
            SplashConfig::from_toml_str("back_color = \"black\""),
            Err(SplashError::Toml(_))
        ));
    }

    #[test]
    fn test_toml_output_parses_back() {
        let config = SplashConfig {
            timestep: Timestep::Scaled {
                reference_fps: 60.0,
            },
            ..Default::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(SplashConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SplashConfig::load("/definitely/not/here/splash.toml").unwrap_err();
        assert!(matches!(err, SplashError::Io { .. }));
    }

    #[test]
    fn test_timestep_steps() {
        assert_eq!(Timestep::PerFrame.steps(33.0), 1.0);

        let scaled = Timestep::Scaled {
            reference_fps: 60.0,
        };
        assert_eq!(scaled.steps(0.0), 1.0);
        assert!((scaled.steps(1000.0 / 60.0) - 1.0).abs() < 1e-6);
        assert!((scaled.steps(1000.0 / 30.0) - 2.0).abs() < 1e-6);
        assert_eq!(scaled.steps(10_000.0), Timestep::MAX_STEPS_PER_FRAME);
    }

    #[test]
    fn test_canvas_options_composite() {
        let options = SplashConfig::default().canvas_options();
        assert_eq!(options.composite.blend_mode, BlendMode::Screen);
        assert_eq!(options.composite.opacity, 0.4);
        assert!(options.transparent);
    }
}
