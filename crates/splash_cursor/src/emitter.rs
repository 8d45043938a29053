//! Pointer-trail particle emitter
//!
//! Pointer events append small bursts ("splats") of particles; every frame
//! the emitter drops expired particles, integrates the rest, and draws them
//! over a faded copy of the previous frame.

use std::rc::Rc;

use rand::{Rng, RngCore};
use splash_animation::Clock;
use splash_core::{DrawContext, Point, Size, Vec2};

use crate::config::EmitterParams;
use crate::particle::Particle;
use crate::render;

/// Running totals for an emitter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmitterStats {
    /// Particles created since construction
    pub emitted: u64,
    /// Particles removed after expiring
    pub expired: u64,
    /// Particles dropped to stay under the live cap
    pub evicted: u64,
    /// Pointer events ignored for falling outside the canvas
    pub rejected: u64,
}

/// Owns the live particle set and spawns into it
pub struct ParticleEmitter {
    params: EmitterParams,
    particles: Vec<Particle>,
    bounds: Size,
    rng: Box<dyn RngCore>,
    clock: Rc<dyn Clock>,
    stats: EmitterStats,
}

impl ParticleEmitter {
    /// Create an emitter for a canvas of `bounds` logical pixels
    pub fn new(
        params: EmitterParams,
        bounds: Size,
        rng: Box<dyn RngCore>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            params,
            particles: Vec::new(),
            bounds,
            rng,
            clock,
            stats: EmitterStats::default(),
        }
    }

    /// Splat particles around a canvas-local point
    ///
    /// Points outside the canvas are ignored.
    pub fn on_pointer_move(&mut self, x: f32, y: f32, force: f32) {
        let origin = Point::new(x, y);
        if !self.bounds.to_rect().contains(origin) {
            self.stats.rejected += 1;
            tracing::trace!("pointer ({}, {}) outside {:?}, ignored", x, y, self.bounds);
            return;
        }

        let now_ms = self.clock.now_ms();
        let p = self.params;
        for _ in 0..p.per_splat {
            let offset = Vec2::new(
                self.centered() * 2.0 * p.jitter_half,
                self.centered() * 2.0 * p.jitter_half,
            );
            let velocity = Vec2::new(
                self.centered() * force * p.velocity_spread,
                self.centered() * force * p.velocity_spread,
            );
            let hue_offset = self.rng.gen::<f64>() * p.hue_spread as f64;
            let hue = (now_ms * p.hue_rate + hue_offset).rem_euclid(360.0) as f32;

            self.particles.push(Particle::new(origin + offset, velocity, hue));
        }
        self.stats.emitted += p.per_splat as u64;

        if self.particles.len() > p.max_particles {
            let excess = self.particles.len() - p.max_particles;
            self.particles.drain(..excess);
            self.stats.evicted += excess as u64;
        }
    }

    /// Uniform sample in `-0.5..0.5`
    fn centered(&mut self) -> f32 {
        self.rng.gen::<f32>() - 0.5
    }

    /// Drop expired particles, then integrate the survivors by `steps`
    pub fn advance(&mut self, steps: f32) {
        let before = self.particles.len();
        self.particles.retain(|p| !p.is_expired());
        self.stats.expired += (before - self.particles.len()) as u64;

        let damping = if steps == 1.0 {
            self.params.damping
        } else {
            self.params.damping.powf(steps)
        };
        let decay = self.params.decay_step;
        for particle in &mut self.particles {
            particle.update(steps, damping, decay);
        }
    }

    /// One animation frame: fade, advance, draw
    ///
    /// Returns the number of blobs drawn.
    pub fn advance_and_render(&mut self, ctx: &mut dyn DrawContext, steps: f32) -> usize {
        render::paint_fade(ctx, &self.params);
        self.advance(steps);

        self.particles
            .iter()
            .filter(|particle| render::paint_particle(ctx, particle, &self.params))
            .count()
    }

    /// Track a new canvas size
    pub fn set_bounds(&mut self, bounds: Size) {
        self.bounds = bounds;
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    pub fn params(&self) -> &EmitterParams {
        &self.params
    }

    /// The live set
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn live_count(&self) -> usize {
        self.particles.len()
    }

    pub fn stats(&self) -> EmitterStats {
        self.stats
    }

    /// Drop every live particle
    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

impl std::fmt::Debug for ParticleEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleEmitter")
            .field("live", &self.particles.len())
            .field("bounds", &self.bounds)
            .field("stats", &self.stats)
            .finish()
    }
}
