//! Individual particle data

use splash_core::{Point, Vec2};

/// A single trail particle
///
/// Lifetime is derived from the accumulated age rather than decremented
/// in place, so a particle with decay step `d` reaches exactly zero after
/// `1 / d` whole steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Position in canvas-local pixels
    pub position: Point,
    /// Velocity in pixels per step
    pub velocity: Vec2,
    /// Color angle in degrees, fixed at creation
    pub hue: f32,
    age: f32,
    life: f32,
}

impl Particle {
    /// Create a particle at full lifetime
    pub fn new(position: Point, velocity: Vec2, hue: f32) -> Self {
        Self {
            position,
            velocity,
            hue,
            age: 0.0,
            life: 1.0,
        }
    }

    /// Remaining lifetime in `0.0..=1.0`
    pub fn life(&self) -> f32 {
        self.life
    }

    /// Steps lived so far
    pub fn age(&self) -> f32 {
        self.age
    }

    /// Check if particle should be removed
    pub fn is_expired(&self) -> bool {
        self.life <= 0.0
    }

    /// Advance by `steps` reference frames
    ///
    /// `damping` is the velocity multiplier for the whole update, already
    /// raised to the step count by the caller.
    pub fn update(&mut self, steps: f32, damping: f32, decay_step: f32) {
        self.position += self.velocity * steps;
        self.age += steps;
        self.life = (1.0 - self.age * decay_step).max(0.0);
        self.velocity = self.velocity * damping;
    }
}
