//! Particle drawing
//!
//! The canvas is never cleared between frames. Each frame lays a
//! low-alpha fill over the previous one, so old blobs fade into trails.

use splash_core::{Color, DrawContext, DrawContextExt};
use splash_paint::gradient::soft_glow;

use crate::config::EmitterParams;
use crate::particle::Particle;

/// Lay the fade fill over the whole canvas
pub fn paint_fade(ctx: &mut dyn DrawContext, params: &EmitterParams) {
    ctx.fill_viewport(params.fade_color);
}

/// Blob color for a particle at its current lifetime
pub fn particle_color(particle: &Particle, params: &EmitterParams) -> Color {
    Color::from_hsla(
        particle.hue,
        params.saturation,
        params.lightness,
        particle.life() * params.peak_alpha,
    )
}

/// Blob radius for a particle at its current lifetime
pub fn particle_radius(particle: &Particle, params: &EmitterParams) -> f32 {
    particle.life() * params.max_radius
}

/// Draw one particle as a soft radial blob
///
/// Returns false when the blob has no area and nothing was drawn.
pub fn paint_particle(ctx: &mut dyn DrawContext, particle: &Particle, params: &EmitterParams) -> bool {
    let radius = particle_radius(particle, params);
    if radius <= 0.0 {
        return false;
    }

    let color = particle_color(particle, params);
    ctx.fill_disc(
        particle.position,
        radius,
        soft_glow(particle.position, radius, color),
    );
    true
}
