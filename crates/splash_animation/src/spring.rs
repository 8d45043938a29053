//! Damped spring
//!
//! Chases a moving target with a mass-spring-damper, integrated with
//! fourth-order Runge-Kutta in short substeps so large frame gaps stay
//! stable. Used to smooth values that jump, like a scroll position.

/// Longest single RK4 substep in seconds
const MAX_SUBSTEP: f32 = 1.0 / 120.0;

/// Longest gap one `step` integrates; longer gaps are clamped to it
const MAX_STEP: f32 = 4.0;

/// Spring parameters and settle thresholds
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
    /// Distance from target under which the spring may settle
    pub rest_delta: f32,
    /// Speed under which the spring may settle
    pub rest_speed: f32,
}

impl SpringConfig {
    /// Spring with thresholds suited to pixel-sized values
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
            rest_delta: 0.5,
            rest_speed: 5.0,
        }
    }

    /// Replace the settle thresholds
    ///
    /// Values in `0..1` (progress, opacity) need far tighter thresholds than
    /// values in pixels.
    pub fn with_rest(mut self, rest_delta: f32, rest_speed: f32) -> Self {
        self.rest_delta = rest_delta;
        self.rest_speed = rest_speed;
        self
    }

    /// Smoothing for scroll-linked progress in `0..1`
    pub fn scroll_progress() -> Self {
        Self::new(100.0, 30.0, 1.0).with_rest(0.001, 0.01)
    }

    /// Damping ratio: below 1 overshoots, above 1 creeps in
    pub fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::scroll_progress()
    }
}

/// Position and velocity, also used for their derivatives
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Motion {
    x: f32,
    v: f32,
}

impl Motion {
    /// `self + rate * dt`
    fn advanced(self, rate: Motion, dt: f32) -> Motion {
        Motion {
            x: self.x + rate.x * dt,
            v: self.v + rate.v * dt,
        }
    }
}

/// A value pulled toward its target by a spring
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    motion: Motion,
    target: f32,
}

impl Spring {
    /// A spring at rest on `initial`
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            motion: Motion { x: initial, v: 0.0 },
            target: initial,
        }
    }

    pub fn value(&self) -> f32 {
        self.motion.x
    }

    pub fn velocity(&self) -> f32 {
        self.motion.v
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    /// Retarget; current velocity carries over
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Snap to `value` and stop
    pub fn snap_to(&mut self, value: f32) {
        self.motion = Motion { x: value, v: 0.0 };
        self.target = value;
    }

    /// Near enough to the target, and slow enough, to stop
    pub fn is_settled(&self) -> bool {
        (self.motion.x - self.target).abs() < self.config.rest_delta
            && self.motion.v.abs() < self.config.rest_speed
    }

    /// Integrate `dt` seconds
    ///
    /// The gap is split into substeps of at most [`MAX_SUBSTEP`], so a stalled
    /// frame cannot push a stiff spring past RK4's stability limit.
    pub fn step(&mut self, dt: f32) {
        if dt.is_nan() || dt <= 0.0 {
            return;
        }
        let dt = dt.min(MAX_STEP);
        let substeps = (dt / MAX_SUBSTEP).ceil().max(1.0) as u32;
        let h = dt / substeps as f32;

        for _ in 0..substeps {
            if self.is_settled() {
                self.snap_to(self.target);
                return;
            }
            self.integrate(h);
        }
    }

    /// One RK4 step of `h` seconds
    fn integrate(&mut self, h: f32) {
        let m = self.motion;
        let half = h * 0.5;
        let k1 = self.rate(m);
        let k2 = self.rate(m.advanced(k1, half));
        let k3 = self.rate(m.advanced(k2, half));
        let k4 = self.rate(m.advanced(k3, h));

        let blend = |a: f32, b: f32, c: f32, d: f32| (a + 2.0 * (b + c) + d) / 6.0;
        self.motion = m.advanced(
            Motion {
                x: blend(k1.x, k2.x, k3.x, k4.x),
                v: blend(k1.v, k2.v, k3.v, k4.v),
            },
            h,
        );
    }

    /// Time derivative of `m`: velocity and acceleration
    fn rate(&self, m: Motion) -> Motion {
        let SpringConfig {
            stiffness,
            damping,
            mass,
            ..
        } = self.config;
        let force = stiffness * (self.target - m.x) - damping * m.v;
        Motion {
            x: m.v,
            v: force / mass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    fn run(spring: &mut Spring, frames: usize) {
        for _ in 0..frames {
            spring.step(FRAME);
        }
    }

    #[test]
    fn test_progress_spring_settles_on_target() {
        let mut spring = Spring::new(SpringConfig::scroll_progress(), 0.0);
        spring.set_target(0.5);
        run(&mut spring, 180);

        assert!(spring.is_settled());
        assert!((spring.value() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_progress_spring_never_overshoots() {
        let mut spring = Spring::new(SpringConfig::scroll_progress(), 0.0);
        spring.set_target(1.0);
        for _ in 0..240 {
            spring.step(FRAME);
            assert!(spring.value() <= 1.0 + 1e-4, "value {}", spring.value());
        }
    }

    #[test]
    fn test_unit_thresholds_keep_small_moves_alive() {
        let mut spring = Spring::new(SpringConfig::scroll_progress(), 0.0);
        spring.set_target(0.2);
        spring.step(FRAME);
        assert!(!spring.is_settled());

        // Pixel thresholds snap the same move straight to the target
        let mut coarse = Spring::new(SpringConfig::new(100.0, 30.0, 1.0), 0.0);
        coarse.set_target(0.2);
        coarse.step(FRAME);
        assert_eq!(coarse.value(), 0.2);
    }

    #[test]
    fn test_retarget_keeps_velocity() {
        let mut spring = Spring::new(SpringConfig::new(180.0, 12.0, 1.0), 0.0);
        spring.set_target(100.0);
        run(&mut spring, 10);

        let velocity = spring.velocity();
        assert!(velocity > 0.0);
        spring.set_target(50.0);
        assert_eq!(spring.velocity(), velocity);
    }

    #[test]
    fn test_damping_ratio() {
        // 30 / (2 * sqrt(100)) = 1.5
        assert!((SpringConfig::scroll_progress().damping_ratio() - 1.5).abs() < 1e-6);
        assert!(SpringConfig::new(180.0, 12.0, 1.0).damping_ratio() < 1.0);
    }

    #[test]
    fn test_large_steps_stay_bounded() {
        let mut spring = Spring::new(SpringConfig::new(400.0, 30.0, 1.0), 0.0);
        spring.set_target(1000.0);
        for _ in 0..100 {
            spring.step(0.1);
            assert!(spring.value().abs() < 2000.0);
        }
    }

    #[test]
    fn test_stalled_frames_stay_stable() {
        let mut spring = Spring::new(SpringConfig::scroll_progress(), 0.0);
        spring.set_target(0.5);
        for _ in 0..12 {
            spring.step(0.25);
            assert!((0.0..=0.5 + 1e-4).contains(&spring.value()), "value {}", spring.value());
        }
        assert!(spring.is_settled());
        assert!((spring.value() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_huge_gap_settles() {
        let mut spring = Spring::new(SpringConfig::scroll_progress(), 0.0);
        spring.set_target(1.0);
        spring.step(1.0e6);
        assert!(spring.value().is_finite());
        assert!(spring.is_settled());
        assert_eq!(spring.value(), 1.0);
    }

    #[test]
    fn test_non_positive_dt_is_ignored() {
        let mut spring = Spring::new(SpringConfig::scroll_progress(), 0.0);
        spring.set_target(1.0);
        spring.step(0.0);
        spring.step(-1.0);
        spring.step(f32::NAN);
        assert_eq!(spring.value(), 0.0);
    }

    #[test]
    fn test_snap_to() {
        let mut spring = Spring::new(SpringConfig::default(), 0.0);
        spring.set_target(0.8);
        spring.step(FRAME);
        spring.snap_to(0.3);
        assert_eq!(spring.value(), 0.3);
        assert_eq!(spring.velocity(), 0.0);
        assert!(spring.is_settled());
    }
}
