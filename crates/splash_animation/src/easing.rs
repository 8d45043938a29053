//! Easing curves
//!
//! The named curves match the CSS / motion-library keywords, all defined as
//! cubic béziers through (0,0) and (1,1).

/// An easing function mapping linear progress to eased progress
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Custom cubic bézier with control points (x1, y1, x2, y2)
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Apply the easing to `t` (clamped to `0.0..=1.0`)
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(x1, y1, x2, y2, t),
        }
    }
}

fn bezier_component(p1: f32, p2: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(p1: f32, p2: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Solve the curve for `x = t` and return its `y`
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, t: f32) -> f32 {
    if t <= 0.0 || t >= 1.0 {
        return t;
    }

    // Newton-Raphson, falling back to bisection on a flat slope
    let mut s = t;
    for _ in 0..8 {
        let x = bezier_component(x1, x2, s) - t;
        if x.abs() < 1e-6 {
            return bezier_component(y1, y2, s);
        }
        let slope = bezier_slope(x1, x2, s);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= x / slope;
    }

    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    s = t;
    for _ in 0..32 {
        let x = bezier_component(x1, x2, s);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) * 0.5;
    }
    bezier_component(y1, y2, s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(-1.0), 0.0);
            assert_eq!(easing.apply(2.0), 1.0);
        }
    }

    #[test]
    fn test_ease_in_out_symmetric() {
        let mid = Easing::EaseInOut.apply(0.5);
        assert!((mid - 0.5).abs() < 1e-3);
        let a = Easing::EaseInOut.apply(0.25);
        let b = Easing::EaseInOut.apply(0.75);
        assert!((a + b - 1.0).abs() < 1e-3);
        assert!(a < 0.25);
    }

    #[test]
    fn test_ease_out_leads_linear() {
        assert!(Easing::EaseOut.apply(0.3) > 0.3);
        assert!(Easing::EaseIn.apply(0.3) < 0.3);
    }

    #[test]
    fn test_monotonic() {
        let mut last = 0.0;
        for i in 0..=100 {
            let v = Easing::EaseInOut.apply(i as f32 / 100.0);
            assert!(v >= last - 1e-5);
            last = v;
        }
    }
}
