#![forbid(unsafe_code)]

//! Easing curves for deck animations.
//!
//! The deck uses a small fixed set of curves: the material
//! fast-out-slow-in family (cubic beziers), simple power curves for
//! acceleration/deceleration, and a quintic ease-out for overscroll. All
//! curves map `[0, 1]` to `[0, 1]` monotonically, with `f(0) = 0` and
//! `f(1) = 1`; inputs outside the unit interval are clamped.

/// A named easing curve.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    /// Identity pacing.
    #[default]
    Linear,
    /// Quadratic ease-in (`t^2`). Used for deriving dim from progress.
    Accelerate,
    /// Quadratic ease-out.
    Decelerate,
    /// Material standard curve, cubic-bezier(0.4, 0.0, 0.2, 1.0).
    FastOutSlowIn,
    /// Material exit curve, cubic-bezier(0.4, 0.0, 1.0, 1.0).
    FastOutLinearIn,
    /// Material enter curve, cubic-bezier(0.0, 0.0, 0.2, 1.0).
    LinearOutSlowIn,
    /// Quintic ease-out (`1 - (1-t)^5`).
    QuintOut,
}

impl Easing {
    /// Evaluate the curve at `t`, clamping `t` to `[0, 1]`.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Accelerate => t * t,
            Self::Decelerate => {
                let inv = 1.0 - t;
                1.0 - inv * inv
            }
            Self::FastOutSlowIn => cubic_bezier(0.4, 0.0, 0.2, 1.0, t),
            Self::FastOutLinearIn => cubic_bezier(0.4, 0.0, 1.0, 1.0, t),
            Self::LinearOutSlowIn => cubic_bezier(0.0, 0.0, 0.2, 1.0, t),
            Self::QuintOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv * inv * inv
            }
        }
    }
}

/// Evaluate a unit cubic bezier (anchors at (0,0) and (1,1)) at time `x`.
///
/// Solves the x(s) polynomial for the curve parameter with a few Newton
/// iterations, falling back to bisection when the derivative is too flat.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let ax = 1.0 + 3.0 * (x1 - x2);
    let bx = 3.0 * (x2 - 2.0 * x1);
    let cx = 3.0 * x1;
    let sample_x = |s: f32| ((ax * s + bx) * s + cx) * s;
    let sample_dx = |s: f32| (3.0 * ax * s + 2.0 * bx) * s + cx;

    let mut s = x;
    for _ in 0..8 {
        let err = sample_x(s) - x;
        if err.abs() < 1e-6 {
            break;
        }
        let d = sample_dx(s);
        if d.abs() < 1e-6 {
            break;
        }
        s -= err / d;
    }

    if !(0.0..=1.0).contains(&s) || (sample_x(s) - x).abs() > 1e-4 {
        // Bisection fallback; x(s) is monotonic on [0, 1].
        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        for _ in 0..32 {
            s = (lo + hi) / 2.0;
            if sample_x(s) < x {
                lo = s;
            } else {
                hi = s;
            }
        }
    }

    let ay = 1.0 + 3.0 * (y1 - y2);
    let by = 3.0 * (y2 - 2.0 * y1);
    let cy = 3.0 * y1;
    ((ay * s + by) * s + cy) * s
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 7] = [
        Easing::Linear,
        Easing::Accelerate,
        Easing::Decelerate,
        Easing::FastOutSlowIn,
        Easing::FastOutLinearIn,
        Easing::LinearOutSlowIn,
        Easing::QuintOut,
    ];

    #[test]
    fn endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-4, "{easing:?} at 1");
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for easing in ALL {
            let mut prev = 0.0f32;
            for i in 0..=100 {
                let v = easing.apply(i as f32 / 100.0);
                assert!(
                    v >= prev - 1e-4,
                    "{easing:?} decreased at t={}: {v} < {prev}",
                    i as f32 / 100.0
                );
                prev = v;
            }
        }
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        for easing in ALL {
            assert_eq!(easing.apply(-3.0), easing.apply(0.0));
            assert_eq!(easing.apply(7.5), easing.apply(1.0));
        }
    }

    #[test]
    fn accelerate_matches_square() {
        assert!((Easing::Accelerate.apply(0.5) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn fast_out_slow_in_midpoint_is_above_linear() {
        // The material standard curve front-loads movement.
        assert!(Easing::FastOutSlowIn.apply(0.5) > 0.5);
    }

    #[test]
    fn bezier_round_trips_known_points() {
        // cubic-bezier(0, 0, 1, 1) degenerates to identity.
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!((cubic_bezier(0.0, 0.0, 1.0, 1.0, t) - t).abs() < 1e-3);
        }
    }
}
