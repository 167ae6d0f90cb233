//! Easing curves for the morph transition.
//!
//! All curves map `[0, 1]` onto `[0, 1]`, start at 0, end at 1 and are
//! monotonic, so an eased transition never overshoots its target.

use serde::{Deserialize, Serialize};

/// Selectable easing curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Quadratic ease-in-out (slow start, fast middle, slow end).
    #[default]
    QuadInOut,
    /// Cubic ease-in-out. Flatter ends than [`Easing::QuadInOut`].
    CubicInOut,
}

impl Easing {
    /// Apply the curve to a normalized progress value.
    ///
    /// Input outside `[0, 1]` is clamped first.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadInOut => quad_in_out(t),
            Easing::CubicInOut => cubic_in_out(t),
        }
    }
}

/// Eased progress of an animation `elapsed` seconds into a `duration`-second run.
///
/// A non-positive duration is already complete.
pub fn ease(elapsed: f32, duration: f32, easing: Easing) -> f32 {
    if duration <= 0.0 {
        return 1.0;
    }
    easing.apply(elapsed / duration)
}

fn quad_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u / 2.0
    }
}

fn cubic_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 3] = [Easing::Linear, Easing::QuadInOut, Easing::CubicInOut];

    #[test]
    fn boundaries_are_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for easing in ALL {
            let mut prev = easing.apply(0.0);
            for i in 1..=200 {
                let val = easing.apply(i as f32 / 200.0);
                assert!(val >= prev, "{easing:?} non-monotonic at step {i}: {prev} > {val}");
                prev = val;
            }
        }
    }

    #[test]
    fn in_out_curves_start_slow() {
        assert!(Easing::QuadInOut.apply(0.25) < 0.25);
        assert!(Easing::CubicInOut.apply(0.25) < Easing::QuadInOut.apply(0.25));
    }

    #[test]
    fn in_out_curves_pass_through_midpoint() {
        assert!((Easing::QuadInOut.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((Easing::CubicInOut.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        assert_eq!(Easing::QuadInOut.apply(-3.0), 0.0);
        assert_eq!(Easing::QuadInOut.apply(7.0), 1.0);
    }

    #[test]
    fn ease_over_duration() {
        assert_eq!(ease(0.0, 2.0, Easing::Linear), 0.0);
        assert!((ease(1.0, 2.0, Easing::Linear) - 0.5).abs() < 1e-6);
        assert_eq!(ease(3.0, 2.0, Easing::QuadInOut), 1.0);
        assert_eq!(ease(0.0, 0.0, Easing::QuadInOut), 1.0);
    }
}
