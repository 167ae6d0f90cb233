//! Morph animator.
//!
//! Owns the morph parameter (`0.0` = heart, `1.0` = photo) and drives it
//! between the two extremes on toggle. The animator is time-agnostic: every
//! call takes the current elapsed time in seconds, so it can be driven by a
//! real clock or stepped deterministically in tests.
//!
//! # State machine
//!
//! ```text
//!           toggle                    done
//!  Heart ───────────▶ Transitioning ───────▶ Photo
//!    ▲                 │     ▲                 │
//!    │      done       │     │     toggle      │
//!    └─────────────────┘     └─────────────────┘
//! ```
//!
//! A toggle while transitioning restarts from the live value toward the new
//! opposite extreme. Toggles are never queued and never ignored.

use crate::easing::Easing;

/// The two shapes the field can settle on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Heart,
    Photo,
}

impl Shape {
    /// Morph value this shape settles at.
    #[inline]
    pub fn extreme(self) -> f32 {
        match self {
            Shape::Heart => 0.0,
            Shape::Photo => 1.0,
        }
    }

    #[inline]
    pub fn opposite(self) -> Shape {
        match self {
            Shape::Heart => Shape::Photo,
            Shape::Photo => Shape::Heart,
        }
    }
}

/// Observable phase of the animator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphPhase {
    /// Settled at 0.
    Heart,
    /// Settled at 1.
    Photo,
    /// Moving toward the given shape.
    Transitioning(Shape),
}

/// Snapshot of the morph parameter and the shape it is heading to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorphState {
    /// Current morph parameter in `[0, 1]`.
    pub value: f32,
    /// The shape the parameter settles at (or is moving toward).
    pub target: Shape,
}

impl MorphState {
    #[inline]
    pub fn is_heart(&self) -> bool {
        self.target == Shape::Heart
    }

    /// Extreme the value is settling at (`0.0` or `1.0`).
    #[inline]
    pub fn target_extreme(&self) -> f32 {
        self.target.extreme()
    }
}

impl Default for MorphState {
    fn default() -> Self {
        Self {
            value: 0.0,
            target: Shape::Heart,
        }
    }
}

/// An in-flight interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Animation {
    from: f32,
    to: f32,
    start: f32,
    duration: f32,
    easing: Easing,
}

impl Animation {
    fn value_at(&self, now: f32) -> f32 {
        let progress = crate::easing::ease(now - self.start, self.duration, self.easing);
        self.from + (self.to - self.from) * progress
    }

    fn is_done(&self, now: f32) -> bool {
        now - self.start >= self.duration
    }
}

/// Drives the morph parameter between heart and photo.
#[derive(Debug, Clone)]
pub struct MorphAnimator {
    state: MorphState,
    animation: Option<Animation>,
    duration: f32,
    easing: Easing,
}

/// Transition length used when the configured one is not a finite number.
pub const DEFAULT_DURATION: f32 = 1.5;

impl MorphAnimator {
    /// Create an animator settled on the heart.
    ///
    /// Negative durations become instant. Infinite or NaN durations fall back
    /// to [`DEFAULT_DURATION`] so every transition still finishes.
    pub fn new(duration: f32, easing: Easing) -> Self {
        let duration = if duration.is_finite() {
            duration.max(0.0)
        } else {
            DEFAULT_DURATION
        };
        Self {
            state: MorphState::default(),
            animation: None,
            duration,
            easing,
        }
    }

    /// Flip the target shape at time `now`.
    ///
    /// The new animation starts from the value at `now`, so a toggle in the
    /// middle of a transition reverses smoothly instead of snapping.
    pub fn toggle(&mut self, now: f32) -> Shape {
        let from = self.advance(now);
        let target = self.state.target.opposite();
        self.state.target = target;
        self.animation = Some(Animation {
            from,
            to: target.extreme(),
            start: now,
            duration: self.duration,
            easing: self.easing,
        });
        tracing::debug!(from, ?target, "morph toggled");
        self.advance(now);
        target
    }

    /// Advance to time `now` and return the current value.
    pub fn advance(&mut self, now: f32) -> f32 {
        if let Some(anim) = self.animation {
            if anim.is_done(now) {
                self.state.value = anim.to;
                self.animation = None;
            } else {
                self.state.value = anim.value_at(now).clamp(0.0, 1.0);
            }
        }
        self.state.value
    }

    /// Value as of the last `advance` or `toggle`.
    #[inline]
    pub fn value(&self) -> f32 {
        self.state.value
    }

    #[inline]
    pub fn state(&self) -> MorphState {
        self.state
    }

    pub fn phase(&self) -> MorphPhase {
        match (self.animation, self.state.target) {
            (Some(_), target) => MorphPhase::Transitioning(target),
            (None, Shape::Heart) => MorphPhase::Heart,
            (None, Shape::Photo) => MorphPhase::Photo,
        }
    }

    #[inline]
    pub fn is_transitioning(&self) -> bool {
        self.animation.is_some()
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }
}

impl Default for MorphAnimator {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION, Easing::QuadInOut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_settled_on_heart() {
        let anim = MorphAnimator::default();
        assert_eq!(anim.value(), 0.0);
        assert_eq!(anim.phase(), MorphPhase::Heart);
        assert!(anim.state().is_heart());
    }

    #[test]
    fn toggle_moves_to_photo_and_settles_exactly() {
        let mut anim = MorphAnimator::new(2.0, Easing::QuadInOut);
        assert_eq!(anim.toggle(0.0), Shape::Photo);
        assert_eq!(anim.phase(), MorphPhase::Transitioning(Shape::Photo));

        let mid = anim.advance(1.0);
        assert!(mid > 0.0 && mid < 1.0);
        // Further along than a linear sweep would be a quarter of the way in
        assert!(mid > 0.25);

        assert_eq!(anim.advance(2.0), 1.0);
        assert_eq!(anim.phase(), MorphPhase::Photo);
        assert_eq!(anim.advance(50.0), 1.0);
    }

    #[test]
    fn eased_start_is_slower_than_linear() {
        let mut anim = MorphAnimator::new(2.0, Easing::QuadInOut);
        anim.toggle(0.0);
        assert!(anim.advance(0.5) < 0.25);
    }

    #[test]
    fn value_is_monotonic_within_a_segment() {
        let mut anim = MorphAnimator::new(1.5, Easing::QuadInOut);
        anim.toggle(0.0);
        let mut prev = anim.value();
        for i in 1..=120 {
            let v = anim.advance(i as f32 / 60.0);
            assert!(v >= prev, "decreased at frame {i}");
            prev = v;
        }
        assert_eq!(prev, 1.0);

        anim.toggle(3.0);
        for i in 1..=120 {
            let v = anim.advance(3.0 + i as f32 / 60.0);
            assert!(v <= prev, "increased at frame {i}");
            prev = v;
        }
        assert_eq!(prev, 0.0);
    }

    #[test]
    fn toggle_mid_transition_reverses_from_live_value() {
        let mut anim = MorphAnimator::new(2.0, Easing::QuadInOut);
        anim.toggle(0.0);
        let live = anim.advance(1.2);

        assert_eq!(anim.toggle(1.2), Shape::Heart);
        assert_eq!(anim.value(), live);
        assert_eq!(anim.phase(), MorphPhase::Transitioning(Shape::Heart));

        let next = anim.advance(1.2 + 1.0 / 60.0);
        assert!(next <= live);
        assert!(live - next < 0.01);

        assert_eq!(anim.advance(3.2), 0.0);
        assert_eq!(anim.phase(), MorphPhase::Heart);
    }

    #[test]
    fn zero_duration_jumps_to_extreme() {
        let mut anim = MorphAnimator::new(0.0, Easing::Linear);
        anim.toggle(5.0);
        assert_eq!(anim.value(), 1.0);
        assert_eq!(anim.phase(), MorphPhase::Photo);
    }

    #[test]
    fn non_finite_duration_still_settles() {
        for duration in [f32::INFINITY, f32::NAN] {
            let mut anim = MorphAnimator::new(duration, Easing::QuadInOut);
            assert_eq!(anim.duration(), DEFAULT_DURATION);
            anim.toggle(0.0);
            assert_eq!(anim.advance(1e6), 1.0);
            assert_eq!(anim.phase(), MorphPhase::Photo);
        }
    }

    #[test]
    fn advance_without_toggle_is_stable() {
        let mut anim = MorphAnimator::default();
        for t in [0.0, 1.0, 100.0] {
            assert_eq!(anim.advance(t), 0.0);
        }
    }
}
