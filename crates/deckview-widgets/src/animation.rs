#![forbid(unsafe_code)]

//! Single-property animations and per-batch animation contexts.
//!
//! A [`PropertyAnimation`] moves one scalar from `from` to `to` over a
//! duration (after an optional start delay), shaped by an easing curve. It
//! has no callbacks of its own: the owner advances it each tick, reads the
//! current value, and decides what completion means. Dropping one mid-flight
//! therefore cancels it *without* any completion side effect, which is
//! exactly the single-flight contract card views need — starting a new
//! animation on a property simply replaces the old `PropertyAnimation`.
//!
//! The batch contexts ([`EnterContext`], [`ExitContext`]) bundle the shared
//! [`RefCountedTrigger`] with the per-batch geometry a card needs to start
//! its leg of a coordinated animation pass. They are short-lived: built per
//! pass, handed to each card, then discarded.

use std::time::Duration;

use deckview_core::easing::Easing;
use deckview_core::trigger::RefCountedTrigger;

use crate::transform::CardTransform;

/// A scalar animation from one value to another.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyAnimation {
    from: f32,
    to: f32,
    delay: Duration,
    duration: Duration,
    easing: Easing,
    elapsed: Duration,
}

impl PropertyAnimation {
    /// Animate `from -> to` over `duration` with linear pacing and no delay.
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            delay: Duration::ZERO,
            duration,
            easing: Easing::Linear,
            elapsed: Duration::ZERO,
        }
    }

    /// Set the start delay.
    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the easing curve.
    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// The target value.
    pub fn to(&self) -> f32 {
        self.to
    }

    /// Advance by `dt` and return the current value.
    pub fn advance(&mut self, dt: Duration) -> f32 {
        self.elapsed = self.elapsed.saturating_add(dt);
        self.value()
    }

    /// Current value at the elapsed time.
    pub fn value(&self) -> f32 {
        let t = self.fraction();
        self.from + (self.to - self.from) * self.easing.apply(t)
    }

    /// Whether the animation has run to completion.
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.delay + self.duration
    }

    /// Whether the animation is still inside its start delay.
    pub fn is_pending(&self) -> bool {
        self.elapsed < self.delay
    }

    fn fraction(&self) -> f32 {
        if self.elapsed < self.delay {
            return 0.0;
        }
        if self.duration.is_zero() {
            return 1.0;
        }
        let active = self.elapsed - self.delay;
        (active.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }
}

/// The animation context for cards entering the deck.
///
/// One context is built per enter pass and shared (by reference) with every
/// card in the batch; the trigger inside aggregates their completions.
#[derive(Debug, Clone)]
pub struct EnterContext {
    /// Runs logic once every card's enter animation has completed.
    pub trigger: RefCountedTrigger,
    /// The transform the current card animates toward.
    pub target_transform: CardTransform,
    /// The current card's index in visible stack order (0 = rearmost).
    pub stack_index: usize,
    /// Total number of visible cards in the pass.
    pub stack_count: usize,
    /// Whether the current card covers the launch target.
    pub occludes_target: bool,
}

impl EnterContext {
    /// Create a context around a shared batch trigger.
    pub fn new(trigger: RefCountedTrigger) -> Self {
        Self {
            trigger,
            target_transform: CardTransform::default(),
            stack_index: 0,
            stack_count: 0,
            occludes_target: false,
        }
    }

    /// Per-card fields, updated as the controller walks the batch.
    pub fn for_card(mut self, index: usize, count: usize, target: CardTransform) -> Self {
        self.stack_index = index;
        self.stack_count = count;
        self.target_transform = target;
        self
    }

    /// Positions between this card and the front of the stack.
    pub fn front_distance(&self) -> usize {
        self.stack_count.saturating_sub(self.stack_index + 1)
    }
}

/// The animation context for cards leaving the deck.
#[derive(Debug, Clone)]
pub struct ExitContext {
    /// Runs logic once every card's exit animation has completed.
    pub trigger: RefCountedTrigger,
    /// Vertical translation that puts a card below the visible stack.
    pub offscreen_translation_y: f32,
}

impl ExitContext {
    /// Create a context around a shared batch trigger.
    pub fn new(trigger: RefCountedTrigger, offscreen_translation_y: f32) -> Self {
        Self {
            trigger,
            offscreen_translation_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn linear_animation_tracks_time() {
        let mut anim = PropertyAnimation::new(0.0, 100.0, ms(100));
        assert_eq!(anim.value(), 0.0);
        assert!((anim.advance(ms(25)) - 25.0).abs() < 1e-3);
        assert!((anim.advance(ms(25)) - 50.0).abs() < 1e-3);
        assert!(!anim.is_finished());
        assert!((anim.advance(ms(50)) - 100.0).abs() < 1e-3);
        assert!(anim.is_finished());
    }

    #[test]
    fn delay_holds_start_value() {
        let mut anim = PropertyAnimation::new(10.0, 20.0, ms(100)).delay(ms(50));
        assert!(anim.is_pending());
        assert_eq!(anim.advance(ms(50)), 10.0);
        assert!(!anim.is_pending());
        assert!((anim.advance(ms(50)) - 15.0).abs() < 1e-3);
        assert!((anim.advance(ms(50)) - 20.0).abs() < 1e-3);
        assert!(anim.is_finished());
    }

    #[test]
    fn overshoot_clamps_at_target() {
        let mut anim = PropertyAnimation::new(0.0, 1.0, ms(10));
        assert_eq!(anim.advance(ms(1000)), 1.0);
        assert!(anim.is_finished());
    }

    #[test]
    fn zero_duration_completes_immediately_after_delay() {
        let mut anim = PropertyAnimation::new(0.0, 5.0, Duration::ZERO).delay(ms(10));
        assert_eq!(anim.advance(ms(9)), 0.0);
        assert!(!anim.is_finished());
        assert_eq!(anim.advance(ms(1)), 5.0);
        assert!(anim.is_finished());
    }

    #[test]
    fn easing_shapes_the_path_not_the_endpoints() {
        let mut eased = PropertyAnimation::new(0.0, 1.0, ms(100)).easing(Easing::Accelerate);
        let mid = eased.advance(ms(50));
        assert!((mid - 0.25).abs() < 1e-3, "accelerate at t=0.5 is 0.25");
        assert_eq!(eased.advance(ms(50)), 1.0);
    }

    #[test]
    fn enter_context_front_distance() {
        let ctx = EnterContext::new(RefCountedTrigger::new()).for_card(0, 3, CardTransform::default());
        assert_eq!(ctx.front_distance(), 2, "rearmost card is farthest from front");
        let ctx = ctx.for_card(2, 3, CardTransform::default());
        assert_eq!(ctx.front_distance(), 0);
    }
}
