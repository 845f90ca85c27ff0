#![forbid(unsafe_code)]

//! The recyclable card view.
//!
//! A [`CardView`] is the expensive visual unit the pool recycles. It binds
//! to a logical item key, runs the enter/exit/dismiss/focus animations, and
//! derives its dim intensity from the animated stack progress. All time
//! passes through [`CardView::tick`]; everything the controller must react
//! to comes back as [`CardEvent`]s from that call.
//!
//! # Invariants
//!
//! - Single flight per property: starting an animation on a property drops
//!   any in-flight animation on it without running its completion.
//!   A dropped flight that carried a pending batch-trigger decrement
//!   releases that decrement immediately, so batch triggers stay balanced
//!   and never wedge on supersession.
//! - Dim is a pure function of progress (`max_dim * ease(1 - p)`); it is
//!   re-derived on every progress change and never stored independently.
//! - Operations that need a bound key are silent no-ops when the view is
//!   unbound or handed a stale key (benign unbind race, not an error).
//!
//! # Failure Modes
//!
//! - A batch trigger whose animation never completes (e.g. the view is
//!   leaked without ticking) wedges that batch's completion callback. Not
//!   defended against.

use std::time::Duration;

use bitflags::bitflags;
use deckview_core::config::DeckConfig;
use deckview_core::timer::TimerQueue;
use deckview_core::trigger::RefCountedTrigger;

use crate::animation::{EnterContext, ExitContext, PropertyAnimation};
use crate::header::{CardHeader, Rgb};
use crate::transform::CardTransform;

bitflags! {
    /// Interaction state bits for a card view.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CardState: u8 {
        /// Explicitly focused (tracked separately from host focus).
        const FOCUSED = 1 << 0;
        /// Focus animations are allowed (enabled after the enter transition).
        const FOCUS_ANIMATIONS_ENABLED = 1 << 1;
        /// The card participates in inter-card clipping.
        const CLIP_IN_STACK = 1 << 2;
        /// Presses are accepted.
        const TOUCH_ENABLED = 1 << 3;
    }
}

/// Notifications surfaced to the stack controller from [`CardView::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardEvent<K> {
    /// The card body was pressed.
    Clicked(K),
    /// The dismiss animation finished; remove the item.
    Dismissed(K),
    /// The clip-in-stack state changed; neighbors must re-clip.
    ClipChanged {
        /// New clip state.
        clip: bool,
    },
    /// Explicit focus changed.
    FocusChanged {
        /// New focus state.
        focused: bool,
    },
}

/// Delayed one-shot actions a card posts against its own timer queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingAction {
    EnableFocusAnimations,
    DismissPressed,
    HeaderDoze,
}

/// What completing a flight means, beyond landing on its final value.
enum FlightEnd {
    /// Decrement the batch trigger this flight registered with.
    DecrementTrigger(RefCountedTrigger),
    /// Restore clip/touch state and emit `Dismissed`.
    FinishDismiss,
}

/// One in-flight property animation plus its completion meaning.
struct Flight {
    anim: PropertyAnimation,
    on_end: Option<FlightEnd>,
}

impl Flight {
    fn plain(anim: PropertyAnimation) -> Self {
        Self { anim, on_end: None }
    }
}

/// A recyclable card in the deck.
pub struct CardView<K: Clone + PartialEq> {
    config: DeckConfig,
    key: Option<K>,
    header: CardHeader,
    transform: CardTransform,
    dim: f32,
    state: CardState,
    translation_x_flight: Option<Flight>,
    translation_y_flight: Option<Flight>,
    scale_flight: Option<Flight>,
    alpha_flight: Option<Flight>,
    progress_flight: Option<Flight>,
    timers: TimerQueue<PendingAction>,
    events: Vec<CardEvent<K>>,
}

impl<K: Clone + PartialEq> CardView<K> {
    /// Construct an unbound card with the given configuration snapshot.
    pub fn new(config: DeckConfig) -> Self {
        let mut view = Self {
            config,
            key: None,
            header: CardHeader::default(),
            transform: CardTransform::default(),
            dim: 0.0,
            state: CardState::CLIP_IN_STACK,
            translation_x_flight: None,
            translation_y_flight: None,
            scale_flight: None,
            alpha_flight: None,
            progress_flight: None,
            timers: TimerQueue::new(),
            events: Vec::new(),
        };
        view.set_progress(view.transform.progress);
        view
    }

    // --- Binding ---

    /// Bind this card to a logical item.
    pub fn bind(&mut self, key: K) {
        self.key = Some(key);
    }

    /// Drop the binding. Late content callbacks become no-ops.
    pub fn unbind(&mut self) {
        self.key = None;
    }

    /// The currently bound key, if any.
    pub fn bound_key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// Deliver loaded item content. Ignored unless `key` matches the
    /// current binding (a late callback racing an unbind is benign).
    pub fn load_content(&mut self, key: &K, title: impl Into<String>, color: Rgb) {
        if self.key.as_ref() != Some(key) {
            tracing::trace!("dropping content for a stale or unbound key");
            return;
        }
        self.header.rebind(title, color);
    }

    /// Drop loaded item content from the header.
    pub fn unload_content(&mut self) {
        self.header.unbind();
    }

    // --- Transform / progress ---

    /// The card's current transform values.
    pub fn transform(&self) -> &CardTransform {
        &self.transform
    }

    /// Normalized stack progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.transform.progress
    }

    /// Current dim intensity, derived from progress.
    pub fn dim(&self) -> f32 {
        self.dim
    }

    /// Header state (highlight, dismiss affordance, content).
    pub fn header(&self) -> &CardHeader {
        &self.header
    }

    /// Synchronize this card's properties with a target transform.
    ///
    /// With a zero duration every property snaps and all in-flight
    /// animations are dropped. Otherwise each differing property starts a
    /// flight with the configured enter easing; the progress animation is
    /// single-flight, so a superseded progress run never completes.
    pub fn apply_transform(&mut self, target: &CardTransform, duration: Duration) {
        if duration.is_zero() {
            self.cancel_animations();
            self.transform = *target;
            self.set_progress(target.progress);
            return;
        }

        self.transform.visible = target.visible;
        // Depth is not animated; it only feeds shadow rendering.
        self.transform.translation_z = target.translation_z;

        let easing = self.config.enter_easing;
        if (self.transform.translation_x - target.translation_x).abs() > f32::EPSILON {
            Self::replace_flight(
                &mut self.translation_x_flight,
                Flight::plain(
                    PropertyAnimation::new(self.transform.translation_x, target.translation_x, duration)
                        .easing(easing),
                ),
            );
        }
        if (self.transform.translation_y - target.translation_y).abs() > f32::EPSILON {
            Self::replace_flight(
                &mut self.translation_y_flight,
                Flight::plain(
                    PropertyAnimation::new(self.transform.translation_y, target.translation_y, duration)
                        .easing(easing),
                ),
            );
        }
        if (self.transform.scale - target.scale).abs() > f32::EPSILON {
            Self::replace_flight(
                &mut self.scale_flight,
                Flight::plain(
                    PropertyAnimation::new(self.transform.scale, target.scale, duration).easing(easing),
                ),
            );
        }
        if (self.transform.alpha - target.alpha).abs() > f32::EPSILON {
            Self::replace_flight(
                &mut self.alpha_flight,
                Flight::plain(
                    PropertyAnimation::new(self.transform.alpha, target.alpha, duration).easing(easing),
                ),
            );
        }
        self.progress_flight = Some(Flight::plain(
            PropertyAnimation::new(self.transform.progress, target.progress, duration).easing(easing),
        ));
    }

    // --- Enter / exit / dismiss ---

    /// Place the card for the enter animation: offscreen below the stack,
    /// unscaled, with dim re-derived from the current progress.
    pub fn prepare_enter_animation(&mut self, offscreen_y: f32) {
        self.transform.translation_y = offscreen_y;
        self.transform.scale = 1.0;
        self.set_progress(self.transform.progress);
    }

    /// Animate the card up into the deck.
    ///
    /// The start delay and duration both grow with the card's distance from
    /// the front of the stack, producing the cascading stagger. The batch
    /// trigger is incremented before the flight starts and decremented when
    /// it completes.
    pub fn start_enter_animation(&mut self, ctx: &EnterContext) {
        let front = ctx.front_distance() as u32;
        let delay = self.config.enter_transition_delay + self.config.enter_stagger_delay * front;
        let duration = self.config.enter_duration + self.config.enter_stagger_delay * front;
        let target = ctx.target_transform;

        self.transform.scale = target.scale;
        self.transform.visible = true;

        ctx.trigger.increment();
        Self::replace_flight(
            &mut self.translation_y_flight,
            Flight {
                anim: PropertyAnimation::new(
                    self.transform.translation_y,
                    target.translation_y,
                    duration,
                )
                .delay(delay)
                .easing(self.config.enter_easing),
                on_end: Some(FlightEnd::DecrementTrigger(ctx.trigger.clone())),
            },
        );

        // Keep focus animations out of the window transition.
        self.timers.schedule(delay, PendingAction::EnableFocusAnimations);
        tracing::debug!(front_distance = front, ?delay, ?duration, "enter animation started");
    }

    /// Animate the card down off the bottom of the stack.
    pub fn start_exit_animation(&mut self, ctx: &ExitContext) {
        ctx.trigger.increment();
        Self::replace_flight(
            &mut self.translation_y_flight,
            Flight {
                anim: PropertyAnimation::new(
                    self.transform.translation_y,
                    ctx.offscreen_translation_y,
                    self.config.exit_duration,
                )
                .easing(self.config.exit_easing),
                on_end: Some(FlightEnd::DecrementTrigger(ctx.trigger.clone())),
            },
        );
        tracing::debug!("exit animation started");
    }

    /// Slide the card off sideways and emit [`CardEvent::Dismissed`] when it
    /// lands. Clipping is unreliable mid-flight, so it is disabled for the
    /// duration and restored on completion.
    pub fn dismiss(&mut self) {
        if self.is_dismissing() {
            return;
        }
        self.set_clip_in_stack(false);
        self.set_touch_enabled(false);
        Self::replace_flight(
            &mut self.translation_x_flight,
            Flight {
                anim: PropertyAnimation::new(
                    self.transform.translation_x,
                    self.transform.translation_x + self.config.dismiss_translation,
                    self.config.dismiss_duration,
                )
                .easing(self.config.dismiss_easing),
                on_end: Some(FlightEnd::FinishDismiss),
            },
        );
        tracing::debug!("dismiss animation started");
    }

    /// Whether a dismiss flight is currently running.
    pub fn is_dismissing(&self) -> bool {
        matches!(
            self.translation_x_flight,
            Some(Flight {
                on_end: Some(FlightEnd::FinishDismiss),
                ..
            })
        )
    }

    /// A press on the header's dismiss affordance. The dismissal itself is
    /// posted after the touch-feedback delay so pressed feedback can draw.
    pub fn press_dismiss_button(&mut self) {
        if !self.state.contains(CardState::TOUCH_ENABLED) {
            return;
        }
        self.timers
            .schedule(self.config.touch_feedback_delay, PendingAction::DismissPressed);
    }

    /// A press on the card body.
    pub fn press(&mut self) {
        if !self.state.contains(CardState::TOUCH_ENABLED) {
            return;
        }
        if let Some(key) = self.key.clone() {
            self.events.push(CardEvent::Clicked(key));
        }
    }

    // --- Focus ---

    /// Explicitly focus this card.
    ///
    /// The explicit flag is tracked independently of host focus so focus
    /// survives touch interactions; the header only animates once focus
    /// animations are enabled (after the enter transition).
    pub fn set_focused(&mut self, animate: bool) {
        self.state.insert(CardState::FOCUSED);
        if self.state.contains(CardState::FOCUS_ANIMATIONS_ENABLED) {
            self.header.on_focus_changed(true, animate);
        }
        self.events.push(CardEvent::FocusChanged { focused: true });
    }

    /// Explicitly unfocus this card.
    pub fn unset_focused(&mut self) {
        self.state.remove(CardState::FOCUSED);
        if self.state.contains(CardState::FOCUS_ANIMATIONS_ENABLED) {
            self.header.on_focus_changed(false, true);
        }
        self.events.push(CardEvent::FocusChanged { focused: false });
    }

    /// Whether this card is explicitly focused.
    pub fn is_focused(&self) -> bool {
        self.state.contains(CardState::FOCUSED)
    }

    fn enable_focus_animations(&mut self) {
        let was_enabled = self.state.contains(CardState::FOCUS_ANIMATIONS_ENABLED);
        self.state.insert(CardState::FOCUS_ANIMATIONS_ENABLED);
        if !was_enabled && self.state.contains(CardState::FOCUSED) {
            // Re-notify the header for focus gained before animations were on.
            self.header.on_focus_changed(true, true);
        }
    }

    // --- Clip / touch ---

    /// Set whether this card clips (and is clipped by) its neighbors.
    pub fn set_clip_in_stack(&mut self, clip: bool) {
        if clip == self.state.contains(CardState::CLIP_IN_STACK) {
            return;
        }
        self.state.set(CardState::CLIP_IN_STACK, clip);
        self.events.push(CardEvent::ClipChanged { clip });
    }

    /// Whether neighbors should clip against this card right now.
    pub fn should_clip_in_stack(&self) -> bool {
        self.state.contains(CardState::CLIP_IN_STACK) && self.transform.visible
    }

    /// Enable or disable press handling.
    pub fn set_touch_enabled(&mut self, enabled: bool) {
        self.state.set(CardState::TOUCH_ENABLED, enabled);
    }

    /// Current interaction state bits.
    pub fn state(&self) -> CardState {
        self.state
    }

    // --- Doze ---

    /// Arm the header doze countdown: after the configured idle delay the
    /// dismiss affordance fades in.
    pub fn start_doze_countdown(&mut self) {
        self.timers
            .schedule(self.config.header_doze_delay, PendingAction::HeaderDoze);
    }

    // --- Ticking ---

    /// Advance all animations and pending actions by `dt` and return the
    /// events that occurred. Deterministic for a given dt sequence.
    pub fn tick(&mut self, dt: Duration) -> Vec<CardEvent<K>> {
        for action in self.timers.advance(dt) {
            match action {
                PendingAction::EnableFocusAnimations => self.enable_focus_animations(),
                PendingAction::DismissPressed => self.dismiss(),
                PendingAction::HeaderDoze => self.header.start_no_user_interaction_animation(),
            }
        }
        self.header.tick(dt);

        if let Some(flight) = &mut self.translation_x_flight {
            self.transform.translation_x = flight.anim.advance(dt);
            if flight.anim.is_finished() {
                let flight = self.translation_x_flight.take();
                self.complete_flight(flight);
            }
        }
        if let Some(flight) = &mut self.translation_y_flight {
            self.transform.translation_y = flight.anim.advance(dt);
            if flight.anim.is_finished() {
                let flight = self.translation_y_flight.take();
                self.complete_flight(flight);
            }
        }
        if let Some(flight) = &mut self.scale_flight {
            self.transform.scale = flight.anim.advance(dt);
            if flight.anim.is_finished() {
                self.scale_flight = None;
            }
        }
        if let Some(flight) = &mut self.alpha_flight {
            self.transform.alpha = flight.anim.advance(dt);
            if flight.anim.is_finished() {
                self.alpha_flight = None;
            }
        }
        if let Some(flight) = &mut self.progress_flight {
            let value = flight.anim.advance(dt);
            let finished = flight.anim.is_finished();
            self.set_progress(value);
            if finished {
                self.progress_flight = None;
            }
        }

        std::mem::take(&mut self.events)
    }

    /// Whether any property animation or pending action is outstanding.
    pub fn is_animating(&self) -> bool {
        self.translation_x_flight.is_some()
            || self.translation_y_flight.is_some()
            || self.scale_flight.is_some()
            || self.alpha_flight.is_some()
            || self.progress_flight.is_some()
            || self.header.is_animating()
            || !self.timers.is_empty()
    }

    // --- Reuse ---

    /// Reset all view properties for pool reuse. The key binding is left in
    /// place (content affinity is what makes pooled reuse cheap); callers
    /// unbind explicitly when an item is removed for good.
    pub fn reset(&mut self) {
        self.cancel_animations();
        self.timers.clear();
        self.events.clear();
        self.transform = CardTransform::default();
        self.set_progress(self.transform.progress);
        self.state = CardState::empty();
        self.header.reset();
    }

    // --- Internals ---

    fn set_progress(&mut self, progress: f32) {
        self.transform.progress = progress;
        self.dim = self.config.max_dim * self.config.dim_easing.apply(1.0 - progress);
    }

    /// Install a new flight on a slot, dropping any superseded one without
    /// its completion. A superseded batch-trigger decrement is released so
    /// the batch stays balanced; everything else is suppressed outright.
    fn replace_flight(slot: &mut Option<Flight>, flight: Flight) {
        Self::release_flight(slot.replace(flight));
    }

    fn release_flight(old: Option<Flight>) {
        if let Some(Flight {
            on_end: Some(FlightEnd::DecrementTrigger(trigger)),
            ..
        }) = old
        {
            trigger.decrement();
        }
    }

    fn cancel_animations(&mut self) {
        Self::release_flight(self.translation_x_flight.take());
        Self::release_flight(self.translation_y_flight.take());
        self.scale_flight = None;
        self.alpha_flight = None;
        self.progress_flight = None;
    }

    fn complete_flight(&mut self, flight: Option<Flight>) {
        let Some(flight) = flight else { return };
        match flight.on_end {
            Some(FlightEnd::DecrementTrigger(trigger)) => trigger.decrement(),
            Some(FlightEnd::FinishDismiss) => {
                self.set_clip_in_stack(true);
                self.set_touch_enabled(true);
                if let Some(key) = self.key.clone() {
                    self.events.push(CardEvent::Dismissed(key));
                }
            }
            None => {}
        }
    }
}

impl<K: Clone + PartialEq + std::fmt::Debug> std::fmt::Debug for CardView<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardView")
            .field("key", &self.key)
            .field("state", &self.state)
            .field("transform", &self.transform)
            .field("dim", &self.dim)
            .field("animating", &self.is_animating())
            .finish_non_exhaustive()
    }
}
