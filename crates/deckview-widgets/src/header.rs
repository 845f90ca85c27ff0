#![forbid(unsafe_code)]

//! Per-card header bar state.
//!
//! The header carries the card's title and accent color, an animated focus
//! highlight, and the "no user interaction" doze behavior that fades the
//! dismiss affordance in once the user has ignored the stack for a while.
//! Like the rest of the crate this holds no drawing code; renderers read
//! [`CardHeader::highlight`] and [`CardHeader::dismiss_alpha`] each frame.

use std::time::Duration;

use deckview_core::easing::Easing;

use crate::animation::PropertyAnimation;

/// Ramp time for the focus highlight.
const FOCUS_HIGHLIGHT_DURATION: Duration = Duration::from_millis(150);
/// Fade time for the dismiss affordance when dozing kicks in.
const DISMISS_FADE_DURATION: Duration = Duration::from_millis(200);

/// A packed 8-bit RGB accent color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Construct from components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Header bar of a single card.
#[derive(Debug, Default)]
pub struct CardHeader {
    title: Option<String>,
    color: Rgb,
    focused: bool,
    highlight: f32,
    highlight_anim: Option<PropertyAnimation>,
    dismiss_alpha: f32,
    dismiss_anim: Option<PropertyAnimation>,
    no_user_interaction: bool,
}

impl CardHeader {
    /// Bind the header to item content.
    pub fn rebind(&mut self, title: impl Into<String>, color: Rgb) {
        self.title = Some(title.into());
        self.color = color;
    }

    /// Drop the bound content.
    pub fn unbind(&mut self) {
        self.title = None;
    }

    /// Whether content is currently bound.
    pub fn is_bound(&self) -> bool {
        self.title.is_some()
    }

    /// The bound title, if any.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The bound accent color.
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Focus highlight intensity in `[0, 1]`.
    pub fn highlight(&self) -> f32 {
        self.highlight
    }

    /// Opacity of the dismiss affordance in `[0, 1]`.
    pub fn dismiss_alpha(&self) -> f32 {
        self.dismiss_alpha
    }

    /// React to the owning card gaining or losing focus.
    ///
    /// Animated changes ramp the highlight; non-animated ones snap it
    /// (used when restoring state after a configuration change).
    pub fn on_focus_changed(&mut self, focused: bool, animate: bool) {
        self.focused = focused;
        let target = if focused { 1.0 } else { 0.0 };
        if animate {
            // Single flight: replace any in-progress ramp.
            self.highlight_anim = Some(
                PropertyAnimation::new(self.highlight, target, FOCUS_HIGHLIGHT_DURATION)
                    .easing(Easing::FastOutSlowIn),
            );
        } else {
            self.highlight_anim = None;
            self.highlight = target;
        }
    }

    /// Whether the owning card is focused.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Fade the dismiss affordance in (doze timeout elapsed).
    pub fn start_no_user_interaction_animation(&mut self) {
        if self.no_user_interaction {
            return;
        }
        self.no_user_interaction = true;
        self.dismiss_anim = Some(PropertyAnimation::new(
            self.dismiss_alpha,
            1.0,
            DISMISS_FADE_DURATION,
        ));
    }

    /// Show the dismiss affordance immediately, without animating.
    pub fn set_no_user_interaction_state(&mut self) {
        self.no_user_interaction = true;
        self.dismiss_anim = None;
        self.dismiss_alpha = 1.0;
    }

    /// Hide the dismiss affordance and rearm the doze behavior.
    pub fn reset_no_user_interaction_state(&mut self) {
        self.no_user_interaction = false;
        self.dismiss_anim = None;
        self.dismiss_alpha = 0.0;
    }

    /// Whether the doze timeout has already fired.
    pub fn in_no_user_interaction_state(&self) -> bool {
        self.no_user_interaction
    }

    /// Whether a highlight or dismiss-affordance animation is running.
    pub fn is_animating(&self) -> bool {
        self.highlight_anim.is_some() || self.dismiss_anim.is_some()
    }

    /// Advance the header's animations.
    pub fn tick(&mut self, dt: Duration) {
        if let Some(anim) = &mut self.highlight_anim {
            self.highlight = anim.advance(dt);
            if anim.is_finished() {
                self.highlight_anim = None;
            }
        }
        if let Some(anim) = &mut self.dismiss_anim {
            self.dismiss_alpha = anim.advance(dt);
            if anim.is_finished() {
                self.dismiss_anim = None;
            }
        }
    }

    /// Reset everything for pool reuse.
    pub fn reset(&mut self) {
        self.title = None;
        self.color = Rgb::default();
        self.focused = false;
        self.highlight = 0.0;
        self.highlight_anim = None;
        self.reset_no_user_interaction_state();
    }
}
