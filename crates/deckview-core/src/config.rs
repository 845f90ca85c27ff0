#![forbid(unsafe_code)]

//! Deck configuration snapshots.
//!
//! `DeckConfig` is an explicitly constructed, immutable value handed to each
//! component at construction time — there is no global instance. Changing
//! configuration means building a new snapshot (see
//! [`DeckConfig::reconfigure`]) and handing it to newly constructed parts;
//! live parts keep the snapshot they were built with.
//!
//! # Invariants
//!
//! - `max_dim` and `overscroll_pct` are in `[0, 1]`.
//! - `min_overscroll_range <= max_overscroll_range`.
//! - `dismiss_translation` is finite and positive.
//!
//! The builder enforces these; a `DeckConfig` value is always valid.

use std::time::Duration;

use thiserror::Error;

use crate::easing::Easing;

/// Validation failure from [`DeckConfigBuilder::build`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// `max_dim` outside `[0, 1]`.
    #[error("max_dim must be within [0, 1], got {0}")]
    DimOutOfRange(f32),
    /// `overscroll_pct` outside `[0, 1]`.
    #[error("overscroll_pct must be within [0, 1], got {0}")]
    OverscrollPctOutOfRange(f32),
    /// Overscroll range bounds inverted.
    #[error("overscroll range inverted: min {min} > max {max}")]
    OverscrollRangeInverted {
        /// Configured minimum overscroll distance.
        min: f32,
        /// Configured maximum overscroll distance.
        max: f32,
    },
    /// `dismiss_translation` not a positive finite distance.
    #[error("dismiss_translation must be finite and positive, got {0}")]
    BadDismissTranslation(f32),
}

/// Immutable deck configuration snapshot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeckConfig {
    /// Base duration of a card's enter animation.
    pub enter_duration: Duration,
    /// Extra start delay (and duration) per position away from the front.
    pub enter_stagger_delay: Duration,
    /// Delay before the first enter animation of a batch starts.
    pub enter_transition_delay: Duration,
    /// Duration of a card's exit-offscreen animation.
    pub exit_duration: Duration,
    /// Duration of the dismiss slide-out.
    pub dismiss_duration: Duration,
    /// Horizontal distance a dismissed card travels (display width).
    pub dismiss_translation: f32,
    /// Duration of a programmatic stack scroll.
    pub scroll_duration: Duration,
    /// Peak dim intensity applied to the rearmost card, in `[0, 1]`.
    pub max_dim: f32,
    /// Fraction of the stack height usable as overscroll.
    pub overscroll_pct: f32,
    /// Lower clamp for the overscroll distance.
    pub min_overscroll_range: f32,
    /// Upper clamp for the overscroll distance.
    pub max_overscroll_range: f32,
    /// Idle time before a card header's dismiss affordance fades in.
    pub header_doze_delay: Duration,
    /// Delay between a dismiss-button press and the dismissal, leaving room
    /// for touch feedback.
    pub touch_feedback_delay: Duration,
    /// Curve for enter/transform animations.
    pub enter_easing: Easing,
    /// Curve for exit-offscreen animations.
    pub exit_easing: Easing,
    /// Curve deriving dim intensity from progress.
    pub dim_easing: Easing,
    /// Curve for the dismiss slide-out.
    pub dismiss_easing: Easing,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            enter_duration: Duration::from_millis(275),
            enter_stagger_delay: Duration::from_millis(12),
            enter_transition_delay: Duration::from_millis(150),
            exit_duration: Duration::from_millis(225),
            dismiss_duration: Duration::from_millis(100),
            dismiss_translation: 480.0,
            scroll_duration: Duration::from_millis(225),
            max_dim: 0.3,
            overscroll_pct: 0.075,
            min_overscroll_range: 32.0,
            max_overscroll_range: 128.0,
            header_doze_delay: Duration::from_secs(5),
            touch_feedback_delay: Duration::from_millis(125),
            enter_easing: Easing::FastOutSlowIn,
            exit_easing: Easing::FastOutLinearIn,
            dim_easing: Easing::Accelerate,
            dismiss_easing: Easing::Linear,
        }
    }
}

impl DeckConfig {
    /// Start building a config from the defaults.
    pub fn builder() -> DeckConfigBuilder {
        DeckConfigBuilder::default()
    }

    /// Derive a changed snapshot: seed a builder with this config's values.
    ///
    /// ```
    /// # use deckview_core::config::DeckConfig;
    /// # use std::time::Duration;
    /// let base = DeckConfig::default();
    /// let quick = base
    ///     .reconfigure()
    ///     .enter_duration(Duration::from_millis(120))
    ///     .build()
    ///     .unwrap();
    /// assert_ne!(base, quick);
    /// ```
    pub fn reconfigure(&self) -> DeckConfigBuilder {
        DeckConfigBuilder {
            config: self.clone(),
        }
    }

    /// Clamp an overscroll distance to the configured range.
    pub fn clamp_overscroll(&self, distance: f32) -> f32 {
        distance.clamp(self.min_overscroll_range, self.max_overscroll_range)
    }
}

/// Builder for [`DeckConfig`] with range validation.
#[derive(Debug, Clone, Default)]
pub struct DeckConfigBuilder {
    config: DeckConfig,
}

macro_rules! setter {
    ($(#[$doc:meta])* $name:ident: $ty:ty) => {
        $(#[$doc])*
        #[must_use]
        pub fn $name(mut self, value: $ty) -> Self {
            self.config.$name = value;
            self
        }
    };
}

impl DeckConfigBuilder {
    setter!(/// Base duration of a card's enter animation.
        enter_duration: Duration);
    setter!(/// Per-position stagger delay for enter animations.
        enter_stagger_delay: Duration);
    setter!(/// Delay before the first enter animation of a batch.
        enter_transition_delay: Duration);
    setter!(/// Duration of a card's exit-offscreen animation.
        exit_duration: Duration);
    setter!(/// Duration of the dismiss slide-out.
        dismiss_duration: Duration);
    setter!(/// Horizontal distance a dismissed card travels.
        dismiss_translation: f32);
    setter!(/// Duration of a programmatic stack scroll.
        scroll_duration: Duration);
    setter!(/// Peak dim intensity in `[0, 1]`.
        max_dim: f32);
    setter!(/// Fraction of the stack height usable as overscroll.
        overscroll_pct: f32);
    setter!(/// Lower clamp for the overscroll distance.
        min_overscroll_range: f32);
    setter!(/// Upper clamp for the overscroll distance.
        max_overscroll_range: f32);
    setter!(/// Idle time before the header dismiss affordance fades in.
        header_doze_delay: Duration);
    setter!(/// Delay between dismiss press and dismissal.
        touch_feedback_delay: Duration);
    setter!(/// Curve for enter/transform animations.
        enter_easing: Easing);
    setter!(/// Curve for exit-offscreen animations.
        exit_easing: Easing);
    setter!(/// Curve deriving dim intensity from progress.
        dim_easing: Easing);
    setter!(/// Curve for the dismiss slide-out.
        dismiss_easing: Easing);

    /// Validate and produce the snapshot.
    pub fn build(self) -> Result<DeckConfig, ConfigError> {
        let config = self.config;
        if !(0.0..=1.0).contains(&config.max_dim) {
            return Err(ConfigError::DimOutOfRange(config.max_dim));
        }
        if !(0.0..=1.0).contains(&config.overscroll_pct) {
            return Err(ConfigError::OverscrollPctOutOfRange(config.overscroll_pct));
        }
        if config.min_overscroll_range > config.max_overscroll_range {
            return Err(ConfigError::OverscrollRangeInverted {
                min: config.min_overscroll_range,
                max: config.max_overscroll_range,
            });
        }
        if !config.dismiss_translation.is_finite() || config.dismiss_translation <= 0.0 {
            return Err(ConfigError::BadDismissTranslation(config.dismiss_translation));
        }
        Ok(config)
    }
}
