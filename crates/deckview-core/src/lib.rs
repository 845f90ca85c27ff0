#![forbid(unsafe_code)]

//! Platform-independent primitives for the DeckView card stack.
//!
//! This crate carries no rendering and no host-platform types. It provides:
//!
//! - [`RefCountedTrigger`]: a count-based completion aggregator used to
//!   detect "all animations in this batch finished".
//! - [`Easing`]: the fixed set of curves deck animations use.
//! - [`TimerQueue`]: deterministic delayed one-shot payloads over a logical
//!   clock, standing in for the host's posted runnables.
//! - [`DeckConfig`]: an immutable configuration snapshot, built and passed
//!   explicitly (no global instance).
//!
//! Everything here assumes a single logical control thread; no locks are
//! taken anywhere, and the trigger is deliberately not `Send`.

pub mod config;
pub mod easing;
pub mod timer;
pub mod trigger;

pub use config::{ConfigError, DeckConfig, DeckConfigBuilder};
pub use easing::Easing;
pub use timer::{TimerId, TimerQueue};
pub use trigger::RefCountedTrigger;
