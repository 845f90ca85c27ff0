#![forbid(unsafe_code)]

//! Card-stack widgets: the recyclable card view, its header, the view
//! pool that recycles them, and the animation contexts that coordinate
//! batched enter/exit transitions.
//!
//! The crate is renderer-agnostic. A [`CardView`] owns animatable
//! properties and interaction state, not pixels; hosts read the
//! [`CardTransform`] and [`CardHeader`] each frame and draw however they
//! like. All time is injected through `tick`, so a host with a real frame
//! clock and a test with synthetic steps drive the exact same code.
//!
//! Typical wiring:
//!
//! ```
//! use deckview_core::{DeckConfig, RefCountedTrigger};
//! use deckview_widgets::{CardTransform, CardView, EnterContext};
//!
//! let config = DeckConfig::default();
//! let trigger = RefCountedTrigger::new()
//!     .with_last_decrement(|| tracing::debug!("enter batch done"));
//!
//! let mut card: CardView<u64> = CardView::new(config);
//! card.bind(42);
//! card.prepare_enter_animation(800.0);
//!
//! let target = CardTransform { visible: true, ..CardTransform::default() };
//! let ctx = EnterContext::new(trigger).for_card(0, 1, target);
//! card.start_enter_animation(&ctx);
//!
//! let mut events = Vec::new();
//! while card.is_animating() {
//!     events.extend(card.tick(std::time::Duration::from_millis(16)));
//! }
//! ```

pub mod animation;
pub mod card;
pub mod header;
pub mod pool;
pub mod transform;

pub use animation::{EnterContext, ExitContext, PropertyAnimation};
pub use card::{CardEvent, CardState, CardView};
pub use header::{CardHeader, Rgb};
pub use pool::{PoolConsumer, ViewPool};
pub use transform::CardTransform;
