#![forbid(unsafe_code)]

//! Headless deck walkthrough.
//!
//! Drives a small card stack through its full lifecycle without a
//! renderer: pick views up from the pool, run the staggered enter batch
//! behind a shared trigger, focus and dismiss a card, then exit. Frame
//! timing comes from a real clock; every state change is logged, so
//! `RUST_LOG=debug cargo run -p deckview-demo` shows the choreography.

use std::time::Duration;

use ahash::AHashMap;
use web_time::Instant;

use deckview_core::{DeckConfig, RefCountedTrigger};
use deckview_widgets::{
    CardEvent, CardTransform, CardView, EnterContext, ExitContext, PoolConsumer, Rgb, ViewPool,
};

const FRAME: Duration = Duration::from_millis(16);
const STACK_HEIGHT: f32 = 720.0;

/// The logical item a card displays.
#[derive(Debug, Clone)]
struct Item {
    title: &'static str,
    accent: Rgb,
}

struct DeckConsumer {
    config: DeckConfig,
    items: AHashMap<u64, Item>,
}

impl PoolConsumer for DeckConsumer {
    type View = CardView<u64>;
    type Key = u64;

    fn create_view(&mut self) -> Self::View {
        CardView::new(self.config.clone())
    }

    fn prepare_to_enter_pool(&mut self, view: &mut Self::View) {
        view.reset();
    }

    fn prepare_to_leave_pool(&mut self, view: &mut Self::View, key: &Self::Key, is_new: bool) {
        view.bind(*key);
        if let Some(item) = self.items.get(key) {
            view.load_content(key, item.title, item.accent);
        }
        view.set_touch_enabled(true);
        tracing::info!(key, is_new, "card left the pool");
    }

    fn has_preferred_data(&self, view: &Self::View, key: &Self::Key) -> bool {
        view.bound_key() == Some(key)
    }
}

/// Stack layout is not the demo's point; spread the cards vertically and
/// derive progress from front order.
fn target_for(index: usize, count: usize) -> CardTransform {
    CardTransform {
        translation_y: (count - 1 - index) as f32 * -40.0,
        translation_z: index as f32 * 4.0,
        progress: (index + 1) as f32 / count as f32,
        visible: true,
        ..CardTransform::default()
    }
}

fn run_until_settled(cards: &mut [CardView<u64>]) -> Vec<CardEvent<u64>> {
    let mut events = Vec::new();
    let mut last = Instant::now();
    while cards.iter().any(CardView::is_animating) {
        let now = Instant::now();
        let dt = now.duration_since(last).max(FRAME);
        last = now;
        for card in cards.iter_mut() {
            events.extend(card.tick(dt));
        }
        std::thread::sleep(FRAME);
    }
    events
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut items = AHashMap::new();
    items.insert(1u64, Item { title: "Inbox", accent: Rgb::new(0x21, 0x96, 0xf3) });
    items.insert(2, Item { title: "Calendar", accent: Rgb::new(0x4c, 0xaf, 0x50) });
    items.insert(3, Item { title: "Terminal", accent: Rgb::new(0x60, 0x7d, 0x8b) });

    // The stock doze delay is tuned for idle users; tighten it so the
    // walkthrough shows the affordance fade without a five second wait.
    let config = match DeckConfig::default()
        .reconfigure()
        .header_doze_delay(Duration::from_millis(600))
        .build()
    {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(%err, "bad deck configuration");
            return;
        }
    };
    let mut pool = ViewPool::new(DeckConsumer {
        config: config.clone(),
        items,
    });

    let keys: Vec<u64> = vec![1, 2, 3];
    let mut cards: Vec<CardView<u64>> = keys
        .iter()
        .map(|key| pool.pick_up_view(Some(key), key))
        .collect();

    // Enter: every card registers with the batch trigger before any of
    // them starts moving, so the callback fires once, after the slowest.
    let trigger = RefCountedTrigger::new()
        .with_first_increment(|| tracing::info!("enter batch started"))
        .with_last_decrement(|| tracing::info!("enter batch complete"));
    let ctx = EnterContext::new(trigger);
    let count = cards.len();
    for (index, card) in cards.iter_mut().enumerate() {
        card.prepare_enter_animation(STACK_HEIGHT);
        let ctx = ctx.clone().for_card(index, count, target_for(index, count));
        card.start_enter_animation(&ctx);
    }
    run_until_settled(&mut cards);

    // Focus the front card and let its header react.
    if let Some(front) = cards.last_mut() {
        front.set_focused(true);
        front.start_doze_countdown();
    }
    run_until_settled(&mut cards);

    // Dismiss the middle card through the header affordance.
    cards[1].press_dismiss_button();
    for event in run_until_settled(&mut cards) {
        match event {
            CardEvent::Dismissed(key) => {
                tracing::info!(key, "card dismissed, returning its view");
                let view = cards.remove(1);
                pool.return_view(view);
            }
            CardEvent::ClipChanged { clip } => tracing::debug!(clip, "clip state changed"),
            CardEvent::FocusChanged { focused } => tracing::debug!(focused, "focus changed"),
            CardEvent::Clicked(key) => tracing::info!(key, "card pressed"),
        }
    }

    // Exit: remaining cards slide offscreen behind a second trigger, then
    // everything goes back to the pool for the next session.
    let trigger = RefCountedTrigger::new()
        .with_last_decrement(|| tracing::info!("exit batch complete"));
    let exit = ExitContext::new(trigger, STACK_HEIGHT);
    for card in cards.iter_mut() {
        card.start_exit_animation(&exit);
    }
    run_until_settled(&mut cards);

    for view in cards.drain(..) {
        pool.return_view(view);
    }
    tracing::info!(pooled = pool.len(), "session over");
}
