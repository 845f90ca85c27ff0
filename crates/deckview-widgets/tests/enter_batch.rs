//! End-to-end coordination tests: a batch of cards entering the deck
//! behind one shared trigger, and a header-press-driven dismissal.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use deckview_core::{DeckConfig, RefCountedTrigger};
use deckview_widgets::{CardEvent, CardTransform, CardView, EnterContext};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn test_config() -> DeckConfig {
    DeckConfig::builder()
        .enter_duration(ms(100))
        .enter_stagger_delay(ms(20))
        .enter_transition_delay(ms(40))
        .dismiss_duration(ms(50))
        .dismiss_translation(400.0)
        .touch_feedback_delay(ms(10))
        .build()
        .expect("valid test config")
}

fn target_for(index: usize) -> CardTransform {
    CardTransform {
        translation_y: index as f32 * 24.0,
        progress: (index as f32 + 1.0) / 3.0,
        visible: true,
        ..CardTransform::default()
    }
}

#[test]
fn enter_batch_completes_exactly_once_after_the_slowest_card() {
    let config = test_config();
    let batch_done = Rc::new(Cell::new(0u32));
    let started = Rc::new(Cell::new(false));

    let trigger = {
        let started = Rc::clone(&started);
        let batch_done = Rc::clone(&batch_done);
        RefCountedTrigger::new()
            .with_first_increment(move || started.set(true))
            .with_last_decrement(move || batch_done.set(batch_done.get() + 1))
    };

    let mut cards: Vec<CardView<usize>> = (0..3)
        .map(|key| {
            let mut card = CardView::new(config.clone());
            card.bind(key);
            card.prepare_enter_animation(600.0);
            card
        })
        .collect();

    let ctx = EnterContext::new(trigger.clone());
    for (index, card) in cards.iter_mut().enumerate() {
        let ctx = ctx.clone().for_card(index, 3, target_for(index));
        card.start_enter_animation(&ctx);
    }

    // All three cards registered before any of them finished.
    assert!(started.get());
    assert_eq!(trigger.count(), 3);
    assert_eq!(batch_done.get(), 0);

    // Rearmost card has front distance 2: its flight spans
    // 40 + 2*20 delay plus 100 + 2*20 duration = 220ms total.
    let mut elapsed = Duration::ZERO;
    while cards.iter().any(CardView::is_animating) {
        for card in &mut cards {
            card.tick(ms(10));
        }
        elapsed += ms(10);
        if batch_done.get() == 0 {
            assert!(trigger.count() > 0, "count stays positive until the last card lands");
        }
        assert!(elapsed <= ms(1000), "batch must settle");
    }

    assert_eq!(batch_done.get(), 1, "batch callback fires exactly once");
    assert_eq!(trigger.count(), 0);
    assert!(elapsed >= ms(220), "callback waits for the slowest (rearmost) card");

    for (index, card) in cards.iter().enumerate() {
        let target = target_for(index);
        assert!((card.transform().translation_y - target.translation_y).abs() < 1e-3);
    }
}

#[test]
fn header_press_dismisses_after_feedback_delay() {
    let config = test_config();
    let mut card: CardView<u64> = CardView::new(config);
    card.bind(99);
    card.load_content(&99, "mail", deckview_widgets::Rgb::new(0x21, 0x96, 0xf3));
    card.apply_transform(
        &CardTransform {
            visible: true,
            progress: 1.0,
            ..CardTransform::default()
        },
        Duration::ZERO,
    );
    card.set_touch_enabled(true);

    card.press_dismiss_button();
    assert!(!card.is_dismissing(), "dismissal waits on the touch feedback delay");

    let mut events = Vec::new();
    while card.is_animating() {
        events.extend(card.tick(ms(5)));
    }

    assert!(events.contains(&CardEvent::Dismissed(99)));
    assert!(
        card.transform().translation_x >= 400.0 - 1e-3,
        "card slid off by the dismiss translation"
    );
    // Second press on the recycled view after reset must start clean.
    card.reset();
    assert!(!card.is_dismissing());
    assert_eq!(card.transform(), &CardTransform::default());
}
