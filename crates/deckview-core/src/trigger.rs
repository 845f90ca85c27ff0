#![forbid(unsafe_code)]

//! Reference-counted completion trigger.
//!
//! A [`RefCountedTrigger`] runs registered callbacks when its count is first
//! incremented (0 → 1) and when it is last decremented (back to 0). It is the
//! join point for a batch of concurrently running animations: each animation
//! increments before it starts and decrements when it ends, so the
//! last-decrement callbacks fire exactly once, after the slowest animation.
//!
//! # Invariants
//!
//! - First-increment callbacks run in registration order, before the count
//!   moves off zero.
//! - Last-decrement callbacks run in registration order, on every transition
//!   to exactly zero.
//! - A negative count is a caller bug (mismatched increment/decrement). It is
//!   reported through the error callback (or logged) and never unwinds other
//!   in-flight work.
//! - Callbacks registered from inside a running callback are appended after
//!   the in-flight batch; they do not run within it.
//!
//! # Failure Modes
//!
//! - `decrement()` below zero: error callback if present, otherwise a
//!   `tracing::warn!`. Last-decrement callbacks are *not* invoked.
//!
//! Handles are `Clone` and share state. Not thread safe; all call sites live
//! on one control thread.

use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

type Callback = Box<dyn FnMut()>;

struct TriggerState {
    count: i64,
    on_first_increment: Vec<Callback>,
    on_last_decrement: Vec<Callback>,
    on_error: Option<Callback>,
}

/// A shared, count-based completion aggregator.
///
/// Cloning produces another handle to the same underlying count.
#[derive(Clone)]
pub struct RefCountedTrigger {
    state: Rc<RefCell<TriggerState>>,
}

impl Default for RefCountedTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl RefCountedTrigger {
    /// Create an idle trigger with no callbacks.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(TriggerState {
                count: 0,
                on_first_increment: Vec::new(),
                on_last_decrement: Vec::new(),
                on_error: None,
            })),
        }
    }

    /// Register a first-increment callback (builder form).
    #[must_use]
    pub fn with_first_increment(self, cb: impl FnMut() + 'static) -> Self {
        self.state.borrow_mut().on_first_increment.push(Box::new(cb));
        self
    }

    /// Register a last-decrement callback (builder form).
    ///
    /// Unlike [`add_last_decrement`](Self::add_last_decrement), this is a
    /// plain append with no zero-crossing guarantee; use it at construction
    /// time, before the trigger is shared.
    #[must_use]
    pub fn with_last_decrement(self, cb: impl FnMut() + 'static) -> Self {
        self.state.borrow_mut().on_last_decrement.push(Box::new(cb));
        self
    }

    /// Install the error callback invoked when the count goes negative.
    #[must_use]
    pub fn with_error(self, cb: impl FnMut() + 'static) -> Self {
        self.state.borrow_mut().on_error = Some(Box::new(cb));
        self
    }

    /// Current count. Non-negative under correct usage.
    pub fn count(&self) -> i64 {
        self.state.borrow().count
    }

    /// Increment the count, running first-increment callbacks on 0 → 1.
    pub fn increment(&self) {
        let fire = {
            let state = self.state.borrow();
            state.count == 0 && !state.on_first_increment.is_empty()
        };
        if fire {
            self.run_list(ListKind::FirstIncrement);
        }
        self.state.borrow_mut().count += 1;
    }

    /// Append a first-increment callback.
    pub fn add_first_increment(&self, cb: impl FnMut() + 'static) {
        self.state.borrow_mut().on_first_increment.push(Box::new(cb));
    }

    /// Append a last-decrement callback.
    ///
    /// When the trigger is currently idle (count 0), the registration is
    /// wrapped in an increment/decrement pair so the "drops to zero" edge is
    /// crossed at least once and the new callback is guaranteed to fire.
    pub fn add_last_decrement(&self, cb: impl FnMut() + 'static) {
        let ensure_last_decrement = self.count() == 0;
        if ensure_last_decrement {
            self.increment();
        }
        self.state.borrow_mut().on_last_decrement.push(Box::new(cb));
        if ensure_last_decrement {
            self.decrement();
        }
    }

    /// Decrement the count, running last-decrement callbacks on a transition
    /// to zero. A negative result takes the error path instead.
    pub fn decrement(&self) {
        let count = {
            let mut state = self.state.borrow_mut();
            state.count -= 1;
            state.count
        };
        if count == 0 {
            self.run_list(ListKind::LastDecrement);
        } else if count < 0 {
            let taken = self.state.borrow_mut().on_error.take();
            match taken {
                Some(mut cb) => {
                    cb();
                    let mut state = self.state.borrow_mut();
                    if state.on_error.is_none() {
                        state.on_error = Some(cb);
                    }
                }
                None => {
                    tracing::warn!(count, "trigger decremented below zero; mismatched increment/decrement");
                }
            }
        }
    }

    /// Run one callback list outside the borrow, preserving registration
    /// order. Callbacks added re-entrantly end up after the in-flight batch.
    fn run_list(&self, kind: ListKind) {
        let mut callbacks = {
            let mut state = self.state.borrow_mut();
            mem::take(kind.select(&mut state))
        };
        for cb in callbacks.iter_mut() {
            cb();
        }
        let mut state = self.state.borrow_mut();
        let added = mem::replace(kind.select(&mut state), callbacks);
        kind.select(&mut state).extend(added);
    }
}

impl std::fmt::Debug for RefCountedTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("RefCountedTrigger")
            .field("count", &state.count)
            .field("first_increment_callbacks", &state.on_first_increment.len())
            .field("last_decrement_callbacks", &state.on_last_decrement.len())
            .field("has_error_callback", &state.on_error.is_some())
            .finish()
    }
}

#[derive(Clone, Copy)]
enum ListKind {
    FirstIncrement,
    LastDecrement,
}

impl ListKind {
    fn select(self, state: &mut TriggerState) -> &mut Vec<Callback> {
        match self {
            Self::FirstIncrement => &mut state.on_first_increment,
            Self::LastDecrement => &mut state.on_last_decrement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
        let count = Rc::new(Cell::new(0));
        let handle = Rc::clone(&count);
        (count, move || handle.set(handle.get() + 1))
    }

    #[test]
    fn first_increment_fires_on_zero_to_one_only() {
        let (fired, cb) = counter();
        let trigger = RefCountedTrigger::new().with_first_increment(cb);

        trigger.increment();
        assert_eq!(fired.get(), 1);

        // Subsequent increments while non-zero do not fire again.
        trigger.increment();
        trigger.increment();
        assert_eq!(fired.get(), 1);

        // Drop back to zero and re-increment: a new 0 -> 1 transition.
        trigger.decrement();
        trigger.decrement();
        trigger.decrement();
        trigger.increment();
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn last_decrement_fires_on_each_transition_to_zero() {
        let (fired, cb) = counter();
        let trigger = RefCountedTrigger::new().with_last_decrement(cb);

        trigger.increment();
        trigger.increment();
        trigger.decrement();
        assert_eq!(fired.get(), 0, "count is 1, not 0");
        trigger.decrement();
        assert_eq!(fired.get(), 1);

        trigger.increment();
        trigger.decrement();
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn callbacks_run_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let trigger = RefCountedTrigger::new();
        for tag in ["a", "b", "c"] {
            let order = Rc::clone(&order);
            trigger.add_first_increment(move || order.borrow_mut().push(tag));
        }
        trigger.increment();
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn add_last_decrement_while_idle_still_fires() {
        let (fired, cb) = counter();
        let trigger = RefCountedTrigger::new();

        // Count is 0 here; the registration crosses the zero edge itself.
        trigger.add_last_decrement(cb);
        assert_eq!(fired.get(), 1);

        // And it keeps firing on later genuine zero events.
        trigger.increment();
        trigger.decrement();
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn add_last_decrement_while_busy_defers_to_completion() {
        let (fired, cb) = counter();
        let trigger = RefCountedTrigger::new();

        trigger.increment();
        trigger.add_last_decrement(cb);
        assert_eq!(fired.get(), 0);

        trigger.decrement();
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn negative_count_takes_error_path_once_per_violation() {
        let (errors, error_cb) = counter();
        let (lasts, last_cb) = counter();
        let trigger = RefCountedTrigger::new()
            .with_last_decrement(last_cb)
            .with_error(error_cb);

        trigger.increment();
        trigger.decrement();
        assert_eq!(lasts.get(), 1);
        assert_eq!(errors.get(), 0);

        trigger.decrement();
        assert_eq!(errors.get(), 1);
        trigger.decrement();
        assert_eq!(errors.get(), 2);
        // Last-decrement callbacks must not fire on violating calls.
        assert_eq!(lasts.get(), 1);
    }

    #[test]
    fn negative_count_without_error_callback_does_not_panic() {
        let trigger = RefCountedTrigger::new();
        trigger.decrement();
        assert_eq!(trigger.count(), -1);
    }

    #[test]
    fn clones_share_state() {
        let (fired, cb) = counter();
        let trigger = RefCountedTrigger::new().with_last_decrement(cb);
        let other = trigger.clone();

        trigger.increment();
        other.increment();
        trigger.decrement();
        other.decrement();
        assert_eq!(fired.get(), 1);
        assert_eq!(trigger.count(), 0);
    }

    #[test]
    fn reentrant_registration_runs_next_time_not_now() {
        let (inner_fired, inner_cb) = counter();
        let trigger = RefCountedTrigger::new();
        {
            let trigger2 = trigger.clone();
            let inner_cb = RefCell::new(Some(inner_cb));
            trigger.add_last_decrement(move || {
                if let Some(cb) = inner_cb.borrow_mut().take() {
                    trigger2.add_first_increment(cb);
                }
            });
        }
        // Registration above crossed zero once; the inner callback was added
        // during that crossing and must not have run yet.
        assert_eq!(inner_fired.get(), 0);

        trigger.increment();
        assert_eq!(inner_fired.get(), 1);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        /// Model the trigger against a plain integer replay of the same
        /// operation sequence. `true` = increment, `false` = decrement (only
        /// emitted when the model count is positive, so the sequence is
        /// well-formed).
        fn well_formed_ops() -> impl Strategy<Value = Vec<bool>> {
            proptest::collection::vec(any::<bool>(), 0..64).prop_map(|raw| {
                let mut depth = 0i64;
                raw.into_iter()
                    .map(|inc| {
                        if inc || depth == 0 {
                            depth += 1;
                            true
                        } else {
                            depth -= 1;
                            false
                        }
                    })
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn transition_counts_match_model(ops in well_formed_ops()) {
                let firsts = Rc::new(Cell::new(0u32));
                let lasts = Rc::new(Cell::new(0u32));
                let trigger = RefCountedTrigger::new();
                {
                    let firsts = Rc::clone(&firsts);
                    trigger.add_first_increment(move || firsts.set(firsts.get() + 1));
                }
                {
                    let lasts = Rc::clone(&lasts);
                    trigger.add_last_decrement(move || lasts.set(lasts.get() + 1));
                }
                // add_last_decrement on an idle trigger crosses zero once.
                let mut expected_lasts = 1u32;
                let mut expected_firsts = 1u32;

                let mut model = 0i64;
                for inc in ops {
                    if inc {
                        if model == 0 {
                            expected_firsts += 1;
                        }
                        model += 1;
                        trigger.increment();
                    } else {
                        model -= 1;
                        if model == 0 {
                            expected_lasts += 1;
                        }
                        trigger.decrement();
                    }
                }

                prop_assert_eq!(trigger.count(), model);
                prop_assert_eq!(firsts.get(), expected_firsts);
                prop_assert_eq!(lasts.get(), expected_lasts);
            }
        }
    }
}
