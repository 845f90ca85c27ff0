#![forbid(unsafe_code)]

//! Recycling pool for expensive card views.
//!
//! A deck shows a bounded window of cards over an unbounded logical dataset.
//! Constructing a card view is expensive (content, header, animation state),
//! so views that scroll out of the window are parked here and handed back
//! out when another item scrolls in. The pool prefers giving an item the
//! view that last displayed it ("preferred data"), which skips rebinding
//! cost entirely; otherwise it recycles an arbitrary idle view.
//!
//! # Invariants
//!
//! - `pick_up_view` never fails: an empty pool falls back to construction.
//! - `prepare_to_leave_pool` runs on every pickup, `prepare_to_enter_pool`
//!   on every return.
//! - While idle, a view is owned exclusively by the pool; ownership moves to
//!   the caller between pickup and return.
//!
//! # Failure Modes
//!
//! - None at runtime. The consumer's `create_view` is assumed to succeed.
//! - The fallback eviction order (most recently returned first) is an
//!   implementation default, not a contract.

/// Strategy object the pool drives: view construction, recycling hooks, and
/// the preferred-data predicate.
pub trait PoolConsumer {
    /// The pooled view type.
    type View;
    /// The logical item key used for the preferred-data test.
    type Key: PartialEq;

    /// Construct a brand-new view.
    fn create_view(&mut self) -> Self::View;

    /// Reset a view as it returns to the pool (drop bindings, stop work).
    fn prepare_to_enter_pool(&mut self, view: &mut Self::View);

    /// Initialize a view as it leaves the pool for `key`. `is_new` is true
    /// when the view was just constructed rather than recycled.
    fn prepare_to_leave_pool(&mut self, view: &mut Self::View, key: &Self::Key, is_new: bool);

    /// Whether an idle view already displays data for `preferred`, making it
    /// the cheapest view to hand out for that key.
    fn has_preferred_data(&self, view: &Self::View, preferred: &Self::Key) -> bool;
}

/// A view pool to manage more views than we can visibly handle.
pub struct ViewPool<C: PoolConsumer> {
    consumer: C,
    // Idle views; the most recently returned view sits at the back.
    idle: Vec<C::View>,
}

impl<C: PoolConsumer> ViewPool<C> {
    /// Create an empty pool around a consumer.
    pub fn new(consumer: C) -> Self {
        Self {
            consumer,
            idle: Vec::new(),
        }
    }

    /// Number of idle views currently pooled.
    pub fn len(&self) -> usize {
        self.idle.len()
    }

    /// Whether the pool holds no idle views.
    pub fn is_empty(&self) -> bool {
        self.idle.is_empty()
    }

    /// Return a view into the pool.
    pub fn return_view(&mut self, mut view: C::View) {
        self.consumer.prepare_to_enter_pool(&mut view);
        self.idle.push(view);
    }

    /// Get a view from the pool and prepare it for `prepare`.
    ///
    /// With `preferred` set, an idle view already showing that key is reused
    /// without considering the others; the scan starts at the most recently
    /// returned view. With no match (or no preference) the most recently
    /// returned view is recycled, and an empty pool falls back to
    /// construction.
    pub fn pick_up_view(&mut self, preferred: Option<&C::Key>, prepare: &C::Key) -> C::View {
        let mut is_new = false;
        let mut view = match self.take_idle(preferred) {
            Some(view) => view,
            None => {
                is_new = true;
                tracing::trace!("view pool empty; constructing a new view");
                self.consumer.create_view()
            }
        };
        self.consumer.prepare_to_leave_pool(&mut view, prepare, is_new);
        view
    }

    fn take_idle(&mut self, preferred: Option<&C::Key>) -> Option<C::View> {
        if self.idle.is_empty() {
            return None;
        }
        if let Some(preferred) = preferred
            && let Some(at) = self
                .idle
                .iter()
                .rposition(|view| self.consumer.has_preferred_data(view, preferred))
        {
            tracing::trace!("reusing preferred pooled view");
            return Some(self.idle.remove(at));
        }
        // Otherwise, just grab the most recently returned view.
        self.idle.pop()
    }

    /// Iterate over the currently pooled (idle) views.
    pub fn pool_iter(&self) -> impl Iterator<Item = &C::View> {
        self.idle.iter()
    }

    /// Access the consumer.
    pub fn consumer(&self) -> &C {
        &self.consumer
    }

    /// Mutable access to the consumer.
    pub fn consumer_mut(&mut self) -> &mut C {
        &mut self.consumer
    }
}

impl<C: PoolConsumer> std::fmt::Debug for ViewPool<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewPool")
            .field("idle", &self.idle.len())
            .finish_non_exhaustive()
    }
}
