//! Pool churn benchmarks: how cheap is recycling a card versus building
//! one, and what does the preferred-key scan cost at realistic pool sizes.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use std::hint::black_box;

use deckview_core::DeckConfig;
use deckview_widgets::{CardView, PoolConsumer, ViewPool};

struct BenchConsumer {
    config: DeckConfig,
}

impl PoolConsumer for BenchConsumer {
    type View = CardView<u64>;
    type Key = u64;

    fn create_view(&mut self) -> Self::View {
        CardView::new(self.config.clone())
    }

    fn prepare_to_enter_pool(&mut self, view: &mut Self::View) {
        view.reset();
    }

    fn prepare_to_leave_pool(&mut self, view: &mut Self::View, key: &Self::Key, _is_new: bool) {
        view.bind(*key);
        view.set_touch_enabled(true);
    }

    fn has_preferred_data(&self, view: &Self::View, key: &Self::Key) -> bool {
        view.bound_key() == Some(key)
    }
}

fn seeded_pool(size: u64) -> ViewPool<BenchConsumer> {
    let consumer = BenchConsumer {
        config: DeckConfig::default(),
    };
    let mut pool = ViewPool::new(consumer);
    let views: Vec<_> = (0..size).map(|key| pool.pick_up_view(None, &key)).collect();
    for view in views {
        pool.return_view(view);
    }
    pool
}

fn bench_pickup(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_pickup");
    for size in [8u64, 32, 128] {
        group.bench_with_input(BenchmarkId::new("preferred_hit", size), &size, |b, &size| {
            b.iter_batched_ref(
                || seeded_pool(size),
                |pool| {
                    // Oldest key sits at the far end of the scan.
                    let view = pool.pick_up_view(black_box(Some(&0)), &0);
                    pool.return_view(view);
                },
                BatchSize::SmallInput,
            );
        });
        group.bench_with_input(BenchmarkId::new("preferred_miss", size), &size, |b, &size| {
            b.iter_batched_ref(
                || seeded_pool(size),
                |pool| {
                    let view = pool.pick_up_view(black_box(Some(&u64::MAX)), &u64::MAX);
                    pool.return_view(view);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_create_vs_recycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_acquire");
    group.bench_function("cold_create", |b| {
        b.iter_batched_ref(
            || seeded_pool(0),
            |pool| black_box(pool.pick_up_view(None, &1)),
            BatchSize::SmallInput,
        );
    });
    group.bench_function("warm_recycle", |b| {
        b.iter_batched_ref(
            || seeded_pool(1),
            |pool| black_box(pool.pick_up_view(None, &1)),
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_pickup, bench_create_vs_recycle);
criterion_main!(benches);
