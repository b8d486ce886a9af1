//! Benchmark harness using Criterion for latency measurement.
//!
//! Measures:
//! - Add that rests (no crossing)
//! - Add that crosses resting depth
//! - Cancel at varying book sizes
//! - Market sweep across price levels
//! - Seeded mixed workload

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tickbook::{OrdType, OrderBook, OrderId, Price, Qty, Side, Timestamp};

fn fresh_book() -> OrderBook {
    let mut book = OrderBook::new(100_000, 1_000_000);
    book.warm_up();
    book
}

/// Benchmark: add that rests without touching the opposing side
fn bench_add_no_cross(c: &mut Criterion) {
    let mut book = fresh_book();
    let mut order_id = 0u64;

    c.bench_function("add_no_cross", |b| {
        b.iter(|| {
            order_id += 1;
            black_box(book.add_limit(
                OrderId::new(order_id),
                Side::Buy,
                Price::new(9_000), // below any asks
                Qty::new(100),
            ))
        })
    });
}

/// Benchmark: add that fully crosses resting depth
fn bench_add_crossing(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_crossing");

    for depth in [1u64, 10, 100].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, &depth| {
            let mut book = fresh_book();

            for i in 0..depth {
                let _ = book.add_limit(
                    OrderId::new(i),
                    Side::Sell,
                    Price::new(10_000),
                    Qty::new(100),
                );
            }

            let mut order_id = 1_000u64;

            b.iter(|| {
                order_id += 2;
                // crossing bid consumes one resting ask
                let res = book.add_limit(
                    OrderId::new(order_id),
                    Side::Buy,
                    Price::new(10_000),
                    Qty::new(100),
                );

                // replenish the consumed ask
                let _ = book.add_limit(
                    OrderId::new(order_id + 1),
                    Side::Sell,
                    Price::new(10_000),
                    Qty::new(100),
                );

                black_box(res)
            })
        });
    }

    group.finish();
}

/// Benchmark: cancel at varying book sizes
fn bench_cancel(c: &mut Criterion) {
    let mut group = c.benchmark_group("cancel");

    for book_size in [100u64, 1_000, 10_000].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(book_size),
            book_size,
            |b, &book_size| {
                let mut book = fresh_book();

                for i in 0..book_size {
                    let (side, price) = if i % 2 == 0 {
                        (Side::Buy, 9_000 + (i % 100) as i64 * 10)
                    } else {
                        (Side::Sell, 20_000 + (i % 100) as i64 * 10)
                    };
                    let _ = book.add_limit(
                        OrderId::new(i),
                        side,
                        Price::new(price),
                        Qty::new(100),
                    );
                }

                let mut cancel_id = 0u64;
                let mut next_id = book_size;

                b.iter(|| {
                    let res = book.cancel(OrderId::new(cancel_id));

                    // replenish so the book size stays constant
                    let (side, price) = if cancel_id % 2 == 0 {
                        (Side::Buy, 9_000 + (cancel_id % 100) as i64 * 10)
                    } else {
                        (Side::Sell, 20_000 + (cancel_id % 100) as i64 * 10)
                    };
                    let _ = book.add_limit(
                        OrderId::new(next_id),
                        side,
                        Price::new(price),
                        Qty::new(100),
                    );

                    cancel_id = next_id;
                    next_id += 1;

                    black_box(res)
                })
            },
        );
    }

    group.finish();
}

/// Benchmark: market sweep across multiple price levels
fn bench_market_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("market_sweep");

    for levels in [1u64, 5, 10, 20].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(levels), levels, |b, &levels| {
            let mut book = fresh_book();
            let mut next_id = 0u64;

            for level in 0..levels {
                for _ in 0..10 {
                    let _ = book.add_limit(
                        OrderId::new(next_id),
                        Side::Sell,
                        Price::new(10_000 + level as i64 * 10),
                        Qty::new(10),
                    );
                    next_id += 1;
                }
            }

            b.iter(|| {
                // take one order per level
                let unfilled =
                    book.match_market(Side::Buy, Qty::new(levels as i64 * 10));

                // replenish
                for level in 0..levels {
                    let _ = book.add_limit(
                        OrderId::new(next_id),
                        Side::Sell,
                        Price::new(10_000 + level as i64 * 10),
                        Qty::new(10),
                    );
                    next_id += 1;
                }

                black_box(unfilled)
            })
        });
    }

    group.finish();
}

/// Benchmark: seeded mixed workload (60% add, 30% cancel, 10% market)
fn bench_mixed_workload(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_workload");

    group.bench_function("60_add_30_cancel_10_match", |b| {
        let mut book = fresh_book();
        let mut rng = ChaCha8Rng::seed_from_u64(0xDEADBEEF);
        let mut next_id = 1u64;
        let mut rested: Vec<u64> = Vec::new();

        // pre-populate
        for _ in 0..1_000 {
            let id = next_id;
            next_id += 1;
            let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
            let price = match side {
                Side::Buy => rng.gen_range(49_000..50_000),
                Side::Sell => rng.gen_range(50_001..51_000),
            };
            if book
                .add_limit(OrderId::new(id), side, Price::new(price), Qty::new(rng.gen_range(1..500)))
                .is_ok()
            {
                rested.push(id);
            }
        }

        b.iter(|| {
            let roll = rng.gen_range(0..100);
            if roll < 60 || rested.is_empty() {
                let id = next_id;
                next_id += 1;
                let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
                let price = match side {
                    Side::Buy => rng.gen_range(49_000..50_200),
                    Side::Sell => rng.gen_range(49_800..51_000),
                };
                let ord_type = if rng.gen_bool(0.1) { OrdType::IOC } else { OrdType::Limit };
                let res = book.add(
                    OrderId::new(id),
                    side,
                    Price::new(price),
                    Qty::new(rng.gen_range(1..500)),
                    ord_type,
                    Timestamp::new(0),
                );
                if res.is_ok() && ord_type == OrdType::Limit {
                    rested.push(id);
                }
                black_box(res.is_ok())
            } else if roll < 90 {
                let idx = rng.gen_range(0..rested.len());
                let id = rested.swap_remove(idx);
                black_box(book.cancel(OrderId::new(id)))
            } else {
                let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
                let unfilled = book.match_market(side, Qty::new(rng.gen_range(1..1_000)));
                black_box(unfilled.raw() >= 0)
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_add_no_cross,
    bench_add_crossing,
    bench_cancel,
    bench_market_sweep,
    bench_mixed_workload,
);

criterion_main!(benches);
