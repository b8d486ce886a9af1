//! Per-operation latency report.
//!
//! Pre-generates a deterministic mixed op stream (adds across a band
//! around the mid, cancels of previously rested ids, market sweeps),
//! warms the arena and branch predictors, then measures each operation
//! with `Instant` into per-kind histograms.

use hdrhistogram::Histogram;
use std::time::Instant;
use tickbook::{OrdType, OrderBook, OrderId, Price, Qty, Side, Timestamp};

const MAX_PRICE: i64 = 100_000;
const MAX_ORDERS: u32 = 1_000_000;
const MID: i64 = 50_000;

const WARMUP_OPS: usize = 10_000;
const BENCH_OPS: usize = 1_000_000;

#[derive(Clone, Copy)]
enum Op {
    Add {
        id: OrderId,
        side: Side,
        price: Price,
        qty: Qty,
        ord_type: OrdType,
    },
    Cancel {
        id: OrderId,
    },
    Match {
        side: Side,
        qty: Qty,
    },
}

/// Deterministic op mix: roughly 60% adds (a slice of them crossing or
/// IOC), 30% cancels of recently rested ids, 10% market sweeps.
fn build_ops(count: usize) -> Vec<Op> {
    let mut ops = Vec::with_capacity(count);
    let mut next_id: u64 = 1;
    let mut rested: Vec<u64> = Vec::new();
    let mut cancel_cursor = 0usize;

    for i in 0..count {
        if i % 10 == 6 {
            let side = if (i / 10) % 2 == 0 { Side::Buy } else { Side::Sell };
            ops.push(Op::Match {
                side,
                qty: Qty::new(40 + (i as i64 % 160)),
            });
        } else if matches!(i % 10, 2 | 5 | 8) && cancel_cursor < rested.len() {
            ops.push(Op::Cancel {
                id: OrderId::new(rested[cancel_cursor]),
            });
            cancel_cursor += 1;
        } else {
            let id = next_id;
            next_id += 1;

            let side = if i % 2 == 0 { Side::Buy } else { Side::Sell };
            let step = i as i64 % 500;
            let crossing = i % 16 == 15;
            let price = match (side, crossing) {
                (Side::Buy, false) => MID - 1 - step,
                (Side::Sell, false) => MID + 1 + step,
                (Side::Buy, true) => MID + 50,
                (Side::Sell, true) => MID - 50,
            };
            let ord_type = if i % 24 == 21 { OrdType::IOC } else { OrdType::Limit };

            if ord_type == OrdType::Limit && !crossing {
                rested.push(id);
            }

            ops.push(Op::Add {
                id: OrderId::new(id),
                side,
                price: Price::new(price),
                qty: Qty::new(1 + (i as i64 % 120)),
                ord_type,
            });
        }
    }

    ops
}

fn apply(book: &mut OrderBook, op: Op) {
    match op {
        Op::Add {
            id,
            side,
            price,
            qty,
            ord_type,
        } => {
            let _ = book.add(id, side, price, qty, ord_type, Timestamp::new(0));
        }
        Op::Cancel { id } => {
            let _ = book.cancel(id);
        }
        Op::Match { side, qty } => {
            let _ = book.match_market(side, qty);
        }
    }
}

fn print_stats(name: &str, hist: &Histogram<u64>) {
    println!(
        "  {:<7} p50={:<5} p90={:<5} p99={:<5} p99.9={:<5} p99.99={:<5} max={}",
        name,
        hist.value_at_quantile(0.50),
        hist.value_at_quantile(0.90),
        hist.value_at_quantile(0.99),
        hist.value_at_quantile(0.999),
        hist.value_at_quantile(0.9999),
        hist.max(),
    );
}

fn main() {
    println!("=== Order Book Latency Report ===\n");

    // Pin to the last core; it is the one most likely isolated from
    // OS interrupt handling.
    if let Some(core_ids) = core_affinity::get_core_ids() {
        if let Some(last) = core_ids.last() {
            if core_affinity::set_for_current(*last) {
                println!("Pinned to core {:?}", last.id);
            }
        }
    }

    let mut book = OrderBook::new(MAX_PRICE, MAX_ORDERS);

    println!("Pre-faulting arena pages...");
    book.warm_up();

    println!("Generating {} operations...", WARMUP_OPS + BENCH_OPS);
    let ops = build_ops(WARMUP_OPS + BENCH_OPS);

    println!("Warming up ({} ops)...", WARMUP_OPS);
    for &op in &ops[..WARMUP_OPS] {
        apply(&mut book, op);
    }

    println!("Measuring ({} ops)...\n", BENCH_OPS);

    let mut add_hist = Histogram::<u64>::new_with_bounds(1, 1_000_000, 3).unwrap();
    let mut cancel_hist = Histogram::<u64>::new_with_bounds(1, 1_000_000, 3).unwrap();
    let mut match_hist = Histogram::<u64>::new_with_bounds(1, 1_000_000, 3).unwrap();

    let total_start = Instant::now();

    for &op in &ops[WARMUP_OPS..] {
        let start = Instant::now();
        apply(&mut book, std::hint::black_box(op));
        let nanos = start.elapsed().as_nanos() as u64;

        let hist = match op {
            Op::Add { .. } => &mut add_hist,
            Op::Cancel { .. } => &mut cancel_hist,
            Op::Match { .. } => &mut match_hist,
        };
        hist.record(nanos.max(1)).unwrap_or(());
    }

    let total = total_start.elapsed();

    println!("Workload: {} operations", BENCH_OPS);
    println!(
        "  Add:    {:>8} ops ({:.1}%)",
        add_hist.len(),
        100.0 * add_hist.len() as f64 / BENCH_OPS as f64
    );
    println!(
        "  Cancel: {:>8} ops ({:.1}%)",
        cancel_hist.len(),
        100.0 * cancel_hist.len() as f64 / BENCH_OPS as f64
    );
    println!(
        "  Match:  {:>8} ops ({:.1}%)",
        match_hist.len(),
        100.0 * match_hist.len() as f64 / BENCH_OPS as f64
    );

    println!("\nLatency (nanoseconds):");
    print_stats("Add:", &add_hist);
    print_stats("Cancel:", &cancel_hist);
    print_stats("Match:", &match_hist);

    let throughput = BENCH_OPS as f64 / total.as_secs_f64();
    println!(
        "\nThroughput: {:.2} M ops/sec ({:.1} ns/op avg)",
        throughput / 1e6,
        total.as_nanos() as f64 / BENCH_OPS as f64
    );

    println!("\nBook state after run:");
    println!("  Orders: {}", book.order_count());
    println!(
        "  Pool used: {} / {}",
        book.pool_used(),
        book.pool_capacity()
    );
    if book.has_bid() && book.has_ask() {
        println!("  Bid: {} @ qty {}", book.bid(), book.bid_qty());
        println!("  Ask: {} @ qty {}", book.ask(), book.ask_qty());
        println!("  Spread: {} ticks", book.spread());
    }
}
