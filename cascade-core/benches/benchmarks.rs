// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use cascade_core::{Executor, Producer, Promise};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

fn promise_complete_with_subscriber(c: &mut Criterion) {
    c.bench_function("promise_complete_with_subscriber", |b| {
        b.iter(|| {
            let promise = Promise::new();
            let sink = Arc::new(AtomicU64::new(0));
            let sink_clone = Arc::clone(&sink);
            let _sub = promise.future().on_success(Executor::immediate(), move |v: u64| {
                sink_clone.fetch_add(v, Ordering::Relaxed);
            });
            promise.succeed(black_box(1));
            black_box(sink.load(Ordering::Relaxed))
        });
    });
}

fn producer_fan_out(c: &mut Criterion) {
    c.bench_function("producer_update_8_subscribers", |b| {
        let producer = Producer::<u64, ()>::new(0);
        let sink = Arc::new(AtomicU64::new(0));
        let subs: Vec<_> = (0..8)
            .map(|_| {
                let sink = Arc::clone(&sink);
                producer.channel().on_update(Executor::immediate(), move |v| {
                    sink.fetch_add(v, Ordering::Relaxed);
                })
            })
            .collect();
        b.iter(|| {
            producer.update(black_box(1));
        });
        drop(subs);
    });
}

fn producer_replay_subscribe(c: &mut Criterion) {
    c.bench_function("late_subscribe_replay_64", |b| {
        let producer = Producer::<u64, ()>::new(64);
        for i in 0..64 {
            producer.update(i);
        }
        b.iter(|| {
            let sub = producer
                .channel()
                .on_update(Executor::immediate(), |v| {
                    black_box(v);
                });
            drop(sub);
        });
    });
}

criterion_group!(
    benches,
    promise_complete_with_subscriber,
    producer_fan_out,
    producer_replay_subscribe
);
criterion_main!(benches);
