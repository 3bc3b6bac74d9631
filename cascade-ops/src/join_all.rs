// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Join operator collecting a set of futures into one.

use cascade_core::{CancellationToken, Fallible, Future, Promise};
use cascade_exec::Executor;
use parking_lot::Mutex;
use std::sync::Arc;

struct JoinState<T> {
    slots: Vec<Option<T>>,
    remaining: usize,
}

/// Completes with every success in input order, or with the first failure.
///
/// An empty input completes immediately with an empty vector.
pub fn join_all<T, I>(
    futures: I,
    cancellation_token: Option<CancellationToken>,
) -> Future<Vec<T>>
where
    T: Clone + Send + 'static,
    I: IntoIterator<Item = Future<T>>,
{
    let futures: Vec<Future<T>> = futures.into_iter().collect();
    let promise = Promise::new();
    let downstream = promise.future();

    if futures.is_empty() {
        promise.succeed(Vec::new());
        return downstream;
    }

    let state = Arc::new(Mutex::new(JoinState {
        slots: (0..futures.len()).map(|_| None).collect(),
        remaining: futures.len(),
    }));

    for (index, future) in futures.iter().enumerate() {
        let writer = promise.downgrade();
        let state = Arc::clone(&state);
        let subscription = future.on_complete(Executor::immediate(), move |value| match value {
            Fallible::Success(value) => {
                let finished = {
                    let mut state = state.lock();
                    if state.slots[index].is_none() {
                        state.slots[index] = Some(value);
                        state.remaining -= 1;
                    }
                    if state.remaining == 0 {
                        state
                            .slots
                            .iter_mut()
                            .map(Option::take)
                            .collect::<Option<Vec<T>>>()
                    } else {
                        None
                    }
                };
                if let Some(values) = finished {
                    writer.succeed(values);
                }
            }
            Fallible::Failure(error) => {
                writer.fail(error);
            }
        });
        promise.insert_to_release_pool(Box::new(subscription));
    }

    if let Some(token) = cancellation_token {
        promise.cancel_on(&token);
    }
    promise.detach();
    downstream
}
