// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Zip operator joining two futures into one.

use cascade_core::{CancellationToken, Fallible, Future, Promise};
use cascade_exec::Executor;
use parking_lot::Mutex;
use std::sync::Arc;

/// Extension trait providing the `zip` operator for futures.
pub trait ZipExt<A>
where
    A: Clone + Send + 'static,
{
    /// Completes with `(a, b)` once both futures succeed; the first failure
    /// wins otherwise.
    fn zip<B>(
        &self,
        other: &Future<B>,
        cancellation_token: Option<CancellationToken>,
    ) -> Future<(A, B)>
    where
        B: Clone + Send + 'static;
}

impl<A> ZipExt<A> for Future<A>
where
    A: Clone + Send + 'static,
{
    fn zip<B>(
        &self,
        other: &Future<B>,
        cancellation_token: Option<CancellationToken>,
    ) -> Future<(A, B)>
    where
        B: Clone + Send + 'static,
    {
        let promise = Promise::new();
        let downstream = promise.future();
        let slots: Arc<Mutex<(Option<A>, Option<B>)>> = Arc::new(Mutex::new((None, None)));

        let writer = promise.downgrade();
        let side = Arc::clone(&slots);
        let left = self.on_complete(Executor::immediate(), move |value| match value {
            Fallible::Success(a) => {
                let pair = {
                    let mut slots = side.lock();
                    slots.0 = Some(a);
                    take_pair(&mut slots)
                };
                if let Some(pair) = pair {
                    writer.succeed(pair);
                }
            }
            Fallible::Failure(error) => {
                writer.fail(error);
            }
        });

        let writer = promise.downgrade();
        let side = Arc::clone(&slots);
        let right = other.on_complete(Executor::immediate(), move |value| match value {
            Fallible::Success(b) => {
                let pair = {
                    let mut slots = side.lock();
                    slots.1 = Some(b);
                    take_pair(&mut slots)
                };
                if let Some(pair) = pair {
                    writer.succeed(pair);
                }
            }
            Fallible::Failure(error) => {
                writer.fail(error);
            }
        });

        promise.insert_to_release_pool(Box::new(left));
        promise.insert_to_release_pool(Box::new(right));
        if let Some(token) = cancellation_token {
            promise.cancel_on(&token);
        }
        promise.detach();
        downstream
    }
}

fn take_pair<A, B>(slots: &mut (Option<A>, Option<B>)) -> Option<(A, B)> {
    match (slots.0.take(), slots.1.take()) {
        (Some(a), Some(b)) => Some((a, b)),
        (a, b) => {
            slots.0 = a;
            slots.1 = b;
            None
        }
    }
}
