// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Delayed-dispatch operators re-scheduling events through the timer.

use cascade_core::{CancellationToken, Channel, Future};
use cascade_exec::Executor;
use std::time::Duration;

/// Extension trait providing the `delayed_update` operator for channels.
pub trait DelayedExt<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    /// Re-dispatches every event through `executor.execute_after(delay)`.
    ///
    /// # Behavior
    ///
    /// - Each update and the completion arrive `delay` later
    /// - Relative order is preserved: the shared timer fires equal
    ///   deadlines in submission order, and the completion is always
    ///   scheduled after the updates that precede it
    fn delayed_update(
        &self,
        delay: Duration,
        executor: &Executor,
        cancellation_token: Option<CancellationToken>,
    ) -> Channel<U, S>;
}

impl<U, S> DelayedExt<U, S> for Channel<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    fn delayed_update(
        &self,
        delay: Duration,
        executor: &Executor,
        cancellation_token: Option<CancellationToken>,
    ) -> Channel<U, S> {
        let executor = executor.clone();
        self.derived(cancellation_token, move |downstream, event| {
            let downstream = downstream.clone();
            executor.execute_after(
                delay,
                Box::new(move || match event {
                    cascade_core::ChannelEvent::Update(update) => {
                        downstream.update(update);
                    }
                    cascade_core::ChannelEvent::Completion(completion) => {
                        downstream.try_complete(completion);
                    }
                }),
            );
        })
    }
}

/// Extension trait providing the `delayed` operator for futures.
pub trait DelayedFutureExt<T>
where
    T: Clone + Send + 'static,
{
    /// Re-dispatches the terminal value `delay` after the upstream
    /// completes.
    fn delayed(
        &self,
        delay: Duration,
        executor: &Executor,
        cancellation_token: Option<CancellationToken>,
    ) -> Future<T>;
}

impl<T> DelayedFutureExt<T> for Future<T>
where
    T: Clone + Send + 'static,
{
    fn delayed(
        &self,
        delay: Duration,
        executor: &Executor,
        cancellation_token: Option<CancellationToken>,
    ) -> Future<T> {
        let executor = executor.clone();
        self.derived(cancellation_token, move |downstream, value| {
            let downstream = downstream.clone();
            executor.execute_after(
                delay,
                Box::new(move || {
                    downstream.try_complete(value);
                }),
            );
        })
    }
}
