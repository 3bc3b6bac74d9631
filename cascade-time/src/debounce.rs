// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Debounce operator coalescing bursts of updates onto a periodic tick.

use cascade_core::{CancellationToken, Channel, ChannelEvent, WeakProducer};
use cascade_exec::Executor;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

struct DebounceState<U> {
    pending: Option<U>,
    ticking: bool,
    done: bool,
}

/// Extension trait providing the `debounce` operator for channels.
pub trait DebounceExt<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    /// Coalesces bursts of updates onto a periodic tick.
    ///
    /// # Behavior
    ///
    /// - The very first update passes through immediately and starts a
    ///   periodic tick every `interval`
    /// - Later updates replace the pending value; each tick emits the
    ///   pending value if one exists
    /// - On completion, a pending value is flushed first, then the
    ///   completion is forwarded and the tick stops
    /// - Errors in the completion pass through like any completion
    fn debounce(
        &self,
        interval: Duration,
        executor: &Executor,
        cancellation_token: Option<CancellationToken>,
    ) -> Channel<U, S>;

    /// Like [`debounce`](DebounceExt::debounce), with a tick-lateness
    /// tolerance.
    ///
    /// `leeway` is an upper bound on how late a tick may fire relative to
    /// its interval. The shared timer fires at the deadline, which honors
    /// any tolerance; the parameter exists for callers porting from timers
    /// that coalesce wake-ups.
    fn debounce_with_leeway(
        &self,
        interval: Duration,
        leeway: Duration,
        executor: &Executor,
        cancellation_token: Option<CancellationToken>,
    ) -> Channel<U, S>;
}

impl<U, S> DebounceExt<U, S> for Channel<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    fn debounce(
        &self,
        interval: Duration,
        executor: &Executor,
        cancellation_token: Option<CancellationToken>,
    ) -> Channel<U, S> {
        let executor = executor.clone();
        let state = Arc::new(Mutex::new(DebounceState {
            pending: None,
            ticking: false,
            done: false,
        }));
        self.derived(cancellation_token, move |downstream, event| match event {
            ChannelEvent::Update(update) => {
                // The state lock is held across the emission so a tick on
                // the timer thread cannot reorder against it.
                let shared = Arc::clone(&state);
                let mut state = state.lock();
                if state.done {
                    return;
                }
                if state.ticking {
                    state.pending = Some(update);
                } else {
                    state.ticking = true;
                    downstream.update(update);
                    schedule_tick(executor.clone(), interval, shared, downstream.clone());
                }
            }
            ChannelEvent::Completion(completion) => {
                let mut state = state.lock();
                state.done = true;
                if let Some(pending) = state.pending.take() {
                    downstream.update(pending);
                }
                downstream.try_complete(completion);
            }
        })
    }

    fn debounce_with_leeway(
        &self,
        interval: Duration,
        _leeway: Duration,
        executor: &Executor,
        cancellation_token: Option<CancellationToken>,
    ) -> Channel<U, S> {
        self.debounce(interval, executor, cancellation_token)
    }
}

fn schedule_tick<U, S>(
    executor: Executor,
    interval: Duration,
    state: Arc<Mutex<DebounceState<U>>>,
    downstream: WeakProducer<U, S>,
) where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    let next = executor.clone();
    executor.execute_after(
        interval,
        Box::new(move || {
            {
                let mut state = state.lock();
                if state.done || !downstream.is_open() {
                    state.ticking = false;
                    return;
                }
                if let Some(pending) = state.pending.take() {
                    downstream.update(pending);
                }
            }
            schedule_tick(next, interval, state, downstream);
        }),
    );
}
