// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Distinct operator filtering consecutive duplicate updates.

use cascade_core::{CancellationToken, Channel, ChannelEvent};
use parking_lot::Mutex;

/// Extension trait providing the `distinct` operators for channels.
pub trait DistinctExt<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    /// Emits an update only when it differs from the previously emitted one.
    ///
    /// # Behavior
    ///
    /// - The first update is always emitted
    /// - Later updates are emitted only if `current != previous`
    /// - The output contains no two adjacent equal updates and is a
    ///   subsequence of the input
    /// - The completion is forwarded unchanged
    ///
    /// `Option` and collection element types compare the way their
    /// `PartialEq` does, so optional and collection updates need no
    /// dedicated variant.
    fn distinct(&self, cancellation_token: Option<CancellationToken>) -> Channel<U, S>
    where
        U: PartialEq;

    /// Like `distinct`, with a caller-supplied equivalence.
    fn distinct_by<F>(
        &self,
        eq: F,
        cancellation_token: Option<CancellationToken>,
    ) -> Channel<U, S>
    where
        F: Fn(&U, &U) -> bool + Send + Sync + 'static;
}

impl<U, S> DistinctExt<U, S> for Channel<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    fn distinct(&self, cancellation_token: Option<CancellationToken>) -> Channel<U, S>
    where
        U: PartialEq,
    {
        self.distinct_by(|previous, current| previous == current, cancellation_token)
    }

    fn distinct_by<F>(
        &self,
        eq: F,
        cancellation_token: Option<CancellationToken>,
    ) -> Channel<U, S>
    where
        F: Fn(&U, &U) -> bool + Send + Sync + 'static,
    {
        let last_emitted: Mutex<Option<U>> = Mutex::new(None);
        self.derived(
            cancellation_token,
            move |downstream, event| match event {
                ChannelEvent::Update(current) => {
                    let emit = {
                        let mut last = last_emitted.lock();
                        let changed = match last.as_ref() {
                            None => true, // First value, always emit
                            Some(previous) => !eq(previous, &current),
                        };
                        if changed {
                            *last = Some(current.clone());
                        }
                        changed
                    };
                    if emit {
                        downstream.update(current);
                    }
                }
                ChannelEvent::Completion(completion) => {
                    downstream.try_complete(completion);
                }
            },
        )
    }
}
