// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Buffered-pairs operator emitting each update together with its
//! predecessor.

use cascade_core::{CancellationToken, Channel, ChannelEvent};
use parking_lot::Mutex;

/// Extension trait providing the `buffered_pairs` operator for channels.
pub trait BufferedPairsExt<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    /// Emits `(previous, current)` for every update after the first.
    ///
    /// # Behavior
    ///
    /// - The first upstream update only seeds the held state, nothing is
    ///   emitted
    /// - Every later update `u` emits `(previous, u)` and becomes the new
    ///   held state
    /// - The completion is forwarded unchanged; a pending held value is
    ///   discarded
    fn buffered_pairs(&self, cancellation_token: Option<CancellationToken>)
        -> Channel<(U, U), S>;
}

impl<U, S> BufferedPairsExt<U, S> for Channel<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    fn buffered_pairs(
        &self,
        cancellation_token: Option<CancellationToken>,
    ) -> Channel<(U, U), S> {
        let previous: Mutex<Option<U>> = Mutex::new(None);
        self.derived(
            cancellation_token,
            move |downstream, event| match event {
                ChannelEvent::Update(current) => {
                    // State mutated before dispatching downstream.
                    let pair = previous
                        .lock()
                        .replace(current.clone())
                        .map(|prev| (prev, current));
                    if let Some(pair) = pair {
                        downstream.update(pair);
                    }
                }
                ChannelEvent::Completion(completion) => {
                    downstream.try_complete(completion);
                }
            },
        )
    }
}
