// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Enumerated operator attaching a running index to each update.

use cascade_core::{CancellationToken, Channel, ChannelEvent};
use std::sync::atomic::{AtomicU64, Ordering};

/// Extension trait providing the `enumerated` operator for channels.
pub trait EnumeratedExt<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    /// Pairs every update with a 0-based, monotonically increasing index.
    fn enumerated(&self, cancellation_token: Option<CancellationToken>) -> Channel<(u64, U), S>;
}

impl<U, S> EnumeratedExt<U, S> for Channel<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    fn enumerated(&self, cancellation_token: Option<CancellationToken>) -> Channel<(u64, U), S> {
        let counter = AtomicU64::new(0);
        self.derived(
            cancellation_token,
            move |downstream, event| match event {
                ChannelEvent::Update(update) => {
                    let index = counter.fetch_add(1, Ordering::Relaxed);
                    downstream.update((index, update));
                }
                ChannelEvent::Completion(completion) => {
                    downstream.try_complete(completion);
                }
            },
        )
    }
}
