// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Buffered operator batching updates into fixed-size vectors.

use cascade_core::{CancellationToken, Channel, ChannelEvent};
use parking_lot::Mutex;

/// Extension trait providing the `buffered` operator for channels.
pub trait BufferedExt<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    /// Collects updates into vectors of `capacity` and emits each full
    /// batch.
    ///
    /// # Behavior
    ///
    /// - Every `capacity` updates, one `Vec<U>` of that length is emitted
    /// - On completion, a non-empty partial batch is flushed first, then
    ///   the completion is forwarded
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    fn buffered(
        &self,
        capacity: usize,
        cancellation_token: Option<CancellationToken>,
    ) -> Channel<Vec<U>, S>;
}

impl<U, S> BufferedExt<U, S> for Channel<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    fn buffered(
        &self,
        capacity: usize,
        cancellation_token: Option<CancellationToken>,
    ) -> Channel<Vec<U>, S> {
        assert!(capacity >= 1, "buffered: capacity must be at least 1");

        let batch: Mutex<Vec<U>> = Mutex::new(Vec::with_capacity(capacity));
        self.derived(
            cancellation_token,
            move |downstream, event| match event {
                ChannelEvent::Update(update) => {
                    let full = {
                        let mut batch = batch.lock();
                        batch.push(update);
                        if batch.len() >= capacity {
                            Some(std::mem::replace(
                                &mut *batch,
                                Vec::with_capacity(capacity),
                            ))
                        } else {
                            None
                        }
                    };
                    if let Some(batch) = full {
                        downstream.update(batch);
                    }
                }
                ChannelEvent::Completion(completion) => {
                    let partial = {
                        let mut batch = batch.lock();
                        if batch.is_empty() {
                            None
                        } else {
                            Some(std::mem::take(&mut *batch))
                        }
                    };
                    if let Some(batch) = partial {
                        downstream.update(batch);
                    }
                    downstream.try_complete(completion);
                }
            },
        )
    }
}
