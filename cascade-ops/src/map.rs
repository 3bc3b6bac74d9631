// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Map operator transforming each update.

use cascade_core::{CancellationToken, Channel, ChannelEvent, Fallible, Result};

/// Extension trait providing the `map` operators for channels.
pub trait MapExt<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    /// Transforms every update with `transform`; the completion passes
    /// through unchanged.
    ///
    /// # Behavior
    ///
    /// - Each update `u` becomes `transform(u)`, in order
    /// - The completion (success or failure) is forwarded as-is
    /// - Replayed updates are transformed like live ones
    fn map<U2, F>(
        &self,
        transform: F,
        cancellation_token: Option<CancellationToken>,
    ) -> Channel<U2, S>
    where
        U2: Clone + Send + 'static,
        F: Fn(U) -> U2 + Send + Sync + 'static;

    /// Transforms every update with a fallible `transform`.
    ///
    /// The first `Err` completes the downstream with that failure; later
    /// upstream events are released.
    fn try_map<U2, F>(
        &self,
        transform: F,
        cancellation_token: Option<CancellationToken>,
    ) -> Channel<U2, S>
    where
        U2: Clone + Send + 'static,
        F: Fn(U) -> Result<U2> + Send + Sync + 'static;
}

impl<U, S> MapExt<U, S> for Channel<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    fn map<U2, F>(
        &self,
        transform: F,
        cancellation_token: Option<CancellationToken>,
    ) -> Channel<U2, S>
    where
        U2: Clone + Send + 'static,
        F: Fn(U) -> U2 + Send + Sync + 'static,
    {
        self.derived(
            cancellation_token,
            move |downstream, event| match event {
                ChannelEvent::Update(update) => {
                    downstream.update(transform(update));
                }
                ChannelEvent::Completion(completion) => {
                    downstream.try_complete(completion);
                }
            },
        )
    }

    fn try_map<U2, F>(
        &self,
        transform: F,
        cancellation_token: Option<CancellationToken>,
    ) -> Channel<U2, S>
    where
        U2: Clone + Send + 'static,
        F: Fn(U) -> Result<U2> + Send + Sync + 'static,
    {
        self.derived(
            cancellation_token,
            move |downstream, event| match event {
                ChannelEvent::Update(update) => match transform(update) {
                    Ok(update) => {
                        downstream.update(update);
                    }
                    Err(error) => {
                        downstream.try_complete(Fallible::Failure(error));
                    }
                },
                ChannelEvent::Completion(completion) => {
                    downstream.try_complete(completion);
                }
            },
        )
    }
}
