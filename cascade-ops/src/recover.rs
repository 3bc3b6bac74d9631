// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Recover operator converting a failed completion back into a success.

use cascade_core::{CancellationToken, CascadeError, Channel, ChannelEvent, Result};

/// Extension trait providing the `recover` operators for channels.
pub trait RecoverExt<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    /// Replaces a failed completion with `recovery(error)`; successful
    /// completions and updates pass through unchanged.
    fn recover<F>(
        &self,
        recovery: F,
        cancellation_token: Option<CancellationToken>,
    ) -> Channel<U, S>
    where
        F: Fn(CascadeError) -> S + Send + Sync + 'static;

    /// Like `recover`, but the recovery itself may fail, in which case its
    /// error becomes the downstream failure.
    fn try_recover<F>(
        &self,
        recovery: F,
        cancellation_token: Option<CancellationToken>,
    ) -> Channel<U, S>
    where
        F: Fn(CascadeError) -> Result<S> + Send + Sync + 'static;
}

impl<U, S> RecoverExt<U, S> for Channel<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    fn recover<F>(
        &self,
        recovery: F,
        cancellation_token: Option<CancellationToken>,
    ) -> Channel<U, S>
    where
        F: Fn(CascadeError) -> S + Send + Sync + 'static,
    {
        self.derived(
            cancellation_token,
            move |downstream, event| match event {
                ChannelEvent::Update(update) => {
                    downstream.update(update);
                }
                ChannelEvent::Completion(completion) => {
                    downstream.try_complete(completion.recover(&recovery));
                }
            },
        )
    }

    fn try_recover<F>(
        &self,
        recovery: F,
        cancellation_token: Option<CancellationToken>,
    ) -> Channel<U, S>
    where
        F: Fn(CascadeError) -> Result<S> + Send + Sync + 'static,
    {
        self.derived(
            cancellation_token,
            move |downstream, event| match event {
                ChannelEvent::Update(update) => {
                    downstream.update(update);
                }
                ChannelEvent::Completion(completion) => {
                    downstream.try_complete(completion.try_recover(&recovery));
                }
            },
        )
    }
}
