// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Map-completion operator transforming the terminal value.

use cascade_core::{CancellationToken, Channel, ChannelEvent, Fallible};

/// Extension trait providing the `map_completion` operator for channels.
pub trait MapCompletionExt<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    /// Transforms the terminal value; updates pass through unchanged.
    ///
    /// Unlike `map`, the transform sees failures too, so it can rewrite a
    /// failure into a success or vice versa.
    fn map_completion<S2, F>(
        &self,
        transform: F,
        cancellation_token: Option<CancellationToken>,
    ) -> Channel<U, S2>
    where
        S2: Clone + Send + 'static,
        F: Fn(Fallible<S>) -> Fallible<S2> + Send + Sync + 'static;
}

impl<U, S> MapCompletionExt<U, S> for Channel<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    fn map_completion<S2, F>(
        &self,
        transform: F,
        cancellation_token: Option<CancellationToken>,
    ) -> Channel<U, S2>
    where
        S2: Clone + Send + 'static,
        F: Fn(Fallible<S>) -> Fallible<S2> + Send + Sync + 'static,
    {
        self.derived(
            cancellation_token,
            move |downstream, event| match event {
                ChannelEvent::Update(update) => {
                    downstream.update(update);
                }
                ChannelEvent::Completion(completion) => {
                    downstream.try_complete(transform(completion));
                }
            },
        )
    }
}
