// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Timeout operator failing a future that takes too long.

use cascade_core::{CancellationToken, CascadeError, Future, Promise};
use cascade_exec::Executor;
use std::time::Duration;

/// Extension trait providing the `timeout` operator for futures.
pub trait TimeoutExt<T>
where
    T: Clone + Send + 'static,
{
    /// Fails with a timeout error if the upstream has not completed after
    /// `deadline`.
    ///
    /// Whichever side arrives first wins the at-most-once transition; a
    /// late upstream completion is dropped.
    fn timeout(
        &self,
        deadline: Duration,
        executor: &Executor,
        cancellation_token: Option<CancellationToken>,
    ) -> Future<T>;
}

impl<T> TimeoutExt<T> for Future<T>
where
    T: Clone + Send + 'static,
{
    fn timeout(
        &self,
        deadline: Duration,
        executor: &Executor,
        cancellation_token: Option<CancellationToken>,
    ) -> Future<T> {
        let promise = Promise::new();
        let downstream = promise.future();

        let writer = promise.downgrade();
        let subscription = self.on_complete(Executor::immediate(), move |value| {
            writer.try_complete(value);
        });
        promise.insert_to_release_pool(Box::new(subscription));

        let writer = promise.downgrade();
        executor.execute_after(
            deadline,
            Box::new(move || {
                writer.fail(CascadeError::timeout_error(format!(
                    "no completion within {deadline:?}"
                )));
            }),
        );

        if let Some(token) = cancellation_token {
            promise.cancel_on(&token);
        }
        promise.detach();
        downstream
    }
}
