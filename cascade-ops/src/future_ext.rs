// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Transform operators for futures.

use cascade_core::{CancellationToken, CascadeError, Fallible, Future, Result};

/// Extension trait providing the transform operators for futures.
pub trait FutureTransformExt<T>
where
    T: Clone + Send + 'static,
{
    /// Transforms a successful terminal value; failures pass through
    /// unchanged.
    fn map<T2, F>(
        &self,
        transform: F,
        cancellation_token: Option<CancellationToken>,
    ) -> Future<T2>
    where
        T2: Clone + Send + 'static,
        F: Fn(T) -> T2 + Send + Sync + 'static;

    /// Transforms a successful terminal value with a fallible transform; an
    /// `Err` becomes the downstream failure.
    fn try_map<T2, F>(
        &self,
        transform: F,
        cancellation_token: Option<CancellationToken>,
    ) -> Future<T2>
    where
        T2: Clone + Send + 'static,
        F: Fn(T) -> Result<T2> + Send + Sync + 'static;

    /// Transforms the terminal value, success or failure.
    fn map_completion<T2, F>(
        &self,
        transform: F,
        cancellation_token: Option<CancellationToken>,
    ) -> Future<T2>
    where
        T2: Clone + Send + 'static,
        F: Fn(Fallible<T>) -> Fallible<T2> + Send + Sync + 'static;

    /// Replaces a failed terminal value with `recovery(error)`.
    fn recover<F>(
        &self,
        recovery: F,
        cancellation_token: Option<CancellationToken>,
    ) -> Future<T>
    where
        F: Fn(CascadeError) -> T + Send + Sync + 'static;

    /// Like `recover`, but the recovery itself may fail.
    fn try_recover<F>(
        &self,
        recovery: F,
        cancellation_token: Option<CancellationToken>,
    ) -> Future<T>
    where
        F: Fn(CascadeError) -> Result<T> + Send + Sync + 'static;
}

impl<T> FutureTransformExt<T> for Future<T>
where
    T: Clone + Send + 'static,
{
    fn map<T2, F>(
        &self,
        transform: F,
        cancellation_token: Option<CancellationToken>,
    ) -> Future<T2>
    where
        T2: Clone + Send + 'static,
        F: Fn(T) -> T2 + Send + Sync + 'static,
    {
        self.derived(cancellation_token, move |downstream, value| {
            downstream.try_complete(value.map(&transform));
        })
    }

    fn try_map<T2, F>(
        &self,
        transform: F,
        cancellation_token: Option<CancellationToken>,
    ) -> Future<T2>
    where
        T2: Clone + Send + 'static,
        F: Fn(T) -> Result<T2> + Send + Sync + 'static,
    {
        self.derived(cancellation_token, move |downstream, value| {
            downstream.try_complete(value.try_map(&transform));
        })
    }

    fn map_completion<T2, F>(
        &self,
        transform: F,
        cancellation_token: Option<CancellationToken>,
    ) -> Future<T2>
    where
        T2: Clone + Send + 'static,
        F: Fn(Fallible<T>) -> Fallible<T2> + Send + Sync + 'static,
    {
        self.derived(cancellation_token, move |downstream, value| {
            downstream.try_complete(transform(value));
        })
    }

    fn recover<F>(
        &self,
        recovery: F,
        cancellation_token: Option<CancellationToken>,
    ) -> Future<T>
    where
        F: Fn(CascadeError) -> T + Send + Sync + 'static,
    {
        self.derived(cancellation_token, move |downstream, value| {
            downstream.try_complete(value.recover(&recovery));
        })
    }

    fn try_recover<F>(
        &self,
        recovery: F,
        cancellation_token: Option<CancellationToken>,
    ) -> Future<T>
    where
        F: Fn(CascadeError) -> Result<T> + Send + Sync + 'static,
    {
        self.derived(cancellation_token, move |downstream, value| {
            downstream.try_complete(value.try_recover(&recovery));
        })
    }
}
