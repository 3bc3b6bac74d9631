// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Free-function constructors for futures, promises and channels.

use cascade_core::{
    CancellationToken, CascadeError, Channel, ExecutionContext, Executor, Fallible, Future,
    Producer, Promise, Result,
};
use std::sync::Arc;
use std::time::Duration;

/// A future pre-completed with a success.
pub fn future_value<T>(value: T) -> Future<T>
where
    T: Clone + Send + 'static,
{
    let promise = Promise::new();
    let future = promise.future();
    promise.succeed(value);
    future
}

/// A future pre-completed with a failure.
pub fn future_failure<T>(error: CascadeError) -> Future<T>
where
    T: Clone + Send + 'static,
{
    let promise = Promise::new();
    let future = promise.future();
    promise.fail(error);
    future
}

/// Runs `operation` on `executor` and completes the returned future with
/// its result.
///
/// If the executor never runs the task, the promise inside it is dropped
/// and the future fails with a cancellation error.
pub fn future<T, F>(executor: &Executor, operation: F) -> Future<T>
where
    T: Clone + Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let promise = Promise::new();
    let future = promise.future();
    executor.execute(Box::new(move || {
        promise.try_complete(operation().into());
    }));
    future
}

/// Like [`future`], scheduled after at least `delay`.
pub fn future_after<T, F>(executor: &Executor, delay: Duration, operation: F) -> Future<T>
where
    T: Clone + Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let promise = Promise::new();
    let future = promise.future();
    executor.execute_after(
        delay,
        Box::new(move || {
            promise.try_complete(operation().into());
        }),
    );
    future
}

/// Contextual [`future`]: the operation runs on the context's executor and
/// receives the context.
///
/// The context is held weakly; if it has been dropped by the time the
/// operation would run, the future fails with `ContextDeallocated`.
pub fn future_ctx<C, T, F>(context: &Arc<C>, operation: F) -> Future<T>
where
    C: ExecutionContext,
    T: Clone + Send + 'static,
    F: FnOnce(&C) -> Result<T> + Send + 'static,
{
    let promise = Promise::new();
    let future = promise.future();
    let weak_context = Arc::downgrade(context);
    context.executor().execute(Box::new(move || {
        let value = match weak_context.upgrade() {
            Some(context) => operation(&context).into(),
            None => Fallible::Failure(CascadeError::ContextDeallocated),
        };
        promise.try_complete(value);
    }));
    future
}

/// Creates a promise and hands it to `setup` for manual completion,
/// synchronously on the calling thread.
///
/// `setup` may complete the promise directly or clone it for later. If no
/// write handle survives `setup` without completing, the future fails with
/// a cancellation error.
pub fn promise<T>(setup: impl FnOnce(&Promise<T>)) -> Future<T>
where
    T: Clone + Send + 'static,
{
    let promise = Promise::new();
    let future = promise.future();
    setup(&promise);
    future
}

/// Like [`promise`], with scheduling: `setup` runs on `executor` after
/// `after`, and the promise is bound to `cancellation_token` if one is
/// given.
pub fn promise_on<T, F>(
    executor: &Executor,
    after: Duration,
    cancellation_token: Option<CancellationToken>,
    setup: F,
) -> Future<T>
where
    T: Clone + Send + 'static,
    F: FnOnce(&Promise<T>) + Send + 'static,
{
    let promise = Promise::new();
    let future = promise.future();
    if let Some(token) = cancellation_token {
        promise.cancel_on(&token);
    }
    let task: cascade_core::Task = Box::new(move || {
        setup(&promise);
    });
    if after.is_zero() {
        executor.execute(task);
    } else {
        executor.execute_after(after, task);
    }
    future
}

/// Runs `operation` on `executor` with a push function; its updates feed
/// the returned channel and its result completes it.
///
/// ```
/// use cascade::{channel, Executor};
///
/// let numbers = channel::<i32, &str, _>(&Executor::immediate(), 4, |push| {
///     push(1);
///     push(2);
///     Ok("done")
/// });
/// assert!(numbers.is_closed());
/// ```
pub fn channel<U, S, F>(executor: &Executor, buffer_size: usize, operation: F) -> Channel<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
    F: FnOnce(&dyn Fn(U)) -> Result<S> + Send + 'static,
{
    let producer = Producer::new(buffer_size);
    let channel = producer.channel();
    executor.execute(Box::new(move || {
        let push = |update: U| {
            producer.update(update);
        };
        let result = operation(&push);
        producer.try_complete(result.into());
    }));
    channel
}

/// Contextual [`channel`]: the operation runs on the context's executor and
/// receives the context alongside the push function.
///
/// If the context has been dropped by the time the operation would run, the
/// channel completes with `ContextDeallocated`.
pub fn channel_ctx<C, U, S, F>(
    context: &Arc<C>,
    buffer_size: usize,
    operation: F,
) -> Channel<U, S>
where
    C: ExecutionContext,
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
    F: FnOnce(&C, &dyn Fn(U)) -> Result<S> + Send + 'static,
{
    let producer = Producer::new(buffer_size);
    let channel = producer.channel();
    let weak_context = Arc::downgrade(context);
    context.executor().execute(Box::new(move || {
        let completion = match weak_context.upgrade() {
            Some(context) => {
                let push = |update: U| {
                    producer.update(update);
                };
                operation(&context, &push).into()
            }
            None => Fallible::Failure(CascadeError::ContextDeallocated),
        };
        producer.try_complete(completion);
    }));
    channel
}
