// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Single-value asynchronous result: [`Promise`] is the write face,
//! [`Future`] the read face.
//!
//! The shared state is a head that is either a list of weakly-held
//! subscription handlers or the terminal [`Fallible`] value. Completion is
//! an at-most-once transition; subscribers that arrive after it still have
//! their callback scheduled with the terminal value.

use crate::cancellation_token::{Cancellable, CancellationToken};
use crate::error::CascadeError;
use crate::fallible::Fallible;
use crate::handler::{Handler, Subscription};
use crate::head::{HeadContainer, HeadUpdate};
use crate::release_pool::ReleasePool;
use cascade_exec::{ExecutionContext, Executor};
use parking_lot::Mutex;
use std::any::Any;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

type CompletionHandler<T> = Handler<Fallible<T>>;

enum FutureHead<T> {
    Subscribed(Vec<Weak<CompletionHandler<T>>>),
    Completed(Fallible<T>),
}

pub(crate) struct FutureCore<T: Clone + Send + 'static> {
    head: HeadContainer<FutureHead<T>>,
    pool: ReleasePool,
    writers: AtomicUsize,
    writers_detached: AtomicBool,
}

impl<T: Clone + Send + 'static> FutureCore<T> {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            head: HeadContainer::new(),
            pool: ReleasePool::new(),
            writers: AtomicUsize::new(1),
            writers_detached: AtomicBool::new(false),
        })
    }

    /// At-most-once terminal transition. Returns `true` iff this call won.
    fn complete(&self, value: Fallible<T>) -> bool {
        let stored = value.clone();
        let waiters = self.head.update(move |head| match head {
            None => (HeadUpdate::Replace(FutureHead::Completed(stored)), Some(Vec::new())),
            Some(FutureHead::Subscribed(subscribers)) => (
                HeadUpdate::Replace(FutureHead::Completed(stored)),
                Some(subscribers),
            ),
            Some(completed @ FutureHead::Completed(_)) => {
                (HeadUpdate::Keep(Some(completed)), None)
            }
        });
        let Some(subscribers) = waiters else {
            return false;
        };
        for weak in subscribers {
            if let Some(handler) = weak.upgrade() {
                handler.enqueue(value.clone());
                handler.schedule_drain();
            }
        }
        self.pool.drain();
        true
    }

    fn completion(&self) -> Option<Fallible<T>> {
        self.head.read(|head| match head {
            Some(FutureHead::Completed(value)) => Some(value.clone()),
            _ => None,
        })
    }

    fn subscribe(
        self: &Arc<Self>,
        executor: Executor,
        callback: Box<dyn Fn(Fallible<T>) + Send + Sync>,
    ) -> Subscription {
        let handler = Handler::new(executor, callback, Box::new(Arc::clone(self)));
        let terminal = self.head.update(|head| match head {
            None => (
                HeadUpdate::Replace(FutureHead::Subscribed(vec![Arc::downgrade(&handler)])),
                None,
            ),
            Some(FutureHead::Subscribed(mut subscribers)) => {
                // Opportunistic pruning of dead records on insert.
                subscribers.retain(|weak| weak.strong_count() > 0);
                subscribers.push(Arc::downgrade(&handler));
                (HeadUpdate::Replace(FutureHead::Subscribed(subscribers)), None)
            }
            Some(FutureHead::Completed(value)) => {
                let snapshot = value.clone();
                (
                    HeadUpdate::Keep(Some(FutureHead::Completed(value))),
                    Some(snapshot),
                )
            }
        });
        if let Some(value) = terminal {
            // Late subscriber: schedule the callback with the terminal value.
            handler.enqueue(value);
            handler.schedule_drain();
        }
        Subscription::new(handler, self.pool.clone())
    }
}

impl<T: Clone + Send + 'static> Cancellable for FutureCore<T> {
    fn cancel(&self) {
        self.complete(Fallible::Failure(CascadeError::Cancelled));
    }
}

/// The write face of a single-value asynchronous result.
///
/// A `Promise` completes at most once, via [`try_complete`](Promise::try_complete)
/// or one of its conveniences. Cloning yields another write handle onto the
/// same state; when the last one drops without completing, the state
/// completes with a cancellation failure so subscribers are not left
/// waiting.
///
/// # Example
///
/// ```
/// use cascade_core::{Executor, Fallible, Promise};
///
/// let promise = Promise::new();
/// let future = promise.future();
/// let _sub = future.on_complete(Executor::immediate(), |value| {
///     assert!(matches!(value, Fallible::Success(7)));
/// });
/// promise.succeed(7);
/// ```
pub struct Promise<T: Clone + Send + 'static> {
    core: Arc<FutureCore<T>>,
}

impl<T: Clone + Send + 'static> Promise<T> {
    /// Creates an empty promise with no subscribers and no value.
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: FutureCore::new(),
        }
    }

    /// The read face sharing this promise's state.
    #[must_use]
    pub fn future(&self) -> Future<T> {
        Future {
            core: Arc::clone(&self.core),
        }
    }

    /// Attempts the terminal transition.
    ///
    /// Returns `true` iff this call caused it; every subscriber then
    /// observes exactly this value.
    pub fn try_complete(&self, value: Fallible<T>) -> bool {
        self.core.complete(value)
    }

    /// Completes with a success.
    pub fn succeed(&self, value: T) -> bool {
        self.try_complete(Fallible::Success(value))
    }

    /// Completes with a failure.
    pub fn fail(&self, error: CascadeError) -> bool {
        self.try_complete(Fallible::Failure(error))
    }

    /// Completes with a cancellation failure.
    pub fn cancel(&self) -> bool {
        self.fail(CascadeError::Cancelled)
    }

    /// Non-blocking snapshot of the terminal value, if any.
    #[must_use]
    pub fn completion(&self) -> Option<Fallible<T>> {
        self.core.completion()
    }

    /// Retains `object` until this promise completes.
    pub fn insert_to_release_pool(&self, object: Box<dyn Any + Send>) {
        self.core.pool.insert(object);
    }

    /// Registers a hook that fires when this promise completes.
    pub fn notify_drain(&self, hook: impl FnOnce() + Send + 'static) {
        self.core.pool.notify_drain(hook);
    }

    /// Subscribes this promise to `token`; the token holds it weakly.
    pub fn cancel_on(&self, token: &CancellationToken) {
        token.add_weak(Arc::downgrade(&self.core) as Weak<dyn Cancellable>);
    }

    /// An uncounted write handle that does not keep the state alive.
    #[must_use]
    pub fn downgrade(&self) -> WeakPromise<T> {
        WeakPromise {
            core: Arc::downgrade(&self.core),
        }
    }

    /// Relinquishes write ownership without completing.
    ///
    /// After this, dropping write handles no longer auto-completes the state
    /// with a cancellation failure; liveness is governed by the read faces.
    /// Combinators use this after wiring their upstream subscription.
    pub fn detach(self) {
        self.core.writers_detached.store(true, Ordering::Release);
    }
}

impl<T: Clone + Send + 'static> Default for Promise<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> Clone for Promise<T> {
    fn clone(&self) -> Self {
        self.core.writers.fetch_add(1, Ordering::Relaxed);
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<T: Clone + Send + 'static> Drop for Promise<T> {
    fn drop(&mut self) {
        if self.core.writers.fetch_sub(1, Ordering::AcqRel) == 1
            && !self.core.writers_detached.load(Ordering::Acquire)
        {
            // Nobody can complete this promise anymore.
            cascade_exec::trace!("last promise handle dropped without completion; cancelling");
            self.core.cancel();
        }
    }
}

impl<T: Clone + Send + 'static> Cancellable for Promise<T> {
    fn cancel(&self) {
        Promise::cancel(self);
    }
}

/// The read face of a single-value asynchronous result.
///
/// Obtained from [`Promise::future`] or one of the constructors in the
/// facade crate. Futures are cheap to clone and can also be awaited
/// directly from async code.
pub struct Future<T: Clone + Send + 'static> {
    core: Arc<FutureCore<T>>,
}

impl<T: Clone + Send + 'static> Future<T> {
    /// Subscribes to the terminal value.
    ///
    /// The callback is invoked exactly once on `executor`, immediately if
    /// the future is already completed. Dropping the returned subscription
    /// before completion means the callback is never invoked.
    pub fn on_complete(
        &self,
        executor: Executor,
        callback: impl Fn(Fallible<T>) + Send + Sync + 'static,
    ) -> Subscription {
        self.core.subscribe(executor, Box::new(callback))
    }

    /// Subscribes to a successful completion only.
    pub fn on_success(
        &self,
        executor: Executor,
        callback: impl Fn(T) + Send + Sync + 'static,
    ) -> Subscription {
        self.on_complete(executor, move |value| {
            if let Fallible::Success(value) = value {
                callback(value);
            }
        })
    }

    /// Subscribes to a failed completion only.
    pub fn on_failure(
        &self,
        executor: Executor,
        callback: impl Fn(CascadeError) + Send + Sync + 'static,
    ) -> Subscription {
        self.on_complete(executor, move |value| {
            if let Fallible::Failure(error) = value {
                callback(error);
            }
        })
    }

    /// Contextual subscription: the callback runs on the context's executor
    /// and is skipped if the context has been dropped by delivery time.
    pub fn on_complete_ctx<C: ExecutionContext>(
        &self,
        context: &Arc<C>,
        callback: impl Fn(&C, Fallible<T>) + Send + Sync + 'static,
    ) -> Subscription {
        let weak_context = Arc::downgrade(context);
        self.on_complete(context.executor(), move |value| {
            if let Some(context) = weak_context.upgrade() {
                callback(&context, value);
            }
        })
    }

    /// Combinator plumbing: builds a downstream future fed by `on_complete`.
    ///
    /// The subscription to `self` is parked in the downstream's release
    /// pool, so it lives exactly as long as the downstream is observed.
    /// `on_complete` runs on the `immediate` executor and writes through an
    /// uncounted weak handle. When `cancellation_token` fires, the
    /// downstream fails with a cancellation error.
    pub fn derived<T2, F>(
        &self,
        cancellation_token: Option<CancellationToken>,
        on_complete: F,
    ) -> Future<T2>
    where
        T2: Clone + Send + 'static,
        F: Fn(&WeakPromise<T2>, Fallible<T>) + Send + Sync + 'static,
    {
        let promise = Promise::new();
        let downstream = promise.future();
        let writer = promise.downgrade();
        let subscription =
            self.on_complete(Executor::immediate(), move |value| on_complete(&writer, value));
        promise.insert_to_release_pool(Box::new(subscription));
        if let Some(token) = cancellation_token {
            promise.cancel_on(&token);
        }
        promise.detach();
        downstream
    }

    /// Non-blocking snapshot of the terminal value, if any.
    #[must_use]
    pub fn completion(&self) -> Option<Fallible<T>> {
        self.core.completion()
    }

    /// `true` once the terminal transition has happened.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completion().is_some()
    }
}

impl<T: Clone + Send + 'static> Clone for Future<T> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<T: Clone + Send + 'static> std::future::IntoFuture for Future<T> {
    type Output = Fallible<T>;
    type IntoFuture = Pin<Box<dyn std::future::Future<Output = Fallible<T>> + Send>>;

    /// Bridges into async code: `future.await` yields the terminal value.
    fn into_future(self) -> Self::IntoFuture {
        let (tx, rx) = futures_channel::oneshot::channel::<Fallible<T>>();
        let sender = Mutex::new(Some(tx));
        let subscription = self.on_complete(Executor::immediate(), move |value| {
            if let Some(tx) = sender.lock().take() {
                let _ = tx.send(value);
            }
        });
        Box::pin(async move {
            let _keep_alive = subscription;
            match rx.await {
                Ok(value) => value,
                // Unreachable while the subscription is held.
                Err(_) => Fallible::Failure(CascadeError::Cancelled),
            }
        })
    }
}

/// An uncounted, weak write handle to a promise's state.
///
/// Used by combinators: the downstream state stays alive only while its read
/// faces (or retaining handlers) do, and writes through a dead handle are
/// no-ops.
pub struct WeakPromise<T: Clone + Send + 'static> {
    core: Weak<FutureCore<T>>,
}

impl<T: Clone + Send + 'static> WeakPromise<T> {
    /// Attempts the terminal transition; `false` if the state is gone or
    /// already completed.
    pub fn try_complete(&self, value: Fallible<T>) -> bool {
        match self.core.upgrade() {
            Some(core) => core.complete(value),
            None => false,
        }
    }

    /// Completes with a success.
    pub fn succeed(&self, value: T) -> bool {
        self.try_complete(Fallible::Success(value))
    }

    /// Completes with a failure.
    pub fn fail(&self, error: CascadeError) -> bool {
        self.try_complete(Fallible::Failure(error))
    }

    /// Completes with a cancellation failure.
    pub fn cancel(&self) -> bool {
        self.fail(CascadeError::Cancelled)
    }
}

impl<T: Clone + Send + 'static> Clone for WeakPromise<T> {
    fn clone(&self) -> Self {
        Self {
            core: Weak::clone(&self.core),
        }
    }
}
