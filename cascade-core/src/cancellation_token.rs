// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Fan-out cancellation signal with weak subscribers.

use event_listener::{Event, EventListener};
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};

/// Anything that can be cancelled by a [`CancellationToken`].
///
/// Promises and producers implement this; cancelling completes them with a
/// cancellation failure.
pub trait Cancellable: Send + Sync {
    /// Cancels the target. Must be idempotent.
    fn cancel(&self);
}

/// Fan-out cancellation signal.
///
/// Clones share one cancellation state: `cancel()` through any handle
/// cancels every live subscriber and wakes every `cancelled()` waiter.
///
/// Subscribers are held weakly: the token never extends the lifetime of the
/// primitives bound to it. Subscribers added after cancellation are cancelled
/// immediately.
///
/// # Example
///
/// ```
/// use cascade_core::{CancellationToken, Fallible, Promise};
///
/// let token = CancellationToken::new();
/// let promise = Promise::<i32>::new();
/// promise.cancel_on(&token);
///
/// token.cancel();
/// assert!(matches!(
///     promise.completion(),
///     Some(Fallible::Failure(e)) if e.is_cancelled()
/// ));
/// ```
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

struct Inner {
    cancelled: AtomicBool,
    event: Event,
    subscribers: Mutex<Vec<Weak<dyn Cancellable>>>,
}

impl CancellationToken {
    /// A fresh token in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                event: Event::new(),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Cancels the token, firing all live subscribers and waking all
    /// waiters.
    ///
    /// Idempotent: whichever call claims the flag does the firing, so each
    /// subscriber is cancelled at most once.
    pub fn cancel(&self) {
        if self.inner.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }

        let subscribers = std::mem::take(&mut *self.inner.subscribers.lock());
        for weak in subscribers {
            if let Some(cancellable) = weak.upgrade() {
                cancellable.cancel();
            }
        }

        // usize::MAX wakes every registered listener, not just one.
        self.inner.event.notify(usize::MAX);
    }

    /// Non-blocking check of the cancellation flag.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Subscribe a cancellable, held weakly.
    ///
    /// If the token is already cancelled, the target is cancelled before this
    /// call returns.
    pub fn add<C: Cancellable + 'static>(&self, cancellable: &Arc<C>) {
        self.add_weak(Arc::downgrade(cancellable) as Weak<dyn Cancellable>);
    }

    /// Subscribe an already-weak cancellable reference.
    pub fn add_weak(&self, cancellable: Weak<dyn Cancellable>) {
        let fire_now = {
            let mut subscribers = self.inner.subscribers.lock();
            // Checked under the lock: `cancel` sets the flag before it takes
            // the list, so either we land in the list it drains or we see
            // the flag and fire here.
            if self.inner.cancelled.load(Ordering::Acquire) {
                cancellable.upgrade()
            } else {
                subscribers.retain(|weak| weak.strong_count() > 0);
                subscribers.push(cancellable);
                None
            }
        };
        if let Some(cancellable) = fire_now {
            cancellable.cancel();
        }
    }

    /// A future that resolves once this token is cancelled, immediately so
    /// for a token that already fired.
    pub fn cancelled(&self) -> Cancelled<'_> {
        Cancelled {
            token: self,
            waiter: None,
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .field("subscribers", &self.inner.subscribers.lock().len())
            .finish()
    }
}

/// Pending wait on a [`CancellationToken`], created by
/// [`cancelled()`](CancellationToken::cancelled).
pub struct Cancelled<'a> {
    token: &'a CancellationToken,
    waiter: Option<EventListener>,
}

impl Future for Cancelled<'_> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        loop {
            if this.token.is_cancelled() {
                return Poll::Ready(());
            }
            match this.waiter.as_mut() {
                // No listener armed yet. Arm one, then go around the loop
                // to re-read the flag: a cancel between the check above and
                // `listen()` would otherwise never wake us.
                None => this.waiter = Some(this.token.inner.event.listen()),
                Some(waiter) => return Pin::new(waiter).poll(cx),
            }
        }
    }
}
