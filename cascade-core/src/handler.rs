// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Subscription records and their delivery mailbox.
//!
//! A producer holds its handlers weakly; the strong reference lives in the
//! [`Subscription`] returned to the subscriber (or in a downstream's release
//! pool, for combinators). Each handler also retains the producer it observes,
//! so a chain of combinators stays alive as long as its tail is held.
//!
//! Delivery is mailbox-style: producers enqueue events under their head lock
//! (no user code runs there), then schedule a single drain task on the
//! handler's executor. The drain runs callbacks strictly in mailbox order,
//! which keeps per-handler ordering intact even on a concurrent pool.

use crate::release_pool::ReleasePool;
use cascade_exec::Executor;
use parking_lot::Mutex;
use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub(crate) struct Handler<E> {
    executor: Executor,
    callback: Box<dyn Fn(E) + Send + Sync>,
    mailbox: Mutex<VecDeque<E>>,
    scheduled: AtomicBool,
    severed: AtomicBool,
    // Keeps the observed producer alive while this handler lives.
    owner: Mutex<Option<Box<dyn Any + Send>>>,
}

impl<E: Send + 'static> Handler<E> {
    pub(crate) fn new(
        executor: Executor,
        callback: Box<dyn Fn(E) + Send + Sync>,
        owner: Box<dyn Any + Send>,
    ) -> Arc<Self> {
        Arc::new(Self {
            executor,
            callback,
            mailbox: Mutex::new(VecDeque::new()),
            scheduled: AtomicBool::new(false),
            severed: AtomicBool::new(false),
            owner: Mutex::new(Some(owner)),
        })
    }

    /// Appends an event to the mailbox. Called under the producer's head
    /// lock, which is what pins delivery order to production order.
    pub(crate) fn enqueue(&self, event: E) {
        if self.severed.load(Ordering::Acquire) {
            return;
        }
        self.mailbox.lock().push_back(event);
    }

    /// Ensures a drain task is in flight on this handler's executor.
    pub(crate) fn schedule_drain(self: &Arc<Self>) {
        if self.scheduled.swap(true, Ordering::AcqRel) {
            return;
        }
        let handler = Arc::clone(self);
        self.executor
            .execute(Box::new(move || handler.drain()));
    }

    fn drain(self: &Arc<Self>) {
        loop {
            if self.severed.load(Ordering::Acquire) {
                self.scheduled.store(false, Ordering::Release);
                return;
            }
            let next = self.mailbox.lock().pop_front();
            match next {
                Some(event) => (self.callback)(event),
                None => {
                    self.scheduled.store(false, Ordering::Release);
                    // An enqueue may have slipped in between the pop and the
                    // store; reclaim the drain if nobody else has.
                    if self.mailbox.lock().is_empty() {
                        return;
                    }
                    if self.scheduled.swap(true, Ordering::AcqRel) {
                        return;
                    }
                }
            }
        }
    }
}

/// Severing side of a handler, object-safe so [`Subscription`] can hold any
/// event type.
pub(crate) trait Severable: Send + Sync {
    fn sever(&self);
}

impl<E: Send + 'static> Severable for Handler<E> {
    fn sever(&self) {
        self.severed.store(true, Ordering::Release);
        self.mailbox.lock().clear();
        // Release the observed producer; the chain above may tear down.
        *self.owner.lock() = None;
    }
}

/// A live subscription to a future or channel.
///
/// Dropping the handle severs the subscription: the callback observes no
/// further events, and the producer's next traversal forgets the record.
/// Call [`detach`](Subscription::detach) to instead keep the subscription
/// alive until the producer resolves.
#[must_use = "dropping a Subscription severs it; call detach() to keep it alive"]
pub struct Subscription {
    handler: Option<Arc<dyn Severable>>,
    pool: ReleasePool,
}

impl Subscription {
    pub(crate) fn new(handler: Arc<dyn Severable>, pool: ReleasePool) -> Self {
        Self {
            handler: Some(handler),
            pool,
        }
    }

    /// Hands the subscription to the producer's release pool, keeping it
    /// alive until the producer completes.
    pub fn detach(mut self) {
        if let Some(handler) = self.handler.take() {
            self.pool.insert(Box::new(handler));
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.take() {
            handler.sever();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("live", &self.handler.is_some())
            .finish()
    }
}
