// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Multi-value reactive stream: [`Producer`] is the write face, [`Channel`]
//! the read face.
//!
//! A channel carries zero or more updates terminated by exactly one
//! completion. The state machine mirrors the promise, with two additions: a
//! bounded ring of recent updates replayed to late subscribers, and per-event
//! fan-out in production order.

use crate::cancellation_token::{Cancellable, CancellationToken};
use crate::error::CascadeError;
use crate::fallible::Fallible;
use crate::handler::{Handler, Subscription};
use crate::head::{HeadContainer, HeadUpdate};
use crate::release_pool::ReleasePool;
use cascade_exec::{ExecutionContext, Executor};
use std::any::Any;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

/// A single event observed by a channel subscriber.
#[derive(Debug, Clone)]
pub enum ChannelEvent<U, S> {
    /// A non-terminal value.
    Update(U),
    /// The terminal value; nothing follows it.
    Completion(Fallible<S>),
}

impl<U, S> ChannelEvent<U, S> {
    /// Returns `true` if this is an `Update`.
    pub const fn is_update(&self) -> bool {
        matches!(self, ChannelEvent::Update(_))
    }

    /// Returns `true` if this is a `Completion`.
    pub const fn is_completion(&self) -> bool {
        matches!(self, ChannelEvent::Completion(_))
    }

    /// Converts into the update value, discarding completions.
    pub fn update(self) -> Option<U> {
        match self {
            ChannelEvent::Update(update) => Some(update),
            ChannelEvent::Completion(_) => None,
        }
    }

    /// Converts into the completion value, discarding updates.
    pub fn completion(self) -> Option<Fallible<S>> {
        match self {
            ChannelEvent::Update(_) => None,
            ChannelEvent::Completion(completion) => Some(completion),
        }
    }
}

type EventHandler<U, S> = Handler<ChannelEvent<U, S>>;

enum ChannelHead<U, S> {
    Open {
        subscribers: Vec<Weak<EventHandler<U, S>>>,
        replay: VecDeque<U>,
    },
    Closed {
        completion: Fallible<S>,
        replay: VecDeque<U>,
    },
}

pub(crate) struct ChannelCore<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    buffer_size: usize,
    head: HeadContainer<ChannelHead<U, S>>,
    pool: ReleasePool,
    writers: AtomicUsize,
    writers_detached: AtomicBool,
}

impl<U, S> ChannelCore<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    fn new(buffer_size: usize) -> Arc<Self> {
        Arc::new(Self {
            buffer_size,
            head: HeadContainer::new(),
            pool: ReleasePool::new(),
            writers: AtomicUsize::new(1),
            writers_detached: AtomicBool::new(false),
        })
    }

    /// Appends to the replay ring and fans the update out, all under the
    /// head lock so every subscriber's mailbox order equals production
    /// order. Returns `false` once closed.
    fn apply_update(&self, update: U) -> bool {
        let scheduled = self.head.update(|head| {
            let (mut subscribers, mut replay) = match head {
                None => (Vec::new(), VecDeque::new()),
                Some(ChannelHead::Open {
                    subscribers,
                    replay,
                }) => (subscribers, replay),
                Some(closed @ ChannelHead::Closed { .. }) => {
                    return (HeadUpdate::Keep(Some(closed)), None)
                }
            };
            if self.buffer_size > 0 {
                if replay.len() == self.buffer_size {
                    replay.pop_front();
                }
                replay.push_back(update.clone());
            }
            let mut live = Vec::with_capacity(subscribers.len());
            subscribers.retain(|weak| match weak.upgrade() {
                Some(handler) => {
                    handler.enqueue(ChannelEvent::Update(update.clone()));
                    live.push(handler);
                    true
                }
                None => false,
            });
            (
                HeadUpdate::Replace(ChannelHead::Open {
                    subscribers,
                    replay,
                }),
                Some(live),
            )
        });
        match scheduled {
            Some(live) => {
                for handler in live {
                    handler.schedule_drain();
                }
                true
            }
            None => false,
        }
    }

    /// At-most-once terminal transition. The completion lands in every
    /// subscriber's mailbox after any updates already enqueued there.
    fn complete(&self, completion: Fallible<S>) -> bool {
        let stored = completion;
        let scheduled = self.head.update(move |head| {
            let (subscribers, replay) = match head {
                None => (Vec::new(), VecDeque::new()),
                Some(ChannelHead::Open {
                    subscribers,
                    replay,
                }) => (subscribers, replay),
                Some(closed @ ChannelHead::Closed { .. }) => {
                    return (HeadUpdate::Keep(Some(closed)), None)
                }
            };
            let mut live = Vec::with_capacity(subscribers.len());
            for weak in &subscribers {
                if let Some(handler) = weak.upgrade() {
                    handler.enqueue(ChannelEvent::Completion(stored.clone()));
                    live.push(handler);
                }
            }
            (
                HeadUpdate::Replace(ChannelHead::Closed {
                    completion: stored,
                    replay,
                }),
                Some(live),
            )
        });
        match scheduled {
            Some(live) => {
                for handler in live {
                    handler.schedule_drain();
                }
                self.pool.drain();
                true
            }
            None => false,
        }
    }

    fn completion(&self) -> Option<Fallible<S>> {
        self.head.read(|head| match head {
            Some(ChannelHead::Closed { completion, .. }) => Some(completion.clone()),
            _ => None,
        })
    }

    fn subscriber_count(&self) -> usize {
        self.head.read(|head| match head {
            Some(ChannelHead::Open { subscribers, .. }) => subscribers
                .iter()
                .filter(|weak| weak.strong_count() > 0)
                .count(),
            _ => 0,
        })
    }

    /// Replays the buffered updates (and the completion, once closed) into
    /// the new handler's mailbox under the head lock, so replay cannot
    /// interleave with live updates.
    fn subscribe(
        self: &Arc<Self>,
        executor: Executor,
        callback: Box<dyn Fn(ChannelEvent<U, S>) + Send + Sync>,
    ) -> Subscription {
        let handler = Handler::new(executor, callback, Box::new(Arc::clone(self)));
        let needs_drain = self.head.update(|head| match head {
            None => (
                HeadUpdate::Replace(ChannelHead::Open {
                    subscribers: vec![Arc::downgrade(&handler)],
                    replay: VecDeque::new(),
                }),
                false,
            ),
            Some(ChannelHead::Open {
                mut subscribers,
                replay,
            }) => {
                for update in &replay {
                    handler.enqueue(ChannelEvent::Update(update.clone()));
                }
                let replayed = !replay.is_empty();
                subscribers.retain(|weak| weak.strong_count() > 0);
                subscribers.push(Arc::downgrade(&handler));
                (
                    HeadUpdate::Replace(ChannelHead::Open {
                        subscribers,
                        replay,
                    }),
                    replayed,
                )
            }
            Some(ChannelHead::Closed { completion, replay }) => {
                for update in &replay {
                    handler.enqueue(ChannelEvent::Update(update.clone()));
                }
                handler.enqueue(ChannelEvent::Completion(completion.clone()));
                (
                    HeadUpdate::Keep(Some(ChannelHead::Closed { completion, replay })),
                    true,
                )
            }
        });
        if needs_drain {
            handler.schedule_drain();
        }
        Subscription::new(handler, self.pool.clone())
    }
}

impl<U, S> Cancellable for ChannelCore<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    fn cancel(&self) {
        self.complete(Fallible::Failure(CascadeError::Cancelled));
    }
}

/// The write face of a channel.
///
/// A `Producer` pushes updates and exactly one completion into the shared
/// state. The last `buffer_size` updates are kept in a ring and replayed to
/// late subscribers. Cloning yields another write handle; when the last one
/// drops without completing, the channel completes with a cancellation
/// failure.
///
/// # Example
///
/// ```
/// use cascade_core::{Executor, Producer};
///
/// let producer = Producer::<i32, ()>::new(4);
/// let channel = producer.channel();
/// let _sub = channel.on_update(Executor::immediate(), |update| {
///     println!("got {update}");
/// });
/// producer.update(1);
/// producer.succeed(());
/// ```
pub struct Producer<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    core: Arc<ChannelCore<U, S>>,
}

impl<U, S> Producer<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    /// Creates an open producer whose replay ring holds the last
    /// `buffer_size` updates (`0` disables replay).
    #[must_use]
    pub fn new(buffer_size: usize) -> Self {
        Self {
            core: ChannelCore::new(buffer_size),
        }
    }

    /// The read face sharing this producer's state.
    #[must_use]
    pub fn channel(&self) -> Channel<U, S> {
        Channel {
            core: Arc::clone(&self.core),
        }
    }

    /// Pushes an update to every subscriber, in production order.
    ///
    /// Returns `false` once the channel is closed; the update is then
    /// dropped.
    pub fn update(&self, update: U) -> bool {
        self.core.apply_update(update)
    }

    /// Attempts the terminal transition. Returns `true` iff this call
    /// caused it.
    pub fn try_complete(&self, completion: Fallible<S>) -> bool {
        self.core.complete(completion)
    }

    /// Completes with a success.
    pub fn succeed(&self, value: S) -> bool {
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

    /// The configured replay capacity.
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.core.buffer_size
    }

    /// `true` once the terminal transition has happened.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.core.completion().is_some()
    }

    /// Retains `object` until this channel completes.
    pub fn insert_to_release_pool(&self, object: Box<dyn Any + Send>) {
        self.core.pool.insert(object);
    }

    /// Registers a hook that fires when this channel completes.
    pub fn notify_drain(&self, hook: impl FnOnce() + Send + 'static) {
        self.core.pool.notify_drain(hook);
    }

    /// Subscribes this producer to `token`; the token holds it weakly.
    pub fn cancel_on(&self, token: &CancellationToken) {
        token.add_weak(Arc::downgrade(&self.core) as Weak<dyn Cancellable>);
    }

    /// An uncounted write handle that does not keep the state alive.
    #[must_use]
    pub fn downgrade(&self) -> WeakProducer<U, S> {
        WeakProducer {
            core: Arc::downgrade(&self.core),
        }
    }

    /// Relinquishes write ownership without completing.
    ///
    /// After this, dropping write handles no longer auto-completes the
    /// channel; liveness is governed by the read faces. Combinators use
    /// this after wiring their upstream subscription.
    pub fn detach(self) {
        self.core.writers_detached.store(true, Ordering::Release);
    }
}

impl<U, S> Clone for Producer<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    fn clone(&self) -> Self {
        self.core.writers.fetch_add(1, Ordering::Relaxed);
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<U, S> Drop for Producer<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    fn drop(&mut self) {
        if self.core.writers.fetch_sub(1, Ordering::AcqRel) == 1
            && !self.core.writers_detached.load(Ordering::Acquire)
        {
            // Nobody can produce into this channel anymore.
            cascade_exec::trace!("last producer handle dropped without completion; cancelling");
            self.core.cancel();
        }
    }
}

impl<U, S> Cancellable for Producer<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    fn cancel(&self) {
        Producer::cancel(self);
    }
}

/// The read face of a channel.
///
/// Subscribers first receive the replayed ring of recent updates, then the
/// completion if the channel is already closed, then live events. Per
/// subscriber, events arrive in production order and nothing follows the
/// completion.
pub struct Channel<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    core: Arc<ChannelCore<U, S>>,
}

impl<U, S> Channel<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    /// Subscribes to every event.
    pub fn on_event(
        &self,
        executor: Executor,
        callback: impl Fn(ChannelEvent<U, S>) + Send + Sync + 'static,
    ) -> Subscription {
        self.core.subscribe(executor, Box::new(callback))
    }

    /// Subscribes to updates only.
    pub fn on_update(
        &self,
        executor: Executor,
        callback: impl Fn(U) + Send + Sync + 'static,
    ) -> Subscription {
        self.on_event(executor, move |event| {
            if let ChannelEvent::Update(update) = event {
                callback(update);
            }
        })
    }

    /// Subscribes to the completion only.
    pub fn on_completion(
        &self,
        executor: Executor,
        callback: impl Fn(Fallible<S>) + Send + Sync + 'static,
    ) -> Subscription {
        self.on_event(executor, move |event| {
            if let ChannelEvent::Completion(completion) = event {
                callback(completion);
            }
        })
    }

    /// Contextual subscription: the callback runs on the context's executor
    /// and is skipped if the context has been dropped by delivery time.
    pub fn on_event_ctx<C: ExecutionContext>(
        &self,
        context: &Arc<C>,
        callback: impl Fn(&C, ChannelEvent<U, S>) + Send + Sync + 'static,
    ) -> Subscription {
        let weak_context = Arc::downgrade(context);
        self.on_event(context.executor(), move |event| {
            if let Some(context) = weak_context.upgrade() {
                callback(&context, event);
            }
        })
    }

    /// Combinator plumbing: builds a downstream channel fed by `on_event`.
    ///
    /// The downstream inherits this channel's buffer size. The subscription
    /// to `self` is parked in the downstream's release pool, so it lives
    /// exactly as long as the downstream is observed: completing the
    /// downstream drains the pool, and dropping every downstream face
    /// releases it the same way. `on_event` runs on the `immediate`
    /// executor and writes through an uncounted weak handle.
    ///
    /// When `cancellation_token` fires, the downstream completes with a
    /// cancellation failure and the upstream subscription is released.
    pub fn derived<U2, S2, F>(
        &self,
        cancellation_token: Option<CancellationToken>,
        on_event: F,
    ) -> Channel<U2, S2>
    where
        U2: Clone + Send + 'static,
        S2: Clone + Send + 'static,
        F: Fn(&WeakProducer<U2, S2>, ChannelEvent<U, S>) + Send + Sync + 'static,
    {
        let producer = Producer::new(self.buffer_size());
        let downstream = producer.channel();
        let writer = producer.downgrade();
        let subscription =
            self.on_event(Executor::immediate(), move |event| on_event(&writer, event));
        producer.insert_to_release_pool(Box::new(subscription));
        if let Some(token) = cancellation_token {
            producer.cancel_on(&token);
        }
        producer.detach();
        downstream
    }

    /// Non-blocking snapshot of the completion, if any.
    #[must_use]
    pub fn completion(&self) -> Option<Fallible<S>> {
        self.core.completion()
    }

    /// `true` once the terminal transition has happened.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.completion().is_some()
    }

    /// The configured replay capacity.
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.core.buffer_size
    }

    /// The number of currently live subscribers.
    ///
    /// Dead records are counted out immediately but only removed from the
    /// list on the next send or subscribe.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.core.subscriber_count()
    }
}

impl<U, S> Clone for Channel<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

/// An uncounted, weak write handle to a channel's state.
///
/// Used by combinators: the downstream channel stays alive only while its
/// read faces (or retaining handlers) do, and writes through a dead handle
/// are no-ops.
pub struct WeakProducer<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    core: Weak<ChannelCore<U, S>>,
}

impl<U, S> WeakProducer<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    /// Pushes an update; `false` if the state is gone or closed.
    pub fn update(&self, update: U) -> bool {
        match self.core.upgrade() {
            Some(core) => core.apply_update(update),
            None => false,
        }
    }

    /// Attempts the terminal transition; `false` if the state is gone or
    /// already closed.
    pub fn try_complete(&self, completion: Fallible<S>) -> bool {
        match self.core.upgrade() {
            Some(core) => core.complete(completion),
            None => false,
        }
    }

    /// Completes with a success.
    pub fn succeed(&self, value: S) -> bool {
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

    /// `true` while the channel state is alive and open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        match self.core.upgrade() {
            Some(core) => core.completion().is_none(),
            None => false,
        }
    }
}

impl<U, S> Clone for WeakProducer<U, S>
where
    U: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    fn clone(&self) -> Self {
        Self {
            core: Weak::clone(&self.core),
        }
    }
}
