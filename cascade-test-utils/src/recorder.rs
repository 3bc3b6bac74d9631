// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Thread-safe ordered log of observed events.
///
/// The recorder hands out callbacks that push into a shared list, so a test
/// can subscribe, drive the primitive under test and then assert on the
/// exact sequence that arrived.
pub struct EventRecorder<E> {
    events: Arc<Mutex<Vec<E>>>,
}

impl<E: Send + 'static> EventRecorder<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Appends an event to the log.
    pub fn record(&self, event: E) {
        self.events.lock().push(event);
    }

    /// A callback that records every value it receives.
    #[must_use]
    pub fn callback(&self) -> impl Fn(E) + Send + Sync + 'static {
        let events = Arc::clone(&self.events);
        move |event| events.lock().push(event)
    }

    /// Copy of everything recorded so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<E>
    where
        E: Clone,
    {
        self.events.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Polls until at least `count` events arrived, giving up after
    /// `limit`.
    ///
    /// Returns `true` if the count was reached.
    pub async fn wait_for(&self, count: usize, limit: Duration) -> bool {
        tokio::time::timeout(limit, async {
            while self.len() < count {
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await
        .is_ok()
    }
}

impl<E: Send + 'static> Default for EventRecorder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EventRecorder<E> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}
