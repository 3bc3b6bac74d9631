// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Thread-safe head state shared by the promise and producer state machines.

use parking_lot::Mutex;

/// Directive returned by a head update function.
pub(crate) enum HeadUpdate<H> {
    /// Install a new head.
    Replace(H),
    /// Clear the head.
    #[allow(dead_code)]
    Remove,
    /// Put the observed head back unchanged.
    Keep(Option<H>),
}

/// A mutex-guarded head pointer.
///
/// The update function observes the current head and returns a directive
/// plus a caller-chosen projection (typically the handler list to dispatch
/// once the lock is gone). Contention is low: a primitive is usually
/// subscribed by a handful of combinators, so a short critical section
/// replaces a CAS loop without changing the contract.
pub(crate) struct HeadContainer<H> {
    head: Mutex<Option<H>>,
}

impl<H> HeadContainer<H> {
    pub(crate) const fn new() -> Self {
        Self {
            head: Mutex::new(None),
        }
    }

    /// Applies `f` to the current head under the lock.
    ///
    /// No user callback runs inside `f`; it may enqueue events on handler
    /// mailboxes, which is what serializes delivery order with head
    /// transitions.
    pub(crate) fn update<R>(&self, f: impl FnOnce(Option<H>) -> (HeadUpdate<H>, R)) -> R {
        let mut guard = self.head.lock();
        let (directive, result) = f(guard.take());
        *guard = match directive {
            HeadUpdate::Replace(head) => Some(head),
            HeadUpdate::Remove => None,
            HeadUpdate::Keep(head) => head,
        };
        result
    }

    /// Read-only projection of the current head.
    pub(crate) fn read<R>(&self, f: impl FnOnce(Option<&H>) -> R) -> R {
        f(self.head.lock().as_ref())
    }
}
