// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Release pools extend the lifetime of owned objects until a primitive
//! resolves.
//!
//! Every promise and producer owns a pool. Combinators park their upstream
//! subscription handle in the downstream's pool, which is what keeps the
//! upstream subscription alive exactly as long as the downstream is
//! observed.

use parking_lot::Mutex;
use std::any::Any;
use std::sync::Arc;

enum PoolItem {
    Release(Box<dyn Any + Send>),
    Notify(Box<dyn FnOnce() + Send>),
}

struct Inner {
    // `None` once drained; later inserts release immediately.
    items: Mutex<Option<Vec<PoolItem>>>,
}

/// A LIFO list of owned objects and drain-notification hooks.
///
/// `drain` releases the items in reverse insertion order and is idempotent;
/// objects inserted into a drained pool are released immediately. Cloning
/// the pool clones a handle onto the same list.
#[derive(Clone)]
pub struct ReleasePool {
    inner: Arc<Inner>,
}

impl ReleasePool {
    /// Creates an empty, undrained pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                items: Mutex::new(Some(Vec::new())),
            }),
        }
    }

    /// Retains `object` until the pool drains.
    ///
    /// If the pool has already drained, `object` is dropped before this call
    /// returns.
    pub fn insert(&self, object: Box<dyn Any + Send>) {
        let rejected = {
            let mut guard = self.inner.items.lock();
            match guard.as_mut() {
                Some(items) => {
                    items.push(PoolItem::Release(object));
                    None
                }
                None => Some(object),
            }
        };
        // Dropped outside the lock; the object's Drop may be arbitrary code.
        drop(rejected);
    }

    /// Registers a hook that fires when the pool drains.
    ///
    /// If the pool has already drained, `hook` fires before this call
    /// returns.
    pub fn notify_drain(&self, hook: impl FnOnce() + Send + 'static) {
        let immediate = {
            let mut guard = self.inner.items.lock();
            match guard.as_mut() {
                Some(items) => {
                    items.push(PoolItem::Notify(Box::new(hook)));
                    None
                }
                None => Some(hook),
            }
        };
        if let Some(hook) = immediate {
            hook();
        }
    }

    /// Releases every item in LIFO order. Idempotent.
    pub fn drain(&self) {
        let drained = self.inner.items.lock().take();
        if let Some(mut items) = drained {
            release_all(&mut items);
        }
    }
}

impl Default for ReleasePool {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        // A pool dropped without an explicit drain still fires its hooks.
        if let Some(items) = self.items.get_mut().as_mut() {
            release_all(items);
        }
    }
}

fn release_all(items: &mut Vec<PoolItem>) {
    while let Some(item) = items.pop() {
        match item {
            PoolItem::Release(object) => drop(object),
            PoolItem::Notify(hook) => hook(),
        }
    }
}
