// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use cascade_core::{Cancellable, CancellationToken, Fallible, Promise};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct CountingTarget {
    fired: AtomicUsize,
}

impl Cancellable for CountingTarget {
    fn cancel(&self) {
        self.fired.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn cancel_fires_each_subscriber_exactly_once() {
    // Arrange
    let token = CancellationToken::new();
    let target = Arc::new(CountingTarget {
        fired: AtomicUsize::new(0),
    });
    token.add(&target);

    // Act
    token.cancel();
    token.cancel();
    token.cancel();

    // Assert
    assert_eq!(target.fired.load(Ordering::SeqCst), 1);
    assert!(token.is_cancelled());
}

#[test]
fn add_after_cancel_fires_immediately() {
    // Arrange
    let token = CancellationToken::new();
    token.cancel();
    let target = Arc::new(CountingTarget {
        fired: AtomicUsize::new(0),
    });

    // Act
    token.add(&target);

    // Assert
    assert_eq!(target.fired.load(Ordering::SeqCst), 1);
}

#[test]
fn subscribers_are_held_weakly() {
    // Arrange
    let token = CancellationToken::new();
    let target = Arc::new(CountingTarget {
        fired: AtomicUsize::new(0),
    });
    token.add(&target);
    let weak = Arc::downgrade(&target);

    // Act - drop the only strong reference before cancelling
    drop(target);
    token.cancel();

    // Assert - the token did not keep the target alive
    assert!(weak.upgrade().is_none());
}

#[test]
fn cancelling_a_bound_promise_fails_it() {
    // Arrange
    let token = CancellationToken::new();
    let promise = Promise::<i32>::new();
    promise.cancel_on(&token);

    // Act
    token.cancel();

    // Assert
    assert!(matches!(
        promise.completion(),
        Some(Fallible::Failure(e)) if e.is_cancelled()
    ));
    assert!(!promise.try_complete(Fallible::Success(9)));
}

#[test]
fn clones_share_cancellation_state() {
    // Arrange
    let token = CancellationToken::new();
    let cloned = token.clone();

    // Act
    cloned.cancel();

    // Assert
    assert!(token.is_cancelled());
}

#[tokio::test]
async fn cancelled_waiter_resolves_after_cancel() {
    // Arrange
    let token = CancellationToken::new();
    let token_clone = token.clone();

    let waiter = tokio::spawn(async move {
        token_clone.cancelled().await;
    });

    // Act
    tokio::time::sleep(Duration::from_millis(10)).await;
    token.cancel();

    // Assert - the waiter task finishes
    tokio::time::timeout(Duration::from_secs(5), waiter)
        .await
        .expect("waiter never woke")
        .expect("waiter task panicked");
}

#[tokio::test]
async fn cancelled_waiter_returns_immediately_when_already_cancelled() {
    // Arrange
    let token = CancellationToken::new();
    token.cancel();

    // Act & Assert - resolves without any notification
    token.cancelled().await;
}
