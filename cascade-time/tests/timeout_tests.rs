// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use cascade_core::{Executor, Fallible, Promise};
use cascade_test_utils::{wait_until, EventRecorder};
use cascade_time::TimeoutExt;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn timeout_fails_an_incomplete_future() {
    // Arrange
    let promise = Promise::<i32>::new();
    let bounded = promise
        .future()
        .timeout(Duration::from_millis(50), &Executor::primary(), None);

    // Act - never complete the upstream

    // Assert
    assert!(wait_until(WAIT, || bounded.is_completed()).await);
    assert!(matches!(
        bounded.completion(),
        Some(Fallible::Failure(e)) if e.is_timeout()
    ));
}

#[test]
fn completion_before_the_deadline_wins() {
    // Arrange
    let promise = Promise::new();
    let bounded = promise
        .future()
        .timeout(Duration::from_secs(60), &Executor::primary(), None);

    // Act
    promise.succeed(5);

    // Assert - the value is in place and stays there
    assert!(matches!(bounded.completion(), Some(Fallible::Success(5))));
}

#[tokio::test]
async fn late_upstream_completion_is_dropped() {
    // Arrange
    let promise = Promise::new();
    let bounded = promise
        .future()
        .timeout(Duration::from_millis(30), &Executor::primary(), None);
    let recorder = EventRecorder::new();
    let _sub = bounded.on_complete(Executor::immediate(), recorder.callback());

    // Act - complete long after the deadline
    assert!(wait_until(WAIT, || bounded.is_completed()).await);
    promise.succeed(5);

    // Assert - exactly one terminal value, the timeout
    assert_eq!(recorder.len(), 1);
    assert!(matches!(
        &recorder.snapshot()[0],
        Fallible::Failure(e) if e.is_timeout()
    ));
}
