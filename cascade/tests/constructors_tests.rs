// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use cascade::prelude::*;
use cascade_test_utils::{wait_until, EventRecorder, TestError};
use std::sync::Arc;
use std::time::{Duration, Instant};

const WAIT: Duration = Duration::from_secs(5);

#[test]
fn future_value_invokes_on_success_exactly_once() {
    // Arrange
    let recorder = EventRecorder::new();
    let future = future_value(7);

    // Act
    let _sub = future.on_success(Executor::immediate(), recorder.callback());

    // Assert
    assert_eq!(recorder.snapshot(), vec![7]);
}

#[test]
fn future_failure_invokes_on_failure() {
    // Arrange
    let future = future_failure::<i32>(CascadeError::user_error(TestError("nope")));
    let recorder = EventRecorder::new();

    // Act
    let _sub = future.on_failure(Executor::immediate(), recorder.callback());

    // Assert
    assert_eq!(recorder.len(), 1);
    assert!(recorder.snapshot()[0].is_user());
}

#[tokio::test]
async fn future_runs_the_operation_on_the_executor() {
    // Arrange
    let caller = std::thread::current().id();

    // Act
    let future = future(&Executor::primary(), move || {
        Ok(std::thread::current().id())
    });

    // Assert
    assert!(wait_until(WAIT, || future.is_completed()).await);
    match future.completion() {
        Some(Fallible::Success(worker)) => assert_ne!(caller, worker),
        other => panic!("expected a success, got {other:?}"),
    }
}

#[tokio::test]
async fn future_after_respects_the_delay() {
    // Arrange
    let started = Instant::now();

    // Act
    let future = future_after(&Executor::primary(), Duration::from_millis(50), move || {
        Ok(Instant::now())
    });

    // Assert
    assert!(wait_until(WAIT, || future.is_completed()).await);
    match future.completion() {
        Some(Fallible::Success(ran_at)) => {
            assert!(ran_at.duration_since(started) >= Duration::from_millis(50));
        }
        other => panic!("expected a success, got {other:?}"),
    }
}

struct Service {
    factor: i32,
}

impl ExecutionContext for Service {
    fn executor(&self) -> Executor {
        Executor::immediate()
    }
}

#[test]
fn future_ctx_runs_with_a_live_context() {
    // Arrange
    let service = Arc::new(Service { factor: 3 });

    // Act
    let future = future_ctx(&service, |service| Ok(service.factor * 10));

    // Assert
    assert!(matches!(future.completion(), Some(Fallible::Success(30))));
}

struct QueueService {
    executor: Executor,
}

impl ExecutionContext for QueueService {
    fn executor(&self) -> Executor {
        self.executor.clone()
    }
}

#[tokio::test]
async fn future_ctx_fails_when_the_context_died() {
    // Arrange - hold the serial queue busy until the context is gone
    let executor = Executor::serial();
    let (gate_tx, gate_rx) = std::sync::mpsc::channel::<()>();
    executor.execute(Box::new(move || {
        let _ = gate_rx.recv();
    }));
    let service = Arc::new(QueueService { executor });

    // Act - the operation is queued behind the gate; the context dies first
    let future = future_ctx(&service, |_| Ok(1));
    drop(service);
    let _ = gate_tx.send(());

    // Assert
    assert!(wait_until(WAIT, || future.is_completed()).await);
    assert!(matches!(
        future.completion(),
        Some(Fallible::Failure(e)) if e.is_context_deallocated()
    ));
}

#[test]
fn promise_setup_completes_synchronously() {
    // Act
    let future = promise(|promise| {
        promise.succeed(5);
    });

    // Assert
    assert!(matches!(future.completion(), Some(Fallible::Success(5))));
}

#[test]
fn promise_without_completion_is_cancelled() {
    // Act - setup neither completes nor clones the promise
    let future = promise::<i32>(|_| {});

    // Assert
    assert!(matches!(
        future.completion(),
        Some(Fallible::Failure(e)) if e.is_cancelled()
    ));
}

#[tokio::test]
async fn promise_on_completes_from_the_executor() {
    // Act
    let future = promise_on(&Executor::primary(), Duration::ZERO, None, |promise| {
        promise.succeed(8);
    });

    // Assert
    assert!(wait_until(WAIT, || future.is_completed()).await);
    assert!(matches!(future.completion(), Some(Fallible::Success(8))));
}

#[test]
fn promise_on_honors_its_cancellation_token() {
    // Arrange - the setup task is delayed far beyond the test
    let token = CancellationToken::new();
    let future = promise_on(
        &Executor::primary(),
        Duration::from_secs(60),
        Some(token.clone()),
        |promise: &Promise<i32>| {
            promise.succeed(1);
        },
    );

    // Act
    token.cancel();

    // Assert
    assert!(matches!(
        future.completion(),
        Some(Fallible::Failure(e)) if e.is_cancelled()
    ));
}

#[test]
fn channel_pushes_updates_then_completes() {
    // Arrange & Act
    let numbers = channel::<i32, &str, _>(&Executor::immediate(), 8, |push| {
        push(1);
        push(2);
        push(3);
        Ok("done")
    });

    // Assert - the replay ring serves a late subscriber
    let recorder = EventRecorder::new();
    let _sub = numbers.on_event(Executor::immediate(), recorder.callback());
    let events = recorder.snapshot();
    let updates: Vec<i32> = events.iter().filter_map(|e| e.clone().update()).collect();
    assert_eq!(updates, vec![1, 2, 3]);
    assert!(matches!(
        events.last(),
        Some(ChannelEvent::Completion(Fallible::Success("done")))
    ));
}

#[test]
fn channel_operation_error_fails_the_channel() {
    // Act
    let numbers = channel::<i32, i32, _>(&Executor::immediate(), 0, |push| {
        push(1);
        Err(CascadeError::user_error(TestError("boom")))
    });

    // Assert
    assert!(matches!(
        numbers.completion(),
        Some(Fallible::Failure(e)) if e.is_user()
    ));
}

#[tokio::test]
async fn channel_ctx_fails_when_the_context_died() {
    // Arrange - hold the serial queue busy until the context is gone
    let executor = Executor::serial();
    let (gate_tx, gate_rx) = std::sync::mpsc::channel::<()>();
    executor.execute(Box::new(move || {
        let _ = gate_rx.recv();
    }));
    let service = Arc::new(QueueService { executor });

    // Act
    let stream = channel_ctx::<_, i32, i32, _>(&service, 0, |_, push| {
        push(1);
        Ok(0)
    });
    drop(service);
    let _ = gate_tx.send(());

    // Assert
    assert!(wait_until(WAIT, || stream.is_closed()).await);
    assert!(matches!(
        stream.completion(),
        Some(Fallible::Failure(e)) if e.is_context_deallocated()
    ));
}

#[test]
fn channel_ctx_runs_with_a_live_context() {
    // Arrange
    let service = Arc::new(Service { factor: 2 });

    // Act
    let stream = channel_ctx::<_, i32, (), _>(&service, 4, |service, push| {
        push(service.factor);
        push(service.factor * 2);
        Ok(())
    });

    // Assert
    let recorder = EventRecorder::new();
    let _sub = stream.on_event(Executor::immediate(), recorder.callback());
    let updates: Vec<i32> = recorder
        .snapshot()
        .iter()
        .filter_map(|e| e.clone().update())
        .collect();
    assert_eq!(updates, vec![2, 4]);
}
