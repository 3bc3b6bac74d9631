// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! End-to-end scenarios composing primitives, combinators and executors.

use cascade::prelude::*;
use cascade_test_utils::{wait_until, EventRecorder};
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn racing_completion_and_subscription_delivers_exactly_once() {
    for _ in 0..50 {
        // Arrange
        let result = promise::<i32>(|promise| {
            let completer = promise.clone();
            std::thread::spawn(move || {
                completer.succeed(7);
            });
        });
        let recorder = EventRecorder::new();

        // Act - subscribe from another thread while completion races
        let future = result.clone();
        let callback = recorder.callback();
        let subscriber = std::thread::spawn(move || {
            future.on_complete(Executor::immediate(), callback).detach();
        });
        subscriber.join().unwrap();

        // Assert
        assert!(recorder.wait_for(1, WAIT).await, "callback never ran");
        assert_eq!(recorder.len(), 1);
        assert!(matches!(recorder.snapshot()[0], Fallible::Success(7)));
    }
}

#[test]
fn mapped_future_chain_composes_transforms() {
    // Arrange
    let future = future_value(2);

    // Act
    let chained = future.map(|x| x + 1, None).map(|x| x * 10, None);

    // Assert
    assert!(matches!(chained.completion(), Some(Fallible::Success(30))));
}

#[tokio::test]
async fn zip_of_constructed_futures_pairs_their_values() {
    // Arrange
    let a = future(&Executor::primary(), || Ok(1));
    let b = future(&Executor::primary(), || Ok("b"));

    // Act
    let zipped = a.zip(&b, None);

    // Assert
    assert!(wait_until(WAIT, || zipped.is_completed()).await);
    assert!(matches!(
        zipped.completion(),
        Some(Fallible::Success((1, "b")))
    ));
}

#[test]
fn pipeline_of_channel_combinators_composes() {
    // Arrange - distinct, then enumerate, then batch in pairs
    let producer = Producer::<i32, ()>::new(0);
    let pipeline = producer
        .channel()
        .distinct(None)
        .enumerated(None)
        .buffered(2, None);
    let recorder = EventRecorder::new();
    let _sub = pipeline.on_event(Executor::immediate(), recorder.callback());

    // Act
    for value in [1, 1, 2, 3, 3, 4] {
        producer.update(value);
    }
    producer.succeed(());

    // Assert - duplicates removed, indices attached, pairs batched
    let events = recorder.snapshot();
    let batches: Vec<Vec<(u64, i32)>> =
        events.iter().filter_map(|e| e.clone().update()).collect();
    assert_eq!(batches, vec![vec![(0, 1), (1, 2)], vec![(2, 3), (3, 4)]]);
    assert!(events.last().unwrap().is_completion());
}

#[tokio::test]
async fn debounce_scenario_first_then_latest_then_completion() {
    // Arrange - interval 100ms; updates at ~0, ~10, ~20; completion at ~300
    let producer = Producer::<i32, ()>::new(0);
    let debounced = producer
        .channel()
        .debounce(Duration::from_millis(100), &Executor::primary(), None);
    let recorder = EventRecorder::new();
    let _sub = debounced.on_event(Executor::immediate(), recorder.callback());

    // Act
    producer.update(1);
    tokio::time::sleep(Duration::from_millis(10)).await;
    producer.update(2);
    tokio::time::sleep(Duration::from_millis(10)).await;
    producer.update(3);
    tokio::time::sleep(Duration::from_millis(280)).await;
    producer.succeed(());

    // Assert - u1 immediately, u3 on the tick, then the completion
    assert!(recorder.wait_for(3, WAIT).await);
    let events = recorder.snapshot();
    let updates: Vec<i32> = events.iter().filter_map(|e| e.clone().update()).collect();
    assert_eq!(updates, vec![1, 3]);
    assert!(events.last().unwrap().is_completion());
}

#[test]
fn late_subscriber_scenario_ring_of_four() {
    // Arrange
    let producer = Producer::<i32, ()>::new(4);
    for i in 1..=5 {
        producer.update(i);
    }
    producer.succeed(());

    // Act
    let recorder = EventRecorder::new();
    let _sub = producer
        .channel()
        .on_event(Executor::immediate(), recorder.callback());

    // Assert
    let events = recorder.snapshot();
    let updates: Vec<i32> = events.iter().filter_map(|e| e.clone().update()).collect();
    assert_eq!(updates, vec![2, 3, 4, 5]);
    assert!(events.last().unwrap().is_completion());
}

#[test]
fn cancellation_scenario_token_beats_completion() {
    // Arrange
    let token = CancellationToken::new();
    let result = promise_on(
        &Executor::primary(),
        Duration::from_secs(60),
        Some(token.clone()),
        |promise: &Promise<i32>| {
            promise.succeed(9);
        },
    );

    // Act
    token.cancel();

    // Assert
    assert!(matches!(
        result.completion(),
        Some(Fallible::Failure(e)) if e.is_cancelled()
    ));
}

#[test]
fn recover_at_the_end_of_a_failing_pipeline() {
    // Arrange
    let producer = Producer::<i32, i32>::new(0);
    let pipeline = producer
        .channel()
        .try_map(
            |x| {
                if x > 2 {
                    Err(CascadeError::timeout_error("too many"))
                } else {
                    Ok(x)
                }
            },
            None,
        )
        .recover(|_| -1, None);
    let recorder = EventRecorder::new();
    let _sub = pipeline.on_event(Executor::immediate(), recorder.callback());

    // Act
    producer.update(1);
    producer.update(3);

    // Assert - the failure was converted into a successful completion
    let events = recorder.snapshot();
    assert!(matches!(
        events.last(),
        Some(ChannelEvent::Completion(Fallible::Success(-1)))
    ));
}

#[tokio::test]
async fn cross_executor_pipeline_preserves_per_subscriber_order() {
    // Arrange - updates hop through the pool on their way downstream
    let producer = Producer::<i32, ()>::new(0);
    let recorder = EventRecorder::new();
    let _sub = producer
        .channel()
        .map(|x| x * 2, None)
        .on_update(Executor::primary(), recorder.callback());

    // Act
    for i in 0..100 {
        producer.update(i);
    }

    // Assert - the handler mailbox serializes pool delivery
    assert!(recorder.wait_for(100, WAIT).await);
    let expected: Vec<i32> = (0..100).map(|i| i * 2).collect();
    assert_eq!(recorder.snapshot(), expected);
}

#[tokio::test]
async fn awaiting_a_combinator_chain() {
    // Arrange
    let base = future(&Executor::primary(), || Ok(20));

    // Act
    let doubled = base.map(|x| x * 2, None);

    // Assert
    assert!(matches!(doubled.await, Fallible::Success(40)));
}

#[tokio::test]
async fn join_all_over_constructed_futures() {
    // Arrange
    let futures: Vec<_> = (0..5)
        .map(|i| future(&Executor::primary(), move || Ok(i * i)))
        .collect();

    // Act
    let joined = join_all(futures, None);

    // Assert
    assert!(wait_until(WAIT, || joined.is_completed()).await);
    match joined.completion() {
        Some(Fallible::Success(values)) => assert_eq!(values, vec![0, 1, 4, 9, 16]),
        other => panic!("expected a success, got {other:?}"),
    }
}
