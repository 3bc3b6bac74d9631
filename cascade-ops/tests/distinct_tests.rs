// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use cascade_core::{Executor, Producer};
use cascade_ops::DistinctExt;
use cascade_test_utils::EventRecorder;

fn updates_of<U: Clone + Send + 'static, S: Clone + Send + 'static>(
    recorder: &EventRecorder<cascade_core::ChannelEvent<U, S>>,
) -> Vec<U> {
    recorder
        .snapshot()
        .iter()
        .filter_map(|e| e.clone().update())
        .collect()
}

#[test]
fn distinct_filters_consecutive_duplicates() {
    // Arrange
    let producer = Producer::<i32, ()>::new(0);
    let distinct = producer.channel().distinct(None);
    let recorder = EventRecorder::new();
    let _sub = distinct.on_event(Executor::immediate(), recorder.callback());

    // Act - send: 1, 1, 2, 2, 2, 3, 2
    for value in [1, 1, 2, 2, 2, 3, 2] {
        producer.update(value);
    }

    // Assert - output: 1, 2, 3, 2
    assert_eq!(updates_of(&recorder), vec![1, 2, 3, 2]);
}

#[test]
fn distinct_always_emits_the_first_update() {
    // Arrange
    let producer = Producer::<i32, ()>::new(0);
    let distinct = producer.channel().distinct(None);
    let recorder = EventRecorder::new();
    let _sub = distinct.on_event(Executor::immediate(), recorder.callback());

    // Act
    producer.update(7);

    // Assert
    assert_eq!(updates_of(&recorder), vec![7]);
}

#[test]
fn distinct_handles_optional_updates() {
    // Arrange
    let producer = Producer::<Option<i32>, ()>::new(0);
    let distinct = producer.channel().distinct(None);
    let recorder = EventRecorder::new();
    let _sub = distinct.on_event(Executor::immediate(), recorder.callback());

    // Act
    for value in [None, None, Some(1), Some(1), None] {
        producer.update(value);
    }

    // Assert
    assert_eq!(updates_of(&recorder), vec![None, Some(1), None]);
}

#[test]
fn distinct_handles_collection_updates() {
    // Arrange
    let producer = Producer::<Vec<i32>, ()>::new(0);
    let distinct = producer.channel().distinct(None);
    let recorder = EventRecorder::new();
    let _sub = distinct.on_event(Executor::immediate(), recorder.callback());

    // Act
    producer.update(vec![1, 2]);
    producer.update(vec![1, 2]);
    producer.update(vec![1, 2, 3]);

    // Assert
    assert_eq!(updates_of(&recorder), vec![vec![1, 2], vec![1, 2, 3]]);
}

#[test]
fn distinct_by_uses_the_supplied_equivalence() {
    // Arrange - compare case-insensitively
    let producer = Producer::<&'static str, ()>::new(0);
    let distinct = producer
        .channel()
        .distinct_by(|a, b| a.eq_ignore_ascii_case(b), None);
    let recorder = EventRecorder::new();
    let _sub = distinct.on_event(Executor::immediate(), recorder.callback());

    // Act
    for value in ["a", "A", "b", "B", "a"] {
        producer.update(value);
    }

    // Assert
    assert_eq!(updates_of(&recorder), vec!["a", "b", "a"]);
}

#[test]
fn distinct_output_is_a_subsequence_with_no_adjacent_equals() {
    // Arrange
    let producer = Producer::<i32, ()>::new(0);
    let distinct = producer.channel().distinct(None);
    let recorder = EventRecorder::new();
    let _sub = distinct.on_event(Executor::immediate(), recorder.callback());
    let input = vec![5, 5, 1, 1, 1, 2, 5, 5, 3, 3];

    // Act
    for value in &input {
        producer.update(*value);
    }

    // Assert
    let output = updates_of(&recorder);
    for window in output.windows(2) {
        assert_ne!(window[0], window[1]);
    }
    // Subsequence check: every output value is matched in input order.
    let mut input_iter = input.iter();
    for value in &output {
        assert!(input_iter.any(|candidate| candidate == value));
    }
}
