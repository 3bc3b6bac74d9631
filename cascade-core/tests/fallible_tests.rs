// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use cascade_core::{CascadeError, Fallible};

#[test]
fn map_transforms_success() {
    // Arrange
    let value = Fallible::success(2);

    // Act
    let mapped = value.map(|x| x + 1).map(|x| x * 10);

    // Assert
    assert_eq!(mapped, Fallible::Success(30));
}

#[test]
fn map_passes_failure_through() {
    // Arrange
    let value: Fallible<i32> = Fallible::failure(CascadeError::Cancelled);

    // Act
    let mapped = value.map(|x| x + 1);

    // Assert
    assert!(matches!(mapped, Fallible::Failure(e) if e.is_cancelled()));
}

#[test]
fn try_map_folds_errors_into_failure() {
    // Arrange
    let value = Fallible::success(2);

    // Act
    let mapped: Fallible<i32> = value.try_map(|_| Err(CascadeError::timeout_error("too slow")));

    // Assert
    assert!(matches!(mapped, Fallible::Failure(e) if e.is_timeout()));
}

#[test]
fn and_then_chains_fallibles() {
    // Arrange
    let value = Fallible::success(2);

    // Act
    let chained = value.and_then(|x| Fallible::success(x * 2));

    // Assert
    assert_eq!(chained, Fallible::Success(4));
}

#[test]
fn recover_converts_failure_to_success() {
    // Arrange
    let value: Fallible<i32> = Fallible::failure(CascadeError::Cancelled);

    // Act
    let recovered = value.recover(|_| 42);

    // Assert
    assert_eq!(recovered, Fallible::Success(42));
}

#[test]
fn recover_passes_success_through() {
    // Arrange
    let value = Fallible::success(7);

    // Act
    let recovered = value.recover(|_| 0);

    // Assert
    assert_eq!(recovered, Fallible::Success(7));
}

#[test]
fn ok_and_err_split_the_variants() {
    assert_eq!(Fallible::success(1).ok(), Some(1));
    assert_eq!(Fallible::<i32>::failure(CascadeError::Cancelled).ok(), None);
    assert!(Fallible::success(1).err().is_none());
    assert!(Fallible::<i32>::failure(CascadeError::Cancelled)
        .err()
        .is_some());
}

#[test]
fn failures_are_never_equal() {
    let a: Fallible<i32> = Fallible::failure(CascadeError::Cancelled);
    let b: Fallible<i32> = Fallible::failure(CascadeError::Cancelled);
    assert_ne!(a, b);
}

#[test]
fn converts_to_and_from_result() {
    // Arrange
    let ok: cascade_core::Result<i32> = Ok(3);

    // Act
    let fallible: Fallible<i32> = ok.into();
    let back: cascade_core::Result<i32> = fallible.into();

    // Assert
    assert_eq!(back.unwrap(), 3);
}

#[test]
#[should_panic(expected = "called `Fallible::unwrap()` on a `Failure` value")]
fn unwrap_panics_on_failure() {
    let value: Fallible<i32> = Fallible::failure(CascadeError::Cancelled);
    let _ = value.unwrap();
}
