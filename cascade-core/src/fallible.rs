// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::{CascadeError, Result};

/// A value that is either a success or a failure.
///
/// `Fallible` is the terminal value of a [`Future`](crate::Future) and the
/// completion of a [`Channel`](crate::Channel). Transform combinators use
/// [`try_map`](Fallible::try_map) to convert errors returned by user code
/// into failures that propagate downstream.
#[derive(Debug, Clone)]
pub enum Fallible<T> {
    /// A successful value
    Success(T),
    /// A failure that terminates the computation
    Failure(CascadeError),
}

impl<T: PartialEq> PartialEq for Fallible<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Fallible::Success(a), Fallible::Success(b)) => a == b,
            _ => false, // Failures are never equal
        }
    }
}

impl<T> Fallible<T> {
    /// Wraps a successful value.
    pub const fn success(value: T) -> Self {
        Fallible::Success(value)
    }

    /// Wraps a failure.
    pub const fn failure(error: CascadeError) -> Self {
        Fallible::Failure(error)
    }

    /// Returns `true` if this is a `Success`.
    pub const fn is_success(&self) -> bool {
        matches!(self, Fallible::Success(_))
    }

    /// Returns `true` if this is a `Failure`.
    pub const fn is_failure(&self) -> bool {
        matches!(self, Fallible::Failure(_))
    }

    /// Converts from `Fallible<T>` to `Option<T>`, discarding failures.
    pub fn ok(self) -> Option<T> {
        match self {
            Fallible::Success(v) => Some(v),
            Fallible::Failure(_) => None,
        }
    }

    /// Converts from `Fallible<T>` to `Option<CascadeError>`, discarding values.
    pub fn err(self) -> Option<CascadeError> {
        match self {
            Fallible::Success(_) => None,
            Fallible::Failure(e) => Some(e),
        }
    }

    /// Maps a `Fallible<T>` to `Fallible<U>` by applying a function to the
    /// contained value.
    ///
    /// Failures are propagated unchanged.
    pub fn map<U, F>(self, f: F) -> Fallible<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Fallible::Success(v) => Fallible::Success(f(v)),
            Fallible::Failure(e) => Fallible::Failure(e),
        }
    }

    /// Maps with a fallible function; an `Err` becomes a `Failure`.
    ///
    /// This is how transforms raised by user code turn into failures: the
    /// transform returns `Result` and the error is folded into the value.
    pub fn try_map<U, F>(self, f: F) -> Fallible<U>
    where
        F: FnOnce(T) -> Result<U>,
    {
        match self {
            Fallible::Success(v) => f(v).into(),
            Fallible::Failure(e) => Fallible::Failure(e),
        }
    }

    /// Maps a `Fallible<T>` to `Fallible<U>` by applying a function that
    /// itself returns a `Fallible`.
    ///
    /// Failures are propagated unchanged.
    pub fn and_then<U, F>(self, f: F) -> Fallible<U>
    where
        F: FnOnce(T) -> Fallible<U>,
    {
        match self {
            Fallible::Success(v) => f(v),
            Fallible::Failure(e) => Fallible::Failure(e),
        }
    }

    /// Converts a failure back into a success; successes pass through.
    pub fn recover<F>(self, f: F) -> Fallible<T>
    where
        F: FnOnce(CascadeError) -> T,
    {
        match self {
            Fallible::Success(v) => Fallible::Success(v),
            Fallible::Failure(e) => Fallible::Success(f(e)),
        }
    }

    /// Attempts to convert a failure back into a success; the recovery
    /// itself may fail.
    pub fn try_recover<F>(self, f: F) -> Fallible<T>
    where
        F: FnOnce(CascadeError) -> Result<T>,
    {
        match self {
            Fallible::Success(v) => Fallible::Success(v),
            Fallible::Failure(e) => f(e).into(),
        }
    }

    /// Returns the contained value, panicking if it's a failure.
    ///
    /// # Panics
    ///
    /// Panics if the value is a `Failure`.
    pub fn unwrap(self) -> T {
        match self {
            Fallible::Success(v) => v,
            Fallible::Failure(e) => {
                panic!("called `Fallible::unwrap()` on a `Failure` value: {e:?}")
            }
        }
    }

    /// Returns the contained value, panicking with a custom message if it's
    /// a failure.
    ///
    /// # Panics
    ///
    /// Panics with the provided message if the value is a `Failure`.
    pub fn expect(self, msg: &str) -> T {
        match self {
            Fallible::Success(v) => v,
            Fallible::Failure(e) => panic!("{msg}: {e:?}"),
        }
    }
}

impl<T> From<Result<T>> for Fallible<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(v) => Fallible::Success(v),
            Err(e) => Fallible::Failure(e),
        }
    }
}

impl<T> From<Fallible<T>> for Result<T> {
    fn from(fallible: Fallible<T>) -> Self {
        match fallible {
            Fallible::Success(v) => Ok(v),
            Fallible::Failure(e) => Err(e),
        }
    }
}
