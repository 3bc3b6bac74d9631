// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Time-based combinators for Cascade channels and futures.
//!
//! Everything here is built on
//! [`Executor::execute_after`](cascade_exec::Executor::execute_after): events
//! are re-dispatched through the shared deadline-ordered timer, so ordering
//! between delayed events follows their deadlines with FIFO tie-break.

pub mod debounce;
pub mod delayed;
pub mod timeout;

pub use debounce::DebounceExt;
pub use delayed::{DelayedExt, DelayedFutureExt};
pub use timeout::TimeoutExt;
