// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Executors for the Cascade reactive primitives.
//!
//! An [`Executor`] is a cheap, cloneable handle onto which the Cascade
//! primitives dispatch their callbacks. This crate provides the built-in
//! executors (`immediate`, `primary`, `main`, per-instance serial queues and
//! caller-supplied queues) together with the shared timer that backs delayed
//! dispatch.
//!
//! The primitives themselves never block: everything an executor receives is
//! a boxed task that was prepared under a short critical section elsewhere.

pub mod context;
pub mod executor;
pub mod logging;

mod timer;

pub use context::ExecutionContext;
pub use executor::{Executor, Task};
