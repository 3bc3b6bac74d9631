// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Core reactive primitives for Cascade.
//!
//! Two primitives carry all values in a Cascade program:
//!
//! - [`Promise`] / [`Future`]: a single terminal [`Fallible`] value.
//! - [`Producer`] / [`Channel`]: zero or more updates followed by exactly
//!   one terminal completion, with a bounded replay ring for late
//!   subscribers.
//!
//! Around them sit the supporting machinery: [`CancellationToken`] for
//! fan-out cancellation, [`ReleasePool`] for lifetime plumbing, and the
//! [`Subscription`] handles that own callback registrations. Callbacks are
//! dispatched through [`Executor`]s from the `cascade-exec` crate; the
//! combinators live in `cascade-ops` and `cascade-time`.

pub mod cancellation_token;
pub mod channel;
pub mod error;
pub mod fallible;
pub mod future;
pub mod release_pool;

mod handler;
mod head;

// Re-export commonly used types
pub use cancellation_token::{Cancellable, CancellationToken};
pub use channel::{Channel, ChannelEvent, Producer, WeakProducer};
pub use error::{CascadeError, Result};
pub use fallible::Fallible;
pub use future::{Future, Promise, WeakPromise};
pub use handler::Subscription;
pub use release_pool::ReleasePool;

// Re-export the executor surface so users of the primitives don't need a
// separate cascade-exec dependency.
pub use cascade_exec::{ExecutionContext, Executor, Task};
