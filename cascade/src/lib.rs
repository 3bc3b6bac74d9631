// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! # Cascade
//!
//! An executor-driven reactive composition library. Two primitives carry
//! every value:
//!
//! - [`Future`] / [`Promise`]: a single terminal [`Fallible`] value
//! - [`Channel`] / [`Producer`]: updates followed by exactly one completion
//!
//! Callbacks are dispatched onto [`Executor`]s, combinators stack on top of
//! each other while preserving cancellation, ordering and lifetime
//! contracts, and [`CancellationToken`]s fan a stop signal out to any
//! number of primitives.
//!
//! ## Quick start
//!
//! ```
//! use cascade::prelude::*;
//!
//! // A channel of sensor readings with a 4-element replay ring.
//! let producer = Producer::<i32, ()>::new(4);
//! let readings = producer.channel();
//!
//! // Compose: drop consecutive duplicates, then batch in pairs.
//! let batched = readings.distinct(None).buffered(2, None);
//! let _sub = batched.on_update(Executor::immediate(), |batch| {
//!     println!("batch: {batch:?}");
//! });
//!
//! producer.update(1);
//! producer.update(1); // filtered
//! producer.update(2); // emits [1, 2]
//! producer.succeed(());
//! ```

pub mod constructors;

// Re-export the primitives and their supporting machinery
pub use cascade_core::{
    Cancellable, CancellationToken, CascadeError, Channel, ChannelEvent, ExecutionContext,
    Executor, Fallible, Future, Producer, Promise, ReleasePool, Result, Subscription, Task,
    WeakProducer, WeakPromise,
};

// Re-export the combinators
pub use cascade_ops::{
    join_all, BufferedExt, BufferedPairsExt, DistinctExt, EnumeratedExt, FutureTransformExt,
    MapCompletionExt, MapExt, RecoverExt, ZipExt,
};
pub use cascade_time::{DebounceExt, DelayedExt, DelayedFutureExt, TimeoutExt};

pub use constructors::{
    channel, channel_ctx, future, future_after, future_ctx, future_failure, future_value,
    promise, promise_on,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::constructors::{
        channel, channel_ctx, future, future_after, future_ctx, future_failure, future_value,
        promise, promise_on,
    };
    pub use cascade_core::{
        Cancellable, CancellationToken, CascadeError, Channel, ChannelEvent, ExecutionContext,
        Executor, Fallible, Future, Producer, Promise, Subscription,
    };
    pub use cascade_ops::{
        join_all, BufferedExt, BufferedPairsExt, DistinctExt, EnumeratedExt, FutureTransformExt,
        MapCompletionExt, MapExt, RecoverExt, ZipExt,
    };
    pub use cascade_time::{DebounceExt, DelayedExt, DelayedFutureExt, TimeoutExt};
}
