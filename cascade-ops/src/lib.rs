// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Value combinators for Cascade channels and futures.
//!
//! Every channel combinator follows the same plumbing: it subscribes to the
//! upstream with the `immediate` executor, creates a downstream producer
//! with the upstream's buffer size, parks the upstream subscription in the
//! downstream's release pool and writes through an uncounted weak handle.
//! Dropping the downstream therefore tears the chain down, and completing
//! it releases the upstream subscription.
//!
//! Each combinator also accepts an optional
//! [`CancellationToken`](cascade_core::CancellationToken); when the token
//! fires, the downstream completes with a cancellation failure.

pub mod buffered;
pub mod buffered_pairs;
pub mod distinct;
pub mod enumerated;
pub mod future_ext;
pub mod join_all;
pub mod map;
pub mod map_completion;
pub mod recover;
pub mod zip;

pub use buffered::BufferedExt;
pub use buffered_pairs::BufferedPairsExt;
pub use distinct::DistinctExt;
pub use enumerated::EnumeratedExt;
pub use future_ext::FutureTransformExt;
pub use join_all::join_all;
pub use map::MapExt;
pub use map_completion::MapCompletionExt;
pub use recover::RecoverExt;
pub use zip::ZipExt;
