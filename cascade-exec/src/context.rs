// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::Executor;

/// An object that owns an execution context.
///
/// Contextual operations (`future_ctx`, `on_event_ctx`, ...) bind a callback
/// to a weakly-held owner: the callback runs on the owner's executor and is
/// skipped, or the operation fails with `ContextDeallocated`, if the owner
/// has been dropped by the time the callback would run.
///
/// Typical implementors are long-lived service objects that process their
/// events on a private serial queue:
///
/// ```
/// use cascade_exec::{ExecutionContext, Executor};
///
/// struct Service {
///     executor: Executor,
/// }
///
/// impl ExecutionContext for Service {
///     fn executor(&self) -> Executor {
///         self.executor.clone()
///     }
/// }
/// ```
pub trait ExecutionContext: Send + Sync + 'static {
    /// The executor contextual callbacks are dispatched on.
    fn executor(&self) -> Executor;
}
