// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::time::Instant;

/// A unit of work dispatched onto an [`Executor`].
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// A cheap, cloneable handle to an execution context.
///
/// Executors are where the Cascade primitives run user callbacks. The library
/// itself never blocks; an executor only ever receives tasks that were
/// prepared outside any critical section.
///
/// # Built-in executors
///
/// - [`Executor::immediate`] runs tasks synchronously on the caller's thread.
///   Combinators use it for transforms that must not cross a thread hop.
/// - [`Executor::primary`] dispatches onto a shared background pool.
/// - [`Executor::main`] is a process-wide serial queue.
/// - [`Executor::serial`] creates a fresh private serial queue.
/// - [`Executor::queue`] wraps a caller-supplied dispatch function, which is
///   how external pools and queues are plugged in.
///
/// # Delayed dispatch
///
/// [`execute_after`](Executor::execute_after) schedules through a shared
/// timer that fires in strict deadline order with FIFO tie-break. Tasks
/// delayed onto `immediate` or `primary` run on the timer worker itself, so
/// long-running delayed work should re-dispatch. Tasks delayed onto a serial
/// or caller-supplied queue are enqueued there when the deadline elapses.
///
/// # Example
///
/// ```
/// use cascade_exec::Executor;
///
/// let executor = Executor::serial();
/// executor.execute(Box::new(|| println!("runs on the serial queue")));
/// ```
#[derive(Clone)]
pub struct Executor {
    kind: Arc<Kind>,
}

enum Kind {
    Immediate,
    Runtime(tokio::runtime::Handle),
    Serial(async_channel::Sender<Task>),
    Custom(Box<dyn Fn(Task) + Send + Sync>),
}

/// The runtime backing `primary`, `main` and the shared timer.
///
/// Built lazily on first use and kept for the lifetime of the process.
pub(crate) fn shared_runtime() -> &'static tokio::runtime::Runtime {
    static RUNTIME: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
    RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .enable_time()
            .thread_name("cascade-worker")
            .build()
            .expect("failed to build the shared cascade runtime")
    })
}

impl Executor {
    /// Runs tasks synchronously, inline on the calling thread.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            kind: Arc::new(Kind::Immediate),
        }
    }

    /// The shared background pool. Tasks may run concurrently on any worker.
    #[must_use]
    pub fn primary() -> Self {
        Self {
            kind: Arc::new(Kind::Runtime(shared_runtime().handle().clone())),
        }
    }

    /// The process-wide serial queue. Tasks run one at a time, in FIFO order.
    #[must_use]
    pub fn main() -> Self {
        static MAIN: OnceLock<Executor> = OnceLock::new();
        MAIN.get_or_init(Executor::serial).clone()
    }

    /// Creates a private serial queue.
    ///
    /// Tasks run one at a time in submission order. The queue's worker shuts
    /// down once every clone of the returned executor has been dropped;
    /// tasks submitted before that point still run.
    #[must_use]
    pub fn serial() -> Self {
        let (tx, rx) = async_channel::unbounded::<Task>();
        let worker = shared_runtime().handle().spawn(async move {
            while let Ok(task) = rx.recv().await {
                task();
            }
        });
        drop(worker);
        Self {
            kind: Arc::new(Kind::Serial(tx)),
        }
    }

    /// Wraps a caller-supplied dispatch function.
    ///
    /// `dispatch` receives each task and decides where it runs. Ordering and
    /// concurrency are whatever the caller's queue provides. The function
    /// must be safe to call from any thread.
    #[must_use]
    pub fn queue(dispatch: impl Fn(Task) + Send + Sync + 'static) -> Self {
        Self {
            kind: Arc::new(Kind::Custom(Box::new(dispatch))),
        }
    }

    /// Schedules `task` to run later, possibly on another thread.
    ///
    /// On `immediate` the task runs before this call returns.
    pub fn execute(&self, task: Task) {
        match &*self.kind {
            Kind::Immediate => task(),
            Kind::Runtime(handle) => {
                handle.spawn(async move { task() });
            }
            Kind::Serial(tx) => {
                if tx.try_send(task).is_err() {
                    crate::warn!("serial queue worker is gone; dropping a task");
                }
            }
            Kind::Custom(dispatch) => dispatch(task),
        }
    }

    /// Schedules `task` to run after at least `delay` of wall-clock time.
    pub fn execute_after(&self, delay: Duration, task: Task) {
        let deadline = Instant::now() + delay;
        match &*self.kind {
            Kind::Immediate | Kind::Runtime(_) => crate::timer::schedule(deadline, task),
            Kind::Serial(tx) => {
                let tx = tx.clone();
                crate::timer::schedule(
                    deadline,
                    Box::new(move || {
                        if tx.try_send(task).is_err() {
                            crate::warn!("serial queue worker is gone; dropping a delayed task");
                        }
                    }),
                );
            }
            Kind::Custom(_) => {
                let executor = self.clone();
                crate::timer::schedule(deadline, Box::new(move || executor.execute(task)));
            }
        }
    }

    /// `true` if `execute` runs tasks inline on the calling thread.
    #[must_use]
    pub fn is_immediate(&self) -> bool {
        matches!(&*self.kind, Kind::Immediate)
    }
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &*self.kind {
            Kind::Immediate => "immediate",
            Kind::Runtime(_) => "runtime",
            Kind::Serial(_) => "serial",
            Kind::Custom(_) => "custom",
        };
        f.debug_struct("Executor").field("kind", &kind).finish()
    }
}
