// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Shared timer backing [`Executor::execute_after`](crate::Executor::execute_after).
//!
//! All delayed tasks in the process funnel through a single worker that fires
//! entries in deadline order, breaking ties by submission order. This is what
//! makes equally-delayed tasks fire in the order they were scheduled, a
//! property the `primary` executor guarantees and the delayed-dispatch
//! combinators rely on.

use crate::executor::Task;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::OnceLock;
use tokio::time::Instant;

struct TimerEntry {
    deadline: Instant,
    seq: u64,
    task: Task,
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for TimerEntry {}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerEntry {
    // Inverted so the max-heap pops the earliest deadline, FIFO on ties.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

fn sender() -> &'static async_channel::Sender<TimerEntry> {
    static SENDER: OnceLock<async_channel::Sender<TimerEntry>> = OnceLock::new();
    SENDER.get_or_init(|| {
        let (tx, rx) = async_channel::unbounded();
        let worker = crate::executor::shared_runtime()
            .handle()
            .spawn(timer_loop(rx));
        drop(worker);
        tx
    })
}

/// Schedules `task` to fire once `deadline` is reached.
///
/// The task runs on the timer worker itself; callers that need the task on a
/// particular queue wrap it in a closure that re-dispatches.
pub(crate) fn schedule(deadline: Instant, task: Task) {
    let entry = TimerEntry {
        deadline,
        seq: SEQUENCE.fetch_add(1, AtomicOrdering::Relaxed),
        task,
    };
    if sender().try_send(entry).is_err() {
        crate::warn!("cascade timer is gone; dropping a delayed task");
    }
}

async fn timer_loop(rx: async_channel::Receiver<TimerEntry>) {
    let mut pending: BinaryHeap<TimerEntry> = BinaryHeap::new();
    loop {
        match pending.peek() {
            None => match rx.recv().await {
                Ok(entry) => pending.push(entry),
                Err(_) => break,
            },
            Some(next) => {
                let deadline = next.deadline;
                tokio::select! {
                    biased;
                    () = tokio::time::sleep_until(deadline) => {
                        if let Some(entry) = pending.pop() {
                            (entry.task)();
                        }
                    }
                    received = rx.recv() => match received {
                        Ok(entry) => pending.push(entry),
                        Err(_) => break,
                    },
                }
            }
        }
    }
    // Channel closed: fire the remainder in deadline order.
    while let Some(entry) = pending.pop() {
        (entry.task)();
    }
}
