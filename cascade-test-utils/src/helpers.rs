// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Polls `predicate` until it holds, giving up after `limit`.
///
/// Returns `true` if the predicate held within the limit.
pub async fn wait_until(limit: Duration, predicate: impl Fn() -> bool) -> bool {
    timeout(limit, async {
        while !predicate() {
            sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .is_ok()
}
