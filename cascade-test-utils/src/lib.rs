// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Shared fixtures for Cascade tests.
//!
//! Production code never depends on this crate; it exists so the workspace's
//! integration tests record observed events and wait on cross-thread
//! delivery the same way everywhere.

pub mod helpers;
pub mod recorder;
pub mod test_error;

pub use helpers::wait_until;
pub use recorder::EventRecorder;
pub use test_error::TestError;
