// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// A small user error for exercising failure paths.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("test error: {0}")]
pub struct TestError(pub &'static str);
