// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for the Cascade reactive primitives.
//!
//! All failures travel through a single root [`CascadeError`] carried inside
//! a [`Fallible`](crate::Fallible) value. Besides errors raised by user
//! transforms, the library itself produces three kinds: cancellation,
//! dead-context and timeout failures.

/// Root error type for all Cascade operations.
#[derive(Debug, thiserror::Error)]
pub enum CascadeError {
    /// A cancellation token fired, or `cancel` was called on a promise or
    /// producer before it completed.
    #[error("operation was cancelled")]
    Cancelled,

    /// The weakly-held context of a contextual operation was dropped before
    /// the callback could run.
    #[error("context was deallocated before the operation ran")]
    ContextDeallocated,

    /// A time-based operation exceeded its deadline.
    #[error("timeout: {context}")]
    Timeout {
        /// Context about the timeout (e.g. the configured duration)
        context: String,
    },

    /// Custom error from user code.
    ///
    /// This wraps errors produced by user-provided transforms and callbacks,
    /// allowing them to propagate through a `Fallible` unchanged.
    #[error("user error: {0}")]
    User(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CascadeError {
    /// Create a timeout error with the given context
    pub fn timeout_error(context: impl Into<String>) -> Self {
        Self::Timeout {
            context: context.into(),
        }
    }

    /// Wrap a user error
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::User(Box::new(error))
    }

    /// `true` for the cancellation failure
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// `true` for the dead-context failure
    #[must_use]
    pub const fn is_context_deallocated(&self) -> bool {
        matches!(self, Self::ContextDeallocated)
    }

    /// `true` for the timeout failure
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// `true` for errors raised by user transforms
    #[must_use]
    pub const fn is_user(&self) -> bool {
        matches!(self, Self::User(_))
    }
}

/// Specialized Result type for Cascade operations
pub type Result<T> = std::result::Result<T, CascadeError>;

/// Stand-in for a boxed user error that could not be cloned.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct PreservedMessage(String);

impl Clone for CascadeError {
    fn clone(&self) -> Self {
        match self {
            Self::Cancelled => Self::Cancelled,
            Self::ContextDeallocated => Self::ContextDeallocated,
            Self::Timeout { context } => Self::Timeout {
                context: context.clone(),
            },
            // The boxed error itself can't be cloned; keep its message
            Self::User(e) => Self::User(Box::new(PreservedMessage(e.to_string()))),
        }
    }
}
