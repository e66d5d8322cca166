// Copyright 2026 Rill Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for Rill stream processing.
//!
//! [`StreamError`] is the default failure type carried by
//! [`StreamEvent`](crate::StreamEvent). Operators are generic over the
//! failure type, so callers with a precisely-typed error can use their own
//! type instead; `StreamError` serves the fully dynamic case.

/// A boxed, type-erased error for fully dynamic failure channels.
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Default error type for Rill stream operations.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// Stream processing encountered an error.
    ///
    /// General-purpose variant for failures raised by the combinators
    /// themselves or injected by tests.
    #[error("Stream processing error: {context}")]
    StreamProcessingError {
        /// Description of what went wrong during stream processing
        context: String,
    },

    /// Custom error from user code.
    ///
    /// Wraps errors produced by sources or user-provided callbacks so they
    /// can travel through the stream unchanged.
    #[error("User error: {0}")]
    UserError(#[source] DynError),
}

impl StreamError {
    /// Create a stream processing error with the given context.
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    /// Wrap a user error.
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Box::new(error))
    }
}
