// Copyright 2026 Rill Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities for the Rill stream combinators.
//!
//! Provides channel-backed test sources, timeout-guarded assertion helpers
//! and an error-injecting stream wrapper. Development and testing only.

pub mod error_injection;
pub mod helpers;

use futures::{Stream, StreamExt};
use rill_core::{StreamError, StreamEvent};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

pub use error_injection::ErrorInjectingStream;

/// Creates a test channel whose stream side wraps each sent value in
/// `StreamEvent::Value`.
///
/// Dropping the sender ends the stream, which is how tests model a source
/// finishing normally.
pub fn test_channel<T: Send + 'static>() -> (
    mpsc::UnboundedSender<T>,
    impl Stream<Item = StreamEvent<T>> + Send,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx).map(StreamEvent::Value);
    (tx, stream)
}

/// Creates a test channel that carries `StreamEvent<T>` directly, so tests
/// can send failures explicitly.
pub fn test_channel_with_errors<T: Send + 'static>() -> (
    mpsc::UnboundedSender<StreamEvent<T>>,
    impl Stream<Item = StreamEvent<T>> + Send,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx);
    (tx, stream)
}

/// Like [`test_channel`] but generic over the failure type.
pub fn typed_test_channel<T, E>() -> (
    mpsc::UnboundedSender<StreamEvent<T, E>>,
    impl Stream<Item = StreamEvent<T, E>> + Send,
)
where
    T: Send + 'static,
    E: Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx);
    (tx, stream)
}

/// A finite source that yields the given values and then finishes.
pub fn value_stream<T: Send + 'static>(
    values: Vec<T>,
) -> impl Stream<Item = StreamEvent<T>> + Send {
    futures::stream::iter(values).map(StreamEvent::Value)
}

/// A finite source that yields the given values and then fails.
pub fn failing_stream<T: Send + 'static>(
    values: Vec<T>,
    error: StreamError,
) -> impl Stream<Item = StreamEvent<T>> + Send {
    futures::stream::iter(
        values
            .into_iter()
            .map(StreamEvent::Value)
            .chain(std::iter::once(StreamEvent::Error(error)))
            .collect::<Vec<_>>(),
    )
}
