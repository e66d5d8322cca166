// Copyright 2026 Rill Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error-remapping adaptor.
//!
//! Wraps a single upstream stream and rewrites every failure it raises
//! through a transform function, leaving values and their order untouched.
//! Because the failure type is a parameter of [`StreamEvent`], the same
//! adaptor serves both dynamic ([`DynError`](rill_core::DynError) /
//! [`StreamError`](rill_core::StreamError)) and statically-typed failure
//! channels.

use futures::{Stream, StreamExt};
use rill_core::StreamEvent;
use std::pin::Pin;

/// Rewrites each failure in the stream with `transform`.
///
/// Values are forwarded unchanged; there is no shared state beyond the
/// delegation itself.
pub fn map_error_impl<S, T, E, E2, F>(
    stream: S,
    mut transform: F,
) -> impl Stream<Item = StreamEvent<T, E2>>
where
    S: Stream<Item = StreamEvent<T, E>>,
    F: FnMut(E) -> E2,
{
    stream.map(move |event| event.map_err(&mut transform))
}

/// Extension trait providing `map_error` as a stream operator.
pub trait MapErrorExt<T, E>: Stream<Item = StreamEvent<T, E>> + Sized
where
    T: 'static,
    E: 'static,
{
    /// Transforms every failure raised by this stream, preserving values.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let stream = source.map_error(|io_err| StreamError::user_error(io_err));
    /// ```
    fn map_error<E2, F>(
        self,
        transform: F,
    ) -> Pin<Box<dyn Stream<Item = StreamEvent<T, E2>> + Send>>
    where
        E2: 'static,
        F: FnMut(E) -> E2 + Send + 'static;
}

impl<T, E, S> MapErrorExt<T, E> for S
where
    T: 'static,
    E: 'static,
    S: Stream<Item = StreamEvent<T, E>> + Send + 'static,
{
    fn map_error<E2, F>(
        self,
        transform: F,
    ) -> Pin<Box<dyn Stream<Item = StreamEvent<T, E2>> + Send>>
    where
        E2: 'static,
        F: FnMut(E) -> E2 + Send + 'static,
    {
        Box::pin(map_error_impl(self, transform))
    }
}
