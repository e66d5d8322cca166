// Copyright 2026 Rill Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Stream wrapper that injects a failure at a configured position.

use futures::Stream;
use rill_core::{StreamError, StreamEvent};
use std::pin::Pin;
use std::task::{Context, Poll};

/// Wraps a stream of values and injects one `StreamEvent::Error` at the
/// given 0-indexed position, wrapping every other item in
/// `StreamEvent::Value`.
pub struct ErrorInjectingStream<S> {
    inner: S,
    inject_error_at: Option<usize>,
    count: usize,
}

impl<S> ErrorInjectingStream<S> {
    pub fn new(inner: S, inject_error_at: usize) -> Self {
        Self {
            inner,
            inject_error_at: Some(inject_error_at),
            count: 0,
        }
    }
}

impl<S, T> Stream for ErrorInjectingStream<S>
where
    S: Stream<Item = T> + Unpin,
{
    type Item = StreamEvent<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.inject_error_at == Some(this.count) {
            this.inject_error_at = None;
            this.count += 1;
            return Poll::Ready(Some(StreamEvent::Error(StreamError::stream_error(
                format!("injected error at position {}", this.count - 1),
            ))));
        }

        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(item)) => {
                this.count += 1;
                Poll::Ready(Some(StreamEvent::Value(item)))
            }
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}
