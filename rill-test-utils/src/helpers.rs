// Copyright 2026 Rill Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Timeout-guarded assertion helpers for stream tests.

use futures::{Stream, StreamExt};
use rill_core::StreamEvent;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Waits for the next event on the stream, panicking if nothing arrives
/// within `timeout_ms`.
pub async fn unwrap_stream<S, T, E>(stream: &mut S, timeout_ms: u64) -> StreamEvent<T, E>
where
    S: Stream<Item = StreamEvent<T, E>> + Unpin,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(Some(event)) => event,
        Ok(None) => panic!("stream ended while an event was expected"),
        Err(_) => panic!("no event within {timeout_ms}ms"),
    }
}

/// Extracts the value from an event, panicking on an error event.
pub fn unwrap_value<T, E>(event: StreamEvent<T, E>) -> T
where
    E: std::fmt::Debug,
{
    event.expect("expected a value event")
}

/// Extracts the error from an event, panicking on a value event.
pub fn unwrap_error<T, E>(event: StreamEvent<T, E>) -> E
where
    T: std::fmt::Debug,
{
    match event {
        StreamEvent::Error(e) => e,
        StreamEvent::Value(v) => panic!("expected an error event, got value {:?}", v),
    }
}

/// Asserts that the stream ends (yields `None`) within `timeout_ms`.
pub async fn assert_stream_ended<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(None) => {}
        Ok(Some(_)) => panic!("expected the stream to end, got an item"),
        Err(_) => panic!("stream did not end within {timeout_ms}ms"),
    }
}

/// Asserts that the stream stays silent for `timeout_ms`.
pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        item = stream.next() => {
            if item.is_some() {
                panic!("unexpected item emitted, expected no output");
            }
        }
        _ = sleep(Duration::from_millis(timeout_ms)) => {}
    }
}
