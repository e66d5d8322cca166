// Copyright 2026 Rill Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::{stream, Stream};
use rill_core::{StreamError, StreamEvent};
use rill_stream::combine_latest;
use rill_test_utils::helpers::{assert_stream_ended, unwrap_error, unwrap_stream, unwrap_value};
use rill_test_utils::{failing_stream, test_channel, test_channel_with_errors, ErrorInjectingStream};
use std::pin::Pin;

type BoxedSource = Pin<Box<dyn Stream<Item = StreamEvent<i32>> + Send>>;

#[tokio::test]
async fn test_source_failure_fails_combined_output() -> anyhow::Result<()> {
    // Arrange
    let (tx1, stream1) = test_channel_with_errors::<i32>();
    let (tx2, stream2) = test_channel_with_errors::<i32>();

    let mut result = combine_latest(vec![stream1, stream2]);

    // Act
    tx1.send(StreamEvent::Value(1))?;
    tx2.send(StreamEvent::Value(2))?;
    let values = unwrap_value(unwrap_stream(&mut result, 500).await);
    assert_eq!(values, vec![1, 2]);

    tx1.send(StreamEvent::Error(StreamError::stream_error("E1")))?;

    // Assert - the failure is the single terminal event
    let error = unwrap_error(unwrap_stream(&mut result, 500).await);
    assert_eq!(error.to_string(), "Stream processing error: E1");
    assert_stream_ended(&mut result, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_later_failure_does_not_overwrite_terminal_error() -> anyhow::Result<()> {
    // Arrange - A at index 0 fails first, B fails afterwards
    let (tx1, stream1) = test_channel_with_errors::<i32>();
    let (tx2, stream2) = test_channel_with_errors::<i32>();

    let mut result = combine_latest(vec![stream1, stream2]);

    // Act - both emit once, snapshot observed
    tx1.send(StreamEvent::Value(1))?;
    tx2.send(StreamEvent::Value(2))?;
    let values = unwrap_value(unwrap_stream(&mut result, 500).await);
    assert_eq!(values, vec![1, 2]);

    // Act - A's failure is applied first and latches the terminal event
    tx1.send(StreamEvent::Error(StreamError::stream_error("E1")))?;
    let error = unwrap_error(unwrap_stream(&mut result, 500).await);
    assert_eq!(error.to_string(), "Stream processing error: E1");

    // Act - B's failure arrives against an already-terminal output
    tx2.send(StreamEvent::Error(StreamError::stream_error("E2")))
        .ok();

    // Assert - exhausted, and it stays exhausted on repeated polls
    assert_stream_ended(&mut result, 500).await;
    assert_stream_ended(&mut result, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_failure_before_first_full_snapshot() -> anyhow::Result<()> {
    // Arrange - A fails before ever emitting a value
    let failing: BoxedSource =
        Box::pin(ErrorInjectingStream::new(stream::iter(Vec::<i32>::new()), 0));
    let (tx2, stream2) = test_channel::<i32>();
    let live: BoxedSource = Box::pin(stream2);

    let mut result = combine_latest(vec![failing, live]);

    // Act - the failure stays latent until every slot holds a first value
    tx2.send(10)?;

    // Assert - the terminal error arrives without any snapshot
    let error = unwrap_error(unwrap_stream(&mut result, 500).await);
    assert_eq!(
        error.to_string(),
        "Stream processing error: injected error at position 0"
    );
    assert_stream_ended(&mut result, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_failure_after_values_mid_stream() -> anyhow::Result<()> {
    // Arrange - A yields 1 then fails; B is a plain channel
    let failing: BoxedSource = Box::pin(failing_stream(
        vec![1],
        StreamError::stream_error("mid-stream"),
    ));
    let (tx2, stream2) = test_channel::<i32>();
    let live: BoxedSource = Box::pin(stream2);

    let mut result = combine_latest(vec![failing, live]);

    // Act - A has already emitted and failed by the time B emits
    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
    tx2.send(10)?;

    // Assert - A's slot already holds the failure, so no snapshot is formed
    let error = unwrap_error(unwrap_stream(&mut result, 500).await);
    assert_eq!(error.to_string(), "Stream processing error: mid-stream");
    assert_stream_ended(&mut result, 500).await;

    Ok(())
}
