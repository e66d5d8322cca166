// Copyright 2026 Rill Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Combine-latest fan-in over any number of sources.
//!
//! Each source runs in its own producer task, feeding slot transitions into a
//! shared aggregate behind a single lock. The output is a stream of
//! snapshots, each a `Vec` with the latest value from every source in source
//! order. Snapshots start once every source has emitted at least one value; a
//! new value from any source emits a new snapshot. A source failure fails the
//! output with the first failure in source-index order; a source finishing
//! without ever emitting completes the output, since no snapshot can cover
//! its slot.
//!
//! Dropping the output cancels every producer task.

use crate::aggregate::{Aggregate, Slot};
use futures::{Stream, StreamExt};
use rill_core::{IntoStream, StreamError, StreamEvent};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

type BoxedSource<T, E> = Pin<Box<dyn Stream<Item = StreamEvent<T, E>> + Send>>;

/// Output stream of [`combine_latest`].
///
/// Yields `StreamEvent::Value(Vec<T>)` snapshots and at most one
/// `StreamEvent::Error` before ending. Once ended it stays ended. Dropping
/// it cancels all producer tasks.
pub struct CombineLatest<T, E = StreamError> {
    receiver: mpsc::UnboundedReceiver<StreamEvent<Vec<T>, E>>,
    cancel: CancellationToken,
}

impl<T, E> std::fmt::Debug for CombineLatest<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombineLatest").finish_non_exhaustive()
    }
}

impl<T, E> Stream for CombineLatest<T, E> {
    type Item = StreamEvent<Vec<T>, E>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl<T, E> Drop for CombineLatest<T, E> {
    fn drop(&mut self) {
        // Consumer abandonment stops every producer task. Idempotent when
        // the output already terminated.
        self.cancel.cancel();
    }
}

/// Combines the latest values of an ordered collection of sources.
///
/// With zero sources the output completes immediately without emitting.
pub fn combine_latest<T, E, IS>(sources: Vec<IS>) -> CombineLatest<T, E>
where
    T: Clone + Send + 'static,
    E: Send + 'static,
    IS: IntoStream<Item = StreamEvent<T, E>>,
    IS::Stream: Send + 'static,
{
    let (sender, receiver) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();

    if sources.is_empty() {
        // Vacuously complete: there is no slot that could ever hold a value.
        drop(sender);
        return CombineLatest { receiver, cancel };
    }

    let aggregate = Arc::new(Aggregate::new(sources.len(), sender, cancel.clone()));
    for (index, source) in sources.into_iter().enumerate() {
        let source: BoxedSource<T, E> = Box::pin(source.into_stream());
        tokio::spawn(run_source(index, source, Arc::clone(&aggregate)));
    }

    CombineLatest { receiver, cancel }
}

/// Producer task: pulls one source to exhaustion or failure, translating
/// every event into a slot transition.
async fn run_source<T, E>(
    index: usize,
    mut source: BoxedSource<T, E>,
    aggregate: Arc<Aggregate<T, E>>,
) where
    T: Clone + Send + 'static,
    E: Send + 'static,
{
    let cancel = aggregate.cancel_token();
    let mut last_value = None;
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => {
                trace!(index, "producer task cancelled");
                return;
            }
            event = source.next() => event,
        };
        match event {
            Some(StreamEvent::Value(value)) => {
                last_value = Some(value.clone());
                aggregate.apply(index, Slot::Latest(value));
            }
            Some(StreamEvent::Error(error)) => {
                aggregate.apply(index, Slot::Failed(error));
                return;
            }
            None => {
                aggregate.apply(index, Slot::Done(last_value.take()));
                return;
            }
        }
    }
}

/// Extension trait providing `combine_latest` as a stream operator.
pub trait CombineLatestExt<T, E>: Stream<Item = StreamEvent<T, E>> + Sized
where
    T: Clone + Send + 'static,
    E: Send + 'static,
{
    /// Combines this stream with `others`, with this stream at index 0.
    ///
    /// See [`combine_latest`] for the emission and termination rules.
    fn combine_latest_with<IS>(self, others: Vec<IS>) -> CombineLatest<T, E>
    where
        IS: IntoStream<Item = StreamEvent<T, E>>,
        IS::Stream: Send + 'static;
}

impl<T, E, S> CombineLatestExt<T, E> for S
where
    T: Clone + Send + 'static,
    E: Send + 'static,
    S: Stream<Item = StreamEvent<T, E>> + Send + 'static,
{
    fn combine_latest_with<IS>(self, others: Vec<IS>) -> CombineLatest<T, E>
    where
        IS: IntoStream<Item = StreamEvent<T, E>>,
        IS::Stream: Send + 'static,
    {
        let mut sources: Vec<BoxedSource<T, E>> = Vec::with_capacity(others.len() + 1);
        sources.push(Box::pin(self));
        for other in others {
            sources.push(Box::pin(other.into_stream()));
        }
        combine_latest(sources)
    }
}
