// Copyright 2026 Rill Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Shared state machine behind `combine_latest`.
//!
//! One [`Aggregate`] is shared by every producer task of a `combine_latest`
//! instance. Each source event becomes a [`Slot`] transition applied under a
//! single lock; the transition stores the new slot, re-evaluates the whole
//! slot array in index order and decides whether to emit a snapshot, fail the
//! output, complete the output, or do nothing.

use parking_lot::Mutex;
use rill_core::StreamEvent;
use std::mem;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Per-source state within the aggregate.
///
/// `Failed` and `Done` are terminal: a producer task never applies another
/// transition for its slot after either of them.
#[derive(Debug)]
pub(crate) enum Slot<T, E> {
    /// No value observed from this source yet.
    Pending,
    /// Most recent value observed from this source.
    Latest(T),
    /// The source raised a failure.
    Failed(E),
    /// The source completed; carries the last value it ever emitted, if any.
    Done(Option<T>),
}

struct AggregateState<T, E> {
    slots: Vec<Slot<T, E>>,
    /// Producing end of the output channel. `None` once the output has
    /// terminated; every transition applied after that is a no-op.
    output: Option<UnboundedSender<StreamEvent<Vec<T>, E>>>,
}

pub(crate) struct Aggregate<T, E> {
    state: Mutex<AggregateState<T, E>>,
    cancel: CancellationToken,
}

/// Result of the index-ordered scan over all slots.
enum Verdict {
    /// A slot holds a failure; its index is recorded so the error can be
    /// moved out afterwards.
    Fail(usize),
    /// A slot finished without ever emitting; no snapshot can cover it.
    Complete,
    /// Every slot holds a value; the snapshot is viable.
    Viable,
}

impl<T, E> Aggregate<T, E>
where
    T: Clone,
{
    pub(crate) fn new(
        num_sources: usize,
        output: UnboundedSender<StreamEvent<Vec<T>, E>>,
        cancel: CancellationToken,
    ) -> Self {
        let mut slots = Vec::with_capacity(num_sources);
        slots.resize_with(num_sources, || Slot::Pending);
        Self {
            state: Mutex::new(AggregateState {
                slots,
                output: Some(output),
            }),
            cancel,
        }
    }

    pub(crate) fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Applies one slot transition and re-evaluates the combined state.
    ///
    /// The whole operation runs under the lock, including any send on the
    /// output channel, so snapshots leave in transition order and the
    /// first-failure-by-index rule is decided against a consistent view of
    /// all slots.
    pub(crate) fn apply(&self, index: usize, next: Slot<T, E>) {
        let mut state = self.state.lock();
        if state.output.is_none() {
            trace!(index, "transition after terminal event, ignoring");
            return;
        }

        let fresh_value = matches!(next, Slot::Latest(_));
        state.slots[index] = next;

        // No output of any kind until every source has produced a first value.
        if state.slots.iter().any(|slot| matches!(slot, Slot::Pending)) {
            return;
        }

        let mut snapshot = Vec::with_capacity(state.slots.len());
        let mut all_done = true;
        let mut verdict = Verdict::Viable;
        for (position, slot) in state.slots.iter().enumerate() {
            match slot {
                // Excluded by the scan above.
                Slot::Pending => return,
                Slot::Latest(value) => {
                    all_done = false;
                    snapshot.push(value.clone());
                }
                Slot::Done(Some(value)) => snapshot.push(value.clone()),
                Slot::Failed(_) => {
                    verdict = Verdict::Fail(position);
                    break;
                }
                Slot::Done(None) => {
                    verdict = Verdict::Complete;
                    break;
                }
            }
        }

        match verdict {
            Verdict::Fail(position) => {
                // Lowest-indexed failure wins; move the error out of its slot.
                match mem::replace(&mut state.slots[position], Slot::Done(None)) {
                    Slot::Failed(error) => {
                        debug!(index = position, "failing combined output");
                        self.terminate(&mut state, Some(error));
                    }
                    _ => unreachable!("slot held a failure during the scan"),
                }
            }
            Verdict::Complete => {
                debug!("source finished without emitting, completing output");
                self.terminate(&mut state, None);
            }
            Verdict::Viable if all_done => {
                // The final snapshot already went out when its last value
                // arrived; finishing alone never re-emits.
                debug!("all sources finished, completing output");
                self.terminate(&mut state, None);
            }
            Verdict::Viable => {
                if fresh_value {
                    trace!(index, "emitting combined snapshot");
                    if let Some(output) = &state.output {
                        let _ = output.send(StreamEvent::Value(snapshot));
                    }
                }
            }
        }
    }

    /// Delivers the single terminal event and stops all producers.
    ///
    /// Dropping the sender closes the channel; an error, when present, is
    /// sent first so the consumer observes it before exhaustion.
    fn terminate(&self, state: &mut AggregateState<T, E>, error: Option<E>) {
        if let Some(output) = state.output.take() {
            if let Some(error) = error {
                let _ = output.send(StreamEvent::Error(error));
            }
        }
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rill_core::StreamError;
    use tokio::sync::mpsc;
    use tokio::sync::mpsc::error::TryRecvError;

    fn aggregate(
        num_sources: usize,
    ) -> (
        Aggregate<i32, StreamError>,
        mpsc::UnboundedReceiver<StreamEvent<Vec<i32>, StreamError>>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Aggregate::new(num_sources, tx, CancellationToken::new()), rx)
    }

    #[test]
    fn holds_output_until_all_slots_have_values() {
        let (agg, mut rx) = aggregate(2);

        agg.apply(0, Slot::Latest(1));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

        agg.apply(1, Slot::Latest(10));
        let event = rx.try_recv().unwrap();
        assert_eq!(event.ok(), Some(vec![1, 10]));
    }

    #[test]
    fn done_slot_keeps_contributing_its_last_value() {
        let (agg, mut rx) = aggregate(2);

        agg.apply(0, Slot::Latest(1));
        agg.apply(1, Slot::Latest(10));
        assert_eq!(rx.try_recv().unwrap().ok(), Some(vec![1, 10]));

        // Finishing with a retained value emits nothing on its own.
        agg.apply(1, Slot::Done(Some(10)));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

        // The finished slot still contributes its last value to fresh snapshots.
        agg.apply(0, Slot::Latest(2));
        assert_eq!(rx.try_recv().unwrap().ok(), Some(vec![2, 10]));
    }

    #[test]
    fn finishing_with_a_prior_value_does_not_emit() {
        let (agg, mut rx) = aggregate(2);

        agg.apply(0, Slot::Latest(1));
        agg.apply(1, Slot::Latest(10));
        rx.try_recv().unwrap();

        agg.apply(1, Slot::Done(Some(10)));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn all_done_completes_without_re_emitting() {
        let (agg, mut rx) = aggregate(2);

        agg.apply(0, Slot::Latest(1));
        agg.apply(1, Slot::Latest(10));
        rx.try_recv().unwrap();

        agg.apply(0, Slot::Done(Some(1)));
        agg.apply(1, Slot::Done(Some(10)));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Disconnected)));
    }

    #[test]
    fn empty_finish_completes_once_all_slots_are_populated() {
        let (agg, mut rx) = aggregate(2);

        agg.apply(0, Slot::Done(None));
        // The other slot is still pending, so nothing terminates yet.
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

        agg.apply(1, Slot::Latest(5));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Disconnected)));
    }

    #[test]
    fn lowest_indexed_failure_wins() {
        let (agg, mut rx) = aggregate(2);

        agg.apply(0, Slot::Latest(1));
        agg.apply(1, Slot::Latest(2));
        assert_eq!(rx.try_recv().unwrap().ok(), Some(vec![1, 2]));

        agg.apply(0, Slot::Failed(StreamError::stream_error("E1")));
        let error = rx.try_recv().unwrap().err().unwrap();
        assert_eq!(error.to_string(), "Stream processing error: E1");

        // A later failure must not overwrite the latched terminal event.
        agg.apply(1, Slot::Failed(StreamError::stream_error("E2")));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Disconnected)));
    }

    #[test]
    fn latent_lower_index_failure_beats_earlier_higher_index_failure() {
        let (agg, mut rx) = aggregate(3);

        // The higher-indexed failure arrives first in time; both failures
        // stay latent while the third slot is still pending.
        agg.apply(1, Slot::Failed(StreamError::stream_error("E2")));
        agg.apply(0, Slot::Failed(StreamError::stream_error("E1")));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

        // The last first-value triggers one index-ordered scan, which must
        // surface the lowest-indexed failure, not the earliest.
        agg.apply(2, Slot::Latest(5));
        let error = rx.try_recv().unwrap().err().unwrap();
        assert_eq!(error.to_string(), "Stream processing error: E1");
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Disconnected)));
    }

    #[test]
    fn failure_scan_precedes_empty_finish_of_higher_slot() {
        let (agg, mut rx) = aggregate(2);

        agg.apply(1, Slot::Failed(StreamError::stream_error("E2")));
        // Slot 0 is still pending, so the failure stays latent.
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

        // Slot 0 finishing empty sits at a lower index than the failure; the
        // index-ordered scan reaches it first and completes normally.
        agg.apply(0, Slot::Done(None));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Disconnected)));
    }

    #[test]
    fn terminal_event_cancels_producers() {
        let (agg, _rx) = aggregate(1);
        let token = agg.cancel_token();
        assert!(!token.is_cancelled());

        agg.apply(0, Slot::Latest(1));
        agg.apply(0, Slot::Done(Some(1)));
        assert!(token.is_cancelled());
    }
}
