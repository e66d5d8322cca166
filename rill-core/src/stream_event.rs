// Copyright 2026 Rill Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::StreamError;

/// A stream item that is either a value or a failure.
///
/// Rill streams carry `StreamEvent` items so that operators can propagate
/// failures in-band, following Rx-style semantics where an error terminates
/// the sequence. The failure type defaults to [`StreamError`] but can be any
/// type, which is how operators support both dynamic and statically-typed
/// failure channels.
#[derive(Debug, Clone)]
pub enum StreamEvent<T, E = StreamError> {
    /// A successful value
    Value(T),
    /// A failure that terminates the stream
    Error(E),
}

impl<T, E> StreamEvent<T, E> {
    /// Returns `true` if this is a `Value`.
    pub const fn is_value(&self) -> bool {
        matches!(self, StreamEvent::Value(_))
    }

    /// Returns `true` if this is an `Error`.
    pub const fn is_error(&self) -> bool {
        matches!(self, StreamEvent::Error(_))
    }

    /// Converts to `Option<T>`, discarding a failure.
    pub fn ok(self) -> Option<T> {
        match self {
            StreamEvent::Value(v) => Some(v),
            StreamEvent::Error(_) => None,
        }
    }

    /// Converts to `Option<E>`, discarding a value.
    pub fn err(self) -> Option<E> {
        match self {
            StreamEvent::Value(_) => None,
            StreamEvent::Error(e) => Some(e),
        }
    }

    /// Maps the contained value, passing failures through unchanged.
    pub fn map<U, F>(self, f: F) -> StreamEvent<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            StreamEvent::Value(v) => StreamEvent::Value(f(v)),
            StreamEvent::Error(e) => StreamEvent::Error(e),
        }
    }

    /// Maps the contained failure, passing values through unchanged.
    pub fn map_err<E2, F>(self, f: F) -> StreamEvent<T, E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            StreamEvent::Value(v) => StreamEvent::Value(v),
            StreamEvent::Error(e) => StreamEvent::Error(f(e)),
        }
    }

    /// Returns the contained value.
    ///
    /// # Panics
    ///
    /// Panics if the event is an `Error`.
    pub fn unwrap(self) -> T
    where
        E: std::fmt::Debug,
    {
        match self {
            StreamEvent::Value(v) => v,
            StreamEvent::Error(e) => {
                panic!("called `StreamEvent::unwrap()` on an `Error` value: {:?}", e)
            }
        }
    }

    /// Returns the contained value, panicking with a custom message on error.
    ///
    /// # Panics
    ///
    /// Panics with the provided message if the event is an `Error`.
    pub fn expect(self, msg: &str) -> T
    where
        E: std::fmt::Debug,
    {
        match self {
            StreamEvent::Value(v) => v,
            StreamEvent::Error(e) => panic!("{}: {:?}", msg, e),
        }
    }
}

impl<T: PartialEq, E> PartialEq for StreamEvent<T, E> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StreamEvent::Value(a), StreamEvent::Value(b)) => a == b,
            _ => false, // Errors are never equal
        }
    }
}

impl<T, E> From<Result<T, E>> for StreamEvent<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(v) => StreamEvent::Value(v),
            Err(e) => StreamEvent::Error(e),
        }
    }
}

impl<T, E> From<StreamEvent<T, E>> for Result<T, E> {
    fn from(event: StreamEvent<T, E>) -> Self {
        match event {
            StreamEvent::Value(v) => Ok(v),
            StreamEvent::Error(e) => Err(e),
        }
    }
}
