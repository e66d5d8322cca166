// Copyright 2026 Rill Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::Stream;

/// A trait for types that can be converted into a `Stream`.
///
/// Operators accept `IntoStream` rather than `Stream` directly so that
/// channels and other stream-like wrappers can be passed without explicit
/// conversion at the call site.
pub trait IntoStream {
    /// The type of items in the stream.
    type Item;
    /// The stream type that this object can be converted into.
    type Stream: Stream<Item = Self::Item>;

    /// Converts this object into a stream.
    fn into_stream(self) -> Self::Stream;
}

/// Blanket implementation for any type that is already a `Stream`.
impl<S> IntoStream for S
where
    S: Stream,
{
    type Item = S::Item;
    type Stream = S;

    fn into_stream(self) -> Self::Stream {
        self
    }
}
