// Copyright 2026 Rill Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core vocabulary types for the Rill stream combinators.
//!
//! Everything in this crate is runtime-independent: the [`StreamEvent`] item
//! type carried by every Rill stream, the [`StreamError`] default failure
//! type, and the [`IntoStream`] conversion trait that lets operators accept
//! channels and other stream-like inputs uniformly.

pub mod error;
pub mod into_stream;
pub mod stream_event;

pub use self::error::{DynError, StreamError};
pub use self::into_stream::IntoStream;
pub use self::stream_event::StreamEvent;
