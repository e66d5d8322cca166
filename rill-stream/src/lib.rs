// Copyright 2026 Rill Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Stream combinators for Rill.
//!
//! The centerpiece is [`combine_latest`], which fans in an arbitrary number of
//! independently paced sources of a common element type and emits a snapshot
//! of the latest value from each source whenever any source produces a new
//! one. [`MapErrorExt::map_error`] is the companion adaptor that rewrites a
//! stream's failure type.

pub mod combine_latest;
pub mod map_error;

mod aggregate;

pub use self::combine_latest::{combine_latest, CombineLatest, CombineLatestExt};
pub use self::map_error::{map_error_impl, MapErrorExt};
