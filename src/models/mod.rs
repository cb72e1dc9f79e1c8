// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the tracker.

pub mod drop;
pub mod event;
pub mod name;
pub mod snapshot;

pub use drop::{ActivityDrops, DropEntry};
pub use event::{ItemObservation, SourceEvent};
pub use name::normalize_key;
pub use snapshot::ProgressSnapshot;
