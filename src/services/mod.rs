// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod catalogue;
pub mod persistence;
pub mod probability;
pub mod reconciler;
pub mod report;
pub mod store;
pub mod tracker;

pub use catalogue::{Catalogue, DropCatalogue};
pub use persistence::PersistHandle;
pub use probability::PercentPolicy;
pub use reconciler::SourceReconciler;
pub use report::{DropRow, DryReport, ReportOptions};
pub use store::ProgressStore;
pub use tracker::{ImportSummary, Tracker};
