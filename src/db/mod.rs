// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence layer.
//!
//! The tracker only needs wholesale load/save of a [`ProgressSnapshot`];
//! where and how it is stored is up to the repository.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileRepository;
pub use memory::MemoryRepository;

use crate::error::Result;
use crate::models::ProgressSnapshot;

/// Load/save contract for persisted progress.
pub trait StateRepository: Send + Sync {
    /// Load the saved snapshot, or `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<ProgressSnapshot>>;

    /// Replace the saved snapshot.
    fn save(&self, snapshot: &ProgressSnapshot) -> Result<()>;
}
