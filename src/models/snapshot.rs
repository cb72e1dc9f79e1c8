// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Serialized progress state exchanged with the persistence layer.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Current snapshot layout version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything needed to rebuild a `ProgressStore`.
///
/// All keys are normalized names. Ordered collections keep the saved file
/// stable between writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Layout version
    #[serde(default = "default_version")]
    pub version: u32,

    // ─── Counters ────────────────────────────────────────────────
    /// Total completions per activity
    #[serde(default)]
    pub total_counts: BTreeMap<String, u32>,
    /// Completions since any tracked drop, per activity
    #[serde(default)]
    pub count_since_drop: BTreeMap<String, u32>,
    /// Activity total at the moment an item was last obtained from it
    #[serde(default)]
    pub drop_snapshots: BTreeMap<String, BTreeMap<String, u32>>,

    // ─── Sets ────────────────────────────────────────────────────
    /// Items confirmed obtained
    #[serde(default)]
    pub obtained_items: BTreeSet<String>,
    /// Activities reported at least once by a full-state scrape
    #[serde(default)]
    pub verified_activities: BTreeSet<String>,

    // ─── Metadata ────────────────────────────────────────────────
    /// When this snapshot was taken (RFC 3339)
    #[serde(default)]
    pub saved_at: String,
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

impl Default for ProgressSnapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            total_counts: BTreeMap::new(),
            count_since_drop: BTreeMap::new(),
            drop_snapshots: BTreeMap::new(),
            obtained_items: BTreeSet::new(),
            verified_activities: BTreeSet::new(),
            saved_at: String::new(),
        }
    }
}
