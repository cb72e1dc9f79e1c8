// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Drop catalogue models.

use serde::{Deserialize, Serialize};

/// A single collection log drop from an activity's drop table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropEntry {
    /// Item name as displayed (e.g., "Tanzanite fang")
    pub item_name: String,
    /// Per-completion drop probability (e.g., 1/1024)
    pub drop_rate: f64,
    /// Game item id, used for icons and loot matching (0 when unknown)
    #[serde(default)]
    pub item_id: i32,
    /// Rarity as the reference source prints it (e.g., "2/1,024")
    #[serde(default)]
    pub rarity_display: Option<String>,
}

/// All catalogued drops for one activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDrops {
    /// Display name of the activity (e.g., "Zulrah")
    #[serde(rename = "monsterName")]
    pub name: String,
    /// Reference page the drops were taken from
    #[serde(default)]
    pub wiki_page: String,
    /// Ordered drop list
    #[serde(default)]
    pub drops: Vec<DropEntry>,
}
