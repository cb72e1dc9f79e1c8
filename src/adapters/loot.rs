// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Loot adapter.
//!
//! A loot notification is the approximate completion source: one per
//! completion, no count attached. It also reveals collection log drops when
//! a received item matches the source's catalogue entry.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{normalize_key, SourceEvent};
use crate::services::catalogue::Catalogue;

/// One stack of received loot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootItem {
    /// Game item id (0 when unknown)
    #[serde(default)]
    pub id: i32,
    pub name: String,
}

/// A loot notification from the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootRecord {
    /// Loot source (NPC name, raid, minigame reward)
    pub source: String,
    /// Whether this notification stands for one completion. Hosts that
    /// report the same loot twice (e.g., an NPC-specific and a generic
    /// notification) set this on only one of them.
    #[serde(default = "default_counts_completion")]
    pub counts_completion: bool,
    #[serde(default)]
    pub items: Vec<LootItem>,
}

fn default_counts_completion() -> bool {
    true
}

/// Activity name a loot source is tracked under: the catalogue's display
/// name when the source resolves (e.g., "The Nightmare" -> "Nightmare"),
/// otherwise the source as given.
pub fn loot_activity(source: &str, catalogue: &dyn Catalogue) -> String {
    let source = source.trim();
    match catalogue.drops_for(source) {
        Some(drops) => drops.name.clone(),
        None => source.to_string(),
    }
}

/// Translate a loot record into events.
///
/// Emits one `ApproximateCompletion` when the record counts a completion,
/// then an `ItemObtainedSignal` for every catalogued drop of the source that was
/// received and is not already obtained. Both are attributed to the
/// catalogue's name for the source so they pair with chat counts.
pub fn loot_events(
    record: &LootRecord,
    catalogue: &dyn Catalogue,
    is_obtained: impl Fn(&str) -> bool,
) -> Vec<SourceEvent> {
    let source = record.source.trim();
    if source.is_empty() {
        tracing::debug!("Dropping loot record without a source");
        return Vec::new();
    }

    let drops = catalogue.drops_for(source);
    let activity = drops
        .as_ref()
        .map_or_else(|| source.to_string(), |d| d.name.clone());

    let mut events = Vec::new();
    if record.counts_completion {
        events.push(SourceEvent::ApproximateCompletion {
            activity: activity.clone(),
        });
    }

    let Some(drops) = drops else {
        return events;
    };

    let received_ids: HashSet<i32> = record
        .items
        .iter()
        .map(|i| i.id)
        .filter(|id| *id > 0)
        .collect();
    let received_names: HashSet<String> = record
        .items
        .iter()
        .filter_map(|i| normalize_key(&i.name))
        .collect();

    for entry in &drops.drops {
        if is_obtained(&entry.item_name) {
            continue;
        }

        let by_id = entry.item_id > 0 && received_ids.contains(&entry.item_id);
        let by_name =
            normalize_key(&entry.item_name).is_some_and(|name| received_names.contains(&name));

        if by_id || by_name {
            tracing::info!(item = %entry.item_name, %activity, "Collection log drop detected from loot");
            events.push(SourceEvent::ItemObtainedSignal {
                item: entry.item_name.clone(),
                activity: Some(activity.clone()),
            });
        }
    }

    events
}
