// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Source events consumed by the reconciler.
//!
//! Each variant comes from a different source adapter. Names are carried as
//! the adapter saw them; the reconciler normalizes them on entry.

use serde::{Deserialize, Serialize};

/// One observation of an item on a fully scraped activity page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemObservation {
    pub item: String,
    pub obtained: bool,
}

impl ItemObservation {
    pub fn new(item: impl Into<String>, obtained: bool) -> Self {
        Self {
            item: item.into(),
            obtained,
        }
    }
}

/// A typed event from one of the progress sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceEvent {
    /// Authoritative full-state scrape of one activity.
    FullStateObservation {
        activity: String,
        total_count: u32,
        items: Vec<ItemObservation>,
    },
    /// Parsed "your X count is N" notification. Authoritative for the count.
    TextNotification { activity: String, total_count: u32 },
    /// Coarse "a completion happened" signal with no count attached.
    ApproximateCompletion { activity: String },
    /// Parsed "new item added" notification.
    ItemObtainedSignal {
        item: String,
        #[serde(default)]
        activity: Option<String>,
    },
}

impl SourceEvent {
    /// Short label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceEvent::FullStateObservation { .. } => "full_state_observation",
            SourceEvent::TextNotification { .. } => "text_notification",
            SourceEvent::ApproximateCompletion { .. } => "approximate_completion",
            SourceEvent::ItemObtainedSignal { .. } => "item_obtained_signal",
        }
    }
}
