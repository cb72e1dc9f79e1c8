// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Game chat adapter.
//!
//! Recognizes kill count messages ("Your Zulrah kill count is: 150.") and
//! collection log notifications ("New item added to your collection log:
//! Tanzanite fang"). Notifications don't name the activity, so the adapter
//! remembers the last activity it saw and attributes the item to it.

use regex::Regex;
use std::sync::{LazyLock, Mutex, PoisonError};

use crate::adapters::{parse_count, strip_tags};
use crate::config::Config;
use crate::models::SourceEvent;

/// Kill count phrasings, most specific first.
static KILL_COUNT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // "Your Zulrah kill count is: 150."
        r"(?i)Your (.+?) kill count is: ([\d,]+)",
        // "Your completion count for Chambers of Xeric is: 50."
        r"(?i)Your completion count for (.+?) is: ([\d,]+)",
        // "Your subdued Wintertodt count is: 100."
        r"(?i)Your subdued (.+?) count is: ([\d,]+)",
        // "Your Chambers of Xeric count is: 50."
        r"(?i)Your (.+?) count is: ([\d,]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("kill count pattern is valid"))
    .collect()
});

static NEW_ITEM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)New item added to your collection log: (.+)")
        .expect("collection log pattern is valid")
});

/// Which chat signals to act on.
#[derive(Debug, Clone, Copy)]
pub struct ChatOptions {
    pub track_kill_counts: bool,
    pub detect_new_items: bool,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            track_kill_counts: true,
            detect_new_items: true,
        }
    }
}

impl From<&Config> for ChatOptions {
    fn from(config: &Config) -> Self {
        Self {
            track_kill_counts: config.track_kc_from_chat,
            detect_new_items: config.auto_detect_collection_log,
        }
    }
}

/// Stateful chat translator.
#[derive(Debug, Default)]
pub struct ChatAdapter {
    options: ChatOptions,
    last_activity: Mutex<Option<String>>,
}

impl ChatAdapter {
    pub fn new(options: ChatOptions) -> Self {
        Self {
            options,
            last_activity: Mutex::new(None),
        }
    }

    /// Translate one chat message. Unrecognized messages yield nothing.
    pub fn parse(&self, message: &str) -> Vec<SourceEvent> {
        let cleaned = strip_tags(message);
        let mut events = Vec::new();

        if self.options.track_kill_counts {
            if let Some((activity, total_count)) = parse_kill_count(&cleaned) {
                tracing::debug!(%activity, total_count, "Kill count from chat");
                self.set_last_activity(&activity);
                events.push(SourceEvent::TextNotification {
                    activity,
                    total_count,
                });
            }
        }

        if self.options.detect_new_items {
            if let Some(item) = parse_new_item(&cleaned) {
                let activity = self.last_activity();
                tracing::debug!(%item, activity = ?activity, "Collection log item from chat");
                events.push(SourceEvent::ItemObtainedSignal { item, activity });
            }
        }

        events
    }

    /// Remember the activity the player is engaged with.
    pub fn set_last_activity(&self, activity: &str) {
        let activity = activity.trim();
        if activity.is_empty() {
            return;
        }
        *self
            .last_activity
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(activity.to_string());
    }

    pub fn last_activity(&self) -> Option<String> {
        self.last_activity
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Parse a kill count message into (activity, count).
pub fn parse_kill_count(message: &str) -> Option<(String, u32)> {
    KILL_COUNT_PATTERNS.iter().find_map(|pattern| {
        let caps = pattern.captures(message)?;
        let activity = caps.get(1)?.as_str().trim();
        if activity.is_empty() {
            return None;
        }
        let count = parse_count(caps.get(2)?.as_str())?;
        Some((activity.to_string(), count))
    })
}

/// Parse a "new item added" notification into the item name.
pub fn parse_new_item(message: &str) -> Option<String> {
    let caps = NEW_ITEM_PATTERN.captures(message)?;
    let item = caps.get(1)?.as_str().trim();
    let item = item.strip_suffix('.').unwrap_or(item).trim();
    (!item.is_empty()).then(|| item.to_string())
}
