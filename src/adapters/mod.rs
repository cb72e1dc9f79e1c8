// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Source adapters.
//!
//! Each adapter turns one kind of host signal into [`SourceEvent`]s.
//! Unparseable payloads stop here; the reconciler only ever sees
//! well-typed events.
//!
//! [`SourceEvent`]: crate::models::SourceEvent

pub mod chat;
pub mod import;
pub mod loot;
pub mod scrape;

pub use chat::{ChatAdapter, ChatOptions};
pub use import::{load_export, parse_export, ImportedPage};
pub use loot::{loot_activity, loot_events, LootItem, LootRecord};
pub use scrape::{observe_page, CollectionLogPage};

use regex::Regex;
use std::sync::LazyLock;

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("markup pattern is valid"));

/// Remove `<col=ff0000>`-style markup and surrounding whitespace.
pub fn strip_tags(text: &str) -> String {
    MARKUP_TAG.replace_all(text, "").trim().to_string()
}

/// Parse a displayed count such as "1,234".
pub fn parse_count(text: &str) -> Option<u32> {
    let digits: String = text.trim().chars().filter(|c| *c != ',').collect();
    digits.parse().ok()
}
