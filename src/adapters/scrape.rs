// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Collection log page scrape adapter.
//!
//! The host reads a rendered collection log page: its title, the header
//! lines under it ("Kills: 1,234", "Completions: 50") and every item slot
//! with its obtained state. That is the authoritative full-state source.

use serde::{Deserialize, Serialize};

use crate::adapters::{parse_count, strip_tags};
use crate::models::{ItemObservation, SourceEvent};

/// A scraped collection log page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionLogPage {
    /// Page title as rendered (may carry markup)
    pub title: String,
    /// Header lines under the title
    #[serde(default)]
    pub header_lines: Vec<String>,
    /// Every item slot on the page
    #[serde(default)]
    pub items: Vec<ItemObservation>,
}

/// Parse a header line such as "Kills: 1,234".
pub fn parse_header_count(line: &str) -> Option<u32> {
    let line = strip_tags(line);
    let (_, value) = line.split_once(':')?;
    parse_count(value)
}

/// Turn a scraped page into a full-state observation.
///
/// The page's count is the largest header count; pages listing several
/// counters (kills and completions) describe the same activity. Returns
/// `None` for pages without a title.
pub fn observe_page(page: &CollectionLogPage) -> Option<SourceEvent> {
    let title = strip_tags(&page.title);
    if title.is_empty() {
        tracing::debug!("Dropping collection log page without a title");
        return None;
    }

    let total_count = page
        .header_lines
        .iter()
        .filter_map(|line| parse_header_count(line))
        .max()
        .unwrap_or(0);

    let items = page
        .items
        .iter()
        .map(|slot| ItemObservation::new(strip_tags(&slot.item), slot.obtained))
        .filter(|slot| !slot.item.is_empty())
        .collect::<Vec<_>>();

    tracing::debug!(
        page = %title,
        total_count,
        items = items.len(),
        obtained = items.iter().filter(|i| i.obtained).count(),
        "Scraped collection log page"
    );

    Some(SourceEvent::FullStateObservation {
        activity: title,
        total_count,
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_count() {
        assert_eq!(parse_header_count("Kills: <col=ffffff>1,234</col>"), Some(1234));
        assert_eq!(parse_header_count("Completions: 50"), Some(50));
        assert_eq!(parse_header_count("Obtained: many"), None);
        assert_eq!(parse_header_count("No colon here"), None);
    }

    #[test]
    fn test_observe_page_takes_largest_count() {
        let page = CollectionLogPage {
            title: "<col=ff981f>Zulrah</col>".to_string(),
            header_lines: vec![
                "Kills: 300".to_string(),
                "Junk line".to_string(),
                "Completions: 12".to_string(),
            ],
            items: vec![
                ItemObservation::new("Tanzanite fang", true),
                ItemObservation::new("Magic fang", false),
                ItemObservation::new(" ", true),
            ],
        };

        let event = observe_page(&page).unwrap();
        assert_eq!(
            event,
            SourceEvent::FullStateObservation {
                activity: "Zulrah".to_string(),
                total_count: 300,
                items: vec![
                    ItemObservation::new("Tanzanite fang", true),
                    ItemObservation::new("Magic fang", false),
                ],
            }
        );
    }

    #[test]
    fn test_page_without_title_dropped() {
        let page = CollectionLogPage {
            title: "<col=ff981f></col>".to_string(),
            header_lines: vec![],
            items: vec![],
        };
        assert!(observe_page(&page).is_none());
    }
}
