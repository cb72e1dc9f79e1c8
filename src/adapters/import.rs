// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Collection log plugin export import.
//!
//! Reads the JSON export written by the third-party "Collection Log" plugin:
//!
//! ```json
//! { "tabs": { "Bosses": { "Zulrah": {
//!     "isUpdated": true,
//!     "items": [ { "id": 12922, "name": "Tanzanite fang", "obtained": true } ],
//!     "killCounts": [ { "name": "Zulrah kills", "amount": 300 } ]
//! } } } }
//! ```
//!
//! Pages the player never opened in game (`isUpdated` false) are skipped.
//! The export may predate newer drops, so it only ever reports obtained
//! items, never absence.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::{ItemObservation, SourceEvent};

#[derive(Debug, Deserialize)]
struct ExportFile {
    #[serde(default)]
    tabs: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportPage {
    #[serde(default)]
    is_updated: bool,
    #[serde(default)]
    items: Vec<ExportItem>,
    #[serde(default)]
    kill_counts: Vec<ExportKillCount>,
}

#[derive(Debug, Deserialize)]
struct ExportItem {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    obtained: bool,
}

#[derive(Debug, Deserialize)]
struct ExportKillCount {
    #[serde(default)]
    amount: i64,
}

/// One imported page, ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedPage {
    /// Tab the page was found under
    pub tab: String,
    pub event: SourceEvent,
}

/// Read and parse an export file.
pub fn load_export<P: AsRef<Path>>(path: P) -> Result<Vec<ImportedPage>> {
    let json = fs::read_to_string(path.as_ref())
        .map_err(|e| AppError::Import(format!("{}: {}", path.as_ref().display(), e)))?;
    parse_export(&json)
}

/// Parse an export into one full-state observation per updated page.
pub fn parse_export(json: &str) -> Result<Vec<ImportedPage>> {
    let file: ExportFile =
        serde_json::from_str(json).map_err(|e| AppError::Import(e.to_string()))?;

    let mut pages = Vec::new();
    for (tab, tab_pages) in file.tabs {
        let Value::Object(tab_pages) = tab_pages else {
            tracing::warn!(%tab, "Skipping malformed collection log tab");
            continue;
        };

        for (name, raw) in tab_pages {
            let page: ExportPage = match serde_json::from_value(raw) {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(%tab, page = %name, error = %e, "Skipping malformed collection log page");
                    continue;
                }
            };
            if !page.is_updated || name.trim().is_empty() {
                continue;
            }

            let total_count = page
                .kill_counts
                .iter()
                .map(|kc| kc.amount.clamp(0, i64::from(u32::MAX)) as u32)
                .max()
                .unwrap_or(0);

            let items = page
                .items
                .into_iter()
                .filter(|item| item.obtained)
                .filter_map(|item| item.name)
                .filter(|name| !name.trim().is_empty())
                .map(|name| ItemObservation::new(name, true))
                .collect();

            pages.push(ImportedPage {
                tab: tab.clone(),
                event: SourceEvent::FullStateObservation {
                    activity: name,
                    total_count,
                    items,
                },
            });
        }
    }

    Ok(pages)
}
