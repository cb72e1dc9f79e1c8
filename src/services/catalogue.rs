// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Drop catalogue loading and name resolution.
//!
//! The catalogue is read-only reference data: which collection log items can
//! drop from which activity, and how often. Reconciliation never touches it.

use dashmap::DashMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{normalize_key, ActivityDrops};

/// Loot source names that differ from their collection log page.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("Barrows", "Barrows Chests"),
    ("The Nightmare", "Nightmare"),
    ("Phosani's Nightmare", "Nightmare"),
    ("The Leviathan", "Leviathan"),
    ("The Whisperer", "Whisperer"),
    ("The Mimic", "Mimic"),
    ("Supply Crate (Wintertodt)", "Wintertodt"),
    ("Reward Cart (Wintertodt)", "Wintertodt"),
    ("Hallowed Sack", "Hallowed Sepulchre"),
    ("Spoils Of War", "Soul Wars"),
    // Irregular plural
    ("Cyclops", "Cyclopes"),
];

/// Read access to drop reference data.
pub trait Catalogue: Send + Sync {
    /// Ordered drops for an activity, or `None` if the activity is unknown.
    fn drops_for(&self, activity: &str) -> Option<Arc<ActivityDrops>>;
}

/// Bundled catalogue file layout.
#[derive(Debug, Deserialize)]
struct CatalogueFile {
    #[serde(default)]
    aliases: HashMap<String, String>,
    #[serde(default)]
    monsters: HashMap<String, ActivityDrops>,
}

/// In-memory catalogue keyed by normalized activity name.
#[derive(Default)]
pub struct DropCatalogue {
    activities: DashMap<String, Arc<ActivityDrops>>,
    aliases: DashMap<String, String>,
}

impl DropCatalogue {
    /// Empty catalogue with only the built-in aliases.
    pub fn new() -> Self {
        let catalogue = Self::default();
        for (from, to) in BUILTIN_ALIASES {
            catalogue.add_alias(from, to);
        }
        catalogue
    }

    /// Load the catalogue from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref()).map_err(|e| {
            AppError::Catalogue(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::load_from_json(&json)
    }

    /// Load the catalogue from a JSON string.
    pub fn load_from_json(json: &str) -> Result<Self> {
        let file: CatalogueFile =
            serde_json::from_str(json).map_err(|e| AppError::Catalogue(e.to_string()))?;

        let catalogue = Self::default();
        // File aliases take precedence over the built-in ones.
        for (from, to) in &file.aliases {
            catalogue.add_alias(from, to);
        }
        for (from, to) in BUILTIN_ALIASES {
            catalogue.add_alias(from, to);
        }

        for (key, drops) in file.monsters {
            match normalize_key(&key) {
                Some(key) => {
                    catalogue.activities.insert(key, Arc::new(drops));
                }
                None => tracing::warn!("Skipping catalogue entry with empty name"),
            }
        }

        tracing::info!(
            activities = catalogue.activities.len(),
            aliases = catalogue.aliases.len(),
            "Loaded drop catalogue"
        );
        Ok(catalogue)
    }

    /// Add or replace the drops for one activity.
    pub fn upsert(&self, drops: ActivityDrops) {
        if let Some(key) = normalize_key(&drops.name) {
            self.activities.insert(key, Arc::new(drops));
        }
    }

    /// Register an alias unless one already exists for `from`.
    pub fn add_alias(&self, from: &str, to: &str) {
        if let (Some(from), Some(to)) = (normalize_key(from), normalize_key(to)) {
            self.aliases.entry(from).or_insert(to);
        }
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    fn get(&self, key: &str) -> Option<Arc<ActivityDrops>> {
        self.activities.get(key).map(|entry| Arc::clone(entry.value()))
    }
}

impl Catalogue for DropCatalogue {
    /// Resolve by exact name, then alias, then singular/plural variants.
    fn drops_for(&self, activity: &str) -> Option<Arc<ActivityDrops>> {
        let key = normalize_key(activity)?;

        if let Some(drops) = self.get(&key) {
            return Some(drops);
        }

        let alias = self.aliases.get(&key).map(|target| target.value().clone());
        if let Some(drops) = alias.and_then(|target| self.get(&target)) {
            return Some(drops);
        }

        // "Tormented Demon" -> "Tormented Demons" and back
        let mut variants = vec![format!("{}s", key), format!("{}es", key)];
        if let Some(stem) = key.strip_suffix("es") {
            variants.push(stem.to_string());
        }
        if let Some(stem) = key.strip_suffix('s') {
            variants.push(stem.to_string());
        }
        variants.iter().find_map(|variant| self.get(variant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "aliases": { "Corrupted Gauntlet": "The Gauntlet" },
        "monsters": {
            "Zulrah": {
                "monsterName": "Zulrah",
                "wikiPage": "Zulrah",
                "drops": [
                    { "itemName": "Tanzanite fang", "dropRate": 0.0009765625, "itemId": 12922, "rarityDisplay": "1/1,024" },
                    { "itemName": "Pet snakeling", "dropRate": 0.00025, "itemId": 12921 }
                ]
            },
            "The Gauntlet": {
                "monsterName": "The Gauntlet",
                "wikiPage": "The Gauntlet",
                "drops": []
            },
            "Tormented Demons": {
                "monsterName": "Tormented Demons",
                "wikiPage": "Tormented Demon",
                "drops": []
            },
            "Nightmare": {
                "monsterName": "Nightmare",
                "wikiPage": "The Nightmare",
                "drops": []
            }
        }
    }"#;

    #[test]
    fn test_load_and_exact_lookup() {
        let catalogue = DropCatalogue::load_from_json(SAMPLE).unwrap();
        assert_eq!(catalogue.len(), 4);

        let zulrah = catalogue.drops_for("  zulrah").unwrap();
        assert_eq!(zulrah.name, "Zulrah");
        assert_eq!(zulrah.drops.len(), 2);
        assert_eq!(zulrah.drops[0].item_name, "Tanzanite fang");
        assert_eq!(zulrah.drops[0].rarity_display.as_deref(), Some("1/1,024"));
        assert_eq!(zulrah.drops[1].rarity_display, None);
    }

    #[test]
    fn test_alias_lookup() {
        let catalogue = DropCatalogue::load_from_json(SAMPLE).unwrap();
        assert_eq!(
            catalogue.drops_for("Corrupted Gauntlet").unwrap().name,
            "The Gauntlet"
        );
        assert_eq!(
            catalogue.drops_for("Phosani's Nightmare").unwrap().name,
            "Nightmare"
        );
    }

    #[test]
    fn test_plural_lookup() {
        let catalogue = DropCatalogue::load_from_json(SAMPLE).unwrap();
        assert_eq!(
            catalogue.drops_for("Tormented Demon").unwrap().name,
            "Tormented Demons"
        );
        assert!(catalogue.drops_for("Vorkath").is_none());
        assert!(catalogue.drops_for("").is_none());
    }

    #[test]
    fn test_upsert_adds_activity() {
        let catalogue = DropCatalogue::new();
        assert!(catalogue.is_empty());
        catalogue.upsert(ActivityDrops {
            name: "Vorkath".to_string(),
            wiki_page: "Vorkath".to_string(),
            drops: vec![],
        });
        assert!(catalogue.drops_for("VORKATH").is_some());
    }

    #[test]
    fn test_invalid_json_is_catalogue_error() {
        let err = DropCatalogue::load_from_json("{ not json").err().unwrap();
        assert!(matches!(err, AppError::Catalogue(_)));
    }
}
