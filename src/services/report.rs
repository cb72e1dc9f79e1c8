// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dry reports: per-drop chance figures for one activity.

use serde::Serialize;

use crate::config::Config;
use crate::models::{normalize_key, ActivityDrops, DropEntry};
use crate::services::probability::{self, PercentPolicy};
use crate::services::store::ProgressStore;

/// Chances at or above this are always called out.
pub const VERY_HIGH_CHANCE: f64 = 0.9;

/// Presentation options for a report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportOptions {
    pub show_only_unobtained: bool,
    /// Highlight unobtained drops at or above this probability
    pub highlight: Option<f64>,
    pub percent_policy: PercentPolicy,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ReportOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            show_only_unobtained: config.show_only_unobtained,
            highlight: config.highlight_probability(),
            percent_policy: config.percent_policy,
        }
    }
}

/// How prominently a row's chance should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanceBand {
    Obtained,
    VeryHigh,
    High,
    Normal,
}

/// One catalogue drop with the player's progress towards it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropRow {
    pub item_name: String,
    pub item_id: i32,
    pub drop_rate: f64,
    /// "1/512"
    pub rate_display: String,
    /// Catalogue-provided rarity text, when the rate is not a plain fraction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rarity_display: Option<String>,
    /// Expected completions per drop ("512 kc")
    pub expected_display: String,
    pub obtained: bool,
    /// Completions since this item last dropped (or since tracking began)
    pub dry_streak: u32,
    pub chance: f64,
    pub chance_display: String,
    /// Total count when the item last dropped
    pub kc_at_drop: Option<u32>,
    /// How lucky that drop was: chance of it by that count
    pub chance_at_drop: Option<f64>,
    pub highlighted: bool,
    pub band: ChanceBand,
}

/// Dry report for one activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DryReport {
    pub activity: String,
    pub wiki_page: String,
    pub total_count: u32,
    pub total_count_display: String,
    pub verified: bool,
    pub obtained: usize,
    pub total_items: usize,
    pub rows: Vec<DropRow>,
}

/// Build a report from the store for one catalogue entry.
///
/// Counts are looked up under the queried name first. A name that has no
/// count (e.g., an alias the host used) falls back to the catalogue's
/// display name.
pub fn build_report(
    store: &ProgressStore,
    drops: &ActivityDrops,
    queried: &str,
    options: &ReportOptions,
) -> DryReport {
    let display_key = normalize_key(&drops.name);
    let activity_key = normalize_key(queried)
        .filter(|key| store.total_count(key) > 0)
        .or(display_key)
        .unwrap_or_default();

    let obtained = drops
        .drops
        .iter()
        .filter(|d| item_key(d).is_some_and(|key| store.is_obtained(&key)))
        .count();

    let rows = drops
        .drops
        .iter()
        .map(|drop| build_row(store, &activity_key, drop, options))
        .filter(|row| !(options.show_only_unobtained && row.obtained))
        .collect();

    let total_count = store.total_count(&activity_key);
    DryReport {
        activity: drops.name.clone(),
        wiki_page: drops.wiki_page.clone(),
        total_count,
        total_count_display: probability::format_count(total_count),
        verified: store.is_verified(&activity_key),
        obtained,
        total_items: drops.drops.len(),
        rows,
    }
}

fn item_key(drop: &DropEntry) -> Option<String> {
    normalize_key(&drop.item_name)
}

fn build_row(
    store: &ProgressStore,
    activity_key: &str,
    drop: &DropEntry,
    options: &ReportOptions,
) -> DropRow {
    let key = item_key(drop).unwrap_or_default();
    let obtained = store.is_obtained(&key);
    let dry_streak = store.item_dry_streak(activity_key, &key);
    let chance = probability::chance(drop.drop_rate, dry_streak);
    let kc_at_drop = store.last_obtained_count(activity_key, &key);

    let highlighted = !obtained && options.highlight.is_some_and(|t| chance >= t);
    let band = if obtained {
        ChanceBand::Obtained
    } else if chance >= VERY_HIGH_CHANCE {
        ChanceBand::VeryHigh
    } else if highlighted {
        ChanceBand::High
    } else {
        ChanceBand::Normal
    };

    DropRow {
        item_name: drop.item_name.clone(),
        item_id: drop.item_id,
        drop_rate: drop.drop_rate,
        rate_display: probability::format_drop_rate(drop.drop_rate),
        rarity_display: drop.rarity_display.clone(),
        expected_display: probability::format_expected(drop.drop_rate),
        obtained,
        dry_streak,
        chance,
        chance_display: probability::format_percent(chance, &options.percent_policy),
        kc_at_drop,
        chance_at_drop: kc_at_drop.map(|kc| probability::chance(drop.drop_rate, kc)),
        highlighted,
        band,
    }
}
