// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory progress model.
//!
//! Holds every counter and flag the tracker knows about for one account.
//! All keys are normalized names (see [`crate::models::normalize_key`]);
//! callers normalize before reaching the store.
//!
//! Invariants kept by every mutation:
//! - `count_since_drop <= total_count` for each activity
//! - every drop snapshot is `<= total_count` of its activity
//! - an obtained item only goes back to unobtained through a verified activity

use std::collections::{HashMap, HashSet};

use crate::models::ProgressSnapshot;
use crate::time_utils::format_utc_rfc3339;

/// Counters for one activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ActivityCounters {
    total: u32,
    since_drop: u32,
}

/// The authoritative progress model.
#[derive(Debug, Clone, Default)]
pub struct ProgressStore {
    counters: HashMap<String, ActivityCounters>,
    /// activity -> item -> activity total when the item was last obtained
    drop_snapshots: HashMap<String, HashMap<String, u32>>,
    obtained: HashSet<String>,
    verified: HashSet<String>,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Mutations ───────────────────────────────────────────────

    /// Set the total count for an activity.
    ///
    /// Counts only move forward: a value at or below the current total
    /// leaves the counters alone. An increase adds the same delta to
    /// `count_since_drop`. The first observation of an activity seeds
    /// `count_since_drop` with the full count.
    ///
    /// Returns `true` if any counter changed.
    pub fn set_total_count(&mut self, activity: &str, count: u32) -> bool {
        match self.counters.get_mut(activity) {
            None => {
                self.counters.insert(
                    activity.to_string(),
                    ActivityCounters {
                        total: count,
                        since_drop: count,
                    },
                );
                true
            }
            Some(counters) if count > counters.total => {
                let delta = count - counters.total;
                counters.total = count;
                counters.since_drop = counters.since_drop.saturating_add(delta);
                true
            }
            Some(_) => false,
        }
    }

    /// Count one completion of an activity.
    pub fn increment_total_count(&mut self, activity: &str) {
        let counters = self.counters.entry(activity.to_string()).or_default();
        counters.total = counters.total.saturating_add(1);
        counters.since_drop = counters.since_drop.saturating_add(1);
    }

    /// Record that an item was obtained.
    ///
    /// With an activity, the pair's snapshot is taken at the activity's
    /// current total and the activity-level streak resets to zero.
    pub fn record_obtained(&mut self, item: &str, activity: Option<&str>) {
        self.obtained.insert(item.to_string());

        if let Some(activity) = activity {
            let counters = self.counters.entry(activity.to_string()).or_default();
            counters.since_drop = 0;
            let total = counters.total;

            self.drop_snapshots
                .entry(activity.to_string())
                .or_default()
                .insert(item.to_string(), total);
        }
    }

    /// Clear an item's obtained flag on behalf of a verified activity.
    ///
    /// Returns `true` if the flag was cleared. Unverified activities never
    /// override an obtain confirmed by another source.
    pub fn mark_not_obtained(&mut self, item: &str, activity: &str) -> bool {
        if !self.verified.contains(activity) {
            return false;
        }
        self.obtained.remove(item)
    }

    /// Mark an activity as reported by a full-state scrape. Idempotent.
    pub fn mark_verified(&mut self, activity: &str) -> bool {
        self.verified.insert(activity.to_string())
    }

    // ─── Readers ─────────────────────────────────────────────────

    /// Total completions of an activity (0 if unknown).
    pub fn total_count(&self, activity: &str) -> u32 {
        self.counters.get(activity).map_or(0, |c| c.total)
    }

    /// Activity-level dry streak: completions since any tracked drop.
    pub fn dry_streak(&self, activity: &str) -> u32 {
        self.counters.get(activity).map_or(0, |c| c.since_drop)
    }

    /// Dry streak for one item from one activity.
    ///
    /// `total - snapshot` when the item has been obtained from the activity;
    /// otherwise the activity-level streak.
    pub fn item_dry_streak(&self, activity: &str, item: &str) -> u32 {
        match self.last_obtained_count(activity, item) {
            Some(at) => self.total_count(activity).saturating_sub(at),
            None => self.dry_streak(activity),
        }
    }

    /// Activity total at the moment the item was last obtained from it.
    pub fn last_obtained_count(&self, activity: &str, item: &str) -> Option<u32> {
        self.drop_snapshots
            .get(activity)
            .and_then(|items| items.get(item))
            .copied()
    }

    pub fn is_obtained(&self, item: &str) -> bool {
        self.obtained.contains(item)
    }

    pub fn is_verified(&self, activity: &str) -> bool {
        self.verified.contains(activity)
    }

    /// Number of activities confirmed by a full-state scrape.
    pub fn verified_count(&self) -> usize {
        self.verified.len()
    }

    /// Number of obtained items.
    pub fn obtained_count(&self) -> usize {
        self.obtained.len()
    }

    /// All known activity keys, sorted.
    pub fn activities(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.counters.keys().cloned().collect();
        keys.sort();
        keys
    }

    // ─── Persistence ─────────────────────────────────────────────

    /// Capture the store for the persistence layer.
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            total_counts: self
                .counters
                .iter()
                .map(|(k, c)| (k.clone(), c.total))
                .collect(),
            count_since_drop: self
                .counters
                .iter()
                .map(|(k, c)| (k.clone(), c.since_drop))
                .collect(),
            drop_snapshots: self
                .drop_snapshots
                .iter()
                .map(|(k, items)| {
                    (
                        k.clone(),
                        items.iter().map(|(i, n)| (i.clone(), *n)).collect(),
                    )
                })
                .collect(),
            obtained_items: self.obtained.iter().cloned().collect(),
            verified_activities: self.verified.iter().cloned().collect(),
            saved_at: format_utc_rfc3339(chrono::Utc::now()),
            ..ProgressSnapshot::default()
        }
    }

    /// Rebuild a store from a persisted snapshot.
    ///
    /// Snapshots that break an invariant (hand-edited or truncated files)
    /// are repaired by clamping; each repair is logged.
    pub fn from_snapshot(snapshot: ProgressSnapshot) -> Self {
        let mut store = Self::new();
        let mut repairs = 0usize;

        for (activity, total) in &snapshot.total_counts {
            // A missing streak means it was never set: seed like a first sighting.
            let since = snapshot
                .count_since_drop
                .get(activity)
                .copied()
                .unwrap_or(*total);
            if since > *total {
                tracing::warn!(%activity, since, total, "Clamping dry streak to total count");
                repairs += 1;
            }
            store.counters.insert(
                activity.clone(),
                ActivityCounters {
                    total: *total,
                    since_drop: since.min(*total),
                },
            );
        }

        for (activity, since) in &snapshot.count_since_drop {
            if !store.counters.contains_key(activity) {
                tracing::warn!(%activity, since, "Dry streak without total count; using it as total");
                repairs += 1;
                store.counters.insert(
                    activity.clone(),
                    ActivityCounters {
                        total: *since,
                        since_drop: *since,
                    },
                );
            }
        }

        for (activity, items) in snapshot.drop_snapshots {
            let counters = store.counters.entry(activity.clone()).or_default();
            for (item, at) in items {
                if at > counters.total {
                    tracing::warn!(%activity, %item, at, total = counters.total, "Drop snapshot above total count; raising total");
                    repairs += 1;
                    counters.total = at;
                }
                store
                    .drop_snapshots
                    .entry(activity.clone())
                    .or_default()
                    .insert(item, at);
            }
        }

        store.obtained = snapshot.obtained_items.into_iter().collect();
        store.verified = snapshot.verified_activities.into_iter().collect();

        tracing::debug!(
            activities = store.counters.len(),
            obtained = store.obtained.len(),
            verified = store.verified.len(),
            repairs,
            "Progress store restored"
        );
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_observation_seeds_streak() {
        let mut store = ProgressStore::new();
        assert!(store.set_total_count("zulrah", 150));
        assert_eq!(store.total_count("zulrah"), 150);
        assert_eq!(store.dry_streak("zulrah"), 150);
    }

    #[test]
    fn test_count_increase_propagates_delta() {
        let mut store = ProgressStore::new();
        store.set_total_count("zulrah", 100);
        store.record_obtained("tanzanite fang", Some("zulrah"));
        assert_eq!(store.dry_streak("zulrah"), 0);

        store.set_total_count("zulrah", 130);
        assert_eq!(store.total_count("zulrah"), 130);
        assert_eq!(store.dry_streak("zulrah"), 30);
        assert_eq!(store.item_dry_streak("zulrah", "tanzanite fang"), 30);
    }

    #[test]
    fn test_counts_are_monotonic() {
        let mut store = ProgressStore::new();
        store.set_total_count("zulrah", 5);
        assert!(!store.set_total_count("zulrah", 3));
        assert!(!store.set_total_count("zulrah", 5));
        assert_eq!(store.total_count("zulrah"), 5);
        assert_eq!(store.dry_streak("zulrah"), 5);
    }

    #[test]
    fn test_increment_from_unknown() {
        let mut store = ProgressStore::new();
        store.increment_total_count("vorkath");
        store.increment_total_count("vorkath");
        assert_eq!(store.total_count("vorkath"), 2);
        assert_eq!(store.dry_streak("vorkath"), 2);
    }

    #[test]
    fn test_record_obtained_is_idempotent() {
        let mut store = ProgressStore::new();
        store.set_total_count("zulrah", 150);
        store.record_obtained("onyx", Some("zulrah"));
        let once = store.snapshot();

        store.record_obtained("onyx", Some("zulrah"));
        let twice = store.snapshot();

        assert_eq!(once.total_counts, twice.total_counts);
        assert_eq!(once.count_since_drop, twice.count_since_drop);
        assert_eq!(once.drop_snapshots, twice.drop_snapshots);
        assert_eq!(once.obtained_items, twice.obtained_items);
    }

    #[test]
    fn test_record_obtained_without_activity_takes_no_snapshot() {
        let mut store = ProgressStore::new();
        store.set_total_count("zulrah", 300);
        store.record_obtained("tanzanite fang", None);

        assert!(store.is_obtained("tanzanite fang"));
        assert_eq!(store.last_obtained_count("zulrah", "tanzanite fang"), None);
        assert_eq!(store.item_dry_streak("zulrah", "tanzanite fang"), 300);
    }

    #[test]
    fn test_mark_not_obtained_requires_verified() {
        let mut store = ProgressStore::new();
        store.record_obtained("onyx", Some("zulrah"));

        assert!(!store.mark_not_obtained("onyx", "zulrah"));
        assert!(store.is_obtained("onyx"));

        assert!(store.mark_verified("zulrah"));
        assert!(!store.mark_verified("zulrah"));
        assert!(store.mark_not_obtained("onyx", "zulrah"));
        assert!(!store.is_obtained("onyx"));
    }

    #[test]
    fn test_unknown_activity_readers() {
        let store = ProgressStore::new();
        assert_eq!(store.total_count("nobody"), 0);
        assert_eq!(store.dry_streak("nobody"), 0);
        assert_eq!(store.item_dry_streak("nobody", "thing"), 0);
        assert!(!store.is_verified("nobody"));
    }

    #[test]
    fn test_snapshot_round_trip_preserves_readers() {
        let mut store = ProgressStore::new();
        store.set_total_count("zulrah", 200);
        store.record_obtained("onyx", Some("zulrah"));
        store.increment_total_count("zulrah");
        store.mark_verified("zulrah");
        store.set_total_count("vorkath", 40);

        let restored = ProgressStore::from_snapshot(store.snapshot());

        assert_eq!(restored.total_count("zulrah"), 201);
        assert_eq!(restored.dry_streak("zulrah"), 1);
        assert_eq!(restored.item_dry_streak("zulrah", "onyx"), 1);
        assert_eq!(restored.last_obtained_count("zulrah", "onyx"), Some(200));
        assert!(restored.is_verified("zulrah"));
        assert!(restored.is_obtained("onyx"));
        assert_eq!(restored.dry_streak("vorkath"), 40);
        assert_eq!(restored.activities(), vec!["vorkath", "zulrah"]);
    }

    #[test]
    fn test_from_snapshot_repairs_broken_invariants() {
        let mut snapshot = ProgressSnapshot::default();
        snapshot.total_counts.insert("zulrah".into(), 10);
        snapshot.count_since_drop.insert("zulrah".into(), 25);
        snapshot.count_since_drop.insert("vorkath".into(), 7);
        snapshot
            .drop_snapshots
            .entry("kraken".into())
            .or_default()
            .insert("jar of dirt".into(), 4);

        let store = ProgressStore::from_snapshot(snapshot);

        assert_eq!(store.dry_streak("zulrah"), 10);
        assert_eq!(store.total_count("vorkath"), 7);
        assert_eq!(store.dry_streak("vorkath"), 7);
        assert_eq!(store.total_count("kraken"), 4);
        assert_eq!(store.item_dry_streak("kraken", "jar of dirt"), 0);
    }
}
