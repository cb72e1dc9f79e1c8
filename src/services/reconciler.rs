// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Source reconciliation.
//!
//! Merges events from three unreliable sources into one [`ProgressStore`]:
//! 1. Full-state scrapes: authoritative for item presence and verification
//! 2. Text notifications: authoritative for the count value
//! 3. Approximate completions: one per completion, but may duplicate (2)
//!
//! A text notification and an approximate completion for the same
//! completion usually arrive within a tick or two of each other, in either
//! order. A per-activity guard pairs them so the completion is counted once.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::config::DEFAULT_DEDUP_WINDOW_MS;
use crate::models::{normalize_key, ItemObservation, ProgressSnapshot, SourceEvent};
use crate::services::store::ProgressStore;
use crate::time_utils::{Clock, MonotonicClock};

/// Which source armed a pending dedup guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GuardOrigin {
    /// A text notification already set the authoritative count.
    Text,
    /// An approximate completion already incremented the count.
    Approximate,
}

#[derive(Debug, Clone, Copy)]
struct PendingGuard {
    origin: GuardOrigin,
    armed_at: Instant,
}

/// Everything mutated by an event, kept behind one lock.
#[derive(Debug, Default)]
struct ReconcilerState {
    store: ProgressStore,
    guards: HashMap<String, PendingGuard>,
}

impl ReconcilerState {
    /// Take the guard for an activity if it is still inside the window.
    /// Expired guards are dropped on the way.
    fn take_guard(&mut self, activity: &str, now: Instant, window: Duration) -> Option<GuardOrigin> {
        let guard = self.guards.remove(activity)?;
        if now.saturating_duration_since(guard.armed_at) < window {
            Some(guard.origin)
        } else {
            None
        }
    }

    fn arm_guard(&mut self, activity: &str, origin: GuardOrigin, now: Instant) {
        self.guards.insert(
            activity.to_string(),
            PendingGuard {
                origin,
                armed_at: now,
            },
        );
    }
}

/// Applies source events to the progress store.
///
/// Safe to share across threads; each event is applied under a single lock
/// so cross-map invariants never tear.
pub struct SourceReconciler {
    state: Mutex<ReconcilerState>,
    clock: Arc<dyn Clock>,
    window: Duration,
}

impl Default for SourceReconciler {
    fn default() -> Self {
        Self::new(ProgressStore::new())
    }
}

impl SourceReconciler {
    /// Create a reconciler over an existing store with the default window
    /// and the real monotonic clock.
    pub fn new(store: ProgressStore) -> Self {
        Self::with_clock(
            store,
            Duration::from_millis(DEFAULT_DEDUP_WINDOW_MS),
            Arc::new(MonotonicClock),
        )
    }

    pub fn with_clock(store: ProgressStore, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(ReconcilerState {
                store,
                guards: HashMap::new(),
            }),
            clock,
            window,
        }
    }

    /// Submit one event. Events are applied in call order.
    pub fn submit(&self, event: SourceEvent) {
        self.apply(event);
    }

    /// Apply one event and report whether the stored state changed.
    pub fn apply(&self, event: SourceEvent) -> bool {
        self.apply_then(event, |_| {})
    }

    /// Apply one event and, if it changed anything, run `on_change` against
    /// the store before the lock is released. Work queued from `on_change`
    /// is therefore ordered exactly like the events.
    pub fn apply_then(&self, event: SourceEvent, on_change: impl FnOnce(&ProgressStore)) -> bool {
        let now = self.clock.now();
        let mut state = self.lock();
        let changed = self.apply_locked(&mut state, event, now);
        if changed {
            on_change(&state.store);
        }
        changed
    }

    fn apply_locked(&self, state: &mut ReconcilerState, event: SourceEvent, now: Instant) -> bool {
        let kind = event.kind();
        match event {
            SourceEvent::FullStateObservation {
                activity,
                total_count,
                items,
            } => {
                let Some(activity) = normalize_key(&activity) else {
                    tracing::debug!(kind, "Dropping event with empty activity name");
                    return false;
                };
                apply_full_state(&mut state.store, &activity, total_count, items)
            }
            SourceEvent::TextNotification {
                activity,
                total_count,
            } => {
                let Some(activity) = normalize_key(&activity) else {
                    tracing::debug!(kind, "Dropping event with empty activity name");
                    return false;
                };
                let changed = state.store.set_total_count(&activity, total_count);

                match state.take_guard(&activity, now, self.window) {
                    Some(GuardOrigin::Approximate) => {
                        // The completion was already counted; the
                        // authoritative value above absorbed it.
                        tracing::debug!(%activity, total_count, "Text count paired with earlier completion");
                    }
                    _ => state.arm_guard(&activity, GuardOrigin::Text, now),
                }

                tracing::debug!(%activity, total_count, "Count from text notification");
                changed
            }
            SourceEvent::ApproximateCompletion { activity } => {
                let Some(activity) = normalize_key(&activity) else {
                    tracing::debug!(kind, "Dropping event with empty activity name");
                    return false;
                };

                match state.take_guard(&activity, now, self.window) {
                    Some(GuardOrigin::Text) => {
                        tracing::debug!(%activity, "Increment skipped (text count already set)");
                        false
                    }
                    _ => {
                        state.store.increment_total_count(&activity);
                        state.arm_guard(&activity, GuardOrigin::Approximate, now);
                        tracing::debug!(
                            %activity,
                            total = state.store.total_count(&activity),
                            "Count incremented from completion"
                        );
                        true
                    }
                }
            }
            SourceEvent::ItemObtainedSignal { item, activity } => {
                let Some(item) = normalize_key(&item) else {
                    tracing::debug!(kind, "Dropping event with empty item name");
                    return false;
                };
                let activity = activity.as_deref().and_then(normalize_key);
                state.store.record_obtained(&item, activity.as_deref());
                tracing::debug!(%item, activity = ?activity, "Item obtained");
                true
            }
        }
    }

    // ─── Queries ─────────────────────────────────────────────────
    //
    // Readers accept display names and normalize them.

    pub fn total_count(&self, activity: &str) -> u32 {
        self.read(activity, |store, key| store.total_count(key))
    }

    pub fn dry_streak(&self, activity: &str) -> u32 {
        self.read(activity, |store, key| store.dry_streak(key))
    }

    pub fn item_dry_streak(&self, activity: &str, item: &str) -> u32 {
        let Some(item) = normalize_key(item) else {
            return 0;
        };
        self.read(activity, |store, key| store.item_dry_streak(key, &item))
    }

    pub fn last_obtained_count(&self, activity: &str, item: &str) -> Option<u32> {
        let item = normalize_key(item)?;
        let activity = normalize_key(activity)?;
        self.lock().store.last_obtained_count(&activity, &item)
    }

    pub fn is_obtained(&self, item: &str) -> bool {
        normalize_key(item).is_some_and(|item| self.lock().store.is_obtained(&item))
    }

    pub fn is_verified(&self, activity: &str) -> bool {
        self.read(activity, |store, key| store.is_verified(key))
    }

    pub fn verified_count(&self) -> usize {
        self.lock().store.verified_count()
    }

    /// Run a closure against the store under the lock.
    pub fn with_store<R>(&self, f: impl FnOnce(&ProgressStore) -> R) -> R {
        f(&self.lock().store)
    }

    /// Capture the current state for persistence.
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.lock().store.snapshot()
    }

    fn read<R: Default>(&self, activity: &str, f: impl FnOnce(&ProgressStore, &str) -> R) -> R {
        match normalize_key(activity) {
            Some(key) => f(&self.lock().store, &key),
            None => R::default(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ReconcilerState> {
        // Every event leaves the state consistent before it can panic, so a
        // poisoned lock still guards valid data.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Apply an authoritative scrape of one activity page.
///
/// Obtained items are recorded without a snapshot: the scrape says the item
/// dropped, not when.
fn apply_full_state(
    store: &mut ProgressStore,
    activity: &str,
    total_count: u32,
    items: Vec<ItemObservation>,
) -> bool {
    let mut changed = store.set_total_count(activity, total_count);
    changed |= store.mark_verified(activity);

    let mut obtained = 0usize;
    let mut cleared = 0usize;
    for observation in items {
        let Some(item) = normalize_key(&observation.item) else {
            continue;
        };
        if observation.obtained {
            if !store.is_obtained(&item) {
                changed = true;
            }
            store.record_obtained(&item, None);
            obtained += 1;
        } else if store.mark_not_obtained(&item, activity) {
            cleared += 1;
            changed = true;
        }
    }

    tracing::debug!(
        %activity,
        total_count,
        obtained,
        cleared,
        "Applied full-state observation"
    );
    changed
}
