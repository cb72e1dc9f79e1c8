// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application facade.
//!
//! Owns the reconciler, the drop catalogue and the save worker handle.
//! Hosts feed raw signals in through the `ingest_*` helpers (or typed
//! events through [`Tracker::submit`]) and query dry reports back out.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::adapters::{
    self, ChatAdapter, ChatOptions, CollectionLogPage, ImportedPage, LootRecord,
};
use crate::config::Config;
use crate::db::StateRepository;
use crate::error::Result;
use crate::models::SourceEvent;
use crate::services::catalogue::Catalogue;
use crate::services::persistence::PersistHandle;
use crate::services::reconciler::SourceReconciler;
use crate::services::report::{self, DryReport, ReportOptions};
use crate::services::store::ProgressStore;
use crate::time_utils::{Clock, MonotonicClock};

/// Outcome of a collection log plugin import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Updated pages found in the export
    pub pages: usize,
    /// Pages that changed stored state
    pub changed: usize,
    /// Obtained items reported across all pages
    pub items: usize,
}

pub struct Tracker {
    config: Config,
    reconciler: SourceReconciler,
    catalogue: Arc<dyn Catalogue>,
    chat: ChatAdapter,
    persist: Option<PersistHandle>,
    imported: AtomicBool,
}

impl Tracker {
    /// Tracker over an empty store.
    pub fn new(config: Config, catalogue: Arc<dyn Catalogue>) -> Self {
        Self::with_clock(config, ProgressStore::new(), catalogue, Arc::new(MonotonicClock))
    }

    pub fn with_clock(
        config: Config,
        store: ProgressStore,
        catalogue: Arc<dyn Catalogue>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let reconciler = SourceReconciler::with_clock(store, config.dedup_window, clock);
        Self {
            chat: ChatAdapter::new(ChatOptions::from(&config)),
            config,
            reconciler,
            catalogue,
            persist: None,
            imported: AtomicBool::new(false),
        }
    }

    /// Restore the tracker from a repository. A missing snapshot starts
    /// from an empty store.
    pub fn load(
        config: Config,
        repository: &dyn StateRepository,
        catalogue: Arc<dyn Catalogue>,
    ) -> Result<Self> {
        let store = match repository.load()? {
            Some(snapshot) => {
                let store = ProgressStore::from_snapshot(snapshot);
                tracing::info!(
                    activities = store.activities().len(),
                    obtained = store.obtained_count(),
                    verified = store.verified_count(),
                    "Loaded saved progress"
                );
                store
            }
            None => {
                tracing::info!("No saved progress; starting fresh");
                ProgressStore::new()
            }
        };

        Ok(Self::with_clock(
            config,
            store,
            catalogue,
            Arc::new(MonotonicClock),
        ))
    }

    /// Save a snapshot through `handle` after every state change.
    pub fn with_persistence(mut self, handle: PersistHandle) -> Self {
        self.persist = Some(handle);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn reconciler(&self) -> &SourceReconciler {
        &self.reconciler
    }

    pub fn catalogue(&self) -> &Arc<dyn Catalogue> {
        &self.catalogue
    }

    /// Apply one event; queue a save if it changed anything.
    ///
    /// The snapshot is taken and queued under the reconciler lock, so the
    /// save worker always receives snapshots in the order the changes were
    /// applied.
    pub fn submit(&self, event: SourceEvent) -> bool {
        self.reconciler.apply_then(event, |store| {
            if let Some(persist) = &self.persist {
                persist.request_save(store.snapshot());
            }
        })
    }

    /// Feed one game chat message. Returns the number of events it produced.
    pub fn ingest_chat(&self, message: &str) -> usize {
        let events = self.chat.parse(message);
        let produced = events.len();
        for event in events {
            self.submit(event);
        }
        produced
    }

    /// Feed one loot notification.
    pub fn ingest_loot(&self, record: &LootRecord) -> usize {
        self.chat
            .set_last_activity(&adapters::loot_activity(&record.source, self.catalogue.as_ref()));

        let events = adapters::loot_events(record, self.catalogue.as_ref(), |item| {
            self.reconciler.is_obtained(item)
        });
        let produced = events.len();
        for event in events {
            self.submit(event);
        }
        produced
    }

    /// Feed one scraped collection log page.
    pub fn ingest_page(&self, page: &CollectionLogPage) -> bool {
        adapters::observe_page(page).is_some_and(|event| self.submit(event))
    }

    /// The host reports which activity the player is engaged with.
    pub fn set_current_activity(&self, activity: &str) {
        self.chat.set_last_activity(activity);
    }

    /// Import a collection log plugin export, once per session.
    ///
    /// Returns `Ok(None)` if an import already ran this session. A failed
    /// read leaves the session open for another attempt.
    pub fn import_collection_log<P: AsRef<Path>>(&self, path: P) -> Result<Option<ImportSummary>> {
        if self
            .imported
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Collection log already imported this session");
            return Ok(None);
        }

        match adapters::load_export(path.as_ref()) {
            Ok(pages) => {
                let summary = self.import_pages(pages);
                tracing::info!(
                    path = %path.as_ref().display(),
                    pages = summary.pages,
                    changed = summary.changed,
                    items = summary.items,
                    "Imported collection log export"
                );
                Ok(Some(summary))
            }
            Err(e) => {
                self.imported.store(false, Ordering::Release);
                Err(e)
            }
        }
    }

    /// Submit already-parsed export pages.
    pub fn import_pages(&self, pages: Vec<ImportedPage>) -> ImportSummary {
        let mut summary = ImportSummary::default();
        for page in pages {
            summary.pages += 1;
            if let SourceEvent::FullStateObservation { items, .. } = &page.event {
                summary.items += items.len();
            }
            if self.submit(page.event) {
                summary.changed += 1;
            }
        }
        summary
    }

    /// Allow the next import (e.g., after the player logs in again).
    pub fn reset_import_session(&self) {
        self.imported.store(false, Ordering::Release);
    }

    /// Dry report for an activity, or `None` if the catalogue doesn't know it.
    pub fn report(&self, activity: &str) -> Option<DryReport> {
        let drops = self.catalogue.drops_for(activity)?;
        let options = ReportOptions::from_config(&self.config);
        Some(
            self.reconciler
                .with_store(|store| report::build_report(store, &drops, activity, &options)),
        )
    }

    /// Flush pending saves and stop the save worker.
    pub async fn shutdown(self) {
        if let Some(persist) = self.persist {
            persist.shutdown().await;
        }
    }
}
