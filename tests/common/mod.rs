// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use clog_tracker::config::Config;
use clog_tracker::models::SourceEvent;
use clog_tracker::services::{Catalogue, DropCatalogue, ProgressStore};
use clog_tracker::time_utils::ManualClock;
use clog_tracker::Tracker;
use std::path::PathBuf;
use std::sync::Arc;

/// Path to a file under tests/fixtures.
#[allow(dead_code)]
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// The fixture drop catalogue.
#[allow(dead_code)]
pub fn test_catalogue() -> Arc<dyn Catalogue> {
    let catalogue = DropCatalogue::load_from_file(fixture("drops.json"))
        .expect("Failed to load fixture catalogue");
    Arc::new(catalogue)
}

/// Create a tracker over an empty store with a hand-driven clock.
#[allow(dead_code)]
pub fn test_tracker() -> (Tracker, ManualClock) {
    let clock = ManualClock::new();
    let tracker = Tracker::with_clock(
        Config::default(),
        ProgressStore::new(),
        test_catalogue(),
        Arc::new(clock.clone()),
    );
    (tracker, clock)
}

#[allow(dead_code)]
pub fn text(activity: &str, total_count: u32) -> SourceEvent {
    SourceEvent::TextNotification {
        activity: activity.to_string(),
        total_count,
    }
}

#[allow(dead_code)]
pub fn completion(activity: &str) -> SourceEvent {
    SourceEvent::ApproximateCompletion {
        activity: activity.to_string(),
    }
}

#[allow(dead_code)]
pub fn obtained(item: &str, activity: &str) -> SourceEvent {
    SourceEvent::ItemObtainedSignal {
        item: item.to_string(),
        activity: Some(activity.to_string()),
    }
}
