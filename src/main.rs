// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! clog-tracker host
//!
//! Reads newline-delimited JSON messages from the game client on stdin and
//! writes requested dry reports as JSON lines to stdout. Logs go to stderr.

use anyhow::Context;
use clog_tracker::{
    adapters::{CollectionLogPage, LootRecord},
    config::Config,
    db::JsonFileRepository,
    models::SourceEvent,
    services::{Catalogue, DropCatalogue, PersistHandle},
    Tracker,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// One message from the game client.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum HostMessage {
    Chat { message: String },
    Loot(LootRecord),
    Page(CollectionLogPage),
    Event { event: SourceEvent },
    Target { activity: String },
    Report { activity: String },
    Import {
        #[serde(default)]
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        state = %config.state_path.display(),
        dedup_window_ms = config.dedup_window.as_millis() as u64,
        "Starting clog-tracker"
    );

    let catalogue = match DropCatalogue::load_from_file(&config.catalogue_path) {
        Ok(catalogue) => catalogue,
        Err(e) => {
            tracing::warn!(
                path = %config.catalogue_path.display(),
                error = %e,
                "Drop catalogue unavailable; reports disabled"
            );
            DropCatalogue::new()
        }
    };
    let catalogue: Arc<dyn Catalogue> = Arc::new(catalogue);

    let repository = Arc::new(JsonFileRepository::new(&config.state_path));
    let tracker = Tracker::load(config.clone(), repository.as_ref(), catalogue)
        .context("Failed to load saved progress")?
        .with_persistence(PersistHandle::spawn(repository, config.save_debounce));

    if let Some(path) = &config.import_path {
        if let Err(e) = tracker.import_collection_log(path) {
            tracing::warn!(path = %path.display(), error = %e, "Collection log import failed");
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let message: HostMessage = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed host message");
                continue;
            }
        };

        if let Some(output) = handle_message(&tracker, message)? {
            stdout.write_all(output.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
    }

    tracing::info!("Input closed; shutting down");
    tracker.shutdown().await;
    Ok(())
}

/// Apply one host message. Returns a JSON line to print, if any.
fn handle_message(tracker: &Tracker, message: HostMessage) -> anyhow::Result<Option<String>> {
    match message {
        HostMessage::Chat { message } => {
            tracker.ingest_chat(&message);
        }
        HostMessage::Loot(record) => {
            tracker.ingest_loot(&record);
        }
        HostMessage::Page(page) => {
            tracker.ingest_page(&page);
        }
        HostMessage::Event { event } => {
            tracker.submit(event);
        }
        HostMessage::Target { activity } => tracker.set_current_activity(&activity),
        HostMessage::Report { activity } => {
            let output = match tracker.report(&activity) {
                Some(report) => serde_json::to_string(&report)?,
                None => {
                    serde_json::json!({ "activity": activity, "error": "unknown activity" })
                        .to_string()
                }
            };
            return Ok(Some(output));
        }
        HostMessage::Import { path } => {
            let Some(path) = path.or_else(|| tracker.config().import_path.clone()) else {
                tracing::warn!("Import requested without a path");
                return Ok(None);
            };
            tracker.reset_import_session();
            match tracker.import_collection_log(&path) {
                Ok(summary) => return Ok(Some(serde_json::to_string(&summary)?)),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Collection log import failed")
                }
            }
        }
    }
    Ok(None)
}

/// Initialize structured JSON logging on stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clog_tracker=debug".parse().expect("valid directive"))
                .add_directive("info".parse().expect("valid directive")),
        )
        .with(format)
        .init();
}
