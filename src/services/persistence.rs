// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Background save worker.
//!
//! Saving is fire-and-forget: the tracker hands over a snapshot after each
//! mutating event and moves on. The worker waits out a debounce interval,
//! keeps only the newest snapshot, and writes it. A failed write is retried
//! with the next snapshot that arrives; memory state is never lost.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::db::StateRepository;
use crate::error::{AppError, Result};
use crate::models::ProgressSnapshot;

/// Handle to a running save worker.
pub struct PersistHandle {
    tx: mpsc::UnboundedSender<ProgressSnapshot>,
    task: JoinHandle<()>,
}

impl PersistHandle {
    /// Spawn the worker on the current tokio runtime.
    pub fn spawn(repository: Arc<dyn StateRepository>, debounce: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_worker(repository, debounce, rx));
        Self { tx, task }
    }

    /// Queue a snapshot for saving. Never blocks.
    pub fn request_save(&self, snapshot: ProgressSnapshot) {
        if self.tx.send(snapshot).is_err() {
            tracing::warn!("Save worker has stopped; snapshot not queued");
        }
    }

    /// Stop accepting snapshots and wait for the last one to be written.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Save worker panicked");
        }
    }
}

async fn run_worker(
    repository: Arc<dyn StateRepository>,
    debounce: Duration,
    mut rx: mpsc::UnboundedReceiver<ProgressSnapshot>,
) {
    let mut pending: Option<ProgressSnapshot> = None;

    while let Some(snapshot) = rx.recv().await {
        pending = Some(snapshot);

        tokio::time::sleep(debounce).await;
        while let Ok(newer) = rx.try_recv() {
            pending = Some(newer);
        }

        if let Some(snapshot) = pending.take() {
            if let Err(e) = write_snapshot(&repository, &snapshot).await {
                tracing::error!(error = %e, "Failed to save progress; will retry on next change");
                pending = Some(snapshot);
            }
        }
    }

    if let Some(snapshot) = pending {
        match write_snapshot(&repository, &snapshot).await {
            Ok(()) => tracing::info!("Final progress save complete"),
            Err(e) => tracing::error!(error = %e, "Final progress save failed"),
        }
    }
}

async fn write_snapshot(
    repository: &Arc<dyn StateRepository>,
    snapshot: &ProgressSnapshot,
) -> Result<()> {
    let repository = Arc::clone(repository);
    let snapshot = snapshot.clone();
    tokio::task::spawn_blocking(move || repository.save(&snapshot))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Save task failed: {}", e)))?
}
