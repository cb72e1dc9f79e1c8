// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON file repository.
//!
//! Writes go to a sibling temp file first and are renamed into place, so a
//! crash mid-write leaves the previous snapshot intact.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::db::StateRepository;
use crate::error::{AppError, Result};
use crate::models::ProgressSnapshot;

/// Stores the snapshot as pretty-printed JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "progress.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateRepository for JsonFileRepository {
    fn load(&self) -> Result<Option<ProgressSnapshot>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::Persistence(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        if json.trim().is_empty() {
            return Ok(None);
        }

        let snapshot = serde_json::from_str(&json).map_err(|e| {
            AppError::Persistence(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &ProgressSnapshot) -> Result<()> {
        let io_err =
            |e: std::io::Error| AppError::Persistence(format!("{}: {}", self.path.display(), e));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Snapshot encode failed: {}", e)))?;

        let temp = self.temp_path();
        let mut file = fs::File::create(&temp).map_err(io_err)?;
        file.write_all(&json).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        drop(file);

        fs::rename(&temp, &self.path).map_err(io_err)?;
        tracing::debug!(path = %self.path.display(), bytes = json.len(), "Progress saved");
        Ok(())
    }
}
