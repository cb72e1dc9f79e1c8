// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.
//!
//! The reconciliation core is infallible; these errors only come from the
//! ambient layers around it (configuration, catalogue loading, persistence
//! and import files).

use crate::config::ConfigError;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Catalogue error: {0}")]
    Catalogue(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether retrying the same operation later can succeed.
    ///
    /// Persistence failures are transient from the tracker's point of view:
    /// the in-memory state is intact and the next save carries it.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Persistence(_))
    }
}

/// Result type alias for fallible ambient operations.
pub type Result<T> = std::result::Result<T, AppError>;
