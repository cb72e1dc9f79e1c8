// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! clog-tracker: collection log dry-streak tracking
//!
//! Reconciles kill counts and drops reported by several unreliable game
//! signals (chat, loot notifications, collection log scrapes, plugin
//! exports) into one progress model, and reports the odds of each
//! outstanding drop.

pub mod adapters;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;

pub use services::Tracker;
