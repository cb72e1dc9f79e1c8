// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Name normalization shared by the store, the reconciler and the catalogue.

/// Normalize an activity or item name into its storage key.
///
/// Keys are case-insensitive and whitespace-trimmed; runs of internal
/// whitespace collapse to a single space so "Tanzanite  fang" and
/// "tanzanite fang" address the same item. Returns `None` for names that
/// are empty after trimming.
pub fn normalize_key(name: &str) -> Option<String> {
    let mut key = String::with_capacity(name.len());
    for word in name.split_whitespace() {
        if !key.is_empty() {
            key.push(' ');
        }
        key.extend(word.chars().flat_map(char::to_lowercase));
    }

    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}
