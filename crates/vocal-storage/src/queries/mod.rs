// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for CRUD operations on storage entities.
//!
//! Every statement that reads or mutates an owned record carries
//! `owner_id = ?` in its predicate.

pub mod journal;
pub mod outbox;
pub mod sessions;
pub mod voice_models;

/// Clamp a `u64` into SQLite's signed integer range.
pub(crate) fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
