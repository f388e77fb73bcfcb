// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Vocal voice-journal service.
//!
//! This crate provides the adapter trait definitions, the shared error type,
//! and the domain records used throughout the workspace. The identity
//! provider, voice vendor and storage backend all sit behind traits defined
//! here so the service layer can be wired with test doubles.

pub mod error;
pub mod traits;
pub mod types;

pub use error::VocalError;
pub use types::{AdapterType, HealthStatus};

pub use traits::{IdentityAdapter, PluginAdapter, StorageAdapter, VoiceVendorAdapter};
