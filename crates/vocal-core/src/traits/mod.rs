// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the external collaborators of the service.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod identity;
pub mod storage;
pub mod vendor;

pub use adapter::PluginAdapter;
pub use identity::IdentityAdapter;
pub use storage::StorageAdapter;
pub use vendor::VoiceVendorAdapter;
