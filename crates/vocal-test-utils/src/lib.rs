// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Vocal integration tests.
//!
//! Provides mock adapters and a test harness for fast, deterministic,
//! CI-runnable tests without the identity provider or voice vendor.
//!
//! # Components
//!
//! - [`MockIdentity`] - Token table standing in for the identity provider
//! - [`MockVendor`] - In-memory voice vendor with failure switches and call capture
//! - [`FailingStorage`] - Storage wrapper that can fail session writes on demand
//! - [`TestHarness`] - Full router over a temp SQLite database

pub mod failing_storage;
pub mod harness;
pub mod mock_identity;
pub mod mock_vendor;

pub use failing_storage::FailingStorage;
pub use harness::{TestHarness, TestResponse};
pub use mock_identity::MockIdentity;
pub use mock_vendor::MockVendor;
