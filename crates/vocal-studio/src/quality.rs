// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rough recording quality grade for an uploaded voice sample.

use serde::Serialize;
use strum::Display;

const MIB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecordingQuality {
    Poor,
    Fair,
    Good,
}

/// Grades a recording from its size and client-reported duration.
///
/// Short and small samples tend to clone badly; both thresholds must be
/// missed for a lower grade.
pub fn classify_recording(size_bytes: u64, duration_seconds: f64) -> RecordingQuality {
    let size_mib = size_bytes as f64 / MIB;
    if size_mib < 0.02 && duration_seconds < 5.0 {
        RecordingQuality::Poor
    } else if size_mib < 0.05 && duration_seconds < 15.0 {
        RecordingQuality::Fair
    } else {
        RecordingQuality::Good
    }
}
