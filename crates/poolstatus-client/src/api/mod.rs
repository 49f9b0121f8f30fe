// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Wire types for the pool status service.
//!
//! Payloads are decoded as the server sends them; interpretation helpers
//! (timestamp parsing, gate state resolution, field aliasing) live next
//! to the types so callers never poke at raw strings.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// Server timestamps are naive UTC with optional fractional seconds.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Reports strictly older than this many seconds render de-emphasized.
pub const STALE_AFTER_SECONDS: i64 = 2 * 60 * 60;

/// One community report from the live status feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusReport {
    /// Display name of the reporting user.
    pub user: String,
    /// Reported state, nominally "Open" or "Closed". Anything else is
    /// kept verbatim and rendered with the closed styling.
    pub status: String,
    /// Naive UTC timestamp in ISO-8601 form, as the server sends it.
    pub timestamp: String,
}

impl StatusReport {
    /// Parse the server timestamp. The value carries no zone suffix and
    /// is taken as UTC.
    #[must_use]
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }

    /// Whole-second age of this report at `now`. Unparseable timestamps
    /// count as age zero.
    #[must_use]
    pub fn age_seconds(&self, now: DateTime<Utc>) -> i64 {
        self.timestamp_utc()
            .map_or(0, |timestamp| (now - timestamp).num_seconds())
    }

    /// Whether this report is old enough to de-emphasize. Exactly two
    /// hours is not yet stale.
    #[must_use]
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.age_seconds(now) > STALE_AFTER_SECONDS
    }
}

/// Status value accepted by the report submission endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportStatus {
    Open,
    Closed,
}

impl ReportStatus {
    /// Wire and display form of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
        }
    }
}

/// Resolved gate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    /// Pool open, no hazard nearby.
    #[default]
    Green,
    /// Hazard approaching, pool still open.
    Amber,
    /// Pool closed.
    Red,
}

impl GateState {
    /// Resolve a wire status code. Codes match exactly; anything
    /// unrecognized resolves to `Green`.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "AMBER" => Self::Amber,
            "RED" => Self::Red,
            _ => Self::Green,
        }
    }
}

/// Payload returned by the weather gate endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GateStatusPayload {
    /// Raw status code ("GREEN", "AMBER", "RED").
    pub status: String,
    /// Operator-facing message. The server may embed markup; render as
    /// plain text.
    pub message: String,
    /// Measurement block. Some backend versions omit it entirely.
    #[serde(default)]
    pub details: GateDetails,
}

impl GateStatusPayload {
    /// Gate state resolved from the raw code.
    #[must_use]
    pub fn state(&self) -> GateState {
        GateState::from_code(&self.status)
    }
}

/// Measurements attached to a gate status payload.
///
/// Backend versions have shipped the lightning distance under three
/// different names; [`GateDetails::distance_km`] resolves whichever one
/// is present.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct GateDetails {
    /// Lightning distance, current field name.
    pub distance: Option<f64>,
    /// Lightning distance, interim field name.
    pub lightning_dist: Option<f64>,
    /// Lightning distance, original field name.
    pub min_distance_km: Option<f64>,
    /// Strikes detected in the monitoring window.
    pub lightning_count: Option<u32>,
    /// Rainfall rate in millimeters per hour.
    pub rainfall_rate: Option<f64>,
}

impl GateDetails {
    /// Nearest lightning distance in kilometers, whichever field name
    /// the backend used. `None` means no strike inside the monitored
    /// radius, which is distinct from a distance of zero.
    #[must_use]
    pub fn distance_km(&self) -> Option<f64> {
        self.distance.or(self.lightning_dist).or(self.min_distance_km)
    }
}
