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

//! Weather gate polling.
//!
//! Polls the weather gate endpoint and keeps the latest resolved state
//! in a shared snapshot. A failed poll flips the link to offline but
//! keeps the last measurements and the last resolved state, so the card
//! does not blank out while the service is unreachable.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local};
use log::{error, info};
use tokio::runtime::Handle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::api::{GateState, GateStatusPayload};
use crate::poll::{poll_period, RequestSequence, TicketWindow};
use crate::rest::RestClient;

const OFFLINE_NOTICE: &str = "Unable to reach weather service.";

/// Configuration for the gate poller.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Base URL of the status service, without a trailing path.
    pub base_url: String,
    /// Fixed polling interval. Values under one second are raised
    /// to a one-second floor.
    pub poll_interval: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            poll_interval: Duration::from_secs(60),
        }
    }
}

/// Reachability of the gate endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateLink {
    /// No poll has completed yet.
    #[default]
    Pending,
    /// The most recent completed poll succeeded.
    Online,
    /// The most recent completed poll failed.
    Offline,
}

/// Latest measurements from the gate endpoint.
///
/// A successful poll replaces all three values, with `None` for
/// anything the payload omitted. Failed polls leave them alone.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GateMetrics {
    /// Nearest lightning distance in kilometers.
    pub distance_km: Option<f64>,
    /// Strikes detected in the monitoring window.
    pub lightning_count: Option<u32>,
    /// Rainfall rate in millimeters per hour.
    pub rainfall_rate: Option<f64>,
}

/// Point-in-time copy of the gate state.
#[derive(Debug, Clone, Default)]
pub struct GateSnapshot {
    /// Endpoint reachability.
    pub link: GateLink,
    /// Last resolved gate state. Retained while offline so the card
    /// keeps its colors.
    pub state: GateState,
    /// Operator message, or the offline notice while unreachable.
    pub message: String,
    /// Latest measurements.
    pub metrics: GateMetrics,
    /// Local wall-clock time of the last successful poll.
    pub last_updated: Option<DateTime<Local>>,
}

#[derive(Debug, Default)]
struct GateShared {
    current: GateSnapshot,
    window: TicketWindow,
}

fn apply_success(
    state: &mut GateShared,
    ticket: u64,
    payload: &GateStatusPayload,
    at: DateTime<Local>,
) -> bool {
    if !state.window.try_apply(ticket) {
        return false;
    }
    state.current.link = GateLink::Online;
    state.current.state = payload.state();
    state.current.message.clone_from(&payload.message);
    state.current.metrics = GateMetrics {
        distance_km: payload.details.distance_km(),
        lightning_count: payload.details.lightning_count,
        rainfall_rate: payload.details.rainfall_rate,
    };
    state.current.last_updated = Some(at);
    true
}

fn apply_failure(state: &mut GateShared, ticket: u64) -> bool {
    if !state.window.try_apply(ticket) {
        return false;
    }
    state.current.link = GateLink::Offline;
    state.current.message = OFFLINE_NOTICE.to_string();
    true
}

/// Handle to the background gate poller.
///
/// Dropping the handle stops the poller.
#[derive(Debug)]
pub struct GateWatch {
    shared: Arc<Mutex<GateShared>>,
    cancel: CancellationToken,
}

impl GateWatch {
    /// Spawn the poller on the current Tokio runtime.
    ///
    /// Fetches once immediately, then on every interval tick. Panics if
    /// called outside a runtime context.
    #[must_use]
    pub fn spawn(config: GateConfig) -> Self {
        let shared = Arc::new(Mutex::new(GateShared::default()));
        let cancel = CancellationToken::new();

        Handle::current().spawn(gate_loop(
            Arc::clone(&shared),
            RestClient::new(&config.base_url),
            cancel.clone(),
            config.poll_interval,
        ));

        Self { shared, cancel }
    }

    /// Copy the current gate state.
    #[must_use]
    pub fn snapshot(&self) -> GateSnapshot {
        self.shared
            .lock()
            .map(|state| state.current.clone())
            .unwrap_or_default()
    }

    /// Stop the poller.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for GateWatch {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn gate_loop(
    shared: Arc<Mutex<GateShared>>,
    rest: RestClient,
    cancel: CancellationToken,
    poll_interval: Duration,
) {
    let sequence = RequestSequence::default();
    let mut ticker = tokio::time::interval(poll_period(poll_interval));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            () = cancel.cancelled() => {
                info!("Gate poller stopped");
                return;
            }
        }

        // Failures take a ticket too; a stale success must not
        // overwrite a newer offline marker.
        let ticket = sequence.issue();
        let rest = rest.clone();
        let shared = Arc::clone(&shared);
        tokio::spawn(async move {
            match rest.fetch_gate_status().await {
                Ok(payload) => {
                    if let Ok(mut state) = shared.lock() {
                        apply_success(&mut state, ticket, &payload, Local::now());
                    }
                }
                Err(e) => {
                    error!("Gate status fetch failed: {}", e);
                    if let Ok(mut state) = shared.lock() {
                        apply_failure(&mut state, ticket);
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::GateDetails;
    use chrono::TimeZone;

    fn payload(status: &str, message: &str, details: GateDetails) -> GateStatusPayload {
        GateStatusPayload {
            status: status.to_string(),
            message: message.to_string(),
            details,
        }
    }

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_first_success_goes_online() {
        let mut state = GateShared::default();
        assert_eq!(state.current.link, GateLink::Pending);

        let details = GateDetails {
            lightning_dist: Some(9.5),
            lightning_count: Some(4),
            rainfall_rate: Some(1.2),
            ..Default::default()
        };
        assert!(apply_success(
            &mut state,
            1,
            &payload("AMBER", "Lightning nearby.", details),
            noon()
        ));

        assert_eq!(state.current.link, GateLink::Online);
        assert_eq!(state.current.state, GateState::Amber);
        assert_eq!(state.current.message, "Lightning nearby.");
        assert_eq!(state.current.metrics.distance_km, Some(9.5));
        assert_eq!(state.current.metrics.lightning_count, Some(4));
        assert_eq!(state.current.metrics.rainfall_rate, Some(1.2));
        assert_eq!(state.current.last_updated, Some(noon()));
    }

    #[test]
    fn test_failure_keeps_measurements() {
        let mut state = GateShared::default();
        let details = GateDetails {
            min_distance_km: Some(7.1),
            lightning_count: Some(2),
            ..Default::default()
        };
        assert!(apply_success(
            &mut state,
            1,
            &payload("RED", "Pool closed.", details),
            noon()
        ));
        assert!(apply_failure(&mut state, 2));

        assert_eq!(state.current.link, GateLink::Offline);
        assert_eq!(state.current.message, "Unable to reach weather service.");
        // Colors and measurements stay at their last known values
        assert_eq!(state.current.state, GateState::Red);
        assert_eq!(state.current.metrics.distance_km, Some(7.1));
        assert_eq!(state.current.metrics.lightning_count, Some(2));
        assert_eq!(state.current.last_updated, Some(noon()));
    }

    #[test]
    fn test_stale_success_cannot_mask_failure() {
        let mut state = GateShared::default();
        assert!(apply_failure(&mut state, 2));
        assert!(!apply_success(
            &mut state,
            1,
            &payload("GREEN", "All clear.", GateDetails::default()),
            noon()
        ));
        assert_eq!(state.current.link, GateLink::Offline);
    }

    #[test]
    fn test_recovery_goes_back_online() {
        let mut state = GateShared::default();
        assert!(apply_failure(&mut state, 1));
        assert!(apply_success(
            &mut state,
            2,
            &payload("GREEN", "All clear.", GateDetails::default()),
            noon()
        ));
        assert_eq!(state.current.link, GateLink::Online);
        assert_eq!(state.current.state, GateState::Green);
        assert_eq!(state.current.message, "All clear.");
    }

    #[test]
    fn test_success_replaces_measurements_wholesale() {
        let mut state = GateShared::default();
        let details = GateDetails {
            distance: Some(5.0),
            lightning_count: Some(8),
            rainfall_rate: Some(3.3),
            ..Default::default()
        };
        assert!(apply_success(&mut state, 1, &payload("RED", "Closed.", details), noon()));

        // A later payload with no measurements clears every value
        assert!(apply_success(
            &mut state,
            2,
            &payload("GREEN", "All clear.", GateDetails::default()),
            noon()
        ));
        assert_eq!(state.current.metrics, GateMetrics::default());
    }

    #[test]
    fn test_unknown_code_resolves_green() {
        let mut state = GateShared::default();
        assert!(apply_success(
            &mut state,
            1,
            &payload("MAGENTA", "", GateDetails::default()),
            noon()
        ));
        assert_eq!(state.current.state, GateState::Green);
    }
}
