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

//! Live report feed polling.
//!
//! Polls the community report endpoint on a fixed interval and keeps
//! the latest list in a shared snapshot for the UI thread to copy.
//! Submissions run as independent tasks and surface their outcome as
//! numbered feedback so the UI can tell a fresh acknowledgment from one
//! it has already shown.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{error, info, warn};
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::api::{ReportStatus, StatusReport};
use crate::poll::{poll_period, RequestSequence, TicketWindow};
use crate::rest::{ApiError, RestClient};

/// Configuration for the report feed poller.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Base URL of the status service, without a trailing path.
    pub base_url: String,
    /// Fixed polling interval. Every tick fetches, even if an earlier
    /// fetch is still in flight. Values under one second are raised to
    /// a one-second floor.
    pub poll_interval: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            poll_interval: Duration::from_secs(60),
        }
    }
}

/// Outcome of a report submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitFeedback {
    /// The server accepted the report.
    Accepted,
    /// The server refused the report; carries its error message.
    Rejected(String),
    /// The request never produced a response.
    Unreachable,
}

/// Point-in-time copy of the feed state.
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    /// Reports in server order, newest first.
    pub reports: Vec<StatusReport>,
    /// Outcome of the most recent submission, if any.
    pub feedback: Option<SubmitFeedback>,
    /// Increments each time `feedback` is replaced.
    pub feedback_serial: u64,
}

#[derive(Debug, Default)]
struct FeedShared {
    reports: Vec<StatusReport>,
    feedback: Option<SubmitFeedback>,
    feedback_serial: u64,
    window: TicketWindow,
}

fn apply_reports(state: &mut FeedShared, ticket: u64, reports: Vec<StatusReport>) -> bool {
    if !state.window.try_apply(ticket) {
        return false;
    }
    state.reports = reports;
    true
}

fn record_feedback(state: &mut FeedShared, feedback: SubmitFeedback) {
    state.feedback_serial += 1;
    state.feedback = Some(feedback);
}

fn feedback_from(result: Result<(), ApiError>) -> SubmitFeedback {
    match result {
        Ok(()) => SubmitFeedback::Accepted,
        Err(ApiError::Rejected(message)) => SubmitFeedback::Rejected(message),
        Err(_) => SubmitFeedback::Unreachable,
    }
}

/// Handle to the background feed poller.
///
/// Dropping the handle stops the poller.
#[derive(Debug)]
pub struct LiveFeed {
    shared: Arc<Mutex<FeedShared>>,
    rest: RestClient,
    refresh: Arc<Notify>,
    runtime: Handle,
    cancel: CancellationToken,
}

impl LiveFeed {
    /// Spawn the poller on the current Tokio runtime.
    ///
    /// Fetches once immediately, then on every interval tick. Panics if
    /// called outside a runtime context.
    #[must_use]
    pub fn spawn(config: FeedConfig) -> Self {
        let shared = Arc::new(Mutex::new(FeedShared::default()));
        let rest = RestClient::new(&config.base_url);
        let refresh = Arc::new(Notify::new());
        let cancel = CancellationToken::new();
        let runtime = Handle::current();

        runtime.spawn(feed_loop(
            Arc::clone(&shared),
            rest.clone(),
            Arc::clone(&refresh),
            cancel.clone(),
            config.poll_interval,
        ));

        Self {
            shared,
            rest,
            refresh,
            runtime,
            cancel,
        }
    }

    /// Copy the current feed state.
    #[must_use]
    pub fn snapshot(&self) -> FeedSnapshot {
        self.shared
            .lock()
            .map(|state| FeedSnapshot {
                reports: state.reports.clone(),
                feedback: state.feedback.clone(),
                feedback_serial: state.feedback_serial,
            })
            .unwrap_or_default()
    }

    /// Fetch out of cycle, without waiting for the next tick.
    pub fn refresh_now(&self) {
        self.refresh.notify_one();
    }

    /// Submit a report in the background. The outcome lands in the
    /// snapshot as new feedback; an accepted report also triggers an
    /// immediate refetch.
    pub fn submit(&self, status: ReportStatus) {
        let rest = self.rest.clone();
        let shared = Arc::clone(&self.shared);
        let refresh = Arc::clone(&self.refresh);

        self.runtime.spawn(async move {
            let result = rest.submit_report(status).await;
            if let Err(e) = &result {
                warn!("Report submit failed: {}", e);
            }
            let feedback = feedback_from(result);
            let accepted = feedback == SubmitFeedback::Accepted;
            if let Ok(mut state) = shared.lock() {
                record_feedback(&mut state, feedback);
            }
            if accepted {
                refresh.notify_one();
            }
        });
    }

    /// Stop the poller.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn feed_loop(
    shared: Arc<Mutex<FeedShared>>,
    rest: RestClient,
    refresh: Arc<Notify>,
    cancel: CancellationToken,
    poll_interval: Duration,
) {
    let sequence = RequestSequence::default();
    let mut ticker = tokio::time::interval(poll_period(poll_interval));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            () = refresh.notified() => {}
            () = cancel.cancelled() => {
                info!("Live feed poller stopped");
                return;
            }
        }

        // Tickets are taken in request-start order; a response may only
        // land if nothing newer has landed first.
        let ticket = sequence.issue();
        let rest = rest.clone();
        let shared = Arc::clone(&shared);
        tokio::spawn(async move {
            match rest.fetch_reports().await {
                Ok(reports) => {
                    if let Ok(mut state) = shared.lock() {
                        apply_reports(&mut state, ticket, reports);
                    }
                }
                Err(e) => error!("Live status fetch failed: {}", e),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(user: &str) -> StatusReport {
        StatusReport {
            user: user.to_string(),
            status: "Open".to_string(),
            timestamp: "2025-06-01T08:00:00".to_string(),
        }
    }

    #[test]
    fn test_apply_replaces_reports() {
        let mut state = FeedShared::default();
        assert!(apply_reports(&mut state, 1, vec![report("alice")]));
        assert_eq!(state.reports.len(), 1);

        // An empty list from a newer request still replaces the view
        assert!(apply_reports(&mut state, 2, Vec::new()));
        assert!(state.reports.is_empty());
    }

    #[test]
    fn test_stale_fetch_does_not_overwrite() {
        let mut state = FeedShared::default();
        assert!(apply_reports(&mut state, 2, vec![report("bob")]));
        assert!(!apply_reports(&mut state, 1, vec![report("alice")]));
        assert_eq!(state.reports[0].user, "bob");
    }

    #[test]
    fn test_feedback_serial_increments() {
        let mut state = FeedShared::default();
        assert_eq!(state.feedback_serial, 0);

        record_feedback(&mut state, SubmitFeedback::Accepted);
        assert_eq!(state.feedback_serial, 1);
        assert_eq!(state.feedback, Some(SubmitFeedback::Accepted));

        record_feedback(&mut state, SubmitFeedback::Unreachable);
        assert_eq!(state.feedback_serial, 2);
        assert_eq!(state.feedback, Some(SubmitFeedback::Unreachable));
    }

    #[test]
    fn test_feedback_mapping() {
        assert_eq!(feedback_from(Ok(())), SubmitFeedback::Accepted);
        assert_eq!(
            feedback_from(Err(ApiError::Rejected("Invalid status".to_string()))),
            SubmitFeedback::Rejected("Invalid status".to_string())
        );

        let decode_error = serde_json::from_str::<u32>("oops").unwrap_err();
        assert_eq!(
            feedback_from(Err(ApiError::Decode(decode_error))),
            SubmitFeedback::Unreachable
        );
        assert_eq!(
            feedback_from(Err(ApiError::Http { status: 502 })),
            SubmitFeedback::Unreachable
        );
    }

    #[test]
    fn test_snapshot_starts_empty() {
        let state = FeedShared::default();
        assert!(state.reports.is_empty());
        assert_eq!(state.feedback, None);
    }
}
