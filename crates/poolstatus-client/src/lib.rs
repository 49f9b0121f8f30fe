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

//! Polling client library for the pool status service.
//!
//! The service exposes two small JSON endpoints: a community report
//! feed (who last saw the pool open or closed) and a weather gate
//! (whether lightning or rain has closed the pool). This library keeps
//! both fresh with fixed-interval background polls and hands the UI
//! cheap point-in-time snapshots. The layers can also be used on their
//! own:
//!
//! - **Wire layer** ([`api`]): payload types, timestamp parsing, gate
//!   state resolution, field aliasing across backend versions
//! - **REST layer** ([`rest`]): typed endpoint calls over one HTTP client
//! - **Polling layer** ([`feed`], [`gate`]): background pollers with
//!   shared snapshots, manual refresh, and report submission
//!
//! # Quick Start
//!
//! ```no_run
//! use poolstatus_client::{FeedConfig, GateConfig, GateWatch, LiveFeed};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let feed = LiveFeed::spawn(FeedConfig {
//!         base_url: "http://pool.example.net".to_string(),
//!         ..Default::default()
//!     });
//!     let gate = GateWatch::spawn(GateConfig {
//!         base_url: "http://pool.example.net".to_string(),
//!         ..Default::default()
//!     });
//!
//!     // Polling approach
//!     loop {
//!         for report in feed.snapshot().reports {
//!             println!("{}: {}", report.user, report.status);
//!         }
//!         println!("gate: {:?}", gate.snapshot().state);
//!         tokio::time::sleep(Duration::from_secs(5)).await;
//!     }
//! }
//! ```
//!
//! # Using the REST layer directly
//!
//! ```no_run
//! use poolstatus_client::RestClient;
//!
//! # async fn example() -> Result<(), poolstatus_client::ApiError> {
//! let rest = RestClient::new("http://pool.example.net");
//! for report in rest.fetch_reports().await? {
//!     println!("{} reported {}", report.user, report.status);
//! }
//! # Ok(())
//! # }
//! ```

pub mod age;
pub mod api;
pub mod feed;
pub mod gate;
mod poll;
pub mod rest;

pub use age::format_age;
pub use api::{
    GateDetails, GateState, GateStatusPayload, ReportStatus, StatusReport, STALE_AFTER_SECONDS,
};
pub use feed::{FeedConfig, FeedSnapshot, LiveFeed, SubmitFeedback};
pub use gate::{GateConfig, GateLink, GateMetrics, GateSnapshot, GateWatch};
pub use rest::{ApiError, RestClient};
