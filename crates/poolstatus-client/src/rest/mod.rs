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

//! REST access to the status service.
//!
//! A thin wrapper over one HTTP client. Calls return typed payloads or
//! an error classified by failure layer; callers decide how to degrade.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::{GateStatusPayload, ReportStatus, StatusReport};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const FEED_PATH: &str = "/api/live-status/";
const GATE_PATH: &str = "/weather/status";

/// Errors from REST calls, by failure layer.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a usable response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body was not the expected JSON.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The server answered a read with a non-success status.
    #[error("server returned HTTP {status}")]
    Http { status: u16 },

    /// The server refused a submitted report.
    #[error("report rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Serialize)]
struct SubmitBody {
    status: ReportStatus,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// REST client bound to one service base URL.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
}

impl RestClient {
    /// Create a client for the service at `base_url` (scheme and
    /// authority, no trailing path).
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch the community report feed. An empty list is a valid
    /// response, not an error.
    pub async fn fetch_reports(&self) -> Result<Vec<StatusReport>, ApiError> {
        let response = self
            .http
            .get(self.url(FEED_PATH))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Submit a report. Any success status counts and the response body
    /// is ignored. A refusal carries the server's `error` message when
    /// the body provides one, otherwise a fixed fallback.
    pub async fn submit_report(&self, status: ReportStatus) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.url(FEED_PATH))
            .timeout(REQUEST_TIMEOUT)
            .json(&SubmitBody { status })
            .send()
            .await?;
        if response.status().is_success() {
            return Ok(());
        }
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_else(|| "Failed to submit".to_string());
        Err(ApiError::Rejected(message))
    }

    /// Fetch the current weather gate status.
    pub async fn fetch_gate_status(&self) -> Result<GateStatusPayload, ApiError> {
        let response = self
            .http
            .get(self.url(GATE_PATH))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
