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

//! Shared plumbing for the pollers.
//!
//! Polls are never serialized, so a slow response can complete after a
//! newer one. Each request takes a ticket when it starts; a completed
//! response may touch the shared view only if its ticket is newer than
//! the last ticket applied there. Also hosts the period floor both
//! pollers apply before building their interval timers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Shortest allowed spacing between polls. The interval timer rejects
/// a zero period, so configured values are raised to this floor.
pub(crate) const MIN_POLL_PERIOD: Duration = Duration::from_secs(1);

/// Poll period actually used by the tickers.
pub(crate) fn poll_period(configured: Duration) -> Duration {
    configured.max(MIN_POLL_PERIOD)
}

/// Issues monotonically increasing request tickets. First ticket is 1.
#[derive(Debug, Default)]
pub(crate) struct RequestSequence(AtomicU64);

impl RequestSequence {
    pub fn issue(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Newest ticket applied to one shared view.
#[derive(Debug, Default)]
pub(crate) struct TicketWindow {
    last_applied: u64,
}

impl TicketWindow {
    /// Advance to `ticket` if it is newer than anything applied so far.
    /// Returns whether the caller may apply its response.
    pub fn try_apply(&mut self, ticket: u64) -> bool {
        if ticket > self.last_applied {
            self.last_applied = ticket;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_period_is_raised_to_floor() {
        // A zero period would kill the ticker before its first fetch
        assert_eq!(poll_period(Duration::ZERO), MIN_POLL_PERIOD);
        assert_eq!(poll_period(Duration::from_millis(200)), MIN_POLL_PERIOD);
    }

    #[test]
    fn test_configured_period_passes_through() {
        assert_eq!(poll_period(Duration::from_secs(60)), Duration::from_secs(60));
        assert_eq!(poll_period(MIN_POLL_PERIOD), MIN_POLL_PERIOD);
    }

    #[test]
    fn test_tickets_are_monotonic() {
        let sequence = RequestSequence::default();
        let first = sequence.issue();
        let second = sequence.issue();
        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert!(second > first);
    }

    #[test]
    fn test_in_order_responses_apply() {
        let mut window = TicketWindow::default();
        assert!(window.try_apply(1));
        assert!(window.try_apply(2));
        assert!(window.try_apply(5));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut window = TicketWindow::default();
        assert!(window.try_apply(2));
        // Ticket 1 completed after ticket 2; its data is older
        assert!(!window.try_apply(1));
        assert!(!window.try_apply(2));
        assert!(window.try_apply(3));
    }
}
