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

//! Relative-time wording for report ages.

const DAY_SECONDS: i64 = 86_400;
const HOUR_SECONDS: i64 = 3_600;
const MINUTE_SECONDS: i64 = 60;

/// Format a whole-second age the way the report feed displays it.
///
/// Thresholds are strict and checked largest first; ages of a minute or
/// less, including negative ones from clock skew, collapse to
/// "Just now". Unit words are fixed regardless of the count, so a
/// 25-hour age reads "1 days ago".
#[must_use]
pub fn format_age(age_seconds: i64) -> String {
    if age_seconds > DAY_SECONDS {
        format!("{} days ago", age_seconds / DAY_SECONDS)
    } else if age_seconds > HOUR_SECONDS {
        format!("{} hours ago", age_seconds / HOUR_SECONDS)
    } else if age_seconds > MINUTE_SECONDS {
        format!("{} mins ago", age_seconds / MINUTE_SECONDS)
    } else {
        "Just now".to_string()
    }
}
