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

use chrono::Utc;
use poolstatus_client::{
    format_age, FeedSnapshot, LiveFeed, ReportStatus, StatusReport, SubmitFeedback,
};

const OPEN_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 255, 100);
const CLOSED_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 100, 100);

// Opacity multiplier for reports older than the staleness threshold
const STALE_TINT: f32 = 0.4;

/// Placeholder shown when a completed fetch returned no reports.
const EMPTY_FEED_NOTICE: &str = "No recent reports.";

/// Badge presentation for a reported status. "Open" gets the green
/// pair; anything else, including unknown values, gets the red pair.
fn badge_style(status: &str) -> (egui::Color32, &'static str) {
    if status == "Open" {
        (OPEN_COLOR, "●")
    } else {
        (CLOSED_COLOR, "●")
    }
}

fn row_tint(stale: bool) -> f32 {
    if stale {
        STALE_TINT
    } else {
        1.0
    }
}

#[derive(Debug)]
struct Banner {
    message: String,
    positive: bool,
}

fn banner_from(feedback: &SubmitFeedback) -> Banner {
    match feedback {
        SubmitFeedback::Accepted => Banner {
            message: "Thanks for your report!".to_string(),
            positive: true,
        },
        SubmitFeedback::Rejected(message) => Banner {
            message: format!("Error: {}", message),
            positive: false,
        },
        SubmitFeedback::Unreachable => Banner {
            message: "Network error".to_string(),
            positive: false,
        },
    }
}

/// Floating window with the community report list and the submit
/// controls.
#[derive(Debug)]
pub struct FeedPanel {
    default_open: bool,
    options_open: bool,
    seen_feedback_serial: u64,
    banner: Option<Banner>,
}

impl FeedPanel {
    pub fn new(default_open: bool) -> Self {
        Self {
            default_open,
            options_open: false,
            seen_feedback_serial: 0,
            banner: None,
        }
    }

    /// Pick up submit feedback the UI has not shown yet. An accepted
    /// report also closes the status picker.
    fn absorb_feedback(&mut self, snapshot: &FeedSnapshot) {
        if snapshot.feedback_serial <= self.seen_feedback_serial {
            return;
        }
        self.seen_feedback_serial = snapshot.feedback_serial;
        if let Some(feedback) = &snapshot.feedback {
            if *feedback == SubmitFeedback::Accepted {
                self.options_open = false;
            }
            self.banner = Some(banner_from(feedback));
        }
    }

    /// Render the feed window. Submit clicks go straight to the feed
    /// handle; the outcome comes back through the snapshot on a later
    /// frame.
    pub fn render(&mut self, ctx: &egui::Context, feed: &LiveFeed) {
        let snapshot = feed.snapshot();
        self.absorb_feedback(&snapshot);

        let screen_height = ctx.screen_rect().height();

        egui::Window::new("Live Reports")
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-10.0, 10.0))
            .fixed_size(egui::vec2(300.0, screen_height - 20.0))
            .resizable(false)
            .collapsible(true)
            .default_open(self.default_open)
            .frame(egui::Frame::window(&ctx.style())
                .fill(egui::Color32::from_rgba_unmultiplied(25, 30, 35, 230))
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(60, 80, 100)))
                .corner_radius(6.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("◈ LIVE REPORTS")
                        .color(egui::Color32::from_rgb(100, 200, 100))
                        .size(14.0)
                        .strong());

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(egui::RichText::new(format!("TOTAL: {}", snapshot.reports.len()))
                            .color(egui::Color32::from_rgb(150, 150, 150))
                            .size(10.0)
                            .monospace());
                    });
                });

                ui.add_space(4.0);

                self.render_banner(ui);
                self.render_submit_controls(ui, feed);

                ui.separator();

                if snapshot.reports.is_empty() {
                    ui.label(egui::RichText::new(EMPTY_FEED_NOTICE)
                        .color(egui::Color32::from_rgb(100, 100, 100))
                        .size(10.0)
                        .italics());
                    return;
                }

                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.push_id("report_list", |ui| {
                        for report in &snapshot.reports {
                            render_report_row(ui, report);
                        }
                    });
                });
            });
    }

    fn render_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = &self.banner else {
            return;
        };

        let color = if banner.positive {
            OPEN_COLOR
        } else {
            CLOSED_COLOR
        };

        let mut dismissed = false;
        egui::Frame::group(ui.style())
            .fill(egui::Color32::from_rgba_unmultiplied(30, 38, 45, 220))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(&banner.message)
                        .color(color)
                        .size(10.0));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button(egui::RichText::new("✕").size(10.0))
                            .on_hover_text("Dismiss")
                            .clicked() {
                            dismissed = true;
                        }
                    });
                });
            });
        if dismissed {
            self.banner = None;
        }

        ui.add_space(4.0);
    }

    fn render_submit_controls(&mut self, ui: &mut egui::Ui, feed: &LiveFeed) {
        ui.horizontal(|ui| {
            let toggle_label = if self.options_open {
                "Cancel"
            } else {
                "Report status"
            };
            if ui.button(egui::RichText::new(toggle_label).size(10.0)).clicked() {
                self.options_open = !self.options_open;
            }
        });

        if !self.options_open {
            return;
        }

        ui.horizontal(|ui| {
            for status in [ReportStatus::Open, ReportStatus::Closed] {
                let (color, icon) = badge_style(status.as_str());
                let text = egui::RichText::new(format!("{} {}", icon, status.as_str()))
                    .color(color)
                    .size(10.0)
                    .strong();
                if ui.button(text).clicked() {
                    feed.submit(status);
                }
            }
        });

        ui.add_space(4.0);
    }
}

fn render_report_row(ui: &mut egui::Ui, report: &StatusReport) {
    let now = Utc::now();
    let stale = report.is_stale(now);
    let tint = row_tint(stale);
    let (badge_color, badge_icon) = badge_style(&report.status);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(badge_icon)
                .color(badge_color.gamma_multiply(tint))
                .size(12.0));

            ui.label(egui::RichText::new(&report.status)
                .color(badge_color.gamma_multiply(tint))
                .size(11.0)
                .strong());

            ui.label(egui::RichText::new(format!("│ {}", report.user))
                .color(egui::Color32::from_rgb(200, 220, 255).gamma_multiply(tint))
                .size(11.0)
                .monospace());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(egui::RichText::new(format_age(report.age_seconds(now)))
                    .color(egui::Color32::from_rgb(130, 130, 130).gamma_multiply(tint))
                    .size(9.0)
                    .monospace());
            });
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with(serial: u64, feedback: SubmitFeedback) -> FeedSnapshot {
        FeedSnapshot {
            reports: Vec::new(),
            feedback: Some(feedback),
            feedback_serial: serial,
        }
    }

    #[test]
    fn test_badge_style() {
        assert_eq!(badge_style("Open").0, OPEN_COLOR);
        assert_eq!(badge_style("Closed").0, CLOSED_COLOR);
        // Unknown statuses fall through to the closed styling
        assert_eq!(badge_style("Maintenance").0, CLOSED_COLOR);
    }

    #[test]
    fn test_row_tint() {
        assert_eq!(row_tint(false), 1.0);
        assert_eq!(row_tint(true), STALE_TINT);
    }

    #[test]
    fn test_banner_wording() {
        assert_eq!(banner_from(&SubmitFeedback::Accepted).message, "Thanks for your report!");
        assert!(banner_from(&SubmitFeedback::Accepted).positive);

        let rejected = banner_from(&SubmitFeedback::Rejected("Invalid status".to_string()));
        assert_eq!(rejected.message, "Error: Invalid status");
        assert!(!rejected.positive);

        assert_eq!(banner_from(&SubmitFeedback::Unreachable).message, "Network error");
    }

    #[test]
    fn test_empty_feed_wording() {
        assert_eq!(EMPTY_FEED_NOTICE, "No recent reports.");
    }

    #[test]
    fn test_accepted_feedback_closes_picker() {
        let mut panel = FeedPanel::new(true);
        panel.options_open = true;

        panel.absorb_feedback(&snapshot_with(1, SubmitFeedback::Accepted));
        assert!(!panel.options_open);
        assert_eq!(panel.banner.as_ref().map(|b| b.positive), Some(true));
    }

    #[test]
    fn test_rejected_feedback_keeps_picker_open() {
        let mut panel = FeedPanel::new(true);
        panel.options_open = true;

        panel.absorb_feedback(&snapshot_with(1, SubmitFeedback::Rejected("nope".to_string())));
        assert!(panel.options_open);
        assert_eq!(panel.banner.as_ref().map(|b| b.positive), Some(false));
    }

    #[test]
    fn test_feedback_is_shown_once() {
        let mut panel = FeedPanel::new(true);

        panel.absorb_feedback(&snapshot_with(1, SubmitFeedback::Accepted));
        assert!(panel.banner.is_some());

        // Dismissed banners stay dismissed while the serial is unchanged
        panel.banner = None;
        panel.absorb_feedback(&snapshot_with(1, SubmitFeedback::Accepted));
        assert!(panel.banner.is_none());

        panel.absorb_feedback(&snapshot_with(2, SubmitFeedback::Unreachable));
        assert!(panel.banner.is_some());
    }
}
