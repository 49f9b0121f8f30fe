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

use poolstatus_client::{GateLink, GateSnapshot, GateState};

/// Fixed presentation for one gate state.
#[derive(Debug)]
pub struct GateStyle {
    pub label: &'static str,
    pub label_color: egui::Color32,
    pub ring_color: egui::Color32,
    pub ring_fill: egui::Color32,
    pub gradient_top: egui::Color32,
    pub gradient_bottom: egui::Color32,
    pub icon: &'static str,
}

static GREEN_STYLE: GateStyle = GateStyle {
    label: "OPEN",
    label_color: egui::Color32::from_rgb(100, 255, 100),
    ring_color: egui::Color32::from_rgb(80, 200, 80),
    ring_fill: egui::Color32::from_rgba_premultiplied(20, 45, 25, 200),
    gradient_top: egui::Color32::from_rgba_premultiplied(30, 55, 35, 220),
    gradient_bottom: egui::Color32::from_rgba_premultiplied(15, 35, 22, 240),
    icon: "☀",
};

static AMBER_STYLE: GateStyle = GateStyle {
    label: "WARNING",
    label_color: egui::Color32::from_rgb(255, 200, 100),
    ring_color: egui::Color32::from_rgb(220, 170, 70),
    ring_fill: egui::Color32::from_rgba_premultiplied(50, 40, 18, 200),
    gradient_top: egui::Color32::from_rgba_premultiplied(60, 48, 25, 220),
    gradient_bottom: egui::Color32::from_rgba_premultiplied(40, 30, 12, 240),
    icon: "⚠",
};

static RED_STYLE: GateStyle = GateStyle {
    label: "CLOSED",
    label_color: egui::Color32::from_rgb(255, 100, 100),
    ring_color: egui::Color32::from_rgb(210, 80, 80),
    ring_fill: egui::Color32::from_rgba_premultiplied(48, 20, 18, 200),
    gradient_top: egui::Color32::from_rgba_premultiplied(60, 28, 25, 220),
    gradient_bottom: egui::Color32::from_rgba_premultiplied(38, 16, 14, 240),
    icon: "⚡",
};

/// Style for a resolved gate state. Unknown wire codes resolve to
/// `Green` before they get here, so every state has a style.
pub fn gate_style(state: GateState) -> &'static GateStyle {
    match state {
        GateState::Green => &GREEN_STYLE,
        GateState::Amber => &AMBER_STYLE,
        GateState::Red => &RED_STYLE,
    }
}

const NEUTRAL_LABEL_COLOR: egui::Color32 = egui::Color32::from_rgb(150, 150, 150);

/// Headline label for the card. While the endpoint is unreachable the
/// colors stay at the last known state but the label goes neutral.
fn card_label(link: GateLink, style: &'static GateStyle) -> (&'static str, egui::Color32) {
    match link {
        GateLink::Pending => ("CHECKING", NEUTRAL_LABEL_COLOR),
        GateLink::Offline => ("OFFLINE", NEUTRAL_LABEL_COLOR),
        GateLink::Online => (style.label, style.label_color),
    }
}

fn format_distance(value: Option<f64>) -> String {
    value.map_or_else(|| "> 15 km".to_string(), |v| format!("{} km", v))
}

fn format_strike_count(value: Option<u32>) -> String {
    value.map_or_else(|| "--".to_string(), |v| v.to_string())
}

fn format_rainfall(value: Option<f64>) -> String {
    value.map_or_else(|| "-- mm/h".to_string(), |v| format!("{:.1} mm/h", v))
}

/// The weather gate card: headline state, operator message, and the
/// three measurements behind the decision.
#[derive(Debug, Default)]
pub struct StatusCard;

impl StatusCard {
    pub fn new() -> Self {
        Self
    }

    /// Render the card into the given UI region.
    pub fn render(&self, ui: &mut egui::Ui, snapshot: &GateSnapshot) {
        let style = gate_style(snapshot.state);

        egui::Frame::group(ui.style())
            .stroke(egui::Stroke::new(1.0, style.ring_color))
            .corner_radius(8.0)
            .show(ui, |ui| {
                // Gradient background tinted by the current state
                let rect = ui.available_rect_before_wrap();
                let painter = ui.painter();

                let mut mesh = egui::epaint::Mesh::default();
                mesh.vertices.push(egui::epaint::Vertex {
                    pos: rect.left_top(),
                    uv: egui::epaint::WHITE_UV,
                    color: style.gradient_top,
                });
                mesh.vertices.push(egui::epaint::Vertex {
                    pos: rect.right_top(),
                    uv: egui::epaint::WHITE_UV,
                    color: style.gradient_top,
                });
                mesh.vertices.push(egui::epaint::Vertex {
                    pos: rect.right_bottom(),
                    uv: egui::epaint::WHITE_UV,
                    color: style.gradient_bottom,
                });
                mesh.vertices.push(egui::epaint::Vertex {
                    pos: rect.left_bottom(),
                    uv: egui::epaint::WHITE_UV,
                    color: style.gradient_bottom,
                });
                mesh.indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
                painter.add(egui::Shape::mesh(mesh));

                ui.vertical_centered(|ui| {
                    ui.add_space(12.0);
                    self.render_ring(ui, style);
                    ui.add_space(6.0);

                    let (label, label_color) = card_label(snapshot.link, style);
                    ui.label(egui::RichText::new(label)
                        .color(label_color)
                        .size(26.0)
                        .strong());

                    ui.add_space(4.0);

                    // Message text exactly as the server sent it; any
                    // markup renders as plain characters
                    if !snapshot.message.is_empty() {
                        ui.label(egui::RichText::new(&snapshot.message)
                            .color(egui::Color32::from_rgb(200, 200, 200))
                            .size(11.0));
                    }

                    ui.add_space(10.0);
                });

                self.render_metrics(ui, snapshot);

                ui.add_space(8.0);

                ui.vertical_centered(|ui| {
                    let updated = snapshot.last_updated.map_or_else(
                        || "Updated --:--:--".to_string(),
                        |at| format!("Updated {}", at.format("%H:%M:%S")),
                    );
                    ui.label(egui::RichText::new(updated)
                        .color(egui::Color32::from_rgb(130, 130, 130))
                        .size(9.0)
                        .monospace());
                    ui.add_space(6.0);
                });
            });
    }

    fn render_ring(&self, ui: &mut egui::Ui, style: &'static GateStyle) {
        let (rect, _response) =
            ui.allocate_exact_size(egui::vec2(68.0, 68.0), egui::Sense::hover());
        let painter = ui.painter();
        let center = rect.center();

        painter.circle_filled(center, 30.0, style.ring_fill);
        painter.circle_stroke(center, 30.0, egui::Stroke::new(2.0, style.ring_color));
        painter.text(
            center,
            egui::Align2::CENTER_CENTER,
            style.icon,
            egui::FontId::proportional(26.0),
            style.label_color,
        );
    }

    fn render_metrics(&self, ui: &mut egui::Ui, snapshot: &GateSnapshot) {
        ui.columns(3, |columns| {
            render_metric_cell(
                &mut columns[0],
                "LIGHTNING",
                &format_distance(snapshot.metrics.distance_km),
            );
            render_metric_cell(
                &mut columns[1],
                "STRIKES",
                &format_strike_count(snapshot.metrics.lightning_count),
            );
            render_metric_cell(
                &mut columns[2],
                "RAINFALL",
                &format_rainfall(snapshot.metrics.rainfall_rate),
            );
        });
    }
}

fn render_metric_cell(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.vertical_centered(|ui| {
        ui.label(egui::RichText::new(label)
            .color(egui::Color32::from_rgb(150, 150, 150))
            .size(9.0)
            .strong());
        ui.label(egui::RichText::new(value)
            .color(egui::Color32::from_rgb(220, 220, 220))
            .size(12.0)
            .monospace());
    });
}
