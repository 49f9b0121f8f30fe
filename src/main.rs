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

mod config;
mod ui;

use clap::Parser;
use config::AppConfig;
use eframe::egui;
use log::{info, warn};
use mimalloc::MiMalloc;
use poolstatus_client::{FeedConfig, GateConfig, GateWatch, LiveFeed};
use std::time::Duration;
use tokio::runtime::Runtime;
use ui::{FeedPanel, StatusCard};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Desktop monitor for a PoolWatch server.
#[derive(Parser, Debug)]
#[command(name = "poolwatch-desktop", version, about = "Live pool status and storm gate monitor")]
struct Cli {
    /// Server base URL, e.g. http://pool.example.org:5000
    #[arg(long)]
    server: Option<String>,

    /// Poll interval in seconds for both the report feed and the gate status
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    poll_secs: Option<u64>,
}

fn main() -> Result<(), eframe::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });
    if let Ok(path) = AppConfig::get_config_path() {
        info!("Config file: {}", path.display());
    }

    let server_url = config.resolve_server_url(cli.server.as_deref());
    let feed_poll_secs = cli.poll_secs.unwrap_or(config.feed_poll_secs);
    let gate_poll_secs = cli.poll_secs.unwrap_or(config.gate_poll_secs);

    info!("Starting PoolWatch Desktop against {}", server_url);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 600.0])
            .with_title("PoolWatch Desktop"),
        ..Default::default()
    };

    eframe::run_native(
        "PoolWatch Desktop",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(PoolWatchApp::new(
                server_url,
                feed_poll_secs,
                gate_poll_secs,
                config.feed_panel_expanded,
            )))
        }),
    )
}

#[derive(Debug)]
struct PoolWatchApp {
    feed: LiveFeed,
    gate: GateWatch,
    status_card: StatusCard,
    feed_panel: FeedPanel,
    // Keeps the poller tasks alive for the lifetime of the window
    _runtime: Runtime,
}

impl PoolWatchApp {
    fn new(
        server_url: String,
        feed_poll_secs: u64,
        gate_poll_secs: u64,
        feed_panel_expanded: bool,
    ) -> Self {
        let runtime = Runtime::new().expect("Failed to create Tokio runtime");

        // Poller handles capture the runtime they are spawned under
        let (feed, gate) = {
            let _guard = runtime.enter();
            let feed = LiveFeed::spawn(FeedConfig {
                base_url: server_url.clone(),
                poll_interval: Duration::from_secs(feed_poll_secs),
            });
            let gate = GateWatch::spawn(GateConfig {
                base_url: server_url,
                poll_interval: Duration::from_secs(gate_poll_secs),
            });
            (feed, gate)
        };

        Self {
            feed,
            gate,
            status_card: StatusCard::new(),
            feed_panel: FeedPanel::new(feed_panel_expanded),
            _runtime: runtime,
        }
    }
}

impl eframe::App for PoolWatchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Snapshots only change when a poll lands, so a coarse repaint
        // timer is enough to keep the relative ages ticking
        ctx.request_repaint_after(Duration::from_millis(500));

        egui::CentralPanel::default().show(ctx, |ui| {
            let gate = self.gate.snapshot();
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                ui.set_max_width(420.0);
                self.status_card.render(ui, &gate);
            });
        });

        self.feed_panel.render(ctx, &self.feed);
    }
}
