mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::{ActionBridge, ClientSettings};
use crossbeam_channel::bounded;
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::ui::LabDesktopApp;

#[derive(Parser, Debug)]
struct Args {
    /// Lab backend base URL.
    #[arg(long, env = "LAB_API_URL")]
    api_url: Option<String>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    let bridge = ActionBridge::new();

    let settings = match args.api_url.as_deref() {
        Some(url) => ClientSettings::with_api_url(url),
        None => ClientSettings::load(),
    };
    match settings {
        Ok(settings) => {
            backend_bridge::runtime::launch(cmd_rx, ui_tx, settings, bridge.clone());
        }
        Err(err) => {
            tracing::error!("invalid lab settings: {err:#}");
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                format!("{err:#}"),
            )));
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Chemistry Lab")
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([760.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Chemistry Lab",
        options,
        Box::new(|_cc| Ok(Box::new(LabDesktopApp::new(cmd_tx, ui_rx, bridge)))),
    )
}
