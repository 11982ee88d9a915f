use std::sync::Arc;

mod backend_bridge;
mod controller;
mod ui;

use anyhow::{anyhow, Context, Result};
use crossbeam_channel::bounded;
use eframe::egui;
use signup_client::{load_settings, SignupClient};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::SignupGuiApp;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    let api = SignupClient::from_settings(&settings)
        .with_context(|| format!("failed to build client for {}", settings.server_url))?;
    info!(server_url = %settings.server_url, "starting signup gui");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, Arc::new(api));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Mergington High School Activities")
            .with_inner_size([1024.0, 720.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };
    let message_hide_after = settings.message_hide_after();
    eframe::run_native(
        "Mergington High School Activities",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(SignupGuiApp::new(
                cmd_tx,
                ui_rx,
                message_hide_after,
            )))
        }),
    )
    .map_err(|err| anyhow!("gui exited with error: {err}"))
}
