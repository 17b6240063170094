//! Runtime bridge between UI command queue and the lab runtime.

use std::{path::Path, sync::Arc, thread};

use anyhow::Context;
use client_core::{
    ActionBridge, ClientSettings, LabApi, LabApiClient, LabBackend, LabHandle, LabIntent,
    LabRuntime, SessionContext,
};
use crossbeam_channel::{Receiver, Sender};
use shared::domain::Debrief;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiErrorContext, UiEvent},
    snapshots::SnapshotFeed,
};

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    settings: ClientSettings,
    bridge: ActionBridge,
) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = LabApiClient::from_settings(&settings, SessionContext::new());
            tracing::info!(
                api = %client.base_url(),
                session = %client.session().session_id(),
                "lab backend worker ready"
            );
            let (lab, handle) = LabRuntime::new(LabApi::new(Arc::new(client)), bridge);
            tokio::spawn(lab.run());
            if ui_tx
                .send(UiEvent::BackendReady(SnapshotFeed::new(handle.subscribe())))
                .is_err()
            {
                tracing::info!("ui closed before the lab backend was ready");
                return;
            }

            // Blocking intake; block_on runs off the worker pool.
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Start => send_intent(&handle, LabIntent::Start, &ui_tx),
                    BackendCommand::DismissFeedback => {
                        send_intent(&handle, LabIntent::DismissFeedback, &ui_tx)
                    }
                    BackendCommand::Retry => send_intent(&handle, LabIntent::Retry, &ui_tx),
                    BackendCommand::SaveReport { path, debrief } => {
                        let event = match write_report(&path, &debrief).await {
                            Ok(()) => UiEvent::Info(format!("Saved report to {}", path.display())),
                            Err(err) => UiEvent::Error(UiError::from_message(
                                UiErrorContext::SaveReport,
                                format!("{err:#}"),
                            )),
                        };
                        let _ = ui_tx.try_send(event);
                    }
                }
            }
            tracing::info!("ui command queue closed, stopping lab backend worker");
        });
    });
}

fn send_intent(handle: &LabHandle, intent: LabIntent, ui_tx: &Sender<UiEvent>) {
    if !handle.send(intent) {
        let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
            UiErrorContext::General,
            "Lab runtime disconnected; restart the app",
        )));
    }
}

async fn write_report(path: &Path, debrief: &Debrief) -> anyhow::Result<()> {
    let body = serde_json::to_vec_pretty(debrief).context("failed to encode debrief")?;
    tokio::fs::write(path, body)
        .await
        .with_context(|| format!("failed to write {}", path.display()))
}
