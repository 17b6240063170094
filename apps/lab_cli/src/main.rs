use std::{sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    views::{CoachCardVm, CoachPanelState, DebriefVm, StepPanelVm},
    ActionBridge, ClientSettings, LabApi, LabApiClient, LabBackend, LabIntent, LabRuntime,
    LabSnapshot, Phase, SessionContext,
};
use shared::domain::ActionId;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

const WAIT_LIMIT: Duration = Duration::from_secs(15);

#[derive(Parser, Debug)]
struct Cli {
    /// Lab backend base URL.
    #[arg(long, env = "LAB_API_URL")]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the backend answers its health endpoint.
    Probe,
    /// Print the scenario the backend serves.
    Scenario,
    /// Play a session headlessly, one action per bench click.
    Run {
        /// Comma separated action ids. Defaults to the textbook path.
        #[arg(long, value_delimiter = ',')]
        actions: Vec<String>,
        /// Print the debrief as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let settings = match cli.api_url.as_deref() {
        Some(url) => ClientSettings::with_api_url(url)?,
        None => ClientSettings::load()?,
    };
    let client = LabApiClient::from_settings(&settings, SessionContext::new());
    info!(api = %client.base_url(), session = %client.session().session_id(), "lab cli starting");

    match cli.command {
        Command::Probe => {
            let health = match client.health().await {
                Ok(health) => health,
                Err(err) if err.is_unreachable() => {
                    bail!("backend at {} is not reachable: {err}", client.base_url())
                }
                Err(err) => {
                    return Err(err).with_context(|| {
                        format!("backend at {} failed the health check", client.base_url())
                    })
                }
            };
            if !health.is_ok() {
                bail!("backend reported status {:?}", health.status);
            }
            println!("backend ok at {}", client.base_url());
        }
        Command::Scenario => {
            let scenario = client.fetch_scenario().await.context("failed to load scenario")?;
            println!("{}", serde_json::to_string_pretty(&scenario)?);
        }
        Command::Run { actions, json } => {
            let actions = if actions.is_empty() {
                textbook_path()
            } else {
                actions.into_iter().map(ActionId::new).collect()
            };
            run_session(LabApi::new(Arc::new(client)), actions, json).await?;
        }
    }

    Ok(())
}

fn textbook_path() -> Vec<ActionId> {
    [
        ActionId::WEAR_PPE,
        ActionId::FILL_BURETTE_HCL,
        ActionId::ADD_PHENOLPHTHALEIN,
        ActionId::TITRATE_CORRECT,
        ActionId::RECORD_READING,
    ]
    .into_iter()
    .map(ActionId::from)
    .collect()
}

async fn wait_for_snapshot(
    rx: &mut watch::Receiver<LabSnapshot>,
    what: &str,
    predicate: impl FnMut(&LabSnapshot) -> bool,
) -> Result<LabSnapshot> {
    let snapshot = tokio::time::timeout(WAIT_LIMIT, rx.wait_for(predicate))
        .await
        .with_context(|| format!("timed out waiting for {what}"))?
        .context("lab runtime stopped")?
        .clone();
    Ok(snapshot)
}

async fn run_session(api: LabApi, actions: Vec<ActionId>, json: bool) -> Result<()> {
    let (runtime, handle) = LabRuntime::new(api, ActionBridge::new());
    let task = tokio::spawn(runtime.run());
    let mut rx = handle.subscribe();

    let snapshot = wait_for_snapshot(&mut rx, "scenario", |s| {
        s.scenario.is_some() || (s.status.error.is_some() && !s.status.loading)
    })
    .await?;
    let Some(scenario) = snapshot.scenario else {
        bail!(snapshot.status.error.unwrap_or_default());
    };
    println!("{}: {}", scenario.title, scenario.description);

    handle.send(LabIntent::Start);
    let mut snapshot = wait_for_snapshot(&mut rx, "lab bench", |s| s.phase == Phase::Lab).await?;

    let mut panel = CoachPanelState::default();
    let mut finished = false;
    for action in actions {
        if let Some(step) = StepPanelVm::from_snapshot(&snapshot) {
            println!("\n{}: {}", step.label, step.description);
        }
        println!("  > {action}");

        let before = snapshot.feedback.as_ref().map(|f| f.token);
        handle.bridge().emit(action);
        snapshot = wait_for_snapshot(&mut rx, "verdict", |s| {
            s.feedback.as_ref().is_some_and(|f| Some(f.token) != before)
                || (s.status.error.is_some() && !s.status.loading)
        })
        .await?;
        if let Some(error) = snapshot.status.error.clone() {
            bail!(error);
        }

        let Some(feedback) = snapshot.feedback.clone() else {
            continue;
        };
        panel.sync(Some(&feedback));
        panel.show_reason = true;
        let card = CoachCardVm::new(&feedback, &panel);
        for line in [card.success_line, card.consequence, card.hint, card.hint_reason]
            .into_iter()
            .flatten()
        {
            println!("    {line}");
        }
        if snapshot.completing {
            finished = true;
            break;
        }
    }
    if !finished {
        bail!("actions ran out before the session was complete");
    }

    let snapshot = wait_for_snapshot(&mut rx, "debrief", |s| {
        s.phase == Phase::Debrief || (s.status.error.is_some() && !s.status.loading)
    })
    .await?;
    let Some(debrief) = snapshot.debrief else {
        bail!(snapshot
            .status
            .error
            .unwrap_or_else(|| "session ended without a debrief".to_string()));
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&debrief)?);
    } else {
        let vm = DebriefVm::new(&debrief);
        println!(
            "\nScore {} ({:?})  steps {}  mistakes {}  warnings {}",
            vm.score, vm.score_tone, vm.steps, vm.mistakes, vm.warnings
        );
        if !vm.summary.is_empty() {
            println!("{}", vm.summary);
        }
        for line in vm.action_log {
            println!("  {line}");
        }
    }

    drop(rx);
    drop(handle);
    task.await.context("lab runtime panicked")?;
    Ok(())
}
