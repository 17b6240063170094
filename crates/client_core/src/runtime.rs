//! Owner task for a [`LabMachine`].
//!
//! One task holds the machine and applies every event in arrival order.
//! Network calls and timers run as spawned tasks that post their outcome
//! back on the internal channel; none of them can be aborted once issued.

use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::{
    bridge::{ActionBridge, ActionNotification},
    machine::{Effect, LabEvent, LabMachine, LabSnapshot},
    status::{LabApi, RequestStatus},
};

/// Intents the presentation layer forwards directly. Action submissions
/// arrive through the [`ActionBridge`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabIntent {
    Start,
    DismissFeedback,
    Retry,
}

impl From<LabIntent> for LabEvent {
    fn from(intent: LabIntent) -> Self {
        match intent {
            LabIntent::Start => LabEvent::Start,
            LabIntent::DismissFeedback => LabEvent::DismissFeedback,
            LabIntent::Retry => LabEvent::Retry,
        }
    }
}

#[derive(Clone)]
pub struct LabHandle {
    intents: mpsc::UnboundedSender<LabIntent>,
    snapshots: watch::Receiver<LabSnapshot>,
    bridge: ActionBridge,
}

impl LabHandle {
    /// Returns `false` once the runtime has stopped.
    pub fn send(&self, intent: LabIntent) -> bool {
        self.intents.send(intent).is_ok()
    }

    pub fn bridge(&self) -> &ActionBridge {
        &self.bridge
    }

    pub fn snapshot(&self) -> LabSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LabSnapshot> {
        self.snapshots.clone()
    }
}

pub struct LabRuntime {
    machine: LabMachine,
    api: LabApi,
    events_tx: mpsc::UnboundedSender<LabEvent>,
    events_rx: mpsc::UnboundedReceiver<LabEvent>,
    intents_rx: mpsc::UnboundedReceiver<LabIntent>,
    actions_rx: mpsc::UnboundedReceiver<ActionNotification>,
    status_rx: watch::Receiver<RequestStatus>,
    snapshot_tx: watch::Sender<LabSnapshot>,
}

impl LabRuntime {
    pub fn new(api: LabApi, bridge: ActionBridge) -> (Self, LabHandle) {
        let machine = LabMachine::new();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (intents_tx, intents_rx) = mpsc::unbounded_channel();
        let actions_rx = bridge.listen();
        let status_rx = api.subscribe_status();
        let (snapshot_tx, snapshot_rx) = watch::channel(machine.snapshot(api.status()));

        let runtime = Self {
            machine,
            api,
            events_tx,
            events_rx,
            intents_rx,
            actions_rx,
            status_rx,
            snapshot_tx,
        };
        let handle = LabHandle {
            intents: intents_tx,
            snapshots: snapshot_rx,
            bridge,
        };
        (runtime, handle)
    }

    /// Runs until every [`LabHandle`] has been dropped.
    pub async fn run(mut self) {
        info!(session = %self.api.session().session_id(), "lab runtime started");
        let boot = self.machine.boot();
        self.execute(boot);
        self.publish();

        loop {
            tokio::select! {
                Some(event) = self.events_rx.recv() => self.apply(event),
                Some(notification) = self.actions_rx.recv() => {
                    self.apply(LabEvent::Action(notification.action));
                }
                Ok(()) = self.status_rx.changed() => self.publish(),
                intent = self.intents_rx.recv() => match intent {
                    Some(intent) => self.apply(intent.into()),
                    None => break,
                },
            }
        }
        info!("lab runtime stopped");
    }

    fn apply(&mut self, event: LabEvent) {
        debug!(event = ?event, "lab runtime event");
        let effects = self.machine.handle(event);
        self.execute(effects);
        self.publish();
    }

    fn publish(&self) {
        let snapshot = self.machine.snapshot(self.api.status());
        self.snapshot_tx.send_if_modified(|current| {
            if *current == snapshot {
                return false;
            }
            *current = snapshot;
            true
        });
    }

    fn execute(&self, effects: Vec<Effect>) {
        for effect in effects {
            let api = self.api.clone();
            let tx = self.events_tx.clone();
            match effect {
                Effect::FetchScenario => {
                    tokio::spawn(async move {
                        let scenario = api.fetch_scenario().await;
                        let _ = tx.send(LabEvent::ScenarioLoaded(scenario));
                    });
                }
                Effect::SubmitAction {
                    generation,
                    step,
                    action,
                } => {
                    tokio::spawn(async move {
                        let result = api.submit_action(step, &action).await;
                        let _ = tx.send(LabEvent::Verdict {
                            generation,
                            step,
                            result,
                        });
                    });
                }
                Effect::ClearFeedbackAfter { token, delay } => {
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = tx.send(LabEvent::FeedbackExpired { token });
                    });
                }
                Effect::FetchDebriefAfter { generation, delay } => {
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = tx.send(LabEvent::DebriefDue { generation });
                    });
                }
                Effect::FetchDebrief { generation } => {
                    tokio::spawn(async move {
                        let debrief = api.fetch_debrief().await;
                        let _ = tx.send(LabEvent::DebriefLoaded {
                            generation,
                            debrief,
                        });
                    });
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
