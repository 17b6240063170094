//! Request wrapper that folds every backend call into one shared loading flag
//! and one error slot. Overlapping calls are neither deduplicated nor
//! cancelled; the last writer wins.

use std::sync::Arc;

use shared::{
    domain::{ActionId, Debrief, Scenario, StepId},
    protocol::ActionResult,
};
use tokio::sync::watch;
use tracing::warn;

use crate::{LabBackend, SessionContext};

pub const SCENARIO_UNREACHABLE: &str = "Cannot reach server. Is the lab backend running?";
pub const ACTION_FAILED: &str = "Network error — check the lab backend.";
pub const DEBRIEF_FAILED: &str = "Could not load debrief.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestStatus {
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct LabApi {
    backend: Arc<dyn LabBackend>,
    status: Arc<watch::Sender<RequestStatus>>,
}

impl LabApi {
    pub fn new(backend: Arc<dyn LabBackend>) -> Self {
        let (status, _) = watch::channel(RequestStatus::default());
        Self {
            backend,
            status: Arc::new(status),
        }
    }

    pub fn session(&self) -> SessionContext {
        self.backend.session()
    }

    pub fn status(&self) -> RequestStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<RequestStatus> {
        self.status.subscribe()
    }

    fn begin(&self, clear_error: bool) {
        self.status.send_modify(|status| {
            status.loading = true;
            if clear_error {
                status.error = None;
            }
        });
    }

    fn finish(&self, error: Option<&str>) {
        self.status.send_modify(|status| {
            status.loading = false;
            if let Some(message) = error {
                status.error = Some(message.to_string());
            }
        });
    }

    pub async fn fetch_scenario(&self) -> Option<Scenario> {
        self.begin(false);
        match self.backend.fetch_scenario().await {
            Ok(scenario) => {
                self.finish(None);
                Some(scenario)
            }
            Err(err) => {
                warn!(unreachable = err.is_unreachable(), error = %err, "lab: scenario fetch failed");
                self.finish(Some(SCENARIO_UNREACHABLE));
                None
            }
        }
    }

    pub async fn submit_action(&self, step_id: StepId, action: &ActionId) -> Option<ActionResult> {
        self.begin(true);
        match self.backend.submit_action(step_id, action).await {
            Ok(result) => {
                self.finish(None);
                Some(result)
            }
            Err(err) => {
                warn!(
                    step = %step_id,
                    action = %action,
                    unreachable = err.is_unreachable(),
                    error = %err,
                    "lab: action submit failed"
                );
                self.finish(Some(ACTION_FAILED));
                None
            }
        }
    }

    pub async fn fetch_debrief(&self) -> Option<Debrief> {
        self.begin(false);
        match self.backend.fetch_debrief().await {
            Ok(debrief) => {
                self.finish(None);
                Some(debrief)
            }
            Err(err) => {
                warn!(unreachable = err.is_unreachable(), error = %err, "lab: debrief fetch failed");
                self.finish(Some(DEBRIEF_FAILED));
                None
            }
        }
    }
}
