use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{ActionId, Debrief, Scenario, SessionId, StepId},
    error::BackendErrorBody,
    protocol::{ActionRequest, ActionResponse, ActionResult, DebriefRequest, HealthResponse},
};
use tracing::{debug, info};

pub mod bridge;
pub mod error;
pub mod machine;
pub mod runtime;
pub mod settings;
pub mod status;
pub mod views;

pub use bridge::{ActionBridge, ActionNotification, SceneObject, LAB_BENCH};
pub use error::{ClientResult, LabClientError};
pub use machine::{Effect, Feedback, FeedbackKind, Generation, LabEvent, LabMachine, LabSnapshot, Phase};
pub use runtime::{LabHandle, LabIntent, LabRuntime};
pub use settings::ClientSettings;
pub use status::{LabApi, RequestStatus};

/// Session scope threaded into every backend call. One value is created per
/// application lifetime; retries keep using it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionContext {
    session_id: SessionId,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::with_id(SessionId::generate())
    }

    pub fn with_id(session_id: SessionId) -> Self {
        Self { session_id }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
pub trait LabBackend: Send + Sync {
    fn session(&self) -> SessionContext;
    async fn fetch_scenario(&self) -> ClientResult<Scenario>;
    async fn submit_action(&self, step_id: StepId, action: &ActionId) -> ClientResult<ActionResult>;
    async fn fetch_debrief(&self) -> ClientResult<Debrief>;
    async fn health(&self) -> ClientResult<HealthResponse>;
}

/// HTTP client for the lab backend. Every call is one round trip with no
/// retry; the session id is the only idempotency handle.
pub struct LabApiClient {
    http: Client,
    base_url: String,
    session: SessionContext,
}

impl LabApiClient {
    pub fn new(base_url: impl Into<String>, session: SessionContext) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
            session,
        }
    }

    pub fn from_settings(settings: &ClientSettings, session: SessionContext) -> Self {
        Self::new(settings.api_base_url.clone(), session)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<BackendErrorBody>(&body)
            .map(|parsed| parsed.error)
            .unwrap_or(body);
        return Err(LabClientError::Status { status, message });
    }
    Ok(response.json().await?)
}

#[async_trait]
impl LabBackend for LabApiClient {
    fn session(&self) -> SessionContext {
        self.session
    }

    async fn fetch_scenario(&self) -> ClientResult<Scenario> {
        let response = self.http.get(self.endpoint("/api/scenario")).send().await?;
        let scenario: Scenario = read_json(response).await?;
        info!(
            title = %scenario.title,
            total_steps = scenario.total_steps,
            first_step = %scenario.first_step.id,
            "lab: scenario loaded"
        );
        Ok(scenario)
    }

    async fn submit_action(&self, step_id: StepId, action: &ActionId) -> ClientResult<ActionResult> {
        let request = ActionRequest {
            session_id: self.session.session_id(),
            step_id,
            action: action.clone(),
        };
        let response = self
            .http
            .post(self.endpoint("/api/action"))
            .json(&request)
            .send()
            .await?;
        let raw: ActionResponse = read_json(response).await?;
        let result = raw.into_result(step_id)?;
        debug!(
            step = %step_id,
            action = %action,
            correct = result.is_correct(),
            "lab: verdict received"
        );
        Ok(result)
    }

    async fn fetch_debrief(&self) -> ClientResult<Debrief> {
        let response = self
            .http
            .post(self.endpoint("/api/debrief"))
            .json(&DebriefRequest {
                session_id: self.session.session_id(),
            })
            .send()
            .await?;
        let debrief: Debrief = read_json(response).await?;
        info!(
            score = debrief.score,
            mistakes = debrief.mistakes,
            warnings = debrief.warnings,
            "lab: debrief loaded"
        );
        Ok(debrief)
    }

    async fn health(&self) -> ClientResult<HealthResponse> {
        let response = self.http.get(self.endpoint("/api/health")).send().await?;
        read_json(response).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
