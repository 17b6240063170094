use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one learner session. Created once per application lifetime and
/// reused across retries, so backend-side tallies accumulate over reruns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    Start,
    FillBurette,
    AddIndicator,
    Titrate,
    Record,
}

impl StepId {
    pub fn as_str(self) -> &'static str {
        match self {
            StepId::Start => "start",
            StepId::FillBurette => "fill_burette",
            StepId::AddIndicator => "add_indicator",
            StepId::Titrate => "titrate",
            StepId::Record => "record",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque action identifier emitted by a bench object. The backend decides
/// what is correct; the client never interprets these beyond equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub String);

impl ActionId {
    pub const WEAR_PPE: &'static str = "wear_ppe";
    pub const SKIP_PPE: &'static str = "skip_ppe";
    pub const FILL_BURETTE_HCL: &'static str = "fill_burette_hcl";
    pub const FILL_BURETTE_NAOH: &'static str = "fill_burette_naoh";
    pub const ADD_PHENOLPHTHALEIN: &'static str = "add_phenolphthalein";
    pub const ADD_LITMUS: &'static str = "add_litmus";
    pub const TITRATE_CORRECT: &'static str = "titrate_correct";
    pub const RECORD_READING: &'static str = "record_reading";

    pub const VOCABULARY: [&'static str; 8] = [
        Self::WEAR_PPE,
        Self::SKIP_PPE,
        Self::FILL_BURETTE_HCL,
        Self::FILL_BURETTE_NAOH,
        Self::ADD_PHENOLPHTHALEIN,
        Self::ADD_LITMUS,
        Self::TITRATE_CORRECT,
        Self::RECORD_READING,
    ];

    pub fn new(action: impl Into<String>) -> Self {
        Self(action.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    pub description: String,
    pub required_action: ActionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub title: String,
    pub description: String,
    pub first_step: Step,
    pub total_steps: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Warning,
    Mistake,
    #[serde(other)]
    Informational,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLogEntry {
    pub step: StepId,
    pub action: ActionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debrief {
    pub score: u32,
    pub completed_steps: u32,
    pub total_steps: u32,
    pub mistakes: u32,
    pub warnings: u32,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub actions: Vec<ActionLogEntry>,
}
