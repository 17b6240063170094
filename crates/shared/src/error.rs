use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::StepId;

/// Body the lab backend returns alongside 4xx responses, e.g. `{"error": "Unknown step"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("verdict for step {step} is correct and incomplete but carries no next_step")]
    MissingNextStep { step: StepId },
}
