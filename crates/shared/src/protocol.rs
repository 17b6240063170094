use serde::{Deserialize, Serialize};

use crate::{
    domain::{ActionId, SessionId, Severity, Step, StepId},
    error::ProtocolError,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRequest {
    pub session_id: SessionId,
    pub step_id: StepId,
    pub action: ActionId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebriefRequest {
    pub session_id: SessionId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// Verdict exactly as it travels over the wire. Which fields are present
/// depends on the `correct` branch; use [`ActionResponse::into_result`] to get
/// the checked form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionResponse {
    pub correct: bool,
    #[serde(default)]
    pub complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_step: Option<Step>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consequence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    Correct {
        message: String,
        complete: bool,
        next_step: Option<Step>,
    },
    Incorrect {
        consequence: String,
        hint: Option<String>,
        hint_reason: Option<String>,
        severity: Severity,
    },
}

impl ActionResult {
    pub fn is_correct(&self) -> bool {
        matches!(self, ActionResult::Correct { .. })
    }
}

impl ActionResponse {
    pub fn into_result(self, step: StepId) -> Result<ActionResult, ProtocolError> {
        if !self.correct {
            return Ok(ActionResult::Incorrect {
                consequence: self.consequence.unwrap_or_default(),
                hint: self.hint.filter(|hint| !hint.is_empty()),
                hint_reason: self.hint_reason.filter(|reason| !reason.is_empty()),
                severity: self.severity.unwrap_or(Severity::Informational),
            });
        }

        if !self.complete && self.next_step.is_none() {
            return Err(ProtocolError::MissingNextStep { step });
        }

        Ok(ActionResult::Correct {
            message: self.message.unwrap_or_default(),
            complete: self.complete,
            next_step: self.next_step,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Debrief;

    #[test]
    fn incorrect_verdict_keeps_coaching_payload() {
        let raw: ActionResponse = serde_json::from_value(serde_json::json!({
            "correct": false,
            "consequence": "You spilled acid.",
            "hint": "Always wear gloves.",
            "severity": "mistake",
            "stay_on_step": true
        }))
        .expect("decode");

        let result = raw.into_result(StepId::Start).expect("verdict");
        assert_eq!(
            result,
            ActionResult::Incorrect {
                consequence: "You spilled acid.".to_string(),
                hint: Some("Always wear gloves.".to_string()),
                hint_reason: None,
                severity: Severity::Mistake,
            }
        );
    }

    #[test]
    fn unknown_severity_falls_back_to_informational() {
        let raw: ActionResponse = serde_json::from_value(serde_json::json!({
            "correct": false,
            "consequence": "Hmm.",
            "severity": "curious"
        }))
        .expect("decode");

        match raw.into_result(StepId::Titrate).expect("verdict") {
            ActionResult::Incorrect { severity, .. } => {
                assert_eq!(severity, Severity::Informational)
            }
            other => panic!("unexpected verdict: {other:?}"),
        }
    }

    #[test]
    fn correct_incomplete_verdict_requires_next_step() {
        let raw = ActionResponse {
            correct: true,
            complete: false,
            message: Some("Good work!".to_string()),
            ..ActionResponse::default()
        };

        assert_eq!(
            raw.into_result(StepId::FillBurette),
            Err(ProtocolError::MissingNextStep {
                step: StepId::FillBurette
            })
        );
    }

    #[test]
    fn complete_verdict_tolerates_null_next_step() {
        let raw: ActionResponse = serde_json::from_value(serde_json::json!({
            "correct": true,
            "complete": true,
            "message": "Good work!",
            "next_step": null
        }))
        .expect("decode");

        assert_eq!(
            raw.into_result(StepId::Record).expect("verdict"),
            ActionResult::Correct {
                message: "Good work!".to_string(),
                complete: true,
                next_step: None,
            }
        );
    }

    #[test]
    fn scenario_step_ignores_backend_graph_fields() {
        let step: Step = serde_json::from_value(serde_json::json!({
            "id": "fill_burette",
            "description": "Fill the burette with HCl.",
            "required_action": "fill_burette_hcl",
            "correct_next": "add_indicator",
            "wrong_choices": [{"action": "fill_burette_naoh"}]
        }))
        .expect("decode");

        assert_eq!(step.id, StepId::FillBurette);
        assert_eq!(step.required_action.as_str(), ActionId::FILL_BURETTE_HCL);
    }

    #[test]
    fn debrief_without_summary_decodes() {
        let debrief: Debrief = serde_json::from_value(serde_json::json!({
            "score": 80,
            "completed_steps": 5,
            "total_steps": 5,
            "mistakes": 1,
            "warnings": 0,
            "actions": [{"step": "start", "action": "wear_ppe"}]
        }))
        .expect("decode");

        assert_eq!(debrief.summary, "");
        assert_eq!(debrief.actions.len(), 1);
        assert_eq!(debrief.actions[0].step, StepId::Start);
    }
}
