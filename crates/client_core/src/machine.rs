//! Phase/step state machine for a lab session.
//!
//! [`LabMachine`] is a pure reducer: it consumes [`LabEvent`]s and returns the
//! [`Effect`]s the runtime must carry out (network calls, timers). Nothing in
//! here awaits or sleeps, so every transition can be driven synchronously.
//!
//! Work issued for a run is tagged with the run's [`Generation`]. A retry
//! bumps the generation, so verdicts and debriefs that resolve after the
//! learner has already gone back to the intro screen are discarded.

use std::time::Duration;

use shared::{
    domain::{ActionId, Debrief, Scenario, Severity, Step, StepId},
    protocol::ActionResult,
};
use tracing::{debug, info};

use crate::status::RequestStatus;

pub const SUCCESS_FEEDBACK_TTL: Duration = Duration::from_millis(1500);
pub const DEBRIEF_DELAY: Duration = Duration::from_millis(1200);
pub const FALLBACK_TOTAL_STEPS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Intro,
    Lab,
    Debrief,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Generation(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackKind {
    Success {
        message: String,
    },
    Failure {
        consequence: String,
        hint: Option<String>,
        hint_reason: Option<String>,
        severity: Severity,
    },
}

/// Transient coaching card. `token` identifies this particular instance so a
/// timer armed for an older card cannot clear a newer one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub token: u64,
    pub kind: FeedbackKind,
}

impl Feedback {
    pub fn is_correct(&self) -> bool {
        matches!(self.kind, FeedbackKind::Success { .. })
    }

    pub fn severity(&self) -> Severity {
        match &self.kind {
            FeedbackKind::Success { .. } => Severity::Success,
            FeedbackKind::Failure { severity, .. } => *severity,
        }
    }

    /// Success cards clear themselves; failure cards wait for a dismissal.
    pub fn auto_dismisses(&self) -> bool {
        self.is_correct()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabEvent {
    ScenarioLoaded(Option<Scenario>),
    Start,
    Action(ActionId),
    Verdict {
        generation: Generation,
        step: StepId,
        result: Option<ActionResult>,
    },
    FeedbackExpired {
        token: u64,
    },
    DebriefDue {
        generation: Generation,
    },
    DebriefLoaded {
        generation: Generation,
        debrief: Option<Debrief>,
    },
    DismissFeedback,
    Retry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchScenario,
    SubmitAction {
        generation: Generation,
        step: StepId,
        action: ActionId,
    },
    ClearFeedbackAfter {
        token: u64,
        delay: Duration,
    },
    FetchDebriefAfter {
        generation: Generation,
        delay: Duration,
    },
    FetchDebrief {
        generation: Generation,
    },
}

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabSnapshot {
    pub phase: Phase,
    pub scenario: Option<Scenario>,
    pub current_step: Option<Step>,
    pub completed: u32,
    pub feedback: Option<Feedback>,
    pub debrief: Option<Debrief>,
    /// Final step accepted; the debrief is pending and actions are ignored.
    pub completing: bool,
    pub status: RequestStatus,
}

impl LabSnapshot {
    pub fn total_steps(&self) -> u32 {
        self.scenario
            .as_ref()
            .map(|scenario| scenario.total_steps)
            .unwrap_or(FALLBACK_TOTAL_STEPS)
    }

    pub fn required_action(&self) -> Option<&ActionId> {
        self.current_step.as_ref().map(|step| &step.required_action)
    }
}

#[derive(Debug, Default)]
pub struct LabMachine {
    phase: Phase,
    scenario: Option<Scenario>,
    current_step: Option<Step>,
    completed: u32,
    feedback: Option<Feedback>,
    debrief: Option<Debrief>,
    generation: Generation,
    awaiting_verdict: bool,
    completing: bool,
    next_token: u64,
}

impl LabMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Effects to run once at application start.
    pub fn boot(&self) -> Vec<Effect> {
        vec![Effect::FetchScenario]
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn scenario(&self) -> Option<&Scenario> {
        self.scenario.as_ref()
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.current_step.as_ref()
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn debrief(&self) -> Option<&Debrief> {
        self.debrief.as_ref()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn snapshot(&self, status: RequestStatus) -> LabSnapshot {
        LabSnapshot {
            phase: self.phase,
            scenario: self.scenario.clone(),
            current_step: self.current_step.clone(),
            completed: self.completed,
            feedback: self.feedback.clone(),
            debrief: self.debrief.clone(),
            completing: self.completing,
            status,
        }
    }

    pub fn handle(&mut self, event: LabEvent) -> Vec<Effect> {
        match event {
            LabEvent::ScenarioLoaded(scenario) => self.on_scenario_loaded(scenario),
            LabEvent::Start => self.on_start(),
            LabEvent::Action(action) => self.on_action(action),
            LabEvent::Verdict {
                generation,
                step,
                result,
            } => self.on_verdict(generation, step, result),
            LabEvent::FeedbackExpired { token } => {
                if self.feedback.as_ref().is_some_and(|f| f.token == token) {
                    self.feedback = None;
                }
                Vec::new()
            }
            LabEvent::DebriefDue { generation } => {
                if generation != self.generation || !self.completing {
                    return Vec::new();
                }
                vec![Effect::FetchDebrief { generation }]
            }
            LabEvent::DebriefLoaded {
                generation,
                debrief,
            } => self.on_debrief_loaded(generation, debrief),
            LabEvent::DismissFeedback => {
                self.feedback = None;
                Vec::new()
            }
            LabEvent::Retry => self.on_retry(),
        }
    }

    fn total_steps(&self) -> u32 {
        self.scenario
            .as_ref()
            .map(|scenario| scenario.total_steps)
            .unwrap_or(FALLBACK_TOTAL_STEPS)
    }

    fn issue_feedback(&mut self, kind: FeedbackKind) -> u64 {
        self.next_token += 1;
        let token = self.next_token;
        self.feedback = Some(Feedback { token, kind });
        token
    }

    fn count_completed_step(&mut self) {
        self.completed = (self.completed + 1).min(self.total_steps());
    }

    fn on_scenario_loaded(&mut self, scenario: Option<Scenario>) -> Vec<Effect> {
        let Some(scenario) = scenario else {
            return Vec::new();
        };
        if self.phase != Phase::Lab || self.current_step.is_none() {
            self.current_step = Some(scenario.first_step.clone());
        }
        self.scenario = Some(scenario);
        Vec::new()
    }

    fn on_start(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Intro {
            return Vec::new();
        }
        if self.scenario.is_none() {
            debug!("lab: start requested before scenario load, refetching");
            return vec![Effect::FetchScenario];
        }
        self.phase = Phase::Lab;
        self.feedback = None;
        info!(generation = self.generation.0, "lab: entered bench");
        Vec::new()
    }

    fn on_action(&mut self, action: ActionId) -> Vec<Effect> {
        if self.phase != Phase::Lab || self.awaiting_verdict || self.completing {
            debug!(action = %action, phase = ?self.phase, "lab: action ignored");
            return Vec::new();
        }
        let Some(step) = self.current_step.as_ref() else {
            return Vec::new();
        };
        self.awaiting_verdict = true;
        vec![Effect::SubmitAction {
            generation: self.generation,
            step: step.id,
            action,
        }]
    }

    fn on_verdict(
        &mut self,
        generation: Generation,
        step: StepId,
        result: Option<ActionResult>,
    ) -> Vec<Effect> {
        if generation != self.generation {
            debug!(stale = generation.0, current = self.generation.0, "lab: stale verdict dropped");
            return Vec::new();
        }
        self.awaiting_verdict = false;
        if self.phase != Phase::Lab {
            return Vec::new();
        }

        match result {
            None => Vec::new(),
            Some(ActionResult::Correct {
                message,
                complete: true,
                ..
            }) => {
                // The final step is not counted; the bench is replaced by the debrief.
                self.issue_feedback(FeedbackKind::Success { message });
                self.completing = true;
                info!(step = %step, "lab: final step accepted, debrief pending");
                vec![Effect::FetchDebriefAfter {
                    generation,
                    delay: DEBRIEF_DELAY,
                }]
            }
            Some(ActionResult::Correct {
                message,
                complete: false,
                next_step,
            }) => {
                let Some(next_step) = next_step else {
                    return Vec::new();
                };
                let token = self.issue_feedback(FeedbackKind::Success { message });
                self.count_completed_step();
                info!(from = %step, to = %next_step.id, completed = self.completed, "lab: step advanced");
                self.current_step = Some(next_step);
                vec![Effect::ClearFeedbackAfter {
                    token,
                    delay: SUCCESS_FEEDBACK_TTL,
                }]
            }
            Some(ActionResult::Incorrect {
                consequence,
                hint,
                hint_reason,
                severity,
            }) => {
                info!(step = %step, severity = ?severity, "lab: incorrect action");
                self.issue_feedback(FeedbackKind::Failure {
                    consequence,
                    hint,
                    hint_reason,
                    severity,
                });
                Vec::new()
            }
        }
    }

    fn on_debrief_loaded(&mut self, generation: Generation, debrief: Option<Debrief>) -> Vec<Effect> {
        if generation != self.generation || !self.completing || self.phase != Phase::Lab {
            debug!(generation = generation.0, "lab: late debrief dropped");
            return Vec::new();
        }
        self.completing = false;
        match debrief {
            Some(debrief) => {
                info!(score = debrief.score, "lab: session complete");
                self.debrief = Some(debrief);
                self.phase = Phase::Debrief;
            }
            // Final step stays current, so resubmitting it requests a new debrief.
            None => {}
        }
        Vec::new()
    }

    fn on_retry(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Debrief {
            return Vec::new();
        }
        self.generation = Generation(self.generation.0 + 1);
        self.phase = Phase::Intro;
        self.completed = 0;
        self.feedback = None;
        self.debrief = None;
        self.awaiting_verdict = false;
        self.completing = false;
        self.current_step = self
            .scenario
            .as_ref()
            .map(|scenario| scenario.first_step.clone());
        info!(generation = self.generation.0, "lab: retry, reloading scenario");
        vec![Effect::FetchScenario]
    }
}

#[cfg(test)]
#[path = "tests/machine_tests.rs"]
mod tests;
