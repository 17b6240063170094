//! View models for the intro, step, coach and debrief panels. Pure functions of
//! a [`LabSnapshot`]; the desktop shell only maps tones to colors.

use shared::domain::{Debrief, Severity};

use crate::machine::{Feedback, FeedbackKind, LabSnapshot};

pub const DEFAULT_TITLE: &str = "Chemistry Lab";
pub const DEFAULT_DESCRIPTION: &str = "Step inside a virtual chemistry lab. Make decisions, see real consequences, and learn from every mistake, safely.";
pub const BENCH_HINT: &str = "CLICK objects on the bench to interact";
/// Upper bound on drawn progress pips; `total_steps` comes from the backend.
pub const MAX_PIPS: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntroVm {
    pub title: String,
    pub description: String,
    pub error: Option<String>,
    pub button_label: &'static str,
    pub button_enabled: bool,
}

impl IntroVm {
    pub fn from_snapshot(snapshot: &LabSnapshot) -> Self {
        let loading = snapshot.status.loading;
        Self {
            title: snapshot
                .scenario
                .as_ref()
                .map(|scenario| scenario.title.clone())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: snapshot
                .scenario
                .as_ref()
                .map(|scenario| scenario.description.clone())
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            error: snapshot.status.error.clone(),
            button_label: if loading { "Loading..." } else { "Enter Lab →" },
            button_enabled: !loading,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPanelVm {
    pub label: String,
    pub description: String,
    /// One entry per step up to [`MAX_PIPS`], `true` once that step is done.
    pub pips: Vec<bool>,
    pub hint: &'static str,
}

impl StepPanelVm {
    /// `None` until a step is current.
    pub fn from_snapshot(snapshot: &LabSnapshot) -> Option<Self> {
        let step = snapshot.current_step.as_ref()?;
        let total = snapshot.total_steps();
        Some(Self {
            label: format!("Step {} of {}", snapshot.completed + 1, total),
            description: step.description.clone(),
            pips: (0..total.min(MAX_PIPS)).map(|i| i < snapshot.completed).collect(),
            hint: BENCH_HINT,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Mistake,
    Info,
}

impl From<Severity> for Tone {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Success => Tone::Success,
            Severity::Warning => Tone::Warning,
            Severity::Mistake => Tone::Mistake,
            Severity::Informational => Tone::Info,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoachButton {
    ToggleReason { showing: bool },
    Dismiss,
    Continue,
}

impl CoachButton {
    pub fn label(self) -> &'static str {
        match self {
            CoachButton::ToggleReason { showing: true } => "Hide reason",
            CoachButton::ToggleReason { showing: false } => "Why this hint?",
            CoachButton::Dismiss => "Dismiss",
            CoachButton::Continue => "Continue →",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoachCardVm {
    pub tone: Tone,
    pub consequence: Option<String>,
    pub success_line: Option<String>,
    pub hint: Option<String>,
    /// Present only while the reason is expanded.
    pub hint_reason: Option<String>,
    pub buttons: Vec<CoachButton>,
    pub auto_dismisses: bool,
}

impl CoachCardVm {
    pub fn new(feedback: &Feedback, panel: &CoachPanelState) -> Self {
        let showing = panel.show_reason;
        let tone = Tone::from(feedback.severity());
        let auto_dismisses = feedback.auto_dismisses();
        match &feedback.kind {
            FeedbackKind::Success { message } => Self {
                tone,
                consequence: None,
                success_line: Some(format!("✓ {message}")),
                hint: None,
                hint_reason: None,
                buttons: vec![CoachButton::Continue],
                auto_dismisses,
            },
            FeedbackKind::Failure {
                consequence,
                hint,
                hint_reason,
                ..
            } => {
                let buttons = if hint_reason.is_some() {
                    vec![CoachButton::ToggleReason { showing }, CoachButton::Dismiss]
                } else {
                    vec![CoachButton::Continue]
                };
                Self {
                    tone,
                    consequence: Some(consequence.clone()).filter(|text| !text.is_empty()),
                    success_line: None,
                    hint: hint.clone(),
                    hint_reason: hint_reason.clone().filter(|_| showing),
                    buttons,
                    auto_dismisses,
                }
            }
        }
    }
}

/// Ephemeral "why this hint?" toggle. Collapses whenever a different feedback
/// instance is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoachPanelState {
    feedback_token: Option<u64>,
    pub show_reason: bool,
}

impl CoachPanelState {
    pub fn sync(&mut self, feedback: Option<&Feedback>) {
        let token = feedback.map(|feedback| feedback.token);
        if token != self.feedback_token {
            self.feedback_token = token;
            self.show_reason = false;
        }
    }

    pub fn toggle_reason(&mut self) {
        self.show_reason = !self.show_reason;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTone {
    Green,
    Amber,
    Red,
}

impl ScoreTone {
    pub fn for_score(score: u32) -> Self {
        if score >= 80 {
            ScoreTone::Green
        } else if score >= 50 {
            ScoreTone::Amber
        } else {
            ScoreTone::Red
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebriefVm {
    pub score: u32,
    pub score_tone: ScoreTone,
    pub steps: String,
    pub mistakes: u32,
    pub warnings: u32,
    pub summary: String,
    pub action_log: Vec<String>,
}

impl DebriefVm {
    pub fn new(debrief: &Debrief) -> Self {
        Self {
            score: debrief.score,
            score_tone: ScoreTone::for_score(debrief.score),
            steps: format!("{}/{}", debrief.completed_steps, debrief.total_steps),
            mistakes: debrief.mistakes,
            warnings: debrief.warnings,
            summary: debrief.summary.clone(),
            action_log: debrief
                .actions
                .iter()
                .enumerate()
                .map(|(i, entry)| format!("{:02}. [{}] → {}", i + 1, entry.step, entry.action))
                .collect(),
        }
    }
}

#[cfg(test)]
#[path = "tests/views_tests.rs"]
mod tests;
