//! Backend commands queued from UI to backend worker. Bench clicks bypass
//! this queue and go straight through the action bridge.

use shared::domain::Debrief;
use std::path::PathBuf;

pub enum BackendCommand {
    Start,
    DismissFeedback,
    Retry,
    SaveReport { path: PathBuf, debrief: Debrief },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Start => "start",
            BackendCommand::DismissFeedback => "dismiss_feedback",
            BackendCommand::Retry => "retry",
            BackendCommand::SaveReport { .. } => "save_report",
        }
    }
}
