//! Backend-to-UI events and error modeling for the desktop shell.

use crate::controller::snapshots::SnapshotFeed;

pub enum UiEvent {
    /// Runtime is up; the feed carries every snapshot from here on.
    BackendReady(SnapshotFeed),
    Info(String),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Io,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    SaveReport,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let category = if lower.contains("invalid")
            || lower.contains("missing")
            || lower.contains("malformed")
            || lower.contains("unsupported scheme")
            || lower.contains("not a url")
            || lower.contains("has no host")
        {
            UiErrorCategory::Validation
        } else if lower.contains("timeout")
            || lower.contains("connection")
            || lower.contains("network")
            || lower.contains("reach server")
            || lower.contains("unavailable")
            || lower.contains("disconnected")
        {
            UiErrorCategory::Transport
        } else if lower.contains("permission denied")
            || lower.contains("no such file")
            || lower.contains("failed to write")
        {
            UiErrorCategory::Io
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Banner text shown above the active screen.
    pub fn banner_text(&self) -> String {
        match (self.context, self.category) {
            (UiErrorContext::BackendStartup, UiErrorCategory::Validation) => {
                format!("Lab settings rejected: {}", self.message)
            }
            (UiErrorContext::BackendStartup, _) => {
                format!("Backend worker failed to start: {}", self.message)
            }
            (UiErrorContext::SaveReport, _) => format!("Could not save report: {}", self.message),
            (UiErrorContext::General, _) => self.message.clone(),
        }
    }
}
