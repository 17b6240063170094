//! Bench objects and the click-to-action channel feeding the lab state machine.

use std::sync::{Arc, Mutex, MutexGuard};

use shared::domain::{ActionId, Step, StepId};
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionNotification {
    pub action: ActionId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
    Goggles,
    Gloves,
    ReagentBottle,
    IndicatorBottle,
    Burette,
    Flask,
    Notebook,
    FloorZone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    None,
    /// Object carries the current step's required action.
    Guide,
    /// Flask tint while the titration step is active.
    Reacting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneObject {
    pub label: &'static str,
    pub kind: PropKind,
    /// `None` for decorative props that never emit.
    pub action: Option<&'static str>,
}

impl SceneObject {
    pub fn is_interactive(&self) -> bool {
        self.action.is_some()
    }

    pub fn highlight(&self, current_step: Option<&Step>) -> Highlight {
        let Some(step) = current_step else {
            return Highlight::None;
        };
        match self.action {
            Some(action) if action == step.required_action.as_str() => Highlight::Guide,
            Some(_) if self.kind == PropKind::Flask && step.id == StepId::Titrate => {
                Highlight::Reacting
            }
            _ => Highlight::None,
        }
    }
}

pub const LAB_BENCH: &[SceneObject] = &[
    SceneObject {
        label: "Goggles",
        kind: PropKind::Goggles,
        action: Some(ActionId::WEAR_PPE),
    },
    SceneObject {
        label: "Gloves",
        kind: PropKind::Gloves,
        action: Some(ActionId::WEAR_PPE),
    },
    SceneObject {
        label: "HCl",
        kind: PropKind::ReagentBottle,
        action: Some(ActionId::FILL_BURETTE_HCL),
    },
    SceneObject {
        label: "NaOH",
        kind: PropKind::ReagentBottle,
        action: Some(ActionId::FILL_BURETTE_NAOH),
    },
    SceneObject {
        label: "Burette",
        kind: PropKind::Burette,
        action: None,
    },
    SceneObject {
        label: "Indicator",
        kind: PropKind::IndicatorBottle,
        action: Some(ActionId::ADD_PHENOLPHTHALEIN),
    },
    SceneObject {
        label: "Litmus",
        kind: PropKind::IndicatorBottle,
        action: Some(ActionId::ADD_LITMUS),
    },
    SceneObject {
        label: "Flask",
        kind: PropKind::Flask,
        action: Some(ActionId::TITRATE_CORRECT),
    },
    SceneObject {
        label: "Record",
        kind: PropKind::Notebook,
        action: Some(ActionId::RECORD_READING),
    },
    SceneObject {
        label: "Floor",
        kind: PropKind::FloorZone,
        action: Some(ActionId::SKIP_PPE),
    },
];

/// Single-listener notification channel. Emitting with no listener attached
/// drops the notification; nothing is queued for a later listener.
#[derive(Clone, Default)]
pub struct ActionBridge {
    listener: Arc<Mutex<Option<mpsc::UnboundedSender<ActionNotification>>>>,
}

impl ActionBridge {
    pub fn new() -> Self {
        Self::default()
    }

    fn listener(&self) -> MutexGuard<'_, Option<mpsc::UnboundedSender<ActionNotification>>> {
        self.listener
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Attaches a new listener, replacing any previous one.
    pub fn listen(&self) -> mpsc::UnboundedReceiver<ActionNotification> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.listener() = Some(tx);
        rx
    }

    pub fn emit(&self, action: ActionId) -> bool {
        let guard = self.listener();
        let Some(tx) = guard.as_ref() else {
            debug!(action = %action, "bridge: no listener, notification dropped");
            return false;
        };
        match tx.send(ActionNotification { action }) {
            Ok(()) => true,
            Err(err) => {
                debug!(action = %err.0.action, "bridge: listener gone, notification dropped");
                false
            }
        }
    }

    pub fn click(&self, object: &SceneObject) -> bool {
        match object.action {
            Some(action) => self.emit(ActionId::from(action)),
            None => false,
        }
    }
}
