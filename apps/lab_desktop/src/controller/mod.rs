//! Controller layer: backend events, snapshot intake, and command orchestration.

pub mod events;
pub mod orchestration;
pub mod snapshots;
