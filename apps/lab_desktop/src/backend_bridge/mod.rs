//! Worker thread hosting the lab runtime and its command intake.

pub mod commands;
pub mod runtime;
