//! UI layer for the lab desktop shell: app shell, panels, and colors.

pub mod app;
pub mod panels;
pub mod theme;

pub use app::LabDesktopApp;
