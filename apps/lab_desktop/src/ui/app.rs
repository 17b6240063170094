use client_core::{
    views::{CoachButton, CoachCardVm, CoachPanelState, DebriefVm, IntroVm, StepPanelVm},
    ActionBridge, LabSnapshot, Phase,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiErrorContext, UiEvent},
    orchestration::dispatch_backend_command,
    snapshots::SnapshotFeed,
};
use crate::ui::{
    panels::{self, DebriefAction},
    theme,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusBannerSeverity {
    Info,
    Error,
}

#[derive(Debug, Clone)]
struct StatusBanner {
    severity: StatusBannerSeverity,
    message: String,
}

pub struct LabDesktopApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    bridge: ActionBridge,
    feed: Option<SnapshotFeed>,
    snapshot: LabSnapshot,
    coach: CoachPanelState,
    status_banner: Option<StatusBanner>,
}

impl LabDesktopApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        bridge: ActionBridge,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            bridge,
            feed: None,
            snapshot: LabSnapshot::default(),
            coach: CoachPanelState::default(),
            status_banner: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::BackendReady(feed) => {
                    self.snapshot = feed.current();
                    self.coach.sync(self.snapshot.feedback.as_ref());
                    self.feed = Some(feed);
                }
                UiEvent::Info(message) => {
                    self.status_banner = Some(StatusBanner {
                        severity: StatusBannerSeverity::Info,
                        message,
                    });
                }
                UiEvent::Error(err) => {
                    tracing::warn!(
                        category = ?err.category(),
                        context = ?err.context(),
                        "{}",
                        err.message()
                    );
                    self.status_banner = Some(StatusBanner {
                        severity: StatusBannerSeverity::Error,
                        message: err.banner_text(),
                    });
                }
            }
        }

        if let Some(snapshot) = self.feed.as_mut().and_then(SnapshotFeed::poll) {
            self.coach.sync(snapshot.feedback.as_ref());
            self.snapshot = snapshot;
        }
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        let mut status = None;
        dispatch_backend_command(&self.cmd_tx, cmd, &mut status);
        if let Some(message) = status {
            self.status_banner = Some(StatusBanner {
                severity: StatusBannerSeverity::Error,
                message: UiError::from_message(UiErrorContext::General, message).banner_text(),
            });
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            let (fill, stroke) = match banner.severity {
                StatusBannerSeverity::Error => (
                    egui::Color32::from_rgb(111, 53, 53),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
                ),
                StatusBannerSeverity::Info => (
                    egui::Color32::from_rgb(34, 52, 78),
                    egui::Stroke::new(1.0, theme::ACCENT),
                ),
            };

            egui::Frame::NONE
                .fill(fill)
                .stroke(stroke)
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
            ui.add_space(8.0);
        }
    }

    fn show_intro_screen(&mut self, ui: &mut egui::Ui) {
        let mut vm = IntroVm::from_snapshot(&self.snapshot);
        vm.button_enabled &= self.feed.is_some();
        if panels::show_intro(ui, &vm) {
            self.dispatch(BackendCommand::Start);
        }
    }

    fn show_lab_screen(&mut self, ui: &mut egui::Ui) {
        if let Some(vm) = StepPanelVm::from_snapshot(&self.snapshot) {
            panels::show_step_panel(ui, &vm);
            ui.add_space(10.0);
        }

        if let Some(feedback) = self.snapshot.feedback.as_ref() {
            let vm = CoachCardVm::new(feedback, &self.coach);
            match panels::show_coach_card(ui, &vm) {
                Some(CoachButton::ToggleReason { .. }) => self.coach.toggle_reason(),
                Some(CoachButton::Dismiss | CoachButton::Continue) => {
                    self.dispatch(BackendCommand::DismissFeedback);
                }
                None => {}
            }
            ui.add_space(10.0);
        }

        let enabled = !self.snapshot.status.loading;
        if let Some(object) = panels::show_bench(ui, self.snapshot.current_step.as_ref(), enabled) {
            tracing::debug!(prop = object.label, "bench prop clicked");
            if !self.bridge.click(object) {
                self.status_banner = Some(StatusBanner {
                    severity: StatusBannerSeverity::Error,
                    message: "Lab runtime is not listening for bench clicks".to_string(),
                });
            }
        }
    }

    fn show_debrief_screen(&mut self, ui: &mut egui::Ui) {
        let Some(debrief) = self.snapshot.debrief.clone() else {
            return;
        };
        let vm = DebriefVm::new(&debrief);
        match panels::show_debrief(ui, &vm) {
            Some(DebriefAction::Retry) => self.dispatch(BackendCommand::Retry),
            Some(DebriefAction::SaveReport) => {
                if let Some(path) = rfd::FileDialog::new()
                    .set_file_name("lab-debrief.json")
                    .add_filter("JSON", &["json"])
                    .save_file()
                {
                    self.dispatch(BackendCommand::SaveReport { path, debrief });
                }
            }
            None => {}
        }
    }
}

impl eframe::App for LabDesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::CentralPanel::default()
            .frame(
                egui::Frame::NONE
                    .fill(theme::SCREEN_BG)
                    .inner_margin(egui::Margin::same(20)),
            )
            .show(ctx, |ui| {
                self.show_status_banner(ui);
                egui::ScrollArea::vertical().show(ui, |ui| match self.snapshot.phase {
                    Phase::Intro => self.show_intro_screen(ui),
                    Phase::Lab => self.show_lab_screen(ui),
                    Phase::Debrief => self.show_debrief_screen(ui),
                });
            });

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
