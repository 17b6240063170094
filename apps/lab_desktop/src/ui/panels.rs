//! Screen and panel renderers. Each function draws one view model and
//! returns the intent the learner triggered, if any.

use client_core::{
    bridge::SceneObject,
    views::{CoachButton, CoachCardVm, DebriefVm, IntroVm, StepPanelVm, Tone},
    LAB_BENCH,
};
use egui::{Color32, RichText};
use shared::domain::Step;

use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebriefAction {
    Retry,
    SaveReport,
}

fn panel_frame() -> egui::Frame {
    egui::Frame::NONE
        .fill(theme::PANEL_BG)
        .stroke(egui::Stroke::new(1.0, theme::PANEL_STROKE))
        .corner_radius(10.0)
        .inner_margin(egui::Margin::symmetric(18, 14))
}

/// Returns `true` when the enter button was clicked.
pub fn show_intro(ui: &mut egui::Ui, vm: &IntroVm) -> bool {
    let mut clicked = false;
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.2);
        ui.label(
            RichText::new("VIRTUAL LAB")
                .small()
                .color(theme::ACCENT)
                .strong(),
        );
        ui.label(RichText::new(&vm.title).size(34.0).strong().color(Color32::WHITE));
        ui.add_space(8.0);
        ui.set_max_width(560.0);
        ui.label(RichText::new(&vm.description).size(16.0).color(theme::MUTED_TEXT));
        ui.add_space(20.0);

        if let Some(error) = &vm.error {
            egui::Frame::NONE
                .fill(Color32::from_rgb(111, 53, 53))
                .stroke(egui::Stroke::new(1.0, Color32::from_rgb(175, 96, 96)))
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.label(RichText::new(error).color(Color32::WHITE));
                });
            ui.add_space(12.0);
        }

        let button = egui::Button::new(RichText::new(vm.button_label).size(18.0).strong())
            .fill(theme::ACCENT)
            .min_size(egui::vec2(200.0, 44.0));
        clicked = ui.add_enabled(vm.button_enabled, button).clicked();
    });
    clicked
}

pub fn show_step_panel(ui: &mut egui::Ui, vm: &StepPanelVm) {
    panel_frame().show(ui, |ui| {
        ui.label(RichText::new(&vm.label).small().strong().color(theme::ACCENT));
        ui.label(RichText::new(&vm.description).size(17.0).color(Color32::WHITE));
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            for done in &vm.pips {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(28.0, 6.0), egui::Sense::hover());
                let color = if *done {
                    theme::PIP_DONE
                } else {
                    theme::PIP_PENDING
                };
                ui.painter().rect_filled(rect, 3.0, color);
            }
        });
        ui.add_space(4.0);
        ui.label(RichText::new(vm.hint).small().color(theme::MUTED_TEXT));
    });
}

pub fn show_coach_card(ui: &mut egui::Ui, vm: &CoachCardVm) -> Option<CoachButton> {
    let colors = theme::card_colors(vm.tone);
    let mut pressed = None;
    egui::Frame::NONE
        .fill(colors.fill)
        .stroke(egui::Stroke::new(1.5, colors.stroke))
        .corner_radius(10.0)
        .inner_margin(egui::Margin::symmetric(16, 12))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(
                RichText::new(theme::tone_title(vm.tone))
                    .strong()
                    .color(colors.title),
            );
            if let Some(line) = &vm.success_line {
                ui.label(RichText::new(line).size(16.0).color(Color32::WHITE));
            }
            if let Some(consequence) = &vm.consequence {
                ui.label(RichText::new(consequence).size(16.0).color(Color32::WHITE));
            }
            if let Some(hint) = &vm.hint {
                ui.add_space(4.0);
                ui.label(RichText::new(format!("💡 {hint}")).color(colors.title));
            }
            if let Some(reason) = &vm.hint_reason {
                ui.label(RichText::new(reason).italics().small().color(theme::MUTED_TEXT));
            }
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                for button in &vm.buttons {
                    if ui.button(button.label()).clicked() {
                        pressed = Some(*button);
                    }
                }
            });
        });
    pressed
}

/// Draws every bench prop. Returns the prop the learner clicked.
pub fn show_bench(
    ui: &mut egui::Ui,
    current_step: Option<&Step>,
    enabled: bool,
) -> Option<&'static SceneObject> {
    let mut clicked = None;
    panel_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new("Lab bench").strong().color(Color32::WHITE));
        ui.add_space(6.0);
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing = egui::vec2(10.0, 10.0);
            for object in LAB_BENCH {
                let button = egui::Button::new(
                    RichText::new(object.label)
                        .strong()
                        .color(theme::prop_color(object.kind)),
                )
                .stroke(theme::highlight_stroke(object.highlight(current_step)))
                .min_size(egui::vec2(120.0, 56.0));
                let response = ui.add_enabled(enabled && object.is_interactive(), button);
                if response.clicked() {
                    clicked = Some(object);
                }
            }
        });
    });
    clicked
}

fn stat(ui: &mut egui::Ui, value: String, label: &str, color: Color32) {
    ui.vertical(|ui| {
        ui.label(RichText::new(value).size(30.0).strong().color(color));
        ui.label(RichText::new(label).small().color(theme::MUTED_TEXT));
    });
}

pub fn show_debrief(ui: &mut egui::Ui, vm: &DebriefVm) -> Option<DebriefAction> {
    let mut action = None;
    ui.vertical_centered(|ui| {
        ui.set_max_width(640.0);
        ui.add_space(24.0);
        panel_frame().show(ui, |ui| {
            ui.label(RichText::new("SESSION COMPLETE").small().strong().color(theme::ACCENT));
            ui.label(RichText::new("Lab Debrief").size(28.0).strong().color(Color32::WHITE));
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 28.0;
                stat(ui, vm.score.to_string(), "Score", theme::score_color(vm.score_tone));
                stat(ui, vm.steps.clone(), "Steps", Color32::WHITE);
                stat(
                    ui,
                    vm.mistakes.to_string(),
                    "Mistakes",
                    theme::card_colors(Tone::Mistake).stroke,
                );
                stat(
                    ui,
                    vm.warnings.to_string(),
                    "Warnings",
                    theme::card_colors(Tone::Warning).stroke,
                );
            });

            if !vm.summary.is_empty() {
                ui.add_space(12.0);
                ui.label(RichText::new("Coach summary").small().strong().color(theme::MUTED_TEXT));
                ui.label(RichText::new(&vm.summary).color(Color32::WHITE));
            }

            ui.add_space(14.0);
            ui.horizontal(|ui| {
                if ui
                    .add(egui::Button::new(RichText::new("Try Again").strong()).fill(theme::ACCENT))
                    .clicked()
                {
                    action = Some(DebriefAction::Retry);
                }
                if ui.button("Save Report").clicked() {
                    action = Some(DebriefAction::SaveReport);
                }
            });

            if !vm.action_log.is_empty() {
                ui.add_space(12.0);
                ui.label(RichText::new("Action Log").small().strong().color(theme::MUTED_TEXT));
                egui::ScrollArea::vertical()
                    .max_height(220.0)
                    .show(ui, |ui| {
                        for line in &vm.action_log {
                            ui.label(RichText::new(line).monospace().color(theme::MUTED_TEXT));
                        }
                    });
            }
        });
    });
    action
}
