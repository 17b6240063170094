//! Colors for coach tones, score bands, and bench highlights.

use client_core::{
    bridge::{Highlight, PropKind},
    views::{ScoreTone, Tone},
};
use egui::Color32;

pub const SCREEN_BG: Color32 = Color32::from_rgb(18, 24, 33);
pub const PANEL_BG: Color32 = Color32::from_rgb(28, 36, 48);
pub const PANEL_STROKE: Color32 = Color32::from_rgb(58, 72, 92);
pub const ACCENT: Color32 = Color32::from_rgb(74, 158, 255);
pub const MUTED_TEXT: Color32 = Color32::from_rgb(150, 163, 180);
pub const PIP_DONE: Color32 = Color32::from_rgb(72, 199, 142);
pub const PIP_PENDING: Color32 = Color32::from_rgb(64, 76, 94);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardColors {
    pub fill: Color32,
    pub stroke: Color32,
    pub title: Color32,
}

pub fn card_colors(tone: Tone) -> CardColors {
    match tone {
        Tone::Success => CardColors {
            fill: Color32::from_rgb(26, 61, 45),
            stroke: Color32::from_rgb(72, 199, 142),
            title: Color32::from_rgb(140, 230, 185),
        },
        Tone::Warning => CardColors {
            fill: Color32::from_rgb(66, 53, 22),
            stroke: Color32::from_rgb(230, 170, 60),
            title: Color32::from_rgb(250, 205, 120),
        },
        Tone::Mistake => CardColors {
            fill: Color32::from_rgb(74, 33, 36),
            stroke: Color32::from_rgb(220, 90, 90),
            title: Color32::from_rgb(255, 150, 150),
        },
        Tone::Info => CardColors {
            fill: Color32::from_rgb(30, 44, 66),
            stroke: ACCENT,
            title: Color32::from_rgb(160, 200, 255),
        },
    }
}

pub fn tone_title(tone: Tone) -> &'static str {
    match tone {
        Tone::Success => "Correct",
        Tone::Warning => "Careful",
        Tone::Mistake => "Mistake",
        Tone::Info => "Note",
    }
}

pub fn score_color(tone: ScoreTone) -> Color32 {
    match tone {
        ScoreTone::Green => Color32::from_rgb(72, 199, 142),
        ScoreTone::Amber => Color32::from_rgb(240, 180, 60),
        ScoreTone::Red => Color32::from_rgb(235, 95, 95),
    }
}

pub fn prop_color(kind: PropKind) -> Color32 {
    match kind {
        PropKind::Goggles | PropKind::Gloves => Color32::from_rgb(90, 140, 210),
        PropKind::ReagentBottle => Color32::from_rgb(170, 120, 200),
        PropKind::IndicatorBottle => Color32::from_rgb(220, 110, 170),
        PropKind::Burette => Color32::from_rgb(160, 175, 190),
        PropKind::Flask => Color32::from_rgb(120, 190, 200),
        PropKind::Notebook => Color32::from_rgb(210, 190, 130),
        PropKind::FloorZone => Color32::from_rgb(110, 110, 110),
    }
}

/// Stroke drawn around a bench prop.
pub fn highlight_stroke(highlight: Highlight) -> egui::Stroke {
    match highlight {
        Highlight::None => egui::Stroke::new(1.0, PANEL_STROKE),
        Highlight::Guide => egui::Stroke::new(2.5, Color32::from_rgb(255, 221, 87)),
        Highlight::Reacting => egui::Stroke::new(2.5, Color32::from_rgb(255, 120, 190)),
    }
}
