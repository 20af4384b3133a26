//! Light/dark theme for the window and the chart.

use eframe::egui::{Color32, Context, Visuals};
use serde::{Deserialize, Serialize};

/// Visual theme. The chart layout follows it on every render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Apply this theme's visuals to an egui context.
    pub fn apply(&self, ctx: &Context) {
        match self {
            Theme::Light => {
                let mut v = Visuals::light();
                v.extreme_bg_color = Color32::WHITE;
                ctx.set_visuals(v);
            }
            Theme::Dark => {
                let mut v = Visuals::dark();
                let paper = Color32::from_rgb(17, 17, 17);
                let plot = Color32::from_rgb(34, 34, 34);
                v.panel_fill = paper;
                v.window_fill = plot;
                v.extreme_bg_color = plot;
                v.faint_bg_color = Color32::from_rgb(45, 45, 45);
                ctx.set_visuals(v);
            }
        }
    }

    /// Text color for chart annotations.
    pub fn annotation_color(&self) -> Color32 {
        match self {
            Theme::Light => Color32::from_rgb(40, 40, 40),
            Theme::Dark => Color32::from_rgb(230, 230, 230),
        }
    }
}
