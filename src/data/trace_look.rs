//! TraceLook: visual styling for overlay traces.

use eframe::egui;
use egui_plot::{LineStyle, MarkerShape};

/// How a trace is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceMode {
    /// Connected line through all points.
    Lines,
    /// Unconnected markers, optionally with a text label per point.
    Markers,
    /// Box summaries with the raw samples drawn as points.
    Distribution,
}

/// The visual presentation of a trace (color, line style, markers, opacity).
#[derive(Debug, Clone, PartialEq)]
pub struct TraceLook {
    pub color: egui::Color32,
    pub mode: TraceMode,
    pub width: f32,
    pub opacity: f32,
    pub style: LineStyle,
    pub point_size: f32,
    pub marker: MarkerShape,
    pub filled: bool,
}

impl Default for TraceLook {
    fn default() -> Self {
        Self {
            color: egui::Color32::GRAY,
            mode: TraceMode::Lines,
            width: 1.0,
            opacity: 1.0,
            style: LineStyle::Solid,
            point_size: 4.0,
            marker: MarkerShape::Circle,
            filled: true,
        }
    }
}

impl TraceLook {
    /// Create a line look with a color allocated based on the dataset index.
    pub fn new(index: usize) -> Self {
        Self {
            color: Self::alloc_color(index),
            ..Default::default()
        }
    }

    /// Open circle markers, used for peak positions.
    pub fn peaks(index: usize) -> Self {
        Self {
            color: Self::alloc_color(index),
            mode: TraceMode::Markers,
            point_size: 8.0,
            filled: false,
            ..Default::default()
        }
    }

    pub fn moving_average(index: usize) -> Self {
        Self {
            color: Self::alloc_color(index),
            width: 1.5,
            style: LineStyle::Dashed { length: 6.0 },
            ..Default::default()
        }
    }

    pub fn mean() -> Self {
        Self {
            color: egui::Color32::RED,
            width: 3.0,
            ..Default::default()
        }
    }

    pub fn sigma_band() -> Self {
        Self {
            color: egui::Color32::from_rgb(255, 165, 0),
            width: 2.0,
            style: LineStyle::Dotted { spacing: 4.0 },
            ..Default::default()
        }
    }

    pub fn distribution() -> Self {
        Self {
            color: egui::Color32::from_rgb(100, 100, 255),
            mode: TraceMode::Distribution,
            width: 1.0,
            opacity: 0.5,
            point_size: 3.0,
            ..Default::default()
        }
    }

    pub fn is_line(&self) -> bool {
        self.mode == TraceMode::Lines
    }

    /// Color at the given opacity, clamped to 0..=1.
    pub fn display_color(&self, opacity: f32) -> egui::Color32 {
        self.color.gamma_multiply(opacity.clamp(0.0, 1.0))
    }

    /// Allocate a distinct color for the given dataset index.
    pub fn alloc_color(index: usize) -> egui::Color32 {
        const PALETTE: [egui::Color32; 6] = [
            egui::Color32::from_rgb(31, 119, 180),
            egui::Color32::from_rgb(255, 127, 14),
            egui::Color32::from_rgb(44, 160, 44),
            egui::Color32::from_rgb(214, 39, 40),
            egui::Color32::from_rgb(148, 103, 189),
            egui::Color32::from_rgb(140, 86, 75),
        ];
        PALETTE[index % PALETTE.len()]
    }
}
