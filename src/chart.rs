//! Chart adapter contract.
//!
//! The adapter is a thin surface: it renders the trace list it is given,
//! applies per-trace style values keyed by position in the last rendered
//! list, and can be torn down. It never decides styling itself.

use crate::data::overlay::OverlayTrace;

/// Partial per-trace style update. `None` leaves the property as it is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StyleDelta {
    pub opacity: Option<f32>,
    pub width: Option<f32>,
}

impl StyleDelta {
    pub fn opacity(opacity: f32) -> Self {
        Self {
            opacity: Some(opacity),
            width: None,
        }
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }
}

/// Titles and theme of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub dark: bool,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            title: "Raw spectra".to_string(),
            x_title: "Wavenumber (cm⁻¹)".to_string(),
            y_title: "Intensity (a.u.)".to_string(),
            dark: false,
        }
    }
}

pub trait ChartAdapter {
    /// Replace everything on the chart. Discards earlier restyles.
    fn render(&mut self, traces: &[OverlayTrace], layout: &ChartLayout);

    /// Patch the style of the traces at the given positions in place.
    fn restyle(&mut self, updates: &[(usize, StyleDelta)]);

    /// Tear the chart down.
    fn purge(&mut self);
}

/// Current style of a rendered trace after restyles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedStyle {
    pub opacity: f32,
    pub width: f32,
}

impl AppliedStyle {
    pub fn of(trace: &OverlayTrace) -> Self {
        Self {
            opacity: trace.look.opacity,
            width: trace.look.width,
        }
    }

    pub fn apply(&mut self, delta: StyleDelta) {
        if let Some(o) = delta.opacity {
            self.opacity = o;
        }
        if let Some(w) = delta.width {
            self.width = w;
        }
    }
}

/// Index of the trace with a point closest to `at`, if any lies within
/// `max_dist`. Distances are measured after scaling x and y by `scale` so the
/// caller can compare in screen-like units.
pub fn nearest_trace(
    traces: &[OverlayTrace],
    at: [f64; 2],
    scale: [f64; 2],
    max_dist: f64,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, tr) in traces.iter().enumerate() {
        for (x, y) in tr.x.iter().zip(&tr.y) {
            let dx = (x - at[0]) * scale[0];
            let dy = (y - at[1]) * scale[1];
            let d = (dx * dx + dy * dy).sqrt();
            if d <= max_dist && best.map_or(true, |(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
    }
    best.map(|(i, _)| i)
}
