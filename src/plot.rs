//! egui_plot implementation of the chart adapter.
//!
//! `PlotSurface` keeps the last rendered trace list plus the style each
//! trace currently has. Restyles patch those styles in place; the next frame
//! draws with them. A click on the plot is snapped to the nearest trace
//! point in screen space and handed back to the caller.

use eframe::egui;
use egui::Align2;
use egui_plot::{Legend, Line, Plot, PlotPoint, Points, Text};

use crate::chart::{nearest_trace, AppliedStyle, ChartAdapter, ChartLayout, StyleDelta};
use crate::color_scheme::Theme;
use crate::data::overlay::{OverlayTrace, PositionedBox};
use crate::data::trace_look::TraceMode;
use crate::interaction::ClickTarget;

/// Maximum click distance to a trace point, in screen points.
const CLICK_RADIUS: f64 = 8.0;

/// A click that landed on a trace.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotClick {
    pub target: ClickTarget,
    /// Screen position of the click.
    pub anchor: [f32; 2],
}

#[derive(Debug, Default)]
pub struct PlotSurface {
    traces: Vec<OverlayTrace>,
    styles: Vec<AppliedStyle>,
    layout: ChartLayout,
    purged: bool,
    reset_view: bool,
}

impl ChartAdapter for PlotSurface {
    fn render(&mut self, traces: &[OverlayTrace], layout: &ChartLayout) {
        self.traces = traces.to_vec();
        self.styles = traces.iter().map(AppliedStyle::of).collect();
        self.layout = layout.clone();
        self.purged = false;
        self.reset_view = true;
    }

    fn restyle(&mut self, updates: &[(usize, StyleDelta)]) {
        for &(i, delta) in updates {
            match self.styles.get_mut(i) {
                Some(style) => style.apply(delta),
                None => log::warn!(
                    "restyle of trace {i} ignored: only {} traces rendered",
                    self.styles.len()
                ),
            }
        }
    }

    fn purge(&mut self) {
        self.traces.clear();
        self.styles.clear();
        self.purged = true;
    }
}

impl PlotSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn traces(&self) -> &[OverlayTrace] {
        &self.traces
    }

    pub fn style(&self, index: usize) -> Option<AppliedStyle> {
        self.styles.get(index).copied()
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    /// `true` after [`ChartAdapter::purge`] until the next render.
    pub fn is_purged(&self) -> bool {
        self.purged
    }

    /// Draw the chart. Returns the trace a click landed on, if any.
    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<PlotClick> {
        if self.traces.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label("Upload spectra to plot them here.");
            });
            return None;
        }

        ui.heading(&self.layout.title);
        let theme = if self.layout.dark { Theme::Dark } else { Theme::Light };
        let text_color = theme.annotation_color();

        let mut plot = Plot::new("spectra_plot")
            .legend(Legend::default())
            .allow_scroll(false)
            .allow_boxed_zoom(true)
            .x_axis_label(self.layout.x_title.clone())
            .y_axis_label(self.layout.y_title.clone());
        if self.reset_view {
            plot = plot.reset();
            self.reset_view = false;
        }

        let traces = &self.traces;
        let styles = &self.styles;
        let plot_resp = plot.show(ui, |plot_ui| {
            for (tr, style) in traces.iter().zip(styles) {
                let color = tr.look.display_color(style.opacity);
                let pts = tr.points();
                match tr.look.mode {
                    TraceMode::Lines => {
                        plot_ui.line(
                            Line::new(&tr.name, pts)
                                .color(color)
                                .width(style.width.max(0.1))
                                .style(tr.look.style),
                        );
                    }
                    TraceMode::Markers => {
                        plot_ui.points(
                            Points::new(&tr.name, pts)
                                .radius(tr.look.point_size * 0.5)
                                .shape(tr.look.marker)
                                .filled(tr.look.filled)
                                .color(color),
                        );
                        for (label, (x, y)) in tr.point_labels.iter().zip(tr.x.iter().zip(&tr.y)) {
                            plot_ui.text(
                                Text::new("", PlotPoint::new(*x, *y), label.as_str())
                                    .anchor(Align2::CENTER_BOTTOM)
                                    .color(text_color),
                            );
                        }
                    }
                    TraceMode::Distribution => {
                        plot_ui.points(
                            Points::new(&tr.name, pts)
                                .radius(tr.look.point_size * 0.5)
                                .color(color),
                        );
                        for b in &tr.boxes {
                            for outline in box_outline(b) {
                                plot_ui.line(
                                    Line::new("", outline)
                                        .color(tr.look.color)
                                        .width(style.width.max(0.1)),
                                );
                            }
                        }
                    }
                }
            }
        });

        if !plot_resp.response.clicked() {
            return None;
        }
        let pos = plot_resp.response.interact_pointer_pos()?;
        let transform = plot_resp.transform;
        let at = transform.value_from_position(pos);
        let scale = [
            transform.dpos_dvalue_x().abs(),
            transform.dpos_dvalue_y().abs(),
        ];
        let index = nearest_trace(&self.traces, [at.x, at.y], scale, CLICK_RADIUS)?;
        Some(PlotClick {
            target: ClickTarget {
                trace_index: Some(index),
                name: self.traces[index].name.clone(),
            },
            anchor: [pos.x, pos.y],
        })
    }
}

/// Polylines for one box: the box itself, the median, and both whiskers.
fn box_outline(b: &PositionedBox) -> Vec<Vec<[f64; 2]>> {
    let (x, w) = (b.position, b.half_width);
    let s = &b.stats;
    vec![
        vec![
            [x - w, s.q1],
            [x + w, s.q1],
            [x + w, s.q3],
            [x - w, s.q3],
            [x - w, s.q1],
        ],
        vec![[x - w, s.median], [x + w, s.median]],
        vec![[x, s.q3], [x, s.upper_bound]],
        vec![[x, s.q1], [x, s.lower_bound]],
        vec![[x - w * 0.5, s.upper_bound], [x + w * 0.5, s.upper_bound]],
        vec![[x - w * 0.5, s.lower_bound], [x + w * 0.5, s.lower_bound]],
    ]
}
