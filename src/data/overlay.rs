//! Overlay composer: turns the dataset store plus an optional processing
//! result into the flat, ordered list of traces handed to the chart.
//!
//! Composition is a pure function of its inputs. Every trace is tagged with
//! its role and, when it belongs to one dataset, that dataset's index; the
//! interaction controller relies on those tags to find a trace's owner.
//! Each trace also records the opacity and line width it has "at rest" so
//! that highlight/dim deltas are always applied relative to them.

use crate::data::dataset::DatasetStore;
use crate::data::processing::{BoxplotStats, ProcessingResult};
use crate::data::trace_look::TraceLook;
use crate::error::{Result, SpecError};

/// Default maximum label length shown in the legend.
pub const LABEL_MAX_LEN: usize = 20;

pub const MEAN_NAME: &str = "Mean";
pub const MEAN_PLUS_SIGMA_NAME: &str = "Mean + 1σ";
pub const MEAN_MINUS_SIGMA_NAME: &str = "Mean - 1σ";
pub const DISTRIBUTION_NAME: &str = "Distribution";

/// Display names used by aggregate overlays.
pub const AGGREGATE_NAMES: [&str; 4] = [
    MEAN_NAME,
    MEAN_PLUS_SIGMA_NAME,
    MEAN_MINUS_SIGMA_NAME,
    DISTRIBUTION_NAME,
];

const AXIS_TOLERANCE: f64 = 1e-9;
const BOX_WIDTH_FRACTION: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceRole {
    Spectrum,
    Peaks,
    MovingAverage,
    Mean,
    MeanPlusSigma,
    MeanMinusSigma,
    Distribution,
}

impl TraceRole {
    /// Roles derived from all datasets together rather than from one.
    pub fn is_aggregate(self) -> bool {
        matches!(
            self,
            TraceRole::Mean
                | TraceRole::MeanPlusSigma
                | TraceRole::MeanMinusSigma
                | TraceRole::Distribution
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceTag {
    pub dataset_index: Option<usize>,
    pub role: TraceRole,
}

/// Box summary placed at a synthetic x position.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedBox {
    pub position: f64,
    /// Half the drawn box width, in x units.
    pub half_width: f64,
    pub stats: BoxplotStats,
}

/// One renderable series.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayTrace {
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub look: TraceLook,
    pub tag: TraceTag,
    /// Opacity at rest, recorded when the trace is created.
    pub base_opacity: f32,
    /// Line width at rest, recorded when the trace is created.
    pub base_width: f32,
    /// Per-point text labels (peak positions).
    pub point_labels: Vec<String>,
    /// Box summaries for distribution traces.
    pub boxes: Vec<PositionedBox>,
}

impl OverlayTrace {
    fn new(name: String, x: Vec<f64>, y: Vec<f64>, look: TraceLook, tag: TraceTag) -> Self {
        Self {
            name,
            x,
            y,
            base_opacity: look.opacity,
            base_width: look.width,
            look,
            tag,
            point_labels: Vec::new(),
            boxes: Vec::new(),
        }
    }

    pub fn dataset_index(&self) -> Option<usize> {
        self.tag.dataset_index
    }

    pub fn role(&self) -> TraceRole {
        self.tag.role
    }

    /// `[x, y]` pairs, truncated to the shorter of the two sequences.
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.x.iter().zip(&self.y).map(|(x, y)| [*x, *y]).collect()
    }
}

/// Switches that shape the overlay independently of the data.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayOptions {
    /// Suppress per-dataset traces and show aggregates only.
    pub show_only_aggregate: bool,
    /// Emit mean and mean±σ traces when the result carries them.
    pub show_aggregate: bool,
    /// Emit the distribution trace when the result carries box statistics.
    pub show_distribution: bool,
    pub label_max_len: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_only_aggregate: false,
            show_aggregate: true,
            show_distribution: true,
            label_max_len: LABEL_MAX_LEN,
        }
    }
}

/// Shorten `name` to at most `max_len` characters, ending in `...` when cut.
pub fn truncate_label(name: &str, max_len: usize) -> String {
    if name.chars().count() > max_len {
        let keep = max_len.saturating_sub(3);
        let mut out: String = name.chars().take(keep).collect();
        out.push_str("...");
        out
    } else {
        name.to_string()
    }
}

/// Legend name of a dataset's spectrum trace.
pub fn spectrum_name(label: &str, index: usize, max_len: usize) -> String {
    if label.is_empty() {
        format!("File {}", index + 1)
    } else {
        truncate_label(label, max_len)
    }
}

pub fn is_aggregate_name(name: &str) -> bool {
    AGGREGATE_NAMES.contains(&name)
}

/// Build the overlay trace list.
pub fn compose_overlay(
    store: &DatasetStore,
    result: Option<&ProcessingResult>,
    options: &DisplayOptions,
) -> Result<Vec<OverlayTrace>> {
    let axes = effective_series(store, result);
    let mut traces = Vec::new();

    if !options.show_only_aggregate {
        for (i, (x, y)) in axes.iter().enumerate() {
            let label = store.labels().get(i).map(String::as_str).unwrap_or("");
            let name = spectrum_name(label, i, options.label_max_len);
            traces.push(OverlayTrace::new(
                name.clone(),
                x.to_vec(),
                y.to_vec(),
                TraceLook::new(i),
                TraceTag {
                    dataset_index: Some(i),
                    role: TraceRole::Spectrum,
                },
            ));

            if let Some(peaks) = result.and_then(|r| r.peaks_for(i)) {
                traces.push(peak_trace(i, &name, x, y, peaks)?);
            }

            if let Some(ma) = result.and_then(|r| r.moving_average_for(i)) {
                let n = ma.len().min(x.len());
                traces.push(OverlayTrace::new(
                    format!("MA {name}"),
                    x[..n].to_vec(),
                    ma[..n].to_vec(),
                    TraceLook::moving_average(i),
                    TraceTag {
                        dataset_index: Some(i),
                        role: TraceRole::MovingAverage,
                    },
                ));
            }
        }
    }

    let mean_std = result
        .filter(|_| options.show_aggregate)
        .and_then(ProcessingResult::mean_std);
    let distribution = result
        .filter(|_| options.show_distribution)
        .and_then(|r| r.distribution.as_deref());

    if (mean_std.is_some() || distribution.is_some()) && !axes.is_empty() {
        check_shared_axis(&axes)?;
    }

    if let Some((mean, std)) = mean_std {
        let Some((axis0, _)) = axes.first() else {
            return Err(SpecError::Validation(
                "mean/std received without any dataset".into(),
            ));
        };
        if mean.len() != axis0.len() {
            return Err(SpecError::InconsistentAxis {
                dataset: 0,
                reason: format!(
                    "mean has {} points, frequency axis has {}",
                    mean.len(),
                    axis0.len()
                ),
            });
        }
        let upper: Vec<f64> = mean.iter().zip(std).map(|(m, s)| m + s).collect();
        let lower: Vec<f64> = mean.iter().zip(std).map(|(m, s)| m - s).collect();
        traces.push(aggregate(MEAN_NAME, axis0, mean.to_vec(), TraceLook::mean(), TraceRole::Mean));
        traces.push(aggregate(
            MEAN_PLUS_SIGMA_NAME,
            axis0,
            upper,
            TraceLook::sigma_band(),
            TraceRole::MeanPlusSigma,
        ));
        traces.push(aggregate(
            MEAN_MINUS_SIGMA_NAME,
            axis0,
            lower,
            TraceLook::sigma_band(),
            TraceRole::MeanMinusSigma,
        ));
    }

    if let Some(stats) = distribution {
        traces.push(distribution_trace(&axes, stats)?);
    }

    Ok(traces)
}

/// Frequency/amplitude pairs to plot per dataset: processed when a result
/// is present, raw otherwise.
fn effective_series<'a>(
    store: &'a DatasetStore,
    result: Option<&'a ProcessingResult>,
) -> Vec<(&'a [f64], &'a [f64])> {
    store
        .iter()
        .map(|d| {
            let processed = result.and_then(|r| {
                Some((
                    r.frequencies.get(d.index)?.as_slice(),
                    r.amplitudes.get(d.index)?.as_slice(),
                ))
            });
            processed.unwrap_or((d.frequencies, d.amplitudes))
        })
        .collect()
}

fn peak_trace(
    index: usize,
    name: &str,
    x: &[f64],
    y: &[f64],
    peaks: &[usize],
) -> Result<OverlayTrace> {
    let mut px = Vec::with_capacity(peaks.len());
    let mut py = Vec::with_capacity(peaks.len());
    for &p in peaks {
        match (x.get(p), y.get(p)) {
            (Some(&fx), Some(&fy)) => {
                px.push(fx);
                py.push(fy);
            }
            _ => {
                return Err(SpecError::Validation(format!(
                    "peak index {p} is outside dataset {index} ({} points)",
                    x.len().min(y.len())
                )))
            }
        }
    }
    let mut trace = OverlayTrace::new(
        format!("Peaks {name}"),
        px,
        py,
        TraceLook::peaks(index),
        TraceTag {
            dataset_index: Some(index),
            role: TraceRole::Peaks,
        },
    );
    trace.point_labels = trace.x.iter().map(|v| format!("{v:.2}")).collect();
    Ok(trace)
}

fn aggregate(name: &str, axis: &[f64], y: Vec<f64>, look: TraceLook, role: TraceRole) -> OverlayTrace {
    OverlayTrace::new(
        name.to_string(),
        axis.to_vec(),
        y,
        look,
        TraceTag {
            dataset_index: None,
            role,
        },
    )
}

/// Dataset 0's span is split into `n + 1` steps; dataset `i` sits at step `i + 1`
/// with one point per amplitude sample.
fn distribution_trace(axes: &[(&[f64], &[f64])], stats: &[BoxplotStats]) -> Result<OverlayTrace> {
    let (axis0, _) = axes
        .first()
        .ok_or_else(|| SpecError::Validation("distribution statistics without any dataset".into()))?;
    let (Some(&first), Some(&last)) = (axis0.first(), axis0.last()) else {
        return Err(SpecError::Validation(
            "dataset 0 has no samples to place the distribution on".into(),
        ));
    };
    let step = (last - first) / (axes.len() as f64 + 1.0);
    let positions: Vec<f64> = (0..axes.len())
        .map(|i| first + (i as f64 + 1.0) * step)
        .collect();

    let mut x = Vec::new();
    let mut y = Vec::new();
    for ((_, amps), pos) in axes.iter().zip(&positions) {
        x.extend(std::iter::repeat(*pos).take(amps.len()));
        y.extend_from_slice(amps);
    }

    let mut trace = OverlayTrace::new(
        DISTRIBUTION_NAME.to_string(),
        x,
        y,
        TraceLook::distribution(),
        TraceTag {
            dataset_index: None,
            role: TraceRole::Distribution,
        },
    );
    trace.boxes = positions
        .iter()
        .zip(stats)
        .map(|(&position, s)| PositionedBox {
            position,
            half_width: (step * BOX_WIDTH_FRACTION).abs(),
            stats: s.clone(),
        })
        .collect();
    Ok(trace)
}

/// Every dataset must sit on dataset 0's frequency axis.
pub fn check_shared_axis(axes: &[(&[f64], &[f64])]) -> Result<()> {
    let Some((axis0, _)) = axes.first() else {
        return Ok(());
    };
    for (i, (axis, _)) in axes.iter().enumerate().skip(1) {
        if axis.len() != axis0.len() {
            return Err(SpecError::InconsistentAxis {
                dataset: i,
                reason: format!("{} points instead of {}", axis.len(), axis0.len()),
            });
        }
        if let Some((k, (a, b))) = axis
            .iter()
            .zip(axis0.iter())
            .enumerate()
            .find(|(_, (a, b))| (*a - *b).abs() > AXIS_TOLERANCE * a.abs().max(b.abs()).max(1.0))
        {
            return Err(SpecError::InconsistentAxis {
                dataset: i,
                reason: format!("point {k} is at {a}, dataset 0 has {b}"),
            });
        }
    }
    Ok(())
}
