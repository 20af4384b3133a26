//! Wire types for the upload/process endpoints and the validated
//! [`ProcessingResult`] the overlay composer consumes.

use serde::{Deserialize, Serialize};

use crate::data::dataset::{Dataset, DatasetStore};
use crate::error::{Result, SpecError};

// ─────────────────────────────────────────────────────────────────────────────
// Upload
// ─────────────────────────────────────────────────────────────────────────────

/// Body of a successful `/upload_files` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub files: Option<Vec<String>>,
    #[serde(default)]
    pub frequencies: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    pub amplitudes: Option<Vec<Vec<f64>>>,
}

impl UploadResponse {
    /// Check the three sequences line up and turn them into datasets.
    pub fn into_datasets(self) -> Result<Vec<Dataset>> {
        let (Some(frequencies), Some(amplitudes)) = (self.frequencies, self.amplitudes) else {
            return Err(SpecError::Validation(
                "upload response is missing frequencies or amplitudes".into(),
            ));
        };
        let files = self.files.unwrap_or_default();
        if frequencies.len() != amplitudes.len() {
            return Err(SpecError::Validation(format!(
                "upload response has {} frequency sequences but {} amplitude sequences",
                frequencies.len(),
                amplitudes.len()
            )));
        }
        if !files.is_empty() && files.len() != frequencies.len() {
            return Err(SpecError::Validation(format!(
                "upload response names {} files for {} datasets",
                files.len(),
                frequencies.len()
            )));
        }
        frequencies
            .into_iter()
            .zip(amplitudes)
            .enumerate()
            .map(|(i, (f, a))| {
                if f.len() != a.len() {
                    return Err(SpecError::Validation(format!(
                        "dataset {i}: {} frequencies but {} amplitudes",
                        f.len(),
                        a.len()
                    )));
                }
                let label = files
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("File {}", i + 1));
                Ok(Dataset::new(label, f, a))
            })
            .collect()
    }
}

/// A file handed to the upload endpoint.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Process request
// ─────────────────────────────────────────────────────────────────────────────

/// Processing switches and parameters sent along with the spectra.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessOptions {
    pub remove_baseline: bool,
    pub apply_smoothing: bool,
    pub normalize: bool,
    pub find_peaks: bool,
    pub calculate_mean_std: bool,
    pub calculate_boxplot: bool,
    pub calculate_moving_average: bool,
    pub lam: f64,
    pub p: f64,
    pub window_length: f64,
    pub polyorder: f64,
    pub width: f64,
    pub prominence: f64,
    pub moving_average_window: f64,
    pub min_freq: f64,
    pub max_freq: f64,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            remove_baseline: false,
            apply_smoothing: false,
            normalize: false,
            find_peaks: false,
            calculate_mean_std: false,
            calculate_boxplot: false,
            calculate_moving_average: false,
            lam: 1000.0,
            p: 0.001,
            window_length: 25.0,
            polyorder: 2.0,
            width: 1.0,
            prominence: 1.0,
            moving_average_window: 5.0,
            min_freq: 0.0,
            max_freq: 10000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessRequest {
    pub frequencies: Vec<Vec<f64>>,
    pub amplitudes: Vec<Vec<f64>>,
    #[serde(flatten)]
    pub options: ProcessOptions,
}

impl ProcessRequest {
    pub fn from_store(store: &DatasetStore, options: ProcessOptions) -> Self {
        Self {
            frequencies: store.frequencies().to_vec(),
            amplitudes: store.amplitudes().to_vec(),
            options,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Process response
// ─────────────────────────────────────────────────────────────────────────────

/// Box summary for one dataset, as computed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxplotStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    #[serde(default)]
    pub outliers: Vec<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub frequencies: Vec<Vec<f64>>,
    pub processed_amplitudes: Vec<Vec<f64>>,
    #[serde(default)]
    pub peaks: Option<Vec<Vec<usize>>>,
    #[serde(default)]
    pub peaks_values: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    pub peaks_info: Option<serde_json::Value>,
    #[serde(default)]
    pub mean_amplitude: Option<Vec<f64>>,
    #[serde(default)]
    pub std_amplitude: Option<Vec<f64>>,
    #[serde(default)]
    pub boxplot_stats: Option<Vec<BoxplotStats>>,
    #[serde(default)]
    pub moving_averages: Option<Vec<Vec<f64>>>,
}

/// Validated output of one processing round trip.
///
/// Per-dataset vectors are indexed like the store the request was built
/// from. Empty optional sequences from the server are normalized to `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProcessingResult {
    pub frequencies: Vec<Vec<f64>>,
    pub amplitudes: Vec<Vec<f64>>,
    pub peaks: Option<Vec<Vec<usize>>>,
    /// Amplitude at each entry of `peaks`, as reported by the server.
    pub peak_values: Option<Vec<Vec<f64>>>,
    pub moving_averages: Option<Vec<Vec<f64>>>,
    pub mean: Option<Vec<f64>>,
    pub std: Option<Vec<f64>>,
    pub distribution: Option<Vec<BoxplotStats>>,
}

impl ProcessingResult {
    /// Validate a response against the number of datasets it was requested for.
    pub fn from_response(resp: ProcessResponse, dataset_count: usize) -> Result<Self> {
        if resp.frequencies.len() != dataset_count
            || resp.processed_amplitudes.len() != dataset_count
        {
            return Err(SpecError::Validation(format!(
                "expected {dataset_count} processed datasets, got {} frequency and {} amplitude sequences",
                resp.frequencies.len(),
                resp.processed_amplitudes.len()
            )));
        }
        for (i, (f, a)) in resp
            .frequencies
            .iter()
            .zip(&resp.processed_amplitudes)
            .enumerate()
        {
            if f.len() != a.len() {
                return Err(SpecError::Validation(format!(
                    "processed dataset {i}: {} frequencies but {} amplitudes",
                    f.len(),
                    a.len()
                )));
            }
        }

        let peaks = non_empty(resp.peaks);
        if let Some(peaks) = &peaks {
            if peaks.len() > dataset_count {
                return Err(SpecError::Validation(format!(
                    "peak lists for {} datasets, only {dataset_count} requested",
                    peaks.len()
                )));
            }
        }
        let moving_averages = non_empty(resp.moving_averages);
        if let Some(ma) = &moving_averages {
            if ma.len() > dataset_count {
                return Err(SpecError::Validation(format!(
                    "moving averages for {} datasets, only {dataset_count} requested",
                    ma.len()
                )));
            }
        }

        Ok(Self {
            frequencies: resp.frequencies,
            amplitudes: resp.processed_amplitudes,
            peaks,
            peak_values: non_empty(resp.peaks_values),
            moving_averages,
            mean: non_empty(resp.mean_amplitude),
            std: non_empty(resp.std_amplitude),
            distribution: non_empty(resp.boxplot_stats),
        })
    }

    pub fn peaks_for(&self, index: usize) -> Option<&[usize]> {
        self.peaks
            .as_ref()
            .and_then(|p| p.get(index))
            .map(Vec::as_slice)
            .filter(|p| !p.is_empty())
    }

    pub fn moving_average_for(&self, index: usize) -> Option<&[f64]> {
        self.moving_averages
            .as_ref()
            .and_then(|m| m.get(index))
            .map(Vec::as_slice)
            .filter(|m| !m.is_empty())
    }

    /// Mean and std when both are present, non-empty and of equal length.
    pub fn mean_std(&self) -> Option<(&[f64], &[f64])> {
        match (&self.mean, &self.std) {
            (Some(m), Some(s)) if !m.is_empty() && m.len() == s.len() => Some((m, s)),
            _ => None,
        }
    }
}

fn non_empty<T>(v: Option<Vec<T>>) -> Option<Vec<T>> {
    v.filter(|v| !v.is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Request sequencing
// ─────────────────────────────────────────────────────────────────────────────

/// Identifies one issued processing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessTicket {
    pub seq: u64,
    pub store_generation: u64,
}

/// Hands out monotonically increasing tickets; only the newest one is accepted.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: u64,
}

impl RequestSequencer {
    pub fn issue(&mut self, store_generation: u64) -> ProcessTicket {
        self.issued += 1;
        ProcessTicket {
            seq: self.issued,
            store_generation,
        }
    }

    pub fn latest(&self) -> u64 {
        self.issued
    }

    /// A completion is current when no newer request was issued and the store
    /// has not changed since the request was built.
    pub fn is_current(&self, ticket: ProcessTicket, store_generation: u64) -> bool {
        ticket.seq == self.issued && ticket.store_generation == store_generation
    }
}
