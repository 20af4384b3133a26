use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::data::dataset::DatasetStore;
use crate::data::processing::ProcessingResult;
use crate::error::{Result, SpecError};

/// Body of `/export_mean_spectrum`.
#[derive(Debug, Clone, Serialize)]
pub struct MeanExportRequest {
    pub frequencies: Vec<f64>,
    pub mean_amplitude: Vec<f64>,
    pub params: BTreeMap<String, String>,
}

impl MeanExportRequest {
    /// Mean spectrum on dataset 0's (processed) axis. Needs a result with a mean.
    pub fn new(result: &ProcessingResult, params: BTreeMap<String, String>) -> Result<Self> {
        let mean = result
            .mean
            .clone()
            .ok_or_else(|| SpecError::Validation("no mean spectrum to export; process with mean ± σ first".into()))?;
        let frequencies = result
            .frequencies
            .first()
            .cloned()
            .ok_or_else(|| SpecError::Validation("no frequency axis to export".into()))?;
        Ok(Self {
            frequencies,
            mean_amplitude: mean,
            params,
        })
    }
}

/// Body of `/export_processed`.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedExportRequest {
    pub files: Vec<String>,
    pub frequencies: Vec<Vec<f64>>,
    pub processed_amplitudes: Vec<Vec<f64>>,
    pub params: BTreeMap<String, String>,
}

impl ProcessedExportRequest {
    pub fn new(
        store: &DatasetStore,
        result: &ProcessingResult,
        params: BTreeMap<String, String>,
    ) -> Self {
        Self {
            files: store.labels().to_vec(),
            frequencies: result.frequencies.clone(),
            processed_amplitudes: result.amplitudes.clone(),
            params,
        }
    }
}

/// A downloaded export, ready for a save-as dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportBlob {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportBlob {
    pub fn save<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        std::fs::write(path, &self.bytes)
    }
}

/// File name from a `Content-Disposition` header, if it names one.
pub fn file_name_from_disposition(header: &str) -> Option<String> {
    header.split(';').map(str::trim).find_map(|part| {
        let name = part.strip_prefix("filename=")?;
        let name = name.trim_matches('"');
        (!name.is_empty()).then(|| name.to_string())
    })
}
