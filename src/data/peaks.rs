//! Peak table rows derived from a processing result.

use crate::data::dataset::DatasetStore;
use crate::data::processing::ProcessingResult;

#[derive(Debug, Clone, PartialEq)]
pub struct PeakRow {
    pub file: String,
    /// 1-based peak number within its file.
    pub number: usize,
    pub frequency: f64,
    pub amplitude: f64,
}

/// One row per detected peak, in dataset then peak order. Peak indices that
/// do not resolve into the processed sequences are skipped. Amplitudes come
/// from the server's peak values when it sent them.
pub fn peak_rows(store: &DatasetStore, result: &ProcessingResult) -> Vec<PeakRow> {
    let Some(peaks) = &result.peaks else {
        return Vec::new();
    };
    let mut rows = Vec::new();
    for (i, list) in peaks.iter().enumerate() {
        let (Some(freqs), Some(amps)) = (result.frequencies.get(i), result.amplitudes.get(i)) else {
            continue;
        };
        let file = store
            .labels()
            .get(i)
            .cloned()
            .unwrap_or_else(|| format!("File {}", i + 1));
        let reported = result.peak_values.as_ref().and_then(|v| v.get(i));
        for (n, &p) in list.iter().enumerate() {
            let amplitude = reported.and_then(|v| v.get(n)).or_else(|| amps.get(p));
            if let (Some(&frequency), Some(&amplitude)) = (freqs.get(p), amplitude) {
                rows.push(PeakRow {
                    file: file.clone(),
                    number: n + 1,
                    frequency,
                    amplitude,
                });
            }
        }
    }
    rows
}
