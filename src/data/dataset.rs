//! Dataset store: the ordered collection of spectra currently loaded.
//!
//! Datasets are kept as three parallel sequences (labels, frequency
//! sequences, amplitude sequences). Index `i` always refers to the same
//! logical dataset in all three, and the store is the only place that
//! mutates them.

use crate::error::{Result, SpecError};

/// One loaded spectrum. Its id is its position in the [`DatasetStore`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    pub label: String,
    pub frequencies: Vec<f64>,
    pub amplitudes: Vec<f64>,
}

impl Dataset {
    pub fn new(label: impl Into<String>, frequencies: Vec<f64>, amplitudes: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            frequencies,
            amplitudes,
        }
    }

    /// Number of (frequency, amplitude) samples.
    pub fn len(&self) -> usize {
        self.frequencies.len().min(self.amplitudes.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Borrowed view of a single dataset inside the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetRef<'a> {
    pub index: usize,
    pub label: &'a str,
    pub frequencies: &'a [f64],
    pub amplitudes: &'a [f64],
}

#[derive(Debug, Default)]
pub struct DatasetStore {
    labels: Vec<String>,
    frequencies: Vec<Vec<f64>>,
    amplitudes: Vec<Vec<f64>>,
    generation: u64,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Bumped on every mutation. Used to discard results computed for an
    /// older collection.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn frequencies(&self) -> &[Vec<f64>] {
        &self.frequencies
    }

    pub fn amplitudes(&self) -> &[Vec<f64>] {
        &self.amplitudes
    }

    pub fn get(&self, index: usize) -> Option<DatasetRef<'_>> {
        if index >= self.len() {
            return None;
        }
        Some(DatasetRef {
            index,
            label: &self.labels[index],
            frequencies: &self.frequencies[index],
            amplitudes: &self.amplitudes[index],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = DatasetRef<'_>> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Discard the current collection and adopt `datasets`.
    pub fn replace_all(&mut self, datasets: Vec<Dataset>) {
        self.labels.clear();
        self.frequencies.clear();
        self.amplitudes.clear();
        self.push_all(datasets);
        self.generation += 1;
        log::debug!("dataset store replaced: {} datasets", self.len());
    }

    /// Append `datasets` after the existing ones. Existing indices are untouched.
    pub fn append(&mut self, datasets: Vec<Dataset>) {
        let before = self.len();
        self.push_all(datasets);
        self.generation += 1;
        log::debug!("dataset store appended: {} -> {} datasets", before, self.len());
    }

    /// Remove the dataset at `index`, shifting later datasets down by one.
    pub fn remove_at(&mut self, index: usize) -> Result<Dataset> {
        let len = self.len();
        if index >= len {
            return Err(SpecError::OutOfRange { index, len });
        }
        let label = self.labels.remove(index);
        let frequencies = self.frequencies.remove(index);
        let amplitudes = self.amplitudes.remove(index);
        self.generation += 1;
        log::debug!("dataset {index} ({label}) removed, {} left", self.len());
        Ok(Dataset {
            label,
            frequencies,
            amplitudes,
        })
    }

    pub fn clear(&mut self) {
        self.labels.clear();
        self.frequencies.clear();
        self.amplitudes.clear();
        self.generation += 1;
    }

    /// Owned copies of all datasets, in order.
    pub fn to_datasets(&self) -> Vec<Dataset> {
        self.iter()
            .map(|d| Dataset::new(d.label, d.frequencies.to_vec(), d.amplitudes.to_vec()))
            .collect()
    }

    fn push_all(&mut self, datasets: Vec<Dataset>) {
        self.labels.reserve(datasets.len());
        self.frequencies.reserve(datasets.len());
        self.amplitudes.reserve(datasets.len());
        for d in datasets {
            self.labels.push(d.label);
            self.frequencies.push(d.frequencies);
            self.amplitudes.push(d.amplitudes);
        }
    }
}
