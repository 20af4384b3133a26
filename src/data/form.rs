//! Processing form state.
//!
//! The form is a flat, ordered set of fields keyed by id. Checkbox fields
//! hold booleans, everything else holds the raw text the user typed; type
//! coercion happens where the values are consumed. Every change, manual or
//! applied from a preset, is broadcast to subscribers in the same way so
//! dependent UI reacts identically to both.

use std::collections::BTreeMap;
use std::sync::mpsc::{Receiver, Sender};

use serde::{Deserialize, Serialize};

use crate::data::overlay::DisplayOptions;
use crate::data::processing::ProcessOptions;
use crate::error::{Result, SpecError};

/// Value stored in a form field or a preset payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            FieldValue::Text(s) => match s.trim() {
                "true" | "on" | "1" => Some(true),
                "false" | "off" | "0" | "" => Some(false),
                _ => None,
            },
            FieldValue::Number(n) => Some(*n != 0.0),
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

/// Flat field-id → value mapping stored in presets.
pub type FormPayload = BTreeMap<String, FieldValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Checkbox,
    Number,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: FieldValue,
    /// Default used when a numeric field is left empty.
    pub default: Option<&'static str>,
    /// Checkbox that must be ticked for this field to be editable.
    pub enabled_by: Option<&'static str>,
}

/// Broadcast whenever a field's value changes.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub id: String,
    pub value: FieldValue,
}

pub struct FormState {
    fields: Vec<FormField>,
    listeners: Vec<Sender<FieldChange>>,
}

impl std::fmt::Debug for FormState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormState")
            .field("fields", &self.fields)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

fn checkbox(id: &'static str, label: &'static str) -> FormField {
    FormField {
        id,
        label,
        kind: FieldKind::Checkbox,
        value: FieldValue::Bool(false),
        default: None,
        enabled_by: None,
    }
}

fn number(
    id: &'static str,
    label: &'static str,
    default: &'static str,
    enabled_by: Option<&'static str>,
) -> FormField {
    FormField {
        id,
        label,
        kind: FieldKind::Number,
        value: FieldValue::Text(default.to_string()),
        default: Some(default),
        enabled_by,
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            fields: vec![
                checkbox("remove_baseline", "Remove baseline"),
                number("lam", "λ", "1000", Some("remove_baseline")),
                number("p", "p", "0.001", Some("remove_baseline")),
                checkbox("apply_smoothing", "Smoothing"),
                number("window_length", "Window length", "25", Some("apply_smoothing")),
                number("polyorder", "Polynomial order", "2", Some("apply_smoothing")),
                checkbox("normalize", "Normalize (SNV)"),
                checkbox("find_peaks", "Find peaks"),
                number("peak_width", "Peak width", "1", Some("find_peaks")),
                number("peak_prominence", "Peak prominence", "1", Some("find_peaks")),
                checkbox("calculate_moving_average", "Moving average"),
                number(
                    "moving_average_window",
                    "MA window",
                    "5",
                    Some("calculate_moving_average"),
                ),
                checkbox("calculate_mean_std", "Mean ± σ"),
                checkbox("calculate_boxplot", "Distribution"),
                checkbox("show_only_mean_std", "Show aggregates only"),
                checkbox("show_peak_table", "Peak table"),
                number("min_freq", "Min frequency", "0", None),
                number("max_freq", "Max frequency", "10000", None),
            ],
            listeners: Vec::new(),
        }
    }
}

impl FormState {
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field(&self, id: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn value(&self, id: &str) -> Option<&FieldValue> {
        self.field(id).map(|f| &f.value)
    }

    pub fn checked(&self, id: &str) -> bool {
        self.value(id).and_then(FieldValue::as_bool).unwrap_or(false)
    }

    /// A field is editable unless the checkbox it depends on is unticked.
    pub fn is_enabled(&self, id: &str) -> bool {
        match self.field(id).and_then(|f| f.enabled_by) {
            Some(parent) => self.checked(parent),
            None => self.field(id).is_some(),
        }
    }

    /// Subscribe to field changes.
    pub fn subscribe(&mut self) -> Receiver<FieldChange> {
        let (tx, rx) = std::sync::mpsc::channel();
        self.listeners.push(tx);
        rx
    }

    /// Set a field, coercing the value to the field's kind. Returns the change
    /// that was broadcast, or `None` when the value did not change.
    pub fn set(&mut self, id: &str, value: FieldValue) -> Result<Option<FieldChange>> {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| SpecError::Validation(format!("unknown form field '{id}'")))?;
        let value = match field.kind {
            FieldKind::Checkbox => FieldValue::Bool(value.as_bool().ok_or_else(|| {
                SpecError::Validation(format!("field '{id}' expects a boolean, got {value:?}"))
            })?),
            FieldKind::Number => FieldValue::Text(value.to_text()),
        };
        if field.value == value {
            return Ok(None);
        }
        field.value = value.clone();
        let change = FieldChange {
            id: id.to_string(),
            value,
        };
        self.listeners.retain(|tx| tx.send(change.clone()).is_ok());
        Ok(Some(change))
    }

    /// Flat payload for presets: booleans for checkboxes, raw strings otherwise.
    pub fn to_payload(&self) -> FormPayload {
        self.fields
            .iter()
            .map(|f| (f.id.to_string(), f.value.clone()))
            .collect()
    }

    /// Apply a preset payload field by field, raising the same change
    /// notifications a manual edit would. Unknown ids are skipped.
    pub fn apply_payload(&mut self, payload: &FormPayload) -> Vec<FieldChange> {
        let mut changes = Vec::new();
        for (id, value) in payload {
            match self.set(id, value.clone()) {
                Ok(Some(change)) => changes.push(change),
                Ok(None) => {}
                Err(e) => log::warn!("preset field '{id}' skipped: {e}"),
            }
        }
        changes
    }

    /// Numeric value of a text field; empty input falls back to the default.
    pub fn number(&self, id: &str) -> Result<f64> {
        let field = self
            .field(id)
            .ok_or_else(|| SpecError::Validation(format!("unknown form field '{id}'")))?;
        let raw = field.value.to_text();
        let raw = raw.trim();
        let text = if raw.is_empty() {
            field.default.unwrap_or("")
        } else {
            raw
        };
        text.parse::<f64>()
            .map_err(|_| SpecError::Validation(format!("{} must be a number, got '{text}'", field.label)))
    }

    pub fn process_options(&self) -> Result<ProcessOptions> {
        Ok(ProcessOptions {
            remove_baseline: self.checked("remove_baseline"),
            apply_smoothing: self.checked("apply_smoothing"),
            normalize: self.checked("normalize"),
            find_peaks: self.checked("find_peaks"),
            calculate_mean_std: self.checked("calculate_mean_std"),
            calculate_boxplot: self.checked("calculate_boxplot"),
            calculate_moving_average: self.checked("calculate_moving_average"),
            lam: self.number("lam")?,
            p: self.number("p")?,
            window_length: self.number("window_length")?,
            polyorder: self.number("polyorder")?,
            width: self.number("peak_width")?,
            prominence: self.number("peak_prominence")?,
            moving_average_window: self.number("moving_average_window")?,
            min_freq: self.number("min_freq")?,
            max_freq: self.number("max_freq")?,
        })
    }

    pub fn display_options(&self, label_max_len: usize) -> DisplayOptions {
        DisplayOptions {
            show_only_aggregate: self.checked("show_only_mean_std"),
            show_aggregate: self.checked("calculate_mean_std"),
            show_distribution: self.checked("calculate_boxplot"),
            label_max_len,
        }
    }

    /// Parameters written into exported files as metadata. Empty text fields
    /// are reported with their defaults.
    pub fn export_params(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .filter(|f| !matches!(f.id, "show_only_mean_std" | "show_peak_table"))
            .map(|f| {
                let text = f.value.to_text();
                let text = match (f.kind, f.default) {
                    (FieldKind::Number, Some(d)) if text.trim().is_empty() => d.to_string(),
                    _ => text,
                };
                (f.id.to_string(), text)
            })
            .collect()
    }
}
