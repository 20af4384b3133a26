//! Application configuration.
//!
//! | Field               | Purpose |
//! |---------------------|---------|
//! | `server_url`        | Base URL of the processing server |
//! | `session_token`     | Bearer credential for preset and processing calls |
//! | `delete_confirm_ms` | Lifetime of the delete affordance |
//! | `label_max_len`     | Legend label truncation length |
//! | `theme`             | Initial light/dark theme |
//! | `initial_form`      | Form values applied at startup |
//!
//! Values come from `~/.specplot/config.yaml` when present, then the
//! `SPECPLOT_SERVER` and `SPECPLOT_TOKEN` environment variables override the
//! connection settings.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::color_scheme::Theme;
use crate::data::form::FormPayload;
use crate::data::overlay::LABEL_MAX_LEN;
use crate::error::{Result, SpecError};
use crate::interaction::DELETE_CONFIRM_TIMEOUT;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
pub const SERVER_ENV: &str = "SPECPLOT_SERVER";
pub const TOKEN_ENV: &str = "SPECPLOT_TOKEN";

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecPlotConfig {
    /// Native window title.
    pub title: String,
    pub server_url: String,
    pub session_token: Option<String>,
    pub delete_confirm_ms: u64,
    pub label_max_len: usize,
    pub theme: Theme,
    pub initial_form: FormPayload,
    /// Optional eframe native-window options.
    #[serde(skip)]
    pub native_options: Option<eframe::NativeOptions>,
}

impl Default for SpecPlotConfig {
    fn default() -> Self {
        Self {
            title: "SpecPlot".to_string(),
            server_url: DEFAULT_SERVER_URL.to_string(),
            session_token: None,
            delete_confirm_ms: DELETE_CONFIRM_TIMEOUT.as_millis() as u64,
            label_max_len: LABEL_MAX_LEN,
            theme: Theme::default(),
            initial_form: FormPayload::new(),
            native_options: None,
        }
    }
}

impl std::fmt::Debug for SpecPlotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecPlotConfig")
            .field("title", &self.title)
            .field("server_url", &self.server_url)
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .field("delete_confirm_ms", &self.delete_confirm_ms)
            .field("label_max_len", &self.label_max_len)
            .field("theme", &self.theme)
            .field("initial_form", &self.initial_form)
            .finish_non_exhaustive()
    }
}

impl SpecPlotConfig {
    pub fn delete_timeout(&self) -> Duration {
        Duration::from_millis(self.delete_confirm_ms)
    }

    /// `~/.specplot/config.yaml`, if a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".specplot").join("config.yaml"))
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)
            .map_err(|e| SpecError::Config(format!("failed to read {path:?}: {e}")))?;
        serde_yaml::from_str(&s)
            .map_err(|e| SpecError::Config(format!("failed to parse {path:?}: {e}")))
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let s = serde_yaml::to_string(self)
            .map_err(|e| SpecError::Config(format!("serialization error: {e}")))?;
        fs::write(path, s)?;
        Ok(())
    }

    /// Load the default file if it exists, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = match Self::default_path() {
            Some(path) if path.exists() => {
                log::info!("loading config from {path:?}");
                Self::load_from_path(&path)?
            }
            _ => Self::default(),
        };
        cfg.apply_overrides(
            std::env::var(SERVER_ENV).ok(),
            std::env::var(TOKEN_ENV).ok(),
        );
        Ok(cfg)
    }

    /// Blank values are ignored.
    pub fn apply_overrides(&mut self, server_url: Option<String>, token: Option<String>) {
        if let Some(url) = server_url.filter(|s| !s.trim().is_empty()) {
            self.server_url = url.trim().to_string();
        }
        if let Some(token) = token.filter(|s| !s.trim().is_empty()) {
            self.session_token = Some(token.trim().to_string());
        }
    }
}
