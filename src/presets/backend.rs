//! Remote preset storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::form::FormPayload;
use crate::error::{Result, SpecError};
use crate::remote::{check_status, RemoteClient};

/// Number of preset slots per user.
pub const SLOT_COUNT: u8 = 5;

/// Slot numbers are 1-based.
pub fn validate_slot(slot: u8) -> Result<u8> {
    if (1..=SLOT_COUNT).contains(&slot) {
        Ok(slot)
    } else {
        Err(SpecError::InvalidSlot(slot))
    }
}

/// Slot metadata as returned by `GET /presets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetSummary {
    pub slot: u8,
    pub name: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Full preset as returned by `GET /presets/{slot}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetRecord {
    pub name: String,
    #[serde(default)]
    pub payload: FormPayload,
}

#[derive(Debug, Serialize)]
struct SaveBody<'a> {
    name: &'a str,
    payload: &'a FormPayload,
}

/// Storage for named configuration slots.
///
/// Implementations report a missing slot as [`SpecError::NotFound`] and a
/// missing or rejected credential as [`SpecError::Unauthorized`].
#[async_trait]
pub trait PresetBackend: Send + Sync {
    async fn list(&self) -> Result<Vec<PresetSummary>>;

    async fn save(&self, slot: u8, name: &str, payload: &FormPayload) -> Result<()>;

    async fn load(&self, slot: u8) -> Result<PresetRecord>;

    async fn delete(&self, slot: u8) -> Result<()>;
}

/// [`PresetBackend`] over the server's `/presets` endpoints.
#[derive(Debug, Clone)]
pub struct HttpPresetBackend {
    remote: RemoteClient,
}

impl HttpPresetBackend {
    pub fn new(remote: RemoteClient) -> Self {
        Self { remote }
    }
}

#[async_trait]
impl PresetBackend for HttpPresetBackend {
    async fn list(&self) -> Result<Vec<PresetSummary>> {
        let resp = check_status(self.remote.get("presets").send().await?).await?;
        resp.json()
            .await
            .map_err(|e| SpecError::Validation(format!("malformed preset list: {e}")))
    }

    async fn save(&self, slot: u8, name: &str, payload: &FormPayload) -> Result<()> {
        let slot = validate_slot(slot)?;
        let body = SaveBody { name, payload };
        let req = self.remote.post(&format!("presets/{slot}")).json(&body);
        check_status(req.send().await?).await?;
        Ok(())
    }

    async fn load(&self, slot: u8) -> Result<PresetRecord> {
        let slot = validate_slot(slot)?;
        let resp = check_status(self.remote.get(&format!("presets/{slot}")).send().await?).await?;
        resp.json()
            .await
            .map_err(|e| SpecError::Validation(format!("malformed preset {slot}: {e}")))
    }

    async fn delete(&self, slot: u8) -> Result<()> {
        let slot = validate_slot(slot)?;
        check_status(self.remote.delete(&format!("presets/{slot}")).send().await?).await?;
        Ok(())
    }
}
