//! Preset panel state and the async operations behind its slot buttons.
//!
//! The UI asks [`PresetPanelState`] for a [`PresetCommand`] when a slot
//! button is clicked, runs it with [`PresetClient::execute`] off the UI
//! thread, and feeds the result back through [`PresetPanelState::apply`].
//! Once any call comes back unauthorized the panel locks: the cache is
//! dropped, a persistent notice is shown and every later request is a no-op.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::data::form::FormPayload;
use crate::error::{Result, SpecError};

use super::backend::{validate_slot, PresetBackend, PresetRecord, PresetSummary, SLOT_COUNT};

pub const LOCKED_NOTICE: &str = "Presets are unavailable: sign in to save and load presets.";

#[derive(Debug, Clone, PartialEq)]
pub enum PresetCommand {
    List,
    Save {
        slot: u8,
        name: String,
        payload: FormPayload,
    },
    Load {
        slot: u8,
    },
    Delete {
        slot: u8,
    },
}

/// Successful outcome of a [`PresetCommand`], including the refreshed slot
/// list for commands that trigger one.
#[derive(Debug, Clone, PartialEq)]
pub enum PresetReply {
    Listed(Vec<PresetSummary>),
    /// `slots` is the refreshed list, or why the refresh failed after a
    /// successful write.
    Saved {
        slot: u8,
        slots: std::result::Result<Vec<PresetSummary>, String>,
    },
    Loaded {
        slot: u8,
        preset: PresetRecord,
    },
    LoadedEmpty {
        slot: u8,
        slots: Vec<PresetSummary>,
    },
    Deleted {
        slot: u8,
        slots: Vec<PresetSummary>,
    },
    AlreadyEmpty {
        slot: u8,
        slots: Vec<PresetSummary>,
    },
}

/// Runs preset commands against a backend.
#[derive(Clone)]
pub struct PresetClient {
    backend: Arc<dyn PresetBackend>,
}

impl PresetClient {
    pub fn new(backend: Arc<dyn PresetBackend>) -> Self {
        Self { backend }
    }

    pub async fn execute(&self, command: PresetCommand) -> Result<PresetReply> {
        match command {
            PresetCommand::List => Ok(PresetReply::Listed(self.backend.list().await?)),
            PresetCommand::Save {
                slot,
                name,
                payload,
            } => {
                self.backend.save(slot, &name, &payload).await?;
                log::info!("preset {slot} saved as '{name}'");
                let slots = match self.backend.list().await {
                    Ok(slots) => Ok(slots),
                    Err(e) if e.is_unauthorized() => return Err(e),
                    Err(e) => {
                        log::warn!("preset list refresh after saving slot {slot} failed: {e}");
                        Err(e.to_string())
                    }
                };
                Ok(PresetReply::Saved { slot, slots })
            }
            PresetCommand::Load { slot } => match self.backend.load(slot).await {
                Ok(preset) => Ok(PresetReply::Loaded { slot, preset }),
                Err(e) if e.is_not_found() => {
                    let slots = self.backend.list().await?;
                    Ok(PresetReply::LoadedEmpty { slot, slots })
                }
                Err(e) => Err(e),
            },
            PresetCommand::Delete { slot } => match self.backend.delete(slot).await {
                Ok(()) => {
                    let slots = self.backend.list().await?;
                    Ok(PresetReply::Deleted { slot, slots })
                }
                Err(e) if e.is_not_found() => {
                    let slots = self.backend.list().await?;
                    Ok(PresetReply::AlreadyEmpty { slot, slots })
                }
                Err(e) => Err(e),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
    Locked,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PresetNotice {
    pub kind: NoticeKind,
    pub text: String,
}

impl PresetNotice {
    fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct PresetPanelState {
    slots: BTreeMap<u8, PresetSummary>,
    locked: bool,
    notice: Option<PresetNotice>,
}

impl PresetPanelState {
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Whether slot buttons (save/load/delete) are enabled.
    pub fn controls_enabled(&self) -> bool {
        !self.locked
    }

    pub fn notice(&self) -> Option<&PresetNotice> {
        self.notice.as_ref()
    }

    pub fn slot(&self, slot: u8) -> Option<&PresetSummary> {
        self.slots.get(&slot)
    }

    /// Slot numbers 1..=5 with their cached metadata.
    pub fn slots(&self) -> impl Iterator<Item = (u8, Option<&PresetSummary>)> + '_ {
        (1..=SLOT_COUNT).map(move |s| (s, self.slots.get(&s)))
    }

    pub fn request_list(&self) -> Option<PresetCommand> {
        (!self.locked).then_some(PresetCommand::List)
    }

    /// `name` is the answer to the name prompt; `None` or blank cancels.
    pub fn request_save(
        &mut self,
        slot: u8,
        name: Option<&str>,
        payload: FormPayload,
    ) -> Option<PresetCommand> {
        if self.locked {
            return None;
        }
        let slot = self.checked_slot(slot)?;
        let name = name.map(str::trim).filter(|n| !n.is_empty())?;
        Some(PresetCommand::Save {
            slot,
            name: name.to_string(),
            payload,
        })
    }

    pub fn request_load(&mut self, slot: u8) -> Option<PresetCommand> {
        if self.locked {
            return None;
        }
        let slot = self.checked_slot(slot)?;
        Some(PresetCommand::Load { slot })
    }

    pub fn request_delete(&mut self, slot: u8) -> Option<PresetCommand> {
        if self.locked {
            return None;
        }
        let slot = self.checked_slot(slot)?;
        Some(PresetCommand::Delete { slot })
    }

    /// Fold a command's result into the panel. Returns the preset whose
    /// payload must be applied to the form, if any.
    pub fn apply(&mut self, result: Result<PresetReply>) -> Option<PresetRecord> {
        let reply = match result {
            Ok(reply) => reply,
            Err(SpecError::Unauthorized) => {
                self.lock();
                return None;
            }
            Err(_) if self.locked => return None,
            Err(e) => {
                log::warn!("preset request failed: {e}");
                self.notice = Some(PresetNotice::new(NoticeKind::Error, e.to_string()));
                return None;
            }
        };
        if self.locked {
            return None;
        }
        match reply {
            PresetReply::Listed(slots) => {
                self.replace_slots(slots);
                None
            }
            PresetReply::Saved { slot, slots } => {
                self.notice = Some(match slots {
                    Ok(slots) => {
                        self.replace_slots(slots);
                        PresetNotice::new(
                            NoticeKind::Success,
                            format!("Preset saved to slot {slot}."),
                        )
                    }
                    Err(reason) => PresetNotice::new(
                        NoticeKind::Info,
                        format!(
                            "Preset saved to slot {slot}, but the slot list could not be refreshed: {reason}"
                        ),
                    ),
                });
                None
            }
            PresetReply::Loaded { slot, preset } => {
                self.notice = Some(PresetNotice::new(
                    NoticeKind::Success,
                    format!("Loaded preset '{}' from slot {slot}.", preset.name),
                ));
                Some(preset)
            }
            PresetReply::LoadedEmpty { slot, slots } => {
                self.replace_slots(slots);
                self.notice = Some(PresetNotice::new(
                    NoticeKind::Info,
                    format!("Slot {slot} is empty."),
                ));
                None
            }
            PresetReply::Deleted { slot, slots } => {
                self.replace_slots(slots);
                self.notice = Some(PresetNotice::new(
                    NoticeKind::Success,
                    format!("Slot {slot} cleared."),
                ));
                None
            }
            PresetReply::AlreadyEmpty { slot, slots } => {
                self.replace_slots(slots);
                self.notice = Some(PresetNotice::new(
                    NoticeKind::Info,
                    format!("Slot {slot} was already empty."),
                ));
                None
            }
        }
    }

    /// Enter the locked state. There is no automatic way out; the user has to
    /// re-authenticate and restart the panel.
    pub fn lock(&mut self) {
        if !self.locked {
            log::warn!("preset panel locked: unauthorized");
        }
        self.locked = true;
        self.slots.clear();
        self.notice = Some(PresetNotice::new(NoticeKind::Locked, LOCKED_NOTICE));
    }

    fn replace_slots(&mut self, slots: Vec<PresetSummary>) {
        self.slots = slots
            .into_iter()
            .filter(|s| validate_slot(s.slot).is_ok())
            .map(|s| (s.slot, s))
            .collect();
    }

    fn checked_slot(&mut self, slot: u8) -> Option<u8> {
        match validate_slot(slot) {
            Ok(slot) => Some(slot),
            Err(e) => {
                self.notice = Some(PresetNotice::new(NoticeKind::Error, e.to_string()));
                None
            }
        }
    }
}
