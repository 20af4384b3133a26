//! Per-user configuration presets stored on the server.

mod backend;
mod panel;

pub use backend::{
    validate_slot, HttpPresetBackend, PresetBackend, PresetRecord, PresetSummary, SLOT_COUNT,
};
pub use panel::{
    NoticeKind, PresetClient, PresetCommand, PresetNotice, PresetPanelState, PresetReply,
    LOCKED_NOTICE,
};
