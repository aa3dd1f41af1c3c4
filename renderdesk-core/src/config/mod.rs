//! Configuration module for Renderdesk.
//!
//! Holds the persisted export preferences and the localized label bundles
//! the dialogs are built from.

mod preferences;
mod strings;

pub use preferences::{
    checked_scale, PreferenceRecord, PreviewConfig, ValidationError, DEFAULT_RENDITION_TYPE,
    MAX_SCALE, MIN_SCALE,
};
pub use strings::{DialogStrings, StringTable, FALLBACK_LANGUAGE};
