//! Renderdesk Core Library
//!
//! Headless implementation of Renderdesk's export dialogs:
//!
//! - Export preferences and their SQLite / in-memory stores
//! - The image type catalog and the renderer contract
//! - The export settings dialog (load, preview, edit, commit or cancel)
//! - The result notice with its "don't show again" preference
//!
//! Presentation is left to the host; see the `renderdesk-gui` crate.

pub mod catalog;
pub mod config;
pub mod db;
pub mod dialog;
pub mod form;
pub mod render;
pub mod store;

// Re-exports for convenience
pub use catalog::{CatalogError, ImageTypeCatalog, DEFAULT_IMAGE_TYPES};
pub use config::{
    DialogStrings, PreferenceRecord, PreviewConfig, StringTable, ValidationError, MAX_SCALE,
    MIN_SCALE,
};
pub use db::Database;
pub use dialog::config::{
    ConfigDialogController, ConfigDialogPresenter, ConfigDialogSession, ConfigOutcome,
};
pub use dialog::result::{
    HeadingStyle, ResultDialog, ResultDialogController, ResultDialogPresenter, ResultOptions,
    ResultView, WriteTicket,
};
pub use dialog::{CloseAction, DialogError, DialogState, SessionSlot};
pub use form::{CheckboxField, ConfigForm, FormValues, RangeField, SelectField, TextField};
pub use render::{OutputFile, Preview, RenderError, RenderOptions, Renderer, Rendition};
pub use store::{MemoryPreferenceStore, PreferenceStore, SqlitePreferenceStore, StorageError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
