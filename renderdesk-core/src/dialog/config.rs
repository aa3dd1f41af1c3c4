//! Export settings dialog.
//!
//! Opening a dialog loads the stored preferences, requests a preview render
//! and hands back a [`ConfigDialogSession`] holding the working copy. The
//! session is consumed by `confirm` (validate, save, return the saved record)
//! or by `cancel`/`dismiss` (nothing is written).

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{CloseAction, DialogError, DialogState, SessionSlot, SlotGuard};
use crate::catalog::ImageTypeCatalog;
use crate::config::{DialogStrings, PreferenceRecord, PreviewConfig};
use crate::form::ConfigForm;
use crate::render::{Preview, RenderOptions, Renderer};
use crate::store::PreferenceStore;

/// What the caller gets back when the dialog closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOutcome {
    /// The user confirmed; holds the record as persisted.
    Committed(PreferenceRecord),
    Canceled,
}

impl ConfigOutcome {
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }

    pub fn into_record(self) -> Option<PreferenceRecord> {
        match self {
            Self::Committed(record) => Some(record),
            Self::Canceled => None,
        }
    }
}

/// Drives the user interaction for an open session.
///
/// Implementations mutate the session's form and return once the user
/// closes the dialog.
#[async_trait]
pub trait ConfigDialogPresenter: Send {
    async fn present(&mut self, session: &mut ConfigDialogSession) -> CloseAction;
}

// =============================================================================
// Controller
// =============================================================================

/// Opens export dialogs. Only one session may be open per process unless the
/// controller is given its own [`SessionSlot`].
pub struct ConfigDialogController<R: Renderer> {
    store: Arc<dyn PreferenceStore>,
    renderer: Arc<R>,
    catalog: Arc<ImageTypeCatalog>,
    preview: PreviewConfig,
    slot: SessionSlot,
}

impl<R: Renderer> Clone for ConfigDialogController<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            renderer: Arc::clone(&self.renderer),
            catalog: Arc::clone(&self.catalog),
            preview: self.preview.clone(),
            slot: self.slot.clone(),
        }
    }
}

impl<R: Renderer> ConfigDialogController<R> {
    pub fn new(
        store: Arc<dyn PreferenceStore>,
        renderer: Arc<R>,
        catalog: ImageTypeCatalog,
    ) -> Self {
        Self {
            store,
            renderer,
            catalog: Arc::new(catalog),
            preview: PreviewConfig::default(),
            slot: SessionSlot::process(),
        }
    }

    /// Enforce the single-open rule on `slot` instead of process-wide.
    pub fn with_slot(mut self, slot: SessionSlot) -> Self {
        self.slot = slot;
        self
    }

    /// Override the fixed settings used for the preview render.
    pub fn with_preview_config(mut self, preview: PreviewConfig) -> Self {
        self.preview = preview;
        self
    }

    /// Current lifecycle state of the slot this controller opens dialogs in.
    pub fn state(&self) -> DialogState {
        self.slot.state()
    }

    /// Load preferences, request the preview and open a session.
    ///
    /// Fails with [`DialogError::Conflict`] if a session is already open and
    /// with [`DialogError::Storage`] if the preferences can't be read. A failed
    /// preview is not an error; the session reports it through
    /// [`ConfigDialogSession::preview`].
    pub async fn open(
        &self,
        strings: DialogStrings,
        selection: &R::Selection,
    ) -> Result<ConfigDialogSession, DialogError> {
        let guard = self.slot.acquire()?;
        let id = Uuid::new_v4();
        info!(session = %id, "Opening export dialog");

        let mut working = self.store.load().await?;
        for correction in working.validate(&self.catalog) {
            warn!(session = %id, %correction, "Stored preference corrected");
        }

        let preview_settings = self.preview.settings_for(&working, &self.catalog);
        let preview = Preview::from(
            self.renderer
                .render(selection, &preview_settings, RenderOptions::preview())
                .await,
        );
        match &preview {
            Preview::Ready(rendition) => {
                let path = rendition.native_path().display();
                debug!(session = %id, %path, "Preview rendered");
            }
            Preview::Unavailable(reason) => {
                warn!(session = %id, %reason, "Preview unavailable, opening without it");
            }
        }

        let form = ConfigForm::from_record(&working, &self.catalog, &strings);
        guard.set(DialogState::Open);

        Ok(ConfigDialogSession {
            id,
            store: Arc::clone(&self.store),
            catalog: Arc::clone(&self.catalog),
            strings,
            working,
            form,
            preview,
            guard,
        })
    }

    /// Open a dialog, let `presenter` run it and apply how it was closed.
    pub async fn get_result_from_config_dialog<P>(
        &self,
        strings: DialogStrings,
        selection: &R::Selection,
        presenter: &mut P,
    ) -> Result<ConfigOutcome, DialogError>
    where
        P: ConfigDialogPresenter + ?Sized,
    {
        let mut session = self.open(strings, selection).await?;
        let action = presenter.present(&mut session).await;
        session.close(action).await
    }
}

// =============================================================================
// Session
// =============================================================================

/// One open export dialog.
///
/// Edits only touch the in-memory form; nothing reaches the store until
/// [`confirm`](Self::confirm).
pub struct ConfigDialogSession {
    id: Uuid,
    store: Arc<dyn PreferenceStore>,
    catalog: Arc<ImageTypeCatalog>,
    strings: DialogStrings,
    working: PreferenceRecord,
    form: ConfigForm,
    preview: Preview,
    guard: SlotGuard,
}

impl std::fmt::Debug for ConfigDialogSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigDialogSession")
            .field("id", &self.id)
            .field("working", &self.working)
            .field("form", &self.form)
            .field("preview", &self.preview)
            .finish()
    }
}

impl ConfigDialogSession {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn strings(&self) -> &DialogStrings {
        &self.strings
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    /// The record loaded when the dialog opened (after corrections).
    pub fn working(&self) -> &PreferenceRecord {
        &self.working
    }

    pub fn form(&self) -> &ConfigForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ConfigForm {
        &mut self.form
    }

    pub fn set_filename(&mut self, filename: impl Into<String>) {
        self.form.filename.set_value(filename);
        debug!(session = %self.id, filename = %self.form.filename.value(), "Filename changed");
    }

    /// Select a rendition type by identifier. Unknown identifiers are ignored.
    pub fn select_rendition_type(&mut self, id: &str) -> bool {
        let changed = self.form.rendition_type.select_value(id);
        debug!(session = %self.id, rendition_type = %id, changed, "Rendition type selected");
        changed
    }

    pub fn select_rendition_index(&mut self, index: usize) -> bool {
        let changed = self.form.rendition_type.select_index(index);
        debug!(session = %self.id, index, changed, "Rendition index selected");
        changed
    }

    /// Report a new slider value; the adjacent label updates with it.
    pub fn set_scale(&mut self, scale: i64) {
        self.form.scale.set_value(scale);
        debug!(session = %self.id, scale, "Scale changed");
    }

    pub fn set_overwrite_file(&mut self, overwrite: bool) {
        self.form.overwrite_file.set_checked(overwrite);
        debug!(session = %self.id, overwrite, "Overwrite toggled");
    }

    /// Validate the form, persist it and close.
    ///
    /// The save runs on its own task: dropping this future does not abort it,
    /// and the controller stays in `Submitting` until it finishes.
    pub async fn confirm(self) -> Result<ConfigOutcome, DialogError> {
        let Self {
            id,
            store,
            catalog,
            working,
            form,
            guard,
            ..
        } = self;

        guard.set(DialogState::Submitting);

        let (candidate, corrections) = form.values().overlay(&working, &catalog);
        for correction in &corrections {
            warn!(session = %id, %correction, "Export setting corrected");
        }

        let save = tokio::spawn(async move {
            let result = store.save(candidate).await;
            drop(guard);
            result
        });

        let saved = save.await??;
        info!(
            session = %id,
            filename = %saved.filename,
            rendition_type = %saved.rendition_type,
            scale = saved.scale,
            overwrite = saved.overwrite_file,
            "Export preferences committed"
        );
        Ok(ConfigOutcome::Committed(saved))
    }

    /// Close via the cancel button. Nothing is persisted.
    pub fn cancel(self) -> ConfigOutcome {
        info!(session = %self.id, "Export dialog canceled");
        ConfigOutcome::Canceled
    }

    /// Close via Escape or the host. Nothing is persisted.
    pub fn dismiss(self) -> ConfigOutcome {
        info!(session = %self.id, "Export dialog dismissed");
        ConfigOutcome::Canceled
    }

    pub async fn close(self, action: CloseAction) -> Result<ConfigOutcome, DialogError> {
        match action {
            CloseAction::Confirm => self.confirm().await,
            CloseAction::Cancel => Ok(self.cancel()),
            CloseAction::Dismiss => Ok(self.dismiss()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
