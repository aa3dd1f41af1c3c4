//! Main application state and update loop.

use std::path::PathBuf;
use std::sync::Arc;

use eframe::egui;
use tokio::runtime::Runtime;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, error, info, warn};

use renderdesk_core::{
    CloseAction, ConfigDialogController, ConfigDialogSession, ConfigOutcome, DialogError,
    ImageTypeCatalog, MemoryPreferenceStore, PreferenceRecord, PreferenceStore, RenderError,
    RenderOptions, Renderer, Rendition, ResultDialog, ResultDialogController, ResultOptions,
    SqlitePreferenceStore,
};

use crate::renderer::{Artboard, ArtboardRenderer, ExportSelection};
use crate::strings::AppStrings;
use crate::ui;

// =============================================================================
// Export State
// =============================================================================

/// Where the export flow currently is.
#[derive(Debug, Default)]
pub enum ExportState {
    #[default]
    Idle,
    /// Loading preferences and rendering the preview.
    Opening,
    /// Export settings dialog is on screen.
    Open(ConfigDialogSession),
    /// Settings are being saved.
    Submitting,
    /// Final render is running.
    Rendering,
}

impl ExportState {
    pub fn is_busy(&self) -> bool {
        !matches!(self, ExportState::Idle)
    }
}

// =============================================================================
// Application State
// =============================================================================

/// Main application state.
pub struct RenderdeskApp {
    /// Tokio runtime for async operations.
    pub runtime: Runtime,

    /// Export preference store.
    pub store: Arc<dyn PreferenceStore>,

    pub renderer: Arc<ArtboardRenderer>,

    pub config_dialogs: ConfigDialogController<ArtboardRenderer>,

    pub result_dialogs: ResultDialogController,

    pub strings: AppStrings,

    // -------------------------------------------------------------------------
    // Document
    // -------------------------------------------------------------------------
    /// The artboard being exported.
    pub artboard: Artboard,

    /// Folder final renders are written to.
    pub output_dir: Option<PathBuf>,

    // -------------------------------------------------------------------------
    // Dialogs
    // -------------------------------------------------------------------------
    pub export: ExportState,

    /// Texture of the current session's preview.
    pub preview_texture: Option<egui::TextureHandle>,

    /// Result notice on screen, if any.
    pub result_dialog: Option<ResultDialog>,

    /// Status message.
    pub status_message: Option<(String, chrono::DateTime<chrono::Utc>)>,

    /// Pending session open receiver.
    open_rx: Option<oneshot::Receiver<Result<ConfigDialogSession, DialogError>>>,

    /// Pending settings save receiver.
    commit_rx: Option<oneshot::Receiver<Result<ConfigOutcome, DialogError>>>,

    /// Pending final render receiver.
    render_rx: Option<oneshot::Receiver<Result<Vec<Rendition>, RenderError>>>,

    /// Pending folder selection result receiver.
    folder_result_rx: Option<oneshot::Receiver<Option<PathBuf>>>,

    /// Pending preference reset receiver.
    reset_rx: Option<oneshot::Receiver<Result<(), String>>>,
}

impl RenderdeskApp {
    /// Create a new application instance.
    pub fn new(cc: &eframe::CreationContext<'_>, runtime: Runtime) -> anyhow::Result<Self> {
        info!("Initializing RenderdeskApp");

        let store = open_store();
        let renderer = Arc::new(ArtboardRenderer::with_temp_previews());
        let catalog = ImageTypeCatalog::default();
        let config_dialogs =
            ConfigDialogController::new(Arc::clone(&store), Arc::clone(&renderer), catalog);
        let result_dialogs = ResultDialogController::new(Arc::clone(&store));
        let strings = AppStrings::bundled()?;

        let mut style = (*cc.egui_ctx.style()).clone();
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        cc.egui_ctx.set_style(style);

        Ok(Self {
            runtime,
            store,
            renderer,
            config_dialogs,
            result_dialogs,
            strings,
            artboard: Artboard::default(),
            output_dir: None,
            export: ExportState::Idle,
            preview_texture: None,
            result_dialog: None,
            status_message: None,
            open_rx: None,
            commit_rx: None,
            render_rx: None,
            folder_result_rx: None,
            reset_rx: None,
        })
    }

    fn selection(&self) -> ExportSelection {
        ExportSelection {
            artboard: self.artboard.clone(),
            output_dir: self.output_dir.clone(),
        }
    }

    // -------------------------------------------------------------------------
    // Export flow
    // -------------------------------------------------------------------------

    /// Open the export settings dialog.
    pub fn start_export(&mut self) {
        if self.export.is_busy() {
            debug!("Export already in progress");
            return;
        }

        info!("Starting export");
        self.export = ExportState::Opening;
        self.result_dialog = None;

        let (tx, rx) = oneshot::channel();
        self.open_rx = Some(rx);

        let controller = self.config_dialogs.clone();
        let strings = self.strings.export();
        let selection = self.selection();
        self.runtime.spawn(async move {
            let _ = tx.send(controller.open(strings, &selection).await);
        });
    }

    /// Check for the dialog session to be ready.
    fn check_open_completion(&mut self, ctx: &egui::Context) {
        if let Some(mut rx) = self.open_rx.take() {
            match rx.try_recv() {
                Ok(Ok(session)) => {
                    self.preview_texture = session
                        .preview()
                        .rendition()
                        .and_then(|rendition| load_preview_texture(ctx, rendition));
                    self.export = ExportState::Open(session);
                }
                Ok(Err(e)) => {
                    error!("Failed to open export dialog: {}", e);
                    self.export = ExportState::Idle;
                    self.set_status(&format!("Could not open export settings: {}", e));
                }
                Err(TryRecvError::Empty) => {
                    // Still waiting
                    self.open_rx = Some(rx);
                }
                Err(TryRecvError::Closed) => {
                    warn!("Open channel closed unexpectedly");
                    self.export = ExportState::Idle;
                }
            }
        }
    }

    /// Close the export settings dialog the way the user chose.
    pub fn close_export_dialog(&mut self, action: CloseAction) {
        if !matches!(self.export, ExportState::Open(_)) {
            return;
        }
        let ExportState::Open(session) = std::mem::take(&mut self.export) else {
            return;
        };
        self.preview_texture = None;

        match action {
            CloseAction::Confirm => {
                self.export = ExportState::Submitting;

                let (tx, rx) = oneshot::channel();
                self.commit_rx = Some(rx);
                self.runtime.spawn(async move {
                    let _ = tx.send(session.confirm().await);
                });
            }
            CloseAction::Cancel => {
                session.cancel();
                self.set_status("Export canceled");
            }
            CloseAction::Dismiss => {
                session.dismiss();
                self.set_status("Export canceled");
            }
        }
    }

    /// Check for the settings save to finish.
    fn check_commit_completion(&mut self) {
        if let Some(mut rx) = self.commit_rx.take() {
            match rx.try_recv() {
                Ok(Ok(ConfigOutcome::Committed(record))) => {
                    self.export = ExportState::Idle;
                    self.render_final(record);
                }
                Ok(Ok(ConfigOutcome::Canceled)) => {
                    self.export = ExportState::Idle;
                }
                Ok(Err(e)) => {
                    error!("Failed to save export settings: {}", e);
                    self.export = ExportState::Idle;
                    self.set_status(&format!("Failed to save export settings: {}", e));
                }
                Err(TryRecvError::Empty) => {
                    self.commit_rx = Some(rx);
                }
                Err(TryRecvError::Closed) => {
                    warn!("Commit channel closed unexpectedly");
                    self.export = ExportState::Idle;
                }
            }
        }
    }

    /// Render with the committed settings, or explain why we can't.
    fn render_final(&mut self, record: PreferenceRecord) {
        if self.output_dir.is_none() {
            if record.skip_no_folder_message {
                self.set_status("No output folder selected");
            } else {
                self.result_dialog = Some(
                    self.result_dialogs
                        .show(&self.strings.no_folder(), ResultOptions::error()),
                );
            }
            return;
        }

        self.export = ExportState::Rendering;

        let (tx, rx) = oneshot::channel();
        self.render_rx = Some(rx);

        let renderer = Arc::clone(&self.renderer);
        let selection = self.selection();
        self.runtime.spawn(async move {
            let result = renderer
                .render(&selection, &record, RenderOptions::final_output())
                .await;
            let _ = tx.send(result);
        });
    }

    /// Check for the final render to finish and report it.
    fn check_render_completion(&mut self) {
        if let Some(mut rx) = self.render_rx.take() {
            match rx.try_recv() {
                Ok(Ok(renditions)) => {
                    self.export = ExportState::Idle;
                    if let Some(rendition) = renditions.first() {
                        info!("Exported {}", rendition.native_path().display());
                    }
                    self.result_dialog = Some(self.result_dialogs.show(
                        &self.strings.export_complete(),
                        ResultOptions::success(renditions),
                    ));
                }
                Ok(Err(e)) => {
                    error!("Export failed: {}", e);
                    self.export = ExportState::Idle;
                    self.result_dialog = Some(
                        self.result_dialogs
                            .show(&self.strings.export_failed(), ResultOptions::error()),
                    );
                }
                Err(TryRecvError::Empty) => {
                    self.render_rx = Some(rx);
                }
                Err(TryRecvError::Closed) => {
                    warn!("Render channel closed unexpectedly");
                    self.export = ExportState::Idle;
                }
            }
        }
    }

    /// Close the result notice.
    pub fn close_result_dialog(&mut self, action: CloseAction) {
        if let Some(dialog) = self.result_dialog.take() {
            dialog.close_with(action);
        }
    }

    // -------------------------------------------------------------------------
    // Preferences
    // -------------------------------------------------------------------------

    /// Forget all saved export preferences.
    pub fn reset_preferences(&mut self) {
        if self.reset_rx.is_some() || self.export.is_busy() {
            return;
        }

        let (tx, rx) = oneshot::channel();
        self.reset_rx = Some(rx);

        let store = Arc::clone(&self.store);
        let result_dialogs = self.result_dialogs.clone();
        self.runtime.spawn(async move {
            // Let queued toggle writes land first so they don't resurrect the record.
            result_dialogs.flush().await;
            let _ = tx.send(store.clear().await.map_err(|e| e.to_string()));
        });
    }

    fn check_reset_completion(&mut self) {
        if let Some(mut rx) = self.reset_rx.take() {
            match rx.try_recv() {
                Ok(Ok(())) => {
                    info!("Export preferences reset");
                    self.set_status("Export preferences reset");
                }
                Ok(Err(e)) => {
                    error!("Failed to reset export preferences: {}", e);
                    self.set_status(&format!("Failed to reset preferences: {}", e));
                }
                Err(TryRecvError::Empty) => {
                    self.reset_rx = Some(rx);
                }
                Err(TryRecvError::Closed) => {
                    warn!("Reset channel closed unexpectedly");
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Output folder
    // -------------------------------------------------------------------------

    /// Open a folder selection dialog asynchronously.
    pub fn open_folder_dialog(&mut self) {
        // Don't open another dialog if one is pending
        if self.folder_result_rx.is_some() {
            return;
        }

        let (tx, rx) = oneshot::channel();
        self.folder_result_rx = Some(rx);

        self.runtime.spawn(async move {
            let folder = rfd::AsyncFileDialog::new()
                .set_title("Choose Output Folder")
                .pick_folder()
                .await
                .map(|f| f.path().to_path_buf());
            let _ = tx.send(folder);
        });
    }

    /// Check for folder selection completion.
    fn check_folder_selection(&mut self) {
        if let Some(mut rx) = self.folder_result_rx.take() {
            match rx.try_recv() {
                Ok(Some(folder)) => {
                    info!("Output folder: {}", folder.display());
                    self.set_status(&format!("Exporting to {}", folder.display()));
                    self.output_dir = Some(folder);
                }
                Ok(None) => {
                    debug!("Folder selection cancelled");
                }
                Err(TryRecvError::Empty) => {
                    self.folder_result_rx = Some(rx);
                }
                Err(TryRecvError::Closed) => {
                    warn!("Folder selection channel closed unexpectedly");
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Status
    // -------------------------------------------------------------------------

    /// Set a status message.
    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some((msg.to_string(), chrono::Utc::now()));
    }

    /// Clear old status messages.
    pub fn clear_old_status(&mut self) {
        if let Some((_, time)) = &self.status_message {
            if chrono::Utc::now() - *time > chrono::Duration::seconds(5) {
                self.status_message = None;
            }
        }
    }

    fn has_pending_work(&self) -> bool {
        self.open_rx.is_some()
            || self.commit_rx.is_some()
            || self.render_rx.is_some()
            || self.folder_result_rx.is_some()
            || self.reset_rx.is_some()
    }
}

/// Open the SQLite store, falling back to memory so the app still runs.
fn open_store() -> Arc<dyn PreferenceStore> {
    match SqlitePreferenceStore::open_default() {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!("Failed to open preference store: {}", e);
            match SqlitePreferenceStore::in_memory() {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    error!("Failed to open in-memory store: {}", e);
                    Arc::new(MemoryPreferenceStore::new())
                }
            }
        }
    }
}

/// Decode a rendered preview into a texture.
fn load_preview_texture(
    ctx: &egui::Context,
    rendition: &Rendition,
) -> Option<egui::TextureHandle> {
    let img = match image::open(rendition.native_path()) {
        Ok(img) => img,
        Err(e) => {
            warn!("Failed to load preview {:?}: {}", rendition.native_path(), e);
            return None;
        }
    };

    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &rgba.into_raw());

    Some(ctx.load_texture("export-preview", color_image, egui::TextureOptions::LINEAR))
}

impl eframe::App for RenderdeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for async completions
        self.check_open_completion(ctx);
        self.check_commit_completion();
        self.check_render_completion();
        self.check_folder_selection();
        self.check_reset_completion();
        self.clear_old_status();

        // Top panel with menu
        egui::TopBottomPanel::top("menu_panel").show(ctx, |ui| {
            ui::menu::render(self, ui, ctx);
        });

        // Status bar at bottom
        egui::TopBottomPanel::bottom("status_panel")
            .max_height(24.0)
            .show(ctx, |ui| {
                ui::status::render(self, ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui::artboard::render(self, ui);
        });

        ui::export_dialog::render(self, ctx);
        ui::result_dialog::render(self, ctx);

        if self.has_pending_work() {
            ctx.request_repaint();
        }
    }
}
