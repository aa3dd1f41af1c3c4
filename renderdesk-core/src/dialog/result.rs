//! Result notice shown after an export.
//!
//! The dialog never returns data. Its only side effect is the optional
//! "don't show again" toggle, which writes `skip_no_folder_message` on a
//! background lane as soon as it changes, independently of the dialog
//! closing.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};
use uuid::Uuid;

use super::CloseAction;
use crate::config::{DialogStrings, PreferenceRecord};
use crate::render::Rendition;
use crate::store::{PreferenceStore, StorageError};

/// What to report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultOptions {
    pub is_error: bool,
    pub rendition_results: Option<Vec<Rendition>>,
}

impl ResultOptions {
    pub fn success(renditions: Vec<Rendition>) -> Self {
        Self {
            is_error: false,
            rendition_results: Some(renditions),
        }
    }

    pub fn error() -> Self {
        Self {
            is_error: true,
            rendition_results: None,
        }
    }
}

/// Marker presenters use to style the heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingStyle {
    #[default]
    Normal,
    Error,
}

/// Static content of a result dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub heading: String,
    pub heading_style: HeadingStyle,
    pub paragraph: Option<String>,
    /// Native path of the first produced file, if any.
    pub output_path: Option<PathBuf>,
    pub ok_label: String,
    /// Label of the "don't show again" toggle; `None` hides it.
    pub checkbox_label: Option<String>,
}

impl ResultView {
    fn build(strings: &DialogStrings, options: &ResultOptions) -> Self {
        Self {
            heading: strings.h1.clone(),
            heading_style: if options.is_error {
                HeadingStyle::Error
            } else {
                HeadingStyle::Normal
            },
            paragraph: strings.p.clone(),
            output_path: options
                .rendition_results
                .as_ref()
                .and_then(|results| results.first())
                .map(|r| r.native_path().to_path_buf()),
            ok_label: strings.ok_button.clone(),
            checkbox_label: strings.checkbox.clone(),
        }
    }
}

/// Drives the user interaction for a result dialog.
#[async_trait]
pub trait ResultDialogPresenter: Send {
    async fn present(&mut self, dialog: &mut ResultDialog) -> CloseAction;
}

// =============================================================================
// Write lane
// =============================================================================

enum LaneCommand {
    Write {
        skip_no_folder_message: bool,
        reply: oneshot::Sender<Result<PreferenceRecord, StorageError>>,
    },
    Flush(oneshot::Sender<()>),
}

/// Background task applying toggle writes one at a time, in order.
#[derive(Clone)]
struct WriteLane {
    store: Arc<dyn PreferenceStore>,
    sender: Arc<Mutex<Option<mpsc::UnboundedSender<LaneCommand>>>>,
}

impl WriteLane {
    fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self {
            store,
            sender: Arc::new(Mutex::new(None)),
        }
    }

    /// Sender for the running lane, spawning the worker on first use.
    fn sender(&self) -> mpsc::UnboundedSender<LaneCommand> {
        let mut slot = self
            .sender
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(tx) = slot.as_ref().filter(|tx| !tx.is_closed()) {
            return tx.clone();
        }

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_lane(Arc::clone(&self.store), rx));
        *slot = Some(tx.clone());
        tx
    }

    fn write_skip_flag(&self, skip_no_folder_message: bool) -> WriteTicket {
        let (reply, rx) = oneshot::channel();
        let command = LaneCommand::Write {
            skip_no_folder_message,
            reply,
        };
        if self.sender().send(command).is_err() {
            error!("Preference write lane stopped, toggle not saved");
        }
        WriteTicket(rx)
    }

    async fn flush(&self) {
        let tx = {
            let slot = self
                .sender
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            match slot.as_ref() {
                Some(tx) => tx.clone(),
                None => return,
            }
        };

        let (done, rx) = oneshot::channel();
        if tx.send(LaneCommand::Flush(done)).is_ok() {
            let _ = rx.await;
        }
    }
}

async fn run_lane(store: Arc<dyn PreferenceStore>, mut rx: mpsc::UnboundedReceiver<LaneCommand>) {
    while let Some(command) = rx.recv().await {
        match command {
            LaneCommand::Write {
                skip_no_folder_message,
                reply,
            } => {
                let result = update_skip_flag(store.as_ref(), skip_no_folder_message).await;
                if let Err(e) = &result {
                    error!(error = %e, "Failed to save skip_no_folder_message");
                }
                let _ = reply.send(result);
            }
            LaneCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("Preference write lane stopped");
}

/// Merge the flag over the latest stored record.
async fn update_skip_flag(
    store: &dyn PreferenceStore,
    skip_no_folder_message: bool,
) -> Result<PreferenceRecord, StorageError> {
    let current = store.load().await?;
    let saved = store
        .save(PreferenceRecord {
            skip_no_folder_message,
            ..current
        })
        .await?;
    debug!(skip_no_folder_message, "Saved skip_no_folder_message");
    Ok(saved)
}

/// Completion handle for one toggle write.
///
/// Dropping it does not cancel the write.
#[derive(Debug)]
pub struct WriteTicket(oneshot::Receiver<Result<PreferenceRecord, StorageError>>);

impl WriteTicket {
    /// Wait for the write. `None` if the lane shut down before running it.
    pub async fn wait(self) -> Option<Result<PreferenceRecord, StorageError>> {
        self.0.await.ok()
    }
}

// =============================================================================
// Controller
// =============================================================================

/// Builds result dialogs and owns their write lane.
#[derive(Clone)]
pub struct ResultDialogController {
    lane: WriteLane,
}

impl ResultDialogController {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self {
            lane: WriteLane::new(store),
        }
    }

    /// Build a dialog for the given outcome.
    ///
    /// The dialog is rebuilt on every call; the same inputs always produce the
    /// same view.
    pub fn show(&self, strings: &DialogStrings, options: ResultOptions) -> ResultDialog {
        let dialog = ResultDialog {
            id: Uuid::new_v4(),
            view: ResultView::build(strings, &options),
            skip_checked: false,
            lane: self.lane.clone(),
        };
        info!(
            dialog = %dialog.id,
            is_error = options.is_error,
            has_output = dialog.view.output_path.is_some(),
            "Showing result dialog"
        );
        dialog
    }

    /// Show a dialog and let `presenter` run it until closed.
    pub async fn show_result_dialog<P>(
        &self,
        strings: &DialogStrings,
        options: ResultOptions,
        presenter: &mut P,
    ) where
        P: ResultDialogPresenter + ?Sized,
    {
        let mut dialog = self.show(strings, options);
        let action = presenter.present(&mut dialog).await;
        dialog.close_with(action);
    }

    /// Wait until every toggle write issued so far has been applied.
    pub async fn flush(&self) {
        self.lane.flush().await;
    }
}

/// An open result dialog.
pub struct ResultDialog {
    id: Uuid,
    view: ResultView,
    skip_checked: bool,
    lane: WriteLane,
}

impl std::fmt::Debug for ResultDialog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultDialog")
            .field("id", &self.id)
            .field("view", &self.view)
            .field("skip_checked", &self.skip_checked)
            .finish()
    }
}

impl ResultDialog {
    pub fn view(&self) -> &ResultView {
        &self.view
    }

    pub fn is_error(&self) -> bool {
        self.view.heading_style == HeadingStyle::Error
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.view.output_path.as_deref()
    }

    pub fn has_skip_toggle(&self) -> bool {
        self.view.checkbox_label.is_some()
    }

    pub fn skip_checked(&self) -> bool {
        self.skip_checked
    }

    /// Handle a change of the "don't show again" toggle.
    ///
    /// Queues the write and returns immediately. Returns `None` when this
    /// dialog has no toggle.
    pub fn set_skip_no_folder_message(&mut self, checked: bool) -> Option<WriteTicket> {
        if !self.has_skip_toggle() {
            return None;
        }
        self.skip_checked = checked;
        debug!(dialog = %self.id, checked, "Skip toggle changed");
        Some(self.lane.write_skip_flag(checked))
    }

    /// OK button.
    pub fn close(self) {
        self.close_with(CloseAction::Confirm);
    }

    /// Escape or host dismissal.
    pub fn dismiss(self) {
        self.close_with(CloseAction::Dismiss);
    }

    /// Close however the user chose to. Pending toggle writes keep running.
    pub fn close_with(self, action: CloseAction) {
        info!(dialog = %self.id, ?action, "Result dialog closed");
    }
}

// =============================================================================
// Tests
// =============================================================================
