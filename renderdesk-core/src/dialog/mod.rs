//! Modal dialog controllers.
//!
//! - [`config`]: the export settings dialog (load, preview, edit, commit/cancel)
//! - [`result`]: the success/error notice with its "don't show again" toggle

pub mod config;
pub mod result;

use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use thiserror::Error;

use crate::store::StorageError;

#[derive(Debug, Error)]
pub enum DialogError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("An export dialog is already open")]
    Conflict,

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// How the user closed a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAction {
    /// OK button or form submit.
    Confirm,
    /// Cancel button.
    Cancel,
    /// Escape key or the host closing the dialog.
    Dismiss,
}

/// Lifecycle of the export dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Loading,
    Open,
    Submitting,
}

// =============================================================================
// Single-session slot
// =============================================================================

static PROCESS_SLOT: OnceLock<SessionSlot> = OnceLock::new();

/// Tracks whether an export dialog is open, and in which state.
///
/// Controllers built with [`ConfigDialogController::new`](config::ConfigDialogController::new)
/// all share [`SessionSlot::process`], so at most one export dialog is open
/// per process. A slot from [`SessionSlot::new`] scopes the rule to the
/// controllers it is handed to.
#[derive(Debug, Clone)]
pub struct SessionSlot {
    state: Arc<Mutex<DialogState>>,
}

impl SessionSlot {
    /// A slot shared with nobody else.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(DialogState::Closed)),
        }
    }

    /// The slot shared by every controller in this process.
    pub fn process() -> Self {
        PROCESS_SLOT.get_or_init(Self::new).clone()
    }

    fn lock(&self) -> MutexGuard<'_, DialogState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> DialogState {
        *self.lock()
    }

    /// Claim the slot, moving it to `Loading`.
    pub(crate) fn acquire(&self) -> Result<SlotGuard, DialogError> {
        let mut state = self.lock();
        if *state != DialogState::Closed {
            return Err(DialogError::Conflict);
        }
        *state = DialogState::Loading;
        Ok(SlotGuard {
            slot: self.clone(),
        })
    }
}

impl Default for SessionSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Holds the slot until dropped, then marks it `Closed` again.
#[derive(Debug)]
pub(crate) struct SlotGuard {
    slot: SessionSlot,
}

impl SlotGuard {
    pub(crate) fn set(&self, state: DialogState) {
        *self.slot.lock() = state;
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        *self.slot.lock() = DialogState::Closed;
    }
}
