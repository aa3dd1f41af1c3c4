//! End-to-end export flow against the SQLite store.

use std::sync::Arc;

use async_trait::async_trait;
use renderdesk_core::{
    ConfigDialogController, ConfigOutcome, DialogError, DialogStrings, ImageTypeCatalog,
    PreferenceRecord, PreferenceStore, RenderError, RenderOptions, Renderer, Rendition,
    ResultDialogController, ResultOptions, SessionSlot, SqlitePreferenceStore,
};
use tempfile::TempDir;

struct StubRenderer;

#[async_trait]
impl Renderer for StubRenderer {
    type Selection = &'static str;

    async fn render(
        &self,
        selection: &&'static str,
        settings: &PreferenceRecord,
        _options: RenderOptions,
    ) -> Result<Vec<Rendition>, RenderError> {
        Ok(vec![Rendition::new(format!(
            "/exports/{}-{}.{}",
            selection, settings.filename, settings.rendition_type
        ))])
    }
}

fn config_strings() -> DialogStrings {
    DialogStrings::new("Export", "Render", "Cancel")
}

fn open_store(tmp: &TempDir) -> Arc<SqlitePreferenceStore> {
    Arc::new(SqlitePreferenceStore::open_at(tmp.path().join("prefs.db")).unwrap())
}

fn image_types() -> ImageTypeCatalog {
    ImageTypeCatalog::new(["png", "jpg", "svg"]).unwrap()
}

/// Controller with its own slot, so tests in this file can run in parallel.
fn dialogs(store: Arc<SqlitePreferenceStore>) -> ConfigDialogController<StubRenderer> {
    ConfigDialogController::new(store, Arc::new(StubRenderer), image_types())
        .with_slot(SessionSlot::new())
}

#[tokio::test]
async fn edited_scale_is_persisted_and_returned() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&tmp);
    let initial = PreferenceRecord {
        filename: String::new(),
        rendition_type: "png".to_string(),
        scale: 2,
        overwrite_file: false,
        skip_no_folder_message: false,
    };
    store.save(initial.clone()).await.unwrap();

    let mut session = dialogs(store.clone())
        .open(config_strings(), &"Artboard")
        .await
        .unwrap();
    session.set_scale(4);
    let outcome = session.confirm().await.unwrap();

    let persisted = store.load().await.unwrap();
    assert_eq!(persisted, PreferenceRecord { scale: 4, ..initial });
    assert_eq!(outcome, ConfigOutcome::Committed(persisted));
}

#[tokio::test]
async fn cancel_without_prior_record_keeps_store_empty() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&tmp);

    let mut session = dialogs(store.clone())
        .open(config_strings(), &"Artboard")
        .await
        .unwrap();
    assert_eq!(session.working(), &PreferenceRecord::default());
    session.set_filename("never-saved");
    assert!(session.cancel().is_canceled());

    assert!(!store.has_record().await.unwrap());
    assert_eq!(store.load().await.unwrap(), PreferenceRecord::default());
}

#[tokio::test]
async fn committed_settings_survive_reopening_the_store() {
    let tmp = TempDir::new().unwrap();

    {
        let store = open_store(&tmp);
        let mut session = dialogs(store).open(config_strings(), &"Artboard").await.unwrap();
        session.set_filename("release-notes");
        session.select_rendition_type("svg");
        session.confirm().await.unwrap();
    }

    let store = open_store(&tmp);
    let session = dialogs(store).open(config_strings(), &"Artboard").await.unwrap();
    assert_eq!(session.form().filename.value(), "release-notes");
    assert_eq!(session.form().rendition_type.selected_value(), "svg");
}

/// Both writers replace the whole record, so whichever finishes last wins.
#[tokio::test]
async fn toggle_and_confirm_are_last_writer_wins() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&tmp);
    let results = ResultDialogController::new(store.clone());
    let notice = DialogStrings::new("No output folder", "OK", "Close")
        .with_checkbox("Don't show this message again");

    // The export dialog snapshots the record before the toggle lands.
    let mut session = dialogs(store.clone())
        .open(config_strings(), &"Artboard")
        .await
        .unwrap();

    let mut dialog = results.show(&notice, ResultOptions::error());
    let ticket = dialog.set_skip_no_folder_message(true).unwrap();
    dialog.close();
    ticket.wait().await.unwrap().unwrap();
    assert!(store.load().await.unwrap().skip_no_folder_message);

    session.set_scale(3);
    let saved = session.confirm().await.unwrap().into_record().unwrap();

    assert!(!saved.skip_no_folder_message);
    assert_eq!(store.load().await.unwrap(), saved);
}

/// The only test here that touches the process-wide slot.
#[tokio::test]
async fn independent_controllers_share_one_session_per_process() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&tmp);
    let menu = ConfigDialogController::new(store.clone(), Arc::new(StubRenderer), image_types());
    let shortcut =
        ConfigDialogController::new(store.clone(), Arc::new(StubRenderer), image_types());

    let session = menu.open(config_strings(), &"Artboard").await.unwrap();
    let second = shortcut.open(config_strings(), &"Artboard").await;
    assert!(matches!(second, Err(DialogError::Conflict)));

    assert!(session.cancel().is_canceled());
    let session = shortcut.open(config_strings(), &"Artboard").await.unwrap();
    session.dismiss();
    assert!(!store.has_record().await.unwrap());
}
