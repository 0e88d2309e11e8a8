//! localStorage-backed persistence: the session store adapter and the
//! last-visited-page record.
//!
//! This is the one boundary where storage failures are allowed to happen;
//! every failure degrades to a no-op write or an absent read and is logged,
//! never surfaced to the quiz logic.

use gloo::storage::{LocalStorage, Storage};
use serde::{Deserialize, Serialize};
use topaz_quiz::{SavedSession, SessionStore};

const SESSION_KEY_PREFIX: &str = "topaz.quiz.";
const LAST_VISITED_KEY: &str = "topaz.last-page";

fn storage_key(session_key: &str) -> String {
    format!("{SESSION_KEY_PREFIX}{session_key}")
}

/// Session store over the browser's localStorage.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

impl SessionStore for LocalStorageStore {
    fn save(&self, session_key: &str, record: &SavedSession) {
        if let Err(err) = LocalStorage::set(storage_key(session_key), record) {
            log::warn!("failed to persist session {session_key}: {err:?}");
        }
    }

    fn load(&self, session_key: &str) -> Option<SavedSession> {
        // Missing, disabled, or corrupt entries all read as absent.
        LocalStorage::get(storage_key(session_key)).ok()
    }

    fn remove(&self, session_key: &str) {
        LocalStorage::delete(storage_key(session_key));
    }
}

/// Navigation bookmark: which page (and quiz) was open last. Restores
/// position only, never graded state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastVisited {
    pub page_id: String,
    #[serde(default)]
    pub quiz_file: Option<String>,
}

pub fn save_last_visited(record: &LastVisited) {
    if let Err(err) = LocalStorage::set(LAST_VISITED_KEY, record) {
        log::warn!("failed to persist last-visited page: {err:?}");
    }
}

#[must_use]
pub fn load_last_visited() -> Option<LastVisited> {
    LocalStorage::get(LAST_VISITED_KEY).ok()
}

pub fn clear_last_visited() {
    LocalStorage::delete(LAST_VISITED_KEY);
}
