//! Browser-side tests for the localStorage adapters.

#![cfg(target_arch = "wasm32")]

use topaz_quiz::{QuizDefinition, QuizModality, QuizSession, SessionStore};
use topaz_web::storage::{self, LastVisited, LocalStorageStore};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn session_record_round_trips_through_local_storage() {
    let json = r#"[{"question": "Q1", "choices": {"A": "a", "B": "b"}, "correctAnswer": "A"}]"#;
    let def = QuizDefinition::from_json(QuizModality::SingleChoice, json).unwrap();
    let mut session = QuizSession::create_fresh(def, "wasm_test.json", "quizContainer");
    session.submit_choice(0, "B", false);

    let store = LocalStorageStore;
    store.save(session.session_key(), &session.to_saved());
    let loaded = store.load("wasm_test.json").unwrap();
    assert_eq!(loaded, session.to_saved());

    store.remove("wasm_test.json");
    assert!(store.load("wasm_test.json").is_none());
}

#[wasm_bindgen_test]
fn missing_record_reads_as_absent() {
    let store = LocalStorageStore;
    assert!(store.load("never_saved.json").is_none());
    // Removing a missing key is a no-op, not a failure.
    store.remove("never_saved.json");
}

#[wasm_bindgen_test]
fn last_visited_round_trips() {
    let record = LastVisited {
        page_id: "epi-1".to_string(),
        quiz_file: Some("assets/quizzes/epidemiology1.json".to_string()),
    };
    storage::save_last_visited(&record);
    assert_eq!(storage::load_last_visited(), Some(record));

    storage::clear_last_visited();
    assert!(storage::load_last_visited().is_none());
}
