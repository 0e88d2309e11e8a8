//! Topaz Quiz Engine
//!
//! Platform-agnostic core logic for the Topaz quiz platform: definition
//! model, session state, grading, retry, and persistence contracts. This
//! crate has no UI or platform-specific dependencies; the web layer provides
//! the storage and loading seams.

pub mod data;
pub mod grading;
pub mod progress;
pub mod retry;
pub mod session;

// Re-export commonly used types
pub use data::{
    AnswerKey, BlankKey, CaseStudy, ChoiceQuestion, ChoiceReasoning, FieldSpec, KeywordSpec,
    LabEntry, LabPart, LabPartKind, LabQuestion, LabQuestionKind, QuizDefinition, QuizModality,
};
pub use grading::{
    accepted_answer_display, accepted_for_blank, grade_keywords, grade_short_answer,
    grade_single_choice, normalize,
};
pub use progress::ProgressSnapshot;
pub use retry::{reshuffle, retry_all, retry_incorrect_only};
pub use session::{
    AnswerSheet, BlockSubmit, ItemKey, ItemRecord, Outcome, PartGrade, QuizSession, RejectReason,
    RetryKey, SavedSession, SubmitResult, WorkingItem, WorkingOrder,
};

/// Trait for abstracting quiz definition loading.
/// Platform-specific implementations should provide this.
pub trait DefinitionSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load and parse the definition array behind a quiz file name.
    ///
    /// # Errors
    ///
    /// Returns an error if the definition cannot be loaded or parsed.
    fn load_definition(
        &self,
        quiz_file: &str,
        modality: QuizModality,
    ) -> Result<QuizDefinition, Self::Error>;
}

/// Trait for abstracting session persistence.
///
/// Both operations are total: implementations catch every underlying failure
/// (quota, disabled storage, corrupt JSON) and degrade to a no-op `save` or
/// an absent `load`. Storage is best-effort and never required for the
/// correctness of the in-memory session.
pub trait SessionStore {
    /// Persist the session record under its key.
    fn save(&self, session_key: &str, record: &SavedSession);

    /// Load a previously persisted record, absent on any failure.
    fn load(&self, session_key: &str) -> Option<SavedSession>;

    /// Drop the persisted record for a key.
    fn remove(&self, session_key: &str);
}

/// Failure to open a quiz: the definition could not be produced, or it holds
/// no questions. Both route to the "quiz unavailable" presentation path.
#[derive(Debug, thiserror::Error)]
pub enum QuizLoadError {
    #[error("quiz definition `{0}` is empty")]
    EmptyDefinition(String),
    #[error(transparent)]
    Source(#[from] anyhow::Error),
}

/// Binds a definition source and a session store into the quiz lifecycle:
/// open (fresh or rehydrated), persist after mutation, discard on retry.
pub struct QuizEngine<L, S>
where
    L: DefinitionSource,
    S: SessionStore,
{
    source: L,
    store: S,
}

impl<L, S> QuizEngine<L, S>
where
    L: DefinitionSource,
    S: SessionStore,
{
    /// Create an engine from the provided definition source and store.
    pub const fn new(source: L, store: S) -> Self {
        Self { source, store }
    }

    /// Open a quiz: load its definition, then rehydrate from the persisted
    /// record when one exists and still matches, otherwise start fresh. A
    /// record that no longer matches the definition is discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the definition cannot be loaded or is empty; no
    /// session is created in that case.
    pub fn open(
        &self,
        quiz_file: &str,
        modality: QuizModality,
        container_id: &str,
    ) -> Result<QuizSession, QuizLoadError>
    where
        L::Error: Into<anyhow::Error>,
    {
        let definition = self
            .source
            .load_definition(quiz_file, modality)
            .map_err(Into::into)?;
        if definition.is_empty() {
            return Err(QuizLoadError::EmptyDefinition(quiz_file.to_string()));
        }

        if let Some(saved) = self.store.load(quiz_file) {
            match QuizSession::from_saved(saved, definition.clone()) {
                Some(session) => return Ok(session),
                // Stale or corrupt record: behaves exactly like an absent one.
                None => self.store.remove(quiz_file),
            }
        }
        Ok(QuizSession::create_fresh(definition, quiz_file, container_id))
    }

    /// Persist the session's record. Best-effort per the store contract.
    pub fn persist(&self, session: &QuizSession) {
        self.store.save(session.session_key(), &session.to_saved());
    }

    /// Drop the persisted record for a session key.
    pub fn discard(&self, session_key: &str) {
        self.store.remove(session_key);
    }

    /// Start the quiz over, dropping the persisted record first.
    #[must_use]
    pub fn retry_all(&self, session: QuizSession) -> QuizSession {
        self.store.remove(session.session_key());
        let fresh = retry::retry_all(session);
        self.persist(&fresh);
        fresh
    }

    /// Reset only the incorrect items and persist the result.
    pub fn retry_incorrect_only(&self, session: &mut QuizSession) {
        retry::retry_incorrect_only(session);
        self.persist(session);
    }

    /// Reshuffle a single-choice quiz into a fresh session, dropping the
    /// persisted record for its key.
    #[must_use]
    pub fn reshuffle<R: rand::Rng + ?Sized>(
        &self,
        session: QuizSession,
        rng: &mut R,
    ) -> QuizSession {
        self.store.remove(session.session_key());
        let fresh = retry::reshuffle(session, rng);
        self.persist(&fresh);
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::convert::Infallible;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct FixtureSource {
        definitions: HashMap<String, String>,
    }

    impl FixtureSource {
        fn with(mut self, quiz_file: &str, json: &str) -> Self {
            self.definitions
                .insert(quiz_file.to_string(), json.to_string());
            self
        }
    }

    impl DefinitionSource for FixtureSource {
        type Error = serde_json::Error;

        fn load_definition(
            &self,
            quiz_file: &str,
            modality: QuizModality,
        ) -> Result<QuizDefinition, Self::Error> {
            let json = self
                .definitions
                .get(quiz_file)
                .map_or("[]", String::as_str);
            QuizDefinition::from_json(modality, json)
        }
    }

    #[derive(Clone, Default)]
    struct MemoryStore {
        records: Rc<RefCell<HashMap<String, SavedSession>>>,
    }

    impl SessionStore for MemoryStore {
        fn save(&self, session_key: &str, record: &SavedSession) {
            self.records
                .borrow_mut()
                .insert(session_key.to_string(), record.clone());
        }

        fn load(&self, session_key: &str) -> Option<SavedSession> {
            self.records.borrow().get(session_key).cloned()
        }

        fn remove(&self, session_key: &str) {
            self.records.borrow_mut().remove(session_key);
        }
    }

    const MCQ_JSON: &str = r#"[
        {"question": "Q1", "choices": {"A": "a", "B": "b"}, "correctAnswer": "A"},
        {"question": "Q2", "choices": {"A": "a", "B": "b"}, "correctAnswer": "B"}
    ]"#;

    fn engine() -> QuizEngine<FixtureSource, MemoryStore> {
        QuizEngine::new(
            FixtureSource::default().with("pharma1.json", MCQ_JSON),
            MemoryStore::default(),
        )
    }

    #[test]
    fn engine_opens_persists_and_rehydrates() {
        let engine = engine();
        let mut session = engine
            .open("pharma1.json", QuizModality::SingleChoice, "pharmaQuizContainer")
            .unwrap();
        session.submit_choice(0, "B", false);
        engine.persist(&session);

        let reopened = engine
            .open("pharma1.json", QuizModality::SingleChoice, "pharmaQuizContainer")
            .unwrap();
        assert_eq!(reopened.answered(), 1);
        assert_eq!(reopened.incorrect(), 1);
        assert_eq!(
            reopened.outcome_of(&ItemKey::Question(0)),
            Outcome::Incorrect
        );
    }

    #[test]
    fn engine_rejects_empty_definition() {
        let engine = QuizEngine::new(FixtureSource::default(), MemoryStore::default());
        let result = engine.open("missing.json", QuizModality::SingleChoice, "c");
        assert!(matches!(result, Err(QuizLoadError::EmptyDefinition(_))));
    }

    #[test]
    fn engine_discards_stale_record() {
        let engine = engine();
        // A record persisted against a different quiz shape.
        let stale = SavedSession {
            modality: QuizModality::SingleChoice,
            total_questions: 9,
            answered: 9,
            correct: 9,
            incorrect: 0,
            incorrect_indices: Vec::new(),
            incorrect_question_blocks: Vec::new(),
            user_answers: std::collections::BTreeMap::new(),
            answers: std::collections::BTreeMap::new(),
            container_id: "pharmaQuizContainer".to_string(),
            quiz_file: "pharma1.json".to_string(),
        };
        engine.store.save("pharma1.json", &stale);

        let session = engine
            .open("pharma1.json", QuizModality::SingleChoice, "pharmaQuizContainer")
            .unwrap();
        assert_eq!(session.answered(), 0);
        assert!(engine.store.load("pharma1.json").is_none());
    }

    #[test]
    fn engine_retry_all_drops_record() {
        let engine = engine();
        let mut session = engine
            .open("pharma1.json", QuizModality::SingleChoice, "pharmaQuizContainer")
            .unwrap();
        session.submit_choice(0, "B", false);
        engine.persist(&session);

        let fresh = engine.retry_all(session);
        assert_eq!(fresh.answered(), 0);
        let record = engine.store.load("pharma1.json").unwrap();
        assert_eq!(record.answered, 0);
    }
}
