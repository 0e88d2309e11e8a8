//! Live quiz attempt state: counters, per-item outcomes, and the submission
//! entry points that are the only place counters mutate.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::data::{ChoiceQuestion, LabPartKind, QuizDefinition, QuizModality};
use crate::grading::{grade_keywords, grade_short_answer, grade_single_choice};

/// Grading state of one item. Monotonic within an attempt: once `Correct` or
/// `Incorrect`, only an explicit retry reset returns it to `Unchecked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    #[default]
    Unchecked,
    Correct,
    Incorrect,
}

impl Outcome {
    #[must_use]
    pub const fn is_checked(self) -> bool {
        !matches!(self, Self::Unchecked)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unchecked => "unchecked",
            Self::Correct => "correct",
            Self::Incorrect => "incorrect",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted per-item record: the outcome plus the raw submitted value(s)
/// kept for re-display after rehydration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ItemRecord {
    #[serde(default)]
    pub status: Outcome,
    #[serde(default, rename = "userAnswer", skip_serializing_if = "Vec::is_empty")]
    pub submitted: Vec<String>,
}

/// Stable identity of a gradable item, synthesized at load time: the source
/// index for single-choice questions, the part id for lab parts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ItemKey {
    Question(usize),
    Part(String),
}

/// Identity used to scope "retry incorrect": the question source index for
/// single-choice, the question-block number for lab quizzes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum RetryKey {
    Question(usize),
    Block(String),
}

/// Display order of a single-choice quiz: a permutation of source indices
/// plus, per displayed position, a permutation of that question's option keys.
/// Never persisted; rehydrated sessions start from identity order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkingOrder {
    pub order: Vec<usize>,
    pub choice_orders: Vec<Vec<String>>,
}

impl WorkingOrder {
    #[must_use]
    pub fn identity(questions: &[ChoiceQuestion]) -> Self {
        Self {
            order: (0..questions.len()).collect(),
            choice_orders: questions.iter().map(ChoiceQuestion::choice_keys).collect(),
        }
    }
}

/// One renderable single-choice item: display position, stable identity, and
/// the option order to draw.
#[derive(Debug, Clone, Copy)]
pub struct WorkingItem<'a> {
    pub position: usize,
    pub source_index: usize,
    pub question: &'a ChoiceQuestion,
    pub choice_order: &'a [String],
}

/// Submitted blank values per part id for one lab block.
pub type AnswerSheet = BTreeMap<String, Vec<String>>;

/// Why a submission was declined with no state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Operation does not apply to this session's modality.
    WrongModality,
    /// No item with that identity exists in the definition.
    UnknownItem,
    /// The submitted option key is not one of the question's choices.
    UnknownChoice,
    /// No option was selected.
    NoSelection,
    /// A required blank of a still-unchecked part is empty.
    EmptyInput,
    /// Restore was requested but nothing is recorded for the item.
    NothingToRestore,
}

/// Result of a single-choice submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitResult {
    /// Freshly graded; counters moved exactly once.
    Graded(Outcome),
    /// Item was already graded; the recorded outcome, counters untouched.
    AlreadyGraded(Outcome),
    /// Declined; no state change.
    Rejected(RejectReason),
}

/// Per-part result inside a lab block submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartGrade {
    pub id: String,
    pub outcome: Outcome,
    /// True when this submission graded the part (counters moved for it).
    pub fresh: bool,
}

/// Result of a lab block submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockSubmit {
    /// Current outcome of every part in the block, fresh ones flagged.
    Graded(Vec<PartGrade>),
    /// Every part was already graded; counters untouched.
    AlreadyGraded(Vec<PartGrade>),
    /// Declined; no state change.
    Rejected(RejectReason),
}

/// The live state of one quiz attempt, identified by its session key (the
/// originating quiz file name). An owned value threaded through every
/// operation; nothing here is global.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSession {
    pub(crate) session_key: String,
    pub(crate) container_id: String,
    pub(crate) modality: QuizModality,
    pub(crate) total_items: usize,
    pub(crate) answered: usize,
    pub(crate) correct: usize,
    pub(crate) incorrect: usize,
    pub(crate) outcomes: BTreeMap<ItemKey, ItemRecord>,
    pub(crate) incorrect_keys: BTreeSet<RetryKey>,
    /// Immutable original definition; never mutated, never persisted.
    pub(crate) source: QuizDefinition,
    pub(crate) working: WorkingOrder,
}

impl QuizSession {
    /// Create a fresh session: totals computed by walking the definition
    /// (flattening case-study groups), all outcomes unchecked, counters zero,
    /// identity display order.
    #[must_use]
    pub fn create_fresh(
        source: QuizDefinition,
        session_key: impl Into<String>,
        container_id: impl Into<String>,
    ) -> Self {
        let total_items = source.total_items();
        let mut outcomes = BTreeMap::new();
        let working = match &source {
            QuizDefinition::SingleChoice(questions) => {
                for index in 0..questions.len() {
                    outcomes.insert(ItemKey::Question(index), ItemRecord::default());
                }
                WorkingOrder::identity(questions)
            }
            QuizDefinition::LabMultiPart(blocks) => {
                for part in blocks.iter().flat_map(|block| block.parts()) {
                    outcomes.insert(ItemKey::Part(part.id.clone()), ItemRecord::default());
                }
                WorkingOrder::default()
            }
        };

        Self {
            session_key: session_key.into(),
            container_id: container_id.into(),
            modality: source.modality(),
            total_items,
            answered: 0,
            correct: 0,
            incorrect: 0,
            outcomes,
            incorrect_keys: BTreeSet::new(),
            source,
            working,
        }
    }

    /// Rebuild a session from a persisted record and a freshly loaded
    /// definition. Returns `None` when the record contradicts the definition
    /// (modality or totals mismatch, unresolvable item keys, counters that
    /// disagree with the outcomes); callers treat that exactly like an absent
    /// record.
    #[must_use]
    pub fn from_saved(saved: SavedSession, source: QuizDefinition) -> Option<Self> {
        if saved.modality != source.modality() || saved.total_questions != source.total_items() {
            return None;
        }

        let mut session = Self::create_fresh(source, saved.quiz_file, saved.container_id);
        match session.modality {
            QuizModality::SingleChoice => {
                let len = session.source.question_count();
                for (index, record) in saved.user_answers {
                    if index >= len {
                        return None;
                    }
                    if record.status.is_checked() {
                        session.outcomes.insert(ItemKey::Question(index), record);
                    }
                }
                for index in saved.incorrect_indices {
                    if index >= len {
                        return None;
                    }
                    session.incorrect_keys.insert(RetryKey::Question(index));
                }
            }
            QuizModality::LabMultiPart => {
                let part_ids: BTreeSet<String> = session
                    .source
                    .lab_questions()
                    .unwrap_or_default()
                    .iter()
                    .flat_map(|block| block.parts().map(|part| part.id.clone()))
                    .collect();
                let block_numbers: BTreeSet<String> = session
                    .source
                    .lab_questions()
                    .unwrap_or_default()
                    .iter()
                    .map(|block| block.question_number.clone())
                    .collect();
                for (id, record) in saved.answers {
                    if !part_ids.contains(&id) {
                        return None;
                    }
                    if record.status.is_checked() {
                        session.outcomes.insert(ItemKey::Part(id), record);
                    }
                }
                for number in saved.incorrect_question_blocks {
                    if !block_numbers.contains(&number) {
                        return None;
                    }
                    session.incorrect_keys.insert(RetryKey::Block(number));
                }
            }
        }

        session.answered = session
            .outcomes
            .values()
            .filter(|record| record.status.is_checked())
            .count();
        session.correct = session
            .outcomes
            .values()
            .filter(|record| record.status == Outcome::Correct)
            .count();
        session.incorrect = session.answered - session.correct;

        if session.answered != saved.answered
            || session.correct != saved.correct
            || session.incorrect != saved.incorrect
        {
            return None;
        }
        Some(session)
    }

    /// Rehydrate when a usable record exists, otherwise start fresh.
    #[must_use]
    pub fn restore_or_create(
        source: QuizDefinition,
        saved: Option<SavedSession>,
        session_key: impl Into<String>,
        container_id: impl Into<String>,
    ) -> Self {
        if let Some(saved) = saved
            && let Some(session) = Self::from_saved(saved, source.clone())
        {
            return session;
        }
        Self::create_fresh(source, session_key, container_id)
    }

    /// The persistence record: counters, outcomes, and retry keys only. The
    /// definition is never written; unchecked items are omitted to bound the
    /// record's size.
    #[must_use]
    pub fn to_saved(&self) -> SavedSession {
        let mut saved = SavedSession {
            modality: self.modality,
            total_questions: self.total_items,
            answered: self.answered,
            correct: self.correct,
            incorrect: self.incorrect,
            incorrect_indices: Vec::new(),
            incorrect_question_blocks: Vec::new(),
            user_answers: BTreeMap::new(),
            answers: BTreeMap::new(),
            container_id: self.container_id.clone(),
            quiz_file: self.session_key.clone(),
        };
        for (key, record) in &self.outcomes {
            if !record.status.is_checked() {
                continue;
            }
            match key {
                ItemKey::Question(index) => {
                    saved.user_answers.insert(*index, record.clone());
                }
                ItemKey::Part(id) => {
                    saved.answers.insert(id.clone(), record.clone());
                }
            }
        }
        for key in &self.incorrect_keys {
            match key {
                RetryKey::Question(index) => saved.incorrect_indices.push(*index),
                RetryKey::Block(number) => saved.incorrect_question_blocks.push(number.clone()),
            }
        }
        saved
    }

    #[must_use]
    pub fn session_key(&self) -> &str {
        &self.session_key
    }

    #[must_use]
    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    #[must_use]
    pub const fn modality(&self) -> QuizModality {
        self.modality
    }

    #[must_use]
    pub const fn total_items(&self) -> usize {
        self.total_items
    }

    #[must_use]
    pub const fn answered(&self) -> usize {
        self.answered
    }

    #[must_use]
    pub const fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub const fn incorrect(&self) -> usize {
        self.incorrect
    }

    #[must_use]
    pub fn outcome_of(&self, key: &ItemKey) -> Outcome {
        self.outcomes.get(key).map_or(Outcome::Unchecked, |record| record.status)
    }

    #[must_use]
    pub fn record_of(&self, key: &ItemKey) -> Option<&ItemRecord> {
        self.outcomes.get(key)
    }

    #[must_use]
    pub const fn incorrect_keys(&self) -> &BTreeSet<RetryKey> {
        &self.incorrect_keys
    }

    #[must_use]
    pub fn has_incorrect(&self) -> bool {
        !self.incorrect_keys.is_empty()
    }

    #[must_use]
    pub const fn source(&self) -> &QuizDefinition {
        &self.source
    }

    #[must_use]
    pub const fn working_order(&self) -> &WorkingOrder {
        &self.working
    }

    /// Replace the display order, e.g. after a reshuffle. The item order must
    /// stay a permutation of the source indices. Lab sessions carry no
    /// display order and ignore the argument's shape.
    #[must_use]
    pub fn with_working_order(mut self, working: WorkingOrder) -> Self {
        if let QuizDefinition::SingleChoice(questions) = &self.source {
            debug_assert_eq!(working.order.len(), questions.len());
            debug_assert_eq!(working.choice_orders.len(), working.order.len());
        }
        self.working = working;
        self
    }

    /// Single-choice items in display order. Empty for lab sessions.
    pub fn working_items(&self) -> impl Iterator<Item = WorkingItem<'_>> {
        let questions = self.source.choice_questions().unwrap_or_default();
        self.working
            .order
            .iter()
            .enumerate()
            .filter_map(move |(position, &source_index)| {
                questions.get(source_index).map(|question| WorkingItem {
                    position,
                    source_index,
                    question,
                    choice_order: self
                        .working
                        .choice_orders
                        .get(position)
                        .map(Vec::as_slice)
                        .unwrap_or_default(),
                })
            })
    }

    /// Grade a single-choice submission. Identified by the question's source
    /// index; idempotent re-submission is reported, never re-scored, and the
    /// `restoring` flag replays a recorded outcome without any mutation.
    pub fn submit_choice(
        &mut self,
        question_index: usize,
        selected: &str,
        restoring: bool,
    ) -> SubmitResult {
        let QuizDefinition::SingleChoice(questions) = &self.source else {
            return SubmitResult::Rejected(RejectReason::WrongModality);
        };
        let Some(question) = questions.get(question_index) else {
            return SubmitResult::Rejected(RejectReason::UnknownItem);
        };

        let key = ItemKey::Question(question_index);
        let recorded = self.outcome_of(&key);
        if recorded.is_checked() {
            return SubmitResult::AlreadyGraded(recorded);
        }
        if restoring {
            return SubmitResult::Rejected(RejectReason::NothingToRestore);
        }
        if selected.trim().is_empty() {
            return SubmitResult::Rejected(RejectReason::NoSelection);
        }
        if !question.choices.contains_key(selected) {
            return SubmitResult::Rejected(RejectReason::UnknownChoice);
        }

        let outcome = grade_single_choice(question, selected);
        self.record_outcome(key, outcome, vec![selected.to_string()]);
        if outcome == Outcome::Incorrect {
            self.incorrect_keys.insert(RetryKey::Question(question_index));
        }
        SubmitResult::Graded(outcome)
    }

    /// Grade every still-unchecked part of one lab block against the answer
    /// sheet. Declines the whole block, with no state change, while a
    /// required blank of an unchecked part is empty. Already-graded parts are
    /// reported but never re-scored; with `restoring` the recorded outcomes
    /// are replayed without mutation.
    pub fn submit_lab_block(
        &mut self,
        question_number: &str,
        sheet: &AnswerSheet,
        restoring: bool,
    ) -> BlockSubmit {
        if self.modality != QuizModality::LabMultiPart {
            return BlockSubmit::Rejected(RejectReason::WrongModality);
        }
        let Some(block) = self.source.find_block(question_number) else {
            return BlockSubmit::Rejected(RejectReason::UnknownItem);
        };
        let parts: Vec<_> = block.parts().cloned().collect();
        let number = block.question_number.clone();

        if restoring {
            let grades: Vec<PartGrade> = parts
                .iter()
                .map(|part| PartGrade {
                    id: part.id.clone(),
                    outcome: self.outcome_of(&ItemKey::Part(part.id.clone())),
                    fresh: false,
                })
                .filter(|grade| grade.outcome.is_checked())
                .collect();
            if grades.is_empty() {
                return BlockSubmit::Rejected(RejectReason::NothingToRestore);
            }
            return BlockSubmit::AlreadyGraded(grades);
        }

        let pending: Vec<_> = parts
            .iter()
            .filter(|part| !self.outcome_of(&ItemKey::Part(part.id.clone())).is_checked())
            .collect();
        if pending.is_empty() {
            let grades = parts
                .iter()
                .map(|part| PartGrade {
                    id: part.id.clone(),
                    outcome: self.outcome_of(&ItemKey::Part(part.id.clone())),
                    fresh: false,
                })
                .collect();
            return BlockSubmit::AlreadyGraded(grades);
        }

        // Empty-field policy: decline the block outright rather than grading
        // blanks the user has not filled in.
        for part in &pending {
            let values = sheet.get(&part.id);
            let blank_filled = |index: usize| {
                values
                    .and_then(|v| v.get(index))
                    .is_some_and(|value| !value.trim().is_empty())
            };
            let ok = match part.kind {
                LabPartKind::ShortAnswer | LabPartKind::MultiShortAnswer => (0..part.blank_count())
                    .all(|index| part.accept_any.contains(&index) || blank_filled(index)),
                LabPartKind::Keywords => (0..part.blank_count()).any(blank_filled),
            };
            if !ok {
                return BlockSubmit::Rejected(RejectReason::EmptyInput);
            }
        }

        let mut grades = Vec::with_capacity(parts.len());
        for part in &parts {
            let key = ItemKey::Part(part.id.clone());
            let recorded = self.outcome_of(&key);
            if recorded.is_checked() {
                grades.push(PartGrade {
                    id: part.id.clone(),
                    outcome: recorded,
                    fresh: false,
                });
                continue;
            }
            let submitted = sheet.get(&part.id).cloned().unwrap_or_default();
            let outcome = match part.kind {
                LabPartKind::ShortAnswer | LabPartKind::MultiShortAnswer => {
                    grade_short_answer(part, &submitted)
                }
                LabPartKind::Keywords => grade_keywords(part, &submitted),
            };
            self.record_outcome(key, outcome, submitted);
            grades.push(PartGrade {
                id: part.id.clone(),
                outcome,
                fresh: true,
            });
        }

        if grades.iter().any(|grade| grade.outcome == Outcome::Incorrect) {
            self.incorrect_keys.insert(RetryKey::Block(number));
        }
        BlockSubmit::Graded(grades)
    }

    /// The single place counters move: one `Unchecked -> Correct|Incorrect`
    /// transition per item per attempt.
    fn record_outcome(&mut self, key: ItemKey, outcome: Outcome, submitted: Vec<String>) {
        debug_assert!(outcome.is_checked());
        debug_assert!(!self.outcome_of(&key).is_checked());

        let record = self.outcomes.entry(key).or_default();
        record.status = outcome;
        record.submitted = submitted;

        self.answered += 1;
        match outcome {
            Outcome::Correct => self.correct += 1,
            Outcome::Incorrect => self.incorrect += 1,
            Outcome::Unchecked => {}
        }
        debug_assert_eq!(self.answered, self.correct + self.incorrect);
        debug_assert!(self.answered <= self.total_items);
    }

    /// Tear the session apart for rebuilds (retry, reshuffle).
    #[must_use]
    pub fn into_source(self) -> (QuizDefinition, String, String) {
        (self.source, self.session_key, self.container_id)
    }
}

/// The wire record persisted under the session key. Deliberately excludes the
/// question definitions; only identifiers, counters, and raw answers go to
/// storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSession {
    #[serde(rename = "type")]
    pub modality: QuizModality,
    pub total_questions: usize,
    pub answered: usize,
    pub correct: usize,
    pub incorrect: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub incorrect_indices: Vec<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub incorrect_question_blocks: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub user_answers: BTreeMap<usize, ItemRecord>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub answers: BTreeMap<String, ItemRecord>,
    pub container_id: String,
    pub quiz_file: String,
}
