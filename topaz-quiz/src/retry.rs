//! Retry controller: full reset, incorrect-only reset, and reshuffle.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::data::{QuizDefinition, QuizModality};
use crate::session::{ItemKey, Outcome, QuizSession, RetryKey, WorkingOrder};

/// Start the whole quiz over: a fresh session from the immutable source,
/// bound to the same session key. The current display order is preserved, so
/// a prior shuffle survives a plain retry. The caller is responsible for
/// discarding the persisted record.
#[must_use]
pub fn retry_all(session: QuizSession) -> QuizSession {
    let working = session.working_order().clone();
    let (source, session_key, container_id) = session.into_source();
    QuizSession::create_fresh(source, session_key, container_id).with_working_order(working)
}

/// Reset only the currently-incorrect items back to `Unchecked`, decrementing
/// the counters once per reset item, and clear the retry key set. Items not
/// covered by a retry key are untouched.
///
/// For lab quizzes a retry key names a whole question block; every graded
/// part of that block is reset, including parts that happened to be correct.
pub fn retry_incorrect_only(session: &mut QuizSession) {
    let keys: Vec<RetryKey> = session.incorrect_keys.iter().cloned().collect();
    for key in keys {
        match key {
            RetryKey::Question(index) => reset_item(session, &ItemKey::Question(index)),
            RetryKey::Block(number) => {
                let part_ids: Vec<String> = session
                    .source
                    .find_block(&number)
                    .map(|block| block.parts().map(|part| part.id.clone()).collect())
                    .unwrap_or_default();
                for id in part_ids {
                    reset_item(session, &ItemKey::Part(id));
                }
            }
        }
    }
    session.incorrect_keys.clear();
}

fn reset_item(session: &mut QuizSession, key: &ItemKey) {
    let Some(record) = session.outcomes.get_mut(key) else {
        return;
    };
    match record.status {
        Outcome::Unchecked => return,
        Outcome::Correct => session.correct -= 1,
        Outcome::Incorrect => session.incorrect -= 1,
    }
    session.answered -= 1;
    record.status = Outcome::Unchecked;
    record.submitted.clear();
    debug_assert_eq!(session.answered, session.correct + session.incorrect);
}

/// Produce a freshly-ordered session for a single-choice quiz: Fisher-Yates
/// over the item order and, independently, over each item's option-key order.
/// The source definition is untouched and the session key is kept; the caller
/// discards the persisted record. Lab sessions are returned unchanged.
#[must_use]
pub fn reshuffle<R: Rng + ?Sized>(session: QuizSession, rng: &mut R) -> QuizSession {
    if session.modality() != QuizModality::SingleChoice {
        return session;
    }
    let (source, session_key, container_id) = session.into_source();

    let working = match &source {
        QuizDefinition::SingleChoice(questions) => {
            let mut order: Vec<usize> = (0..questions.len()).collect();
            order.shuffle(rng);
            let choice_orders = order
                .iter()
                .map(|&index| {
                    let mut keys = questions[index].choice_keys();
                    keys.shuffle(rng);
                    keys
                })
                .collect();
            WorkingOrder {
                order,
                choice_orders,
            }
        }
        QuizDefinition::LabMultiPart(_) => WorkingOrder::default(),
    };

    QuizSession::create_fresh(source, session_key, container_id).with_working_order(working)
}
