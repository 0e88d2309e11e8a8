//! Pure correctness deciders, one per answer modality.
//!
//! Nothing here touches session counters; the session's submit operations are
//! the only place an outcome is recorded.

use crate::data::{AnswerKey, ChoiceQuestion, LabPart};
use crate::session::Outcome;

/// Canonical form used for all text comparison: trimmed and case-folded.
#[must_use]
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Correct iff the submitted option key equals the question's answer key.
#[must_use]
pub fn grade_single_choice(question: &ChoiceQuestion, submitted: &str) -> Outcome {
    if submitted == question.correct_answer {
        Outcome::Correct
    } else {
        Outcome::Incorrect
    }
}

/// Grade a short-answer part: every blank must pass.
///
/// A blank flagged accept-any passes trivially. Otherwise the normalized
/// submission must *contain* one of the blank's accepted answers (substring
/// containment is deliberate leniency: supersets of the accepted phrase also
/// pass).
#[must_use]
pub fn grade_short_answer(part: &LabPart, submitted: &[String]) -> Outcome {
    for index in 0..part.blank_count() {
        if part.accept_any.contains(&index) {
            continue;
        }
        let value = normalize(submitted.get(index).map_or("", String::as_str));
        let accepted = accepted_for_blank(&part.answer, index);
        let hit = accepted
            .iter()
            .any(|answer| !answer.is_empty() && value.contains(&normalize(answer)));
        if !hit {
            return Outcome::Incorrect;
        }
    }
    Outcome::Correct
}

/// Grade a keyword part: correct iff the number of required keywords found
/// across all submitted values reaches the spec's threshold. A keyword counts
/// as found when any of its `|`-delimited synonyms is a substring of any
/// non-empty submitted value.
#[must_use]
pub fn grade_keywords(part: &LabPart, submitted: &[String]) -> Outcome {
    let AnswerKey::Keywords(spec) = &part.answer else {
        return Outcome::Incorrect;
    };

    let values: Vec<String> = submitted
        .iter()
        .map(|value| normalize(value))
        .filter(|value| !value.is_empty())
        .collect();

    let found = spec
        .required_keywords
        .iter()
        .filter(|keyword| {
            keyword
                .to_lowercase()
                .split('|')
                .any(|synonym| values.iter().any(|value| value.contains(synonym)))
        })
        .count();

    if found >= spec.threshold() {
        Outcome::Correct
    } else {
        Outcome::Incorrect
    }
}

/// Accepted answers for one blank of a short-answer key.
///
/// A bare string applies to every blank. A per-blank list resolves by index;
/// past its end the whole list collapses into one alternatives set, matching
/// the original data's fallback behavior.
#[must_use]
pub fn accepted_for_blank(answer: &AnswerKey, index: usize) -> Vec<&str> {
    match answer {
        AnswerKey::Text(text) => vec![text.as_str()],
        AnswerKey::PerBlank(blanks) => match blanks.get(index) {
            Some(blank) => blank.accepted().iter().map(String::as_str).collect(),
            None => blanks
                .iter()
                .flat_map(|blank| blank.accepted())
                .map(String::as_str)
                .collect(),
        },
        AnswerKey::Keywords(_) => Vec::new(),
    }
}

/// Display form of a part's accepted answer: the first alternative per blank
/// (first `|`-synonym for keyword-style strings), joined with " / ".
#[must_use]
pub fn accepted_answer_display(part: &LabPart) -> String {
    match &part.answer {
        AnswerKey::Text(text) => first_alternative(text).to_string(),
        AnswerKey::PerBlank(blanks) => blanks
            .iter()
            .map(|blank| {
                blank
                    .accepted()
                    .first()
                    .map_or("", |answer| first_alternative(answer))
            })
            .collect::<Vec<_>>()
            .join(" / "),
        AnswerKey::Keywords(spec) => spec
            .required_keywords
            .iter()
            .map(|keyword| first_alternative(keyword))
            .collect::<Vec<_>>()
            .join(" / "),
    }
}

fn first_alternative(answer: &str) -> &str {
    answer.split('|').next().unwrap_or(answer)
}
