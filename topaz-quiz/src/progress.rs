//! Aggregate progress: the consumer contract for the visible tracker.

use crate::session::QuizSession;

/// Snapshot of a session's aggregate state, shaped for display. Derived, not
/// stored; recompute after every mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub remaining: usize,
    /// Answered share in percent, 0.0 for an empty quiz.
    pub percent: f32,
    /// Whether "retry incorrect" has anything to act on.
    pub has_incorrect: bool,
}

impl QuizSession {
    #[must_use]
    pub fn progress(&self) -> ProgressSnapshot {
        let total = self.total_items();
        let answered = self.answered();
        #[allow(clippy::cast_precision_loss)]
        let percent = if total == 0 {
            0.0
        } else {
            answered as f32 / total as f32 * 100.0
        };
        ProgressSnapshot {
            total,
            answered,
            correct: self.correct(),
            incorrect: self.incorrect(),
            remaining: total - answered,
            percent,
            has_incorrect: self.has_incorrect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{QuizDefinition, QuizModality};

    #[test]
    fn snapshot_tracks_counts_and_percent() {
        let json = r#"[
            {"question": "Q1", "choices": {"A": "a", "B": "b"}, "correctAnswer": "A"},
            {"question": "Q2", "choices": {"A": "a", "B": "b"}, "correctAnswer": "B"},
            {"question": "Q3", "choices": {"A": "a", "B": "b"}, "correctAnswer": "A"},
            {"question": "Q4", "choices": {"A": "a", "B": "b"}, "correctAnswer": "B"}
        ]"#;
        let def = QuizDefinition::from_json(QuizModality::SingleChoice, json).unwrap();
        let mut session = QuizSession::create_fresh(def, "quiz.json", "quizContainer");
        session.submit_choice(0, "A", false);
        session.submit_choice(1, "A", false);

        let snapshot = session.progress();
        assert_eq!(snapshot.total, 4);
        assert_eq!(snapshot.answered, 2);
        assert_eq!(snapshot.correct, 1);
        assert_eq!(snapshot.incorrect, 1);
        assert_eq!(snapshot.remaining, 2);
        assert!((snapshot.percent - 50.0).abs() < f32::EPSILON);
        assert!(snapshot.has_incorrect);
    }

    #[test]
    fn empty_definition_yields_zero_percent() {
        let def = QuizDefinition::empty(QuizModality::SingleChoice);
        let session = QuizSession::create_fresh(def, "quiz.json", "quizContainer");
        let snapshot = session.progress();
        assert_eq!(snapshot.total, 0);
        assert!((snapshot.percent - 0.0).abs() < f32::EPSILON);
    }
}
