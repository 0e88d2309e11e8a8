//! Reshuffle properties: permutation soundness, preserved identity, and
//! deterministic seeding.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use topaz_quiz::{QuizDefinition, QuizModality, QuizSession, reshuffle};

const MCQ_JSON: &str = r#"[
    {"question": "Q1", "choices": {"A": "a", "B": "b", "C": "c", "D": "d"}, "correctAnswer": "A"},
    {"question": "Q2", "choices": {"A": "a", "B": "b", "C": "c", "D": "d"}, "correctAnswer": "B"},
    {"question": "Q3", "choices": {"A": "a", "B": "b", "C": "c", "D": "d"}, "correctAnswer": "C"},
    {"question": "Q4", "choices": {"A": "a", "B": "b", "C": "c", "D": "d"}, "correctAnswer": "D"},
    {"question": "Q5", "choices": {"A": "a", "B": "b", "C": "c", "D": "d"}, "correctAnswer": "A"},
    {"question": "Q6", "choices": {"A": "a", "B": "b", "C": "c", "D": "d"}, "correctAnswer": "B"},
    {"question": "Q7", "choices": {"A": "a", "B": "b", "C": "c", "D": "d"}, "correctAnswer": "C"},
    {"question": "Q8", "choices": {"A": "a", "B": "b", "C": "c", "D": "d"}, "correctAnswer": "D"}
]"#;

fn session() -> QuizSession {
    let def = QuizDefinition::from_json(QuizModality::SingleChoice, MCQ_JSON).unwrap();
    QuizSession::create_fresh(def, "epi2.json", "epiQuizContainer")
}

#[test]
fn reshuffle_preserves_items_and_permutes_order() {
    let mut rng = ChaCha20Rng::seed_from_u64(0xBEEF);
    let shuffled = reshuffle(session(), &mut rng);

    assert_eq!(shuffled.total_items(), 8);
    assert_eq!(shuffled.answered(), 0);
    assert_eq!(shuffled.session_key(), "epi2.json");

    // The order is a permutation of the source indices.
    let mut order = shuffled.working_order().order.clone();
    order.sort_unstable();
    assert_eq!(order, (0..8).collect::<Vec<_>>());

    // The multiset of question texts is unchanged.
    let mut texts: Vec<&str> = shuffled
        .working_items()
        .map(|item| item.question.question.as_str())
        .collect();
    texts.sort_unstable();
    let mut source_texts: Vec<&str> = shuffled
        .source()
        .choice_questions()
        .unwrap()
        .iter()
        .map(|question| question.question.as_str())
        .collect();
    source_texts.sort_unstable();
    assert_eq!(texts, source_texts);
}

#[test]
fn choice_orders_are_permutations_of_each_questions_keys() {
    let mut rng = ChaCha20Rng::seed_from_u64(42);
    let shuffled = reshuffle(session(), &mut rng);

    for item in shuffled.working_items() {
        let mut keys = item.choice_order.to_vec();
        keys.sort_unstable();
        assert_eq!(keys, item.question.choice_keys());
    }
}

#[test]
fn same_seed_reproduces_the_same_order() {
    let mut rng_a = ChaCha20Rng::seed_from_u64(7);
    let mut rng_b = ChaCha20Rng::seed_from_u64(7);
    let first = reshuffle(session(), &mut rng_a);
    let second = reshuffle(session(), &mut rng_b);
    assert_eq!(first.working_order(), second.working_order());
}

#[test]
fn some_seed_moves_items_away_from_identity() {
    let identity: Vec<usize> = (0..8).collect();
    let moved = (1..=5).any(|seed| {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        reshuffle(session(), &mut rng).working_order().order != identity
    });
    assert!(moved, "five seeded shuffles all landed on identity order");
}

#[test]
fn prior_answers_do_not_survive_a_reshuffle() {
    let mut before = session();
    before.submit_choice(0, "B", false);
    before.submit_choice(1, "B", false);
    assert_eq!(before.answered(), 2);

    let mut rng = ChaCha20Rng::seed_from_u64(3);
    let shuffled = reshuffle(before, &mut rng);
    assert_eq!(shuffled.answered(), 0);
    assert_eq!(shuffled.correct(), 0);
    assert!(!shuffled.has_incorrect());
}
