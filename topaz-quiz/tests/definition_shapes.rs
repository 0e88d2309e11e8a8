//! Wire-format checks: definition parsing against realistic files and the
//! stability of the persisted session record's JSON shape.

use std::hash::Hasher;

use serde_json::Value;
use topaz_quiz::{
    AnswerSheet, QuizDefinition, QuizModality, QuizSession, SavedSession,
};
use twox_hash::XxHash64;

const PHARMA_JSON: &str = r#"[
    {
        "question": "A patient on warfarin starts TMP-SMX. INR rises. Mechanism?",
        "choices": {
            "A": "CYP2C9 inhibition",
            "B": "Protein binding displacement only",
            "C": "Vitamin K supplementation",
            "D": "Increased warfarin clearance"
        },
        "correctAnswer": "A",
        "reasoning": {
            "correct": "TMP-SMX inhibits CYP2C9, reducing warfarin metabolism.",
            "incorrect": {
                "B": "Displacement alone is transient.",
                "C": "Would lower, not raise, the INR.",
                "D": "Clearance decreases, not increases."
            }
        }
    },
    {
        "question": "Identify the organism in the photomicrograph.",
        "choices": {"A": "Aspergillus", "B": "Mucor", "C": "Candida"},
        "correctAnswer": "B",
        "reasoning": {"correct": "Broad, ribbon-like nonseptate hyphae.", "incorrect": {"A": "Septate, acute angles.", "C": "Yeast with pseudohyphae."}},
        "imageUrl": "assets/mucor.jpg",
        "imageSource": "CDC PHIL"
    }
]"#;

const LAB_JSON: &str = r#"[
    {
        "questionNumber": "3",
        "note": "Answer all parts before checking.",
        "subQuestions": [
            {"id": "3a", "prompt": "Stain used for acid-fast bacilli?", "type": "short_answer",
             "answer": "ziehl-neelsen", "reasoning": "Carbol fuchsin retained after acid-alcohol."},
            {"id": "3b", "prompt": "Name two culture media.", "type": "multi_short_answer",
             "fields": ["Medium 1", "Medium 2"],
             "answer": [["lowenstein-jensen", "lj"], ["middlebrook"]],
             "acceptAny": []}
        ]
    },
    {
        "questionNumber": "4",
        "type": "matching_case_study",
        "subQuestions": [
            {
                "id": "Case A",
                "case": "Returned traveler with cyclic fevers.",
                "parts": [
                    {"id": "4a", "prompt": "Diagnostic test?", "type": "keywords",
                     "answer": {"requiredKeywords": ["thick|thin", "smear|film"], "requiredCount": 2}}
                ],
                "reasoning": "Malaria is confirmed by serial blood smears."
            }
        ]
    }
]"#;

fn snapshot_hash(bytes: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(bytes);
    hasher.finish()
}

#[test]
fn realistic_definitions_parse_and_flatten() {
    let pharma = QuizDefinition::from_json(QuizModality::SingleChoice, PHARMA_JSON).unwrap();
    assert_eq!(pharma.question_count(), 2);
    assert_eq!(pharma.total_items(), 2);
    let questions = pharma.choice_questions().unwrap();
    assert_eq!(questions[1].image_source.as_deref(), Some("CDC PHIL"));

    let lab = QuizDefinition::from_json(QuizModality::LabMultiPart, LAB_JSON).unwrap();
    assert_eq!(lab.question_count(), 2);
    assert_eq!(lab.total_items(), 3);
    let block = lab.find_block("4").unwrap();
    assert_eq!(block.parts().count(), 1);
}

#[test]
fn saved_record_uses_the_persisted_wire_names() {
    let lab = QuizDefinition::from_json(QuizModality::LabMultiPart, LAB_JSON).unwrap();
    let mut session = QuizSession::create_fresh(lab, "micro_lab.json", "labQuizContainer");
    let mut sheet = AnswerSheet::new();
    sheet.insert("3a".to_string(), vec!["Ziehl-Neelsen stain".to_string()]);
    sheet.insert(
        "3b".to_string(),
        vec!["LJ".to_string(), "middlebrook 7H10".to_string()],
    );
    session.submit_lab_block("3", &sheet, false);

    let json = serde_json::to_string(&session.to_saved()).unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.get("type").and_then(Value::as_str), Some("lab"));
    assert_eq!(object.get("totalQuestions").and_then(Value::as_u64), Some(3));
    assert!(object.contains_key("answers"));
    assert!(!object.contains_key("userAnswers"));
    assert_eq!(
        object.get("quizFile").and_then(Value::as_str),
        Some("micro_lab.json")
    );
    assert_eq!(
        object.get("containerId").and_then(Value::as_str),
        Some("labQuizContainer")
    );
    let record = &value["answers"]["3a"];
    assert_eq!(record["status"].as_str(), Some("correct"));
    assert_eq!(record["userAnswer"][0].as_str(), Some("Ziehl-Neelsen stain"));
}

#[test]
fn saved_record_serialization_is_stable() {
    let pharma = QuizDefinition::from_json(QuizModality::SingleChoice, PHARMA_JSON).unwrap();
    let mut session = QuizSession::create_fresh(pharma, "pharma4.json", "pharmaQuizContainer");
    session.submit_choice(0, "A", false);
    session.submit_choice(1, "C", false);

    let first = serde_json::to_string(&session.to_saved()).unwrap();
    let reparsed: SavedSession = serde_json::from_str(&first).unwrap();
    let second = serde_json::to_string(&reparsed).unwrap();

    // One decode/encode cycle is lossless and byte-stable.
    assert_eq!(snapshot_hash(first.as_bytes()), snapshot_hash(second.as_bytes()));
    assert_eq!(reparsed, session.to_saved());
}
