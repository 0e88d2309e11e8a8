//! Quiz definition model: the JSON shapes fetched from static assets.
//!
//! A definition file is a bare JSON array; which shape it holds is decided by
//! the catalog entry that names it, so parsing always takes a [`QuizModality`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Grading discipline of a quiz, serialized with the wire names used by the
/// persisted session record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuizModality {
    #[serde(rename = "mcq")]
    SingleChoice,
    #[serde(rename = "lab")]
    LabMultiPart,
}

impl QuizModality {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SingleChoice => "mcq",
            Self::LabMultiPart => "lab",
        }
    }
}

impl fmt::Display for QuizModality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuizModality {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mcq" => Ok(Self::SingleChoice),
            "lab" => Ok(Self::LabMultiPart),
            _ => Err(()),
        }
    }
}

/// Rationale text attached to a single-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ChoiceReasoning {
    /// Why the correct option is correct.
    #[serde(default)]
    pub correct: String,
    /// Per-option explanations of why the others are wrong.
    #[serde(default)]
    pub incorrect: BTreeMap<String, String>,
}

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceQuestion {
    pub question: String,
    /// Option key (e.g. "A") to option text.
    pub choices: BTreeMap<String, String>,
    pub correct_answer: String,
    #[serde(default)]
    pub reasoning: ChoiceReasoning,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_source: Option<String>,
}

impl ChoiceQuestion {
    /// Option keys in their canonical (sorted) order.
    #[must_use]
    pub fn choice_keys(&self) -> Vec<String> {
        self.choices.keys().cloned().collect()
    }
}

/// Structural flavor of a lab question block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LabQuestionKind {
    #[default]
    Standard,
    MatchingCaseStudy,
}

/// One numbered lab question block, containing either leaf sub-question parts
/// or case-study groups that each carry their own parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabQuestion {
    pub question_number: String,
    #[serde(rename = "type", default)]
    pub kind: LabQuestionKind,
    #[serde(default)]
    pub sub_questions: Vec<LabEntry>,
    #[serde(default)]
    pub note: Option<String>,
    /// Block-level rationale, used when a part has none of its own.
    #[serde(default)]
    pub reasoning: Option<String>,
}

impl LabQuestion {
    /// All gradable parts of this block, flattening case-study groups.
    pub fn parts(&self) -> impl Iterator<Item = &LabPart> {
        self.sub_questions.iter().flat_map(LabEntry::parts)
    }

    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts().count()
    }
}

/// A sub-question entry: either a case-study group or a leaf part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabEntry {
    CaseStudy(CaseStudy),
    Part(LabPart),
}

impl LabEntry {
    #[must_use]
    pub fn parts(&self) -> &[LabPart] {
        match self {
            Self::CaseStudy(case) => &case.parts,
            Self::Part(part) => std::slice::from_ref(part),
        }
    }
}

/// A case vignette grouping several parts under one narrative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudy {
    pub id: String,
    #[serde(rename = "case", default)]
    pub case_text: String,
    pub parts: Vec<LabPart>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// Answer modality of a lab part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabPartKind {
    ShortAnswer,
    MultiShortAnswer,
    Keywords,
}

/// One gradable lab part: a prompt plus one or more input blanks and the
/// answer key used to grade them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabPart {
    pub id: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(rename = "type")]
    pub kind: LabPartKind,
    #[serde(default)]
    pub fields: FieldSpec,
    #[serde(default)]
    pub answer: AnswerKey,
    /// Blank indices accepted without checking.
    #[serde(default)]
    pub accept_any: Vec<usize>,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_source: Option<String>,
}

impl LabPart {
    /// Number of input blanks this part renders and grades. Always at least
    /// one, matching the view's fallback for a missing or zero field count.
    #[must_use]
    pub fn blank_count(&self) -> usize {
        self.fields.count()
    }
}

/// Input blanks of a part: either a bare count or a list of field labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldSpec {
    Count(u32),
    Labels(Vec<String>),
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self::Count(1)
    }
}

impl FieldSpec {
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::Count(n) => (*n).max(1) as usize,
            Self::Labels(labels) => labels.len().max(1),
        }
    }

    /// Label for the blank at `index`, when the spec carries labels.
    #[must_use]
    pub fn label(&self, index: usize) -> Option<&str> {
        match self {
            Self::Count(_) => None,
            Self::Labels(labels) => labels.get(index).map(String::as_str),
        }
    }
}

/// Answer key of a lab part. The JSON is polymorphic: keyword specs are
/// objects, short answers are a string or a per-blank list whose entries are
/// themselves a string or an alternatives list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerKey {
    Keywords(KeywordSpec),
    Text(String),
    PerBlank(Vec<BlankKey>),
}

impl Default for AnswerKey {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

/// Required-keyword spec with a minimum match threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordSpec {
    /// Each entry may carry `|`-delimited synonyms.
    pub required_keywords: Vec<String>,
    #[serde(default)]
    pub required_count: Option<usize>,
}

impl KeywordSpec {
    /// Minimum number of keywords that must be found. Absent counts require
    /// every keyword.
    #[must_use]
    pub fn threshold(&self) -> usize {
        self.required_count
            .unwrap_or_else(|| self.required_keywords.len())
    }
}

/// Accepted answer(s) for a single blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlankKey {
    Text(String),
    Alternatives(Vec<String>),
}

impl BlankKey {
    #[must_use]
    pub fn accepted(&self) -> &[String] {
        match self {
            Self::Text(text) => std::slice::from_ref(text),
            Self::Alternatives(list) => list,
        }
    }
}

/// A parsed quiz definition: the immutable source of truth for one quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizDefinition {
    SingleChoice(Vec<ChoiceQuestion>),
    LabMultiPart(Vec<LabQuestion>),
}

impl QuizDefinition {
    /// Parse a definition file's JSON array under the given modality.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into that shape.
    pub fn from_json(modality: QuizModality, json: &str) -> Result<Self, serde_json::Error> {
        match modality {
            QuizModality::SingleChoice => serde_json::from_str(json).map(Self::SingleChoice),
            QuizModality::LabMultiPart => serde_json::from_str(json).map(Self::LabMultiPart),
        }
    }

    #[must_use]
    pub const fn modality(&self) -> QuizModality {
        match self {
            Self::SingleChoice(_) => QuizModality::SingleChoice,
            Self::LabMultiPart(_) => QuizModality::LabMultiPart,
        }
    }

    /// Number of top-level question entries in the definition file.
    #[must_use]
    pub fn question_count(&self) -> usize {
        match self {
            Self::SingleChoice(questions) => questions.len(),
            Self::LabMultiPart(blocks) => blocks.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.question_count() == 0
    }

    /// Count of gradable atomic units: one per single-choice question, one
    /// per part for lab blocks (flattening case-study groups).
    #[must_use]
    pub fn total_items(&self) -> usize {
        match self {
            Self::SingleChoice(questions) => questions.len(),
            Self::LabMultiPart(blocks) => blocks.iter().map(LabQuestion::part_count).sum(),
        }
    }

    #[must_use]
    pub fn choice_questions(&self) -> Option<&[ChoiceQuestion]> {
        match self {
            Self::SingleChoice(questions) => Some(questions),
            Self::LabMultiPart(_) => None,
        }
    }

    #[must_use]
    pub fn lab_questions(&self) -> Option<&[LabQuestion]> {
        match self {
            Self::SingleChoice(_) => None,
            Self::LabMultiPart(blocks) => Some(blocks),
        }
    }

    /// Look up a lab block by its question number.
    #[must_use]
    pub fn find_block(&self, question_number: &str) -> Option<&LabQuestion> {
        self.lab_questions()?
            .iter()
            .find(|block| block.question_number == question_number)
    }

    /// Empty single-choice definition (useful for tests).
    #[must_use]
    pub fn empty(modality: QuizModality) -> Self {
        match modality {
            QuizModality::SingleChoice => Self::SingleChoice(Vec::new()),
            QuizModality::LabMultiPart => Self::LabMultiPart(Vec::new()),
        }
    }
}
