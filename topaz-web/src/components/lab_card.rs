use std::collections::BTreeMap;

use topaz_quiz::{
    AnswerSheet, ItemRecord, LabEntry, LabPart, LabPartKind, LabQuestion, Outcome,
    accepted_answer_display,
};
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct LabCardProps {
    pub block: LabQuestion,
    /// Current record per part id; parts absent here are unchecked.
    pub records: BTreeMap<String, ItemRecord>,
    /// Emits (question number, the draft answer sheet).
    pub on_check: Callback<(String, AnswerSheet)>,
}

/// One lab question block: its sub-question parts (flattened case studies
/// included), input blanks, a single check button, and per-part rationale
/// after grading.
#[function_component(LabCard)]
pub fn lab_card(props: &LabCardProps) -> Html {
    let sheet = use_state(AnswerSheet::new);

    // Grading or a retry reset changes the record set; drafts are stale
    // either way (graded inputs render from the record, reset ones empty).
    {
        let sheet = sheet.clone();
        use_effect_with(props.records.clone(), move |_| sheet.set(AnswerSheet::new()));
    }

    let records = &props.records;
    let block_graded = props
        .block
        .parts()
        .all(|part| graded(records, part).is_some());

    let on_check = {
        let on_check = props.on_check.clone();
        let sheet = sheet.clone();
        let number = props.block.question_number.clone();
        Callback::from(move |_: MouseEvent| {
            on_check.emit((number.clone(), (*sheet).clone()));
        })
    };

    let part_html = |part: &LabPart| -> Html {
        let record = graded(records, part);
        let graded = record.is_some();
        let outcome = record.map_or(Outcome::Unchecked, |record| record.status);

        let blanks = (0..part.blank_count())
            .map(|index| {
                let value = if graded {
                    record
                        .and_then(|record| record.submitted.get(index))
                        .cloned()
                        .unwrap_or_default()
                } else {
                    (*sheet)
                        .get(&part.id)
                        .and_then(|values| values.get(index))
                        .cloned()
                        .unwrap_or_default()
                };
                let oninput = {
                    let sheet = sheet.clone();
                    let id = part.id.clone();
                    let blank_count = part.blank_count();
                    Callback::from(move |event: InputEvent| {
                        let input: HtmlInputElement = event.target_unchecked_into();
                        let mut next = (*sheet).clone();
                        let values = next
                            .entry(id.clone())
                            .or_insert_with(|| vec![String::new(); blank_count]);
                        if values.len() < blank_count {
                            values.resize(blank_count, String::new());
                        }
                        values[index] = input.value();
                        sheet.set(next);
                    })
                };
                let class = classes!("lab-input", outcome_border(outcome));
                let field = html! {
                    <input
                        type="text"
                        data-id={part.id.clone()}
                        {class}
                        {value}
                        disabled={graded}
                        {oninput}
                    />
                };
                match part.fields.label(index) {
                    Some(label) => html! {
                        <label class="lab-field">
                            <span class="lab-field-label">{ label.to_string() }</span>
                            { field }
                        </label>
                    },
                    None => field,
                }
            })
            .collect::<Html>();

        let image = part
            .image_url
            .as_ref()
            .map(|url| {
                let source = part.image_source.as_ref().map(|source| {
                    html! { <p class="image-source">{ format!("Source: {source}") }</p> }
                });
                html! {
                    <div class="question-image">
                        <img src={url.clone()} alt="Question Image" />
                        { source.unwrap_or_default() }
                    </div>
                }
            })
            .unwrap_or_default();

        let feedback = if graded {
            part_feedback(part, &props.block, outcome)
        } else {
            Html::default()
        };

        html! {
            <div class="sub-question" data-id={part.id.clone()}>
                <label class="sub-question-prompt">
                    { format!("{}: {}", part.id, part.prompt) }
                </label>
                { image }
                <div class="lab-fields">{ blanks }</div>
                { feedback }
            </div>
        }
    };

    let entries = props
        .block
        .sub_questions
        .iter()
        .map(|entry| match entry {
            LabEntry::CaseStudy(case) => {
                let parts = case.parts.iter().map(|part| part_html(part)).collect::<Html>();
                let all_graded = case.parts.iter().all(|part| graded(records, part).is_some());
                let rationale = case
                    .reasoning
                    .as_ref()
                    .filter(|_| all_graded)
                    .map(|reasoning| {
                        html! {
                            <div class="reasoning-main">
                                <p><b>{ "Case Rationale:" }</b></p>
                                <p>{ reasoning.clone() }</p>
                            </div>
                        }
                    })
                    .unwrap_or_default();
                html! {
                    <div class="sub-question case-study" data-id={case.id.clone()}>
                        <p class="case-text">
                            <b>{ format!("{}: ", case.id) }</b>{ case.case_text.clone() }
                        </p>
                        { parts }
                        { rationale }
                    </div>
                }
            }
            LabEntry::Part(part) => part_html(part),
        })
        .collect::<Html>();

    let note = props
        .block
        .note
        .as_ref()
        .map(|note| html! { <p class="block-note">{ note.clone() }</p> })
        .unwrap_or_default();

    html! {
        <div class="lab-question-card" data-question-number={props.block.question_number.clone()}>
            <h2 class="block-heading">{ format!("Question {}", props.block.question_number) }</h2>
            { note }
            <div class="sub-questions">{ entries }</div>
            <button
                class="check-lab-btn"
                disabled={block_graded}
                onclick={on_check}
            >
                { "Check" }
            </button>
        </div>
    }
}

fn graded<'a>(records: &'a BTreeMap<String, ItemRecord>, part: &LabPart) -> Option<&'a ItemRecord> {
    records
        .get(&part.id)
        .filter(|record| record.status.is_checked())
}

const fn outcome_border(outcome: Outcome) -> Option<&'static str> {
    match outcome {
        Outcome::Unchecked => None,
        Outcome::Correct => Some("border-correct"),
        Outcome::Incorrect => Some("border-incorrect"),
    }
}

fn part_feedback(part: &LabPart, block: &LabQuestion, outcome: Outcome) -> Html {
    let class = classes!(
        "reasoning",
        if outcome == Outcome::Correct {
            "reasoning-correct"
        } else {
            "reasoning-incorrect"
        }
    );
    // Keyword parts explain rather than reveal; short answers show the
    // accepted answer's display form first.
    let body = if matches!(part.kind, LabPartKind::Keywords) {
        let text = part
            .reasoning
            .clone()
            .or_else(|| block.reasoning.clone())
            .unwrap_or_default();
        html! { <p>{ text }</p> }
    } else {
        let reasoning = part
            .reasoning
            .as_ref()
            .map(|reasoning| html! { <p>{ reasoning.clone() }</p> })
            .unwrap_or_default();
        html! {
            <>
                <p>
                    <b>{ "Correct Answer: " }</b>
                    <span class="accepted-answer">{ accepted_answer_display(part) }</span>
                </p>
                { reasoning }
            </>
        }
    };
    html! { <div {class}>{ body }</div> }
}
