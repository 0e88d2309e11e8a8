use topaz_quiz::{ChoiceQuestion, ItemRecord, Outcome};
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct ChoiceCardProps {
    /// 1-based display number in the current working order.
    pub number: usize,
    /// Stable identity: index into the source definition.
    pub source_index: usize,
    pub question: ChoiceQuestion,
    /// Option keys in display order.
    pub choice_order: Vec<String>,
    /// Current record for this item; absent while unchecked.
    #[prop_or_default]
    pub record: Option<ItemRecord>,
    /// Emits (source index, selected option key).
    pub on_check: Callback<(usize, String)>,
}

/// One multiple-choice question card: radio options, a check button that
/// disables after grading, and the rationale panel.
#[function_component(ChoiceCard)]
pub fn choice_card(props: &ChoiceCardProps) -> Html {
    let selected = use_state(|| None::<String>);
    let graded = props
        .record
        .as_ref()
        .is_some_and(|record| record.status.is_checked());
    let submitted = props
        .record
        .as_ref()
        .and_then(|record| record.submitted.first().cloned());

    // A retry reset clears the record; drop the stale radio selection too.
    {
        let selected = selected.clone();
        use_effect_with(props.record.clone(), move |record| {
            if record.is_none() {
                selected.set(None);
            }
        });
    }

    let onchange = {
        let selected = selected.clone();
        Callback::from(move |event: Event| {
            let input: HtmlInputElement = event.target_unchecked_into();
            selected.set(Some(input.value()));
        })
    };
    let on_check = {
        let on_check = props.on_check.clone();
        let selected = selected.clone();
        let source_index = props.source_index;
        Callback::from(move |_: MouseEvent| {
            if let Some(value) = (*selected).clone() {
                on_check.emit((source_index, value));
            }
        })
    };

    let image = props
        .question
        .image_url
        .as_ref()
        .map(|url| {
            let source = props.question.image_source.as_ref().map(|source| {
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

    let options = props
        .choice_order
        .iter()
        .map(|key| {
            let text = props
                .question
                .choices
                .get(key)
                .cloned()
                .unwrap_or_default();
            let is_submitted = submitted.as_deref() == Some(key.as_str());
            let is_answer = *key == props.question.correct_answer;
            let outcome_class = if graded {
                option_class(is_answer, is_submitted)
            } else {
                None
            };
            let class = classes!("quiz-option", outcome_class);
            let checked = if graded {
                is_submitted
            } else {
                (*selected).as_deref() == Some(key.as_str())
            };
            html! {
                <label {class}>
                    <input
                        type="radio"
                        name={format!("question-{}", props.source_index)}
                        value={key.clone()}
                        {checked}
                        disabled={graded}
                        onchange={onchange.clone()}
                    />
                    <span class="option-key">{ format!("{key}.") }</span>
                    { " " }{ text }
                </label>
            }
        })
        .collect::<Html>();

    let feedback = props
        .record
        .as_ref()
        .filter(|record| record.status.is_checked())
        .map(|record| reasoning_panel(&props.question, record.status))
        .unwrap_or_default();

    html! {
        <div class="question-card" data-original-index={props.source_index.to_string()}>
            <h2 class="question-heading">
                <span class="question-number">{ format!("Question {}:", props.number) }</span>
                { " " }{ props.question.question.clone() }
            </h2>
            { image }
            <div class="choices">{ options }</div>
            <button class="check-btn" disabled={graded} onclick={on_check}>
                { "Check Answer" }
            </button>
            { feedback }
        </div>
    }
}

const fn option_class(is_answer: bool, is_submitted: bool) -> Option<&'static str> {
    if is_answer {
        Some("option-correct")
    } else if is_submitted {
        Some("option-incorrect")
    } else {
        None
    }
}

fn reasoning_panel(question: &ChoiceQuestion, outcome: Outcome) -> Html {
    let incorrect_reasons = question
        .reasoning
        .incorrect
        .iter()
        .filter(|(key, _)| **key != question.correct_answer)
        .map(|(key, reason)| {
            html! { <li><b>{ format!("Why '{key}' is incorrect:") }</b>{ " " }{ reason.clone() }</li> }
        })
        .collect::<Html>();

    let (title, class, lead) = if outcome == Outcome::Correct {
        ("Correct!", "reasoning reasoning-correct", String::new())
    } else {
        (
            "Incorrect",
            "reasoning reasoning-incorrect",
            format!("The correct answer is {}. ", question.correct_answer),
        )
    };

    html! {
        <div {class}>
            <h3>{ title }</h3>
            <p>{ lead }{ question.reasoning.correct.clone() }</p>
            <h4>{ "Why other choices are incorrect:" }</h4>
            <ul>{ incorrect_reasons }</ul>
        </div>
    }
}
