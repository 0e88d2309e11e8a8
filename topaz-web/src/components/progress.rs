use topaz_quiz::{ProgressSnapshot, QuizModality};
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct ProgressTrackerProps {
    pub snapshot: ProgressSnapshot,
    pub modality: QuizModality,
    pub on_retry_all: Callback<()>,
    pub on_retry_incorrect: Callback<()>,
    /// Only offered for single-choice quizzes.
    #[prop_or_default]
    pub on_reshuffle: Option<Callback<()>>,
}

/// The visible progress tracker: counters, fill bar, and the retry controls.
#[function_component(ProgressTracker)]
pub fn progress_tracker(props: &ProgressTrackerProps) -> Html {
    let snapshot = props.snapshot;
    let fill_style = format!("width: {:.0}%", snapshot.percent);

    let on_retry_all = {
        let on_retry_all = props.on_retry_all.clone();
        Callback::from(move |_: MouseEvent| on_retry_all.emit(()))
    };
    let on_retry_incorrect = {
        let on_retry_incorrect = props.on_retry_incorrect.clone();
        Callback::from(move |_: MouseEvent| on_retry_incorrect.emit(()))
    };
    let reshuffle_button = props
        .on_reshuffle
        .as_ref()
        .filter(|_| props.modality == QuizModality::SingleChoice)
        .map(|on_reshuffle| {
            let on_reshuffle = on_reshuffle.clone();
            let onclick = Callback::from(move |_: MouseEvent| on_reshuffle.emit(()));
            html! {
                <button id="reshuffle-btn" class="retry-button" {onclick}>
                    { "Shuffle & Restart" }
                </button>
            }
        })
        .unwrap_or_default();

    html! {
        <div id="progress-tracker" class="progress-tracker">
            <div class="progress-stats">
                <span>{ "Answered " }<b id="answered-count">{ snapshot.answered }</b>
                    { " / " }<b id="total-count">{ snapshot.total }</b></span>
                <span class="stat-correct">{ "Correct " }<b id="correct-count">{ snapshot.correct }</b></span>
                <span class="stat-incorrect">{ "Incorrect " }<b id="incorrect-count">{ snapshot.incorrect }</b></span>
                <span>{ "Remaining " }<b id="remaining-count">{ snapshot.remaining }</b></span>
            </div>
            <div class="progress-bar">
                <div id="progress-bar-fill" class="progress-bar-fill" style={fill_style}></div>
            </div>
            <div id="retry-buttons" class="retry-buttons">
                <button id="retry-btn" class="retry-button" onclick={on_retry_all}>
                    { "Retry Quiz" }
                </button>
                <button
                    id="retry-incorrect-btn"
                    class="retry-button"
                    disabled={!snapshot.has_incorrect}
                    onclick={on_retry_incorrect}
                >
                    { "Retry Incorrect" }
                </button>
                { reshuffle_button }
            </div>
        </div>
    }
}
