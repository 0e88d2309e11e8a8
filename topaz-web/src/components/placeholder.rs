use yew::prelude::*;

/// Shown when a quiz definition cannot be fetched or is empty.
#[function_component(NotAvailable)]
pub fn not_available() -> Html {
    html! {
        <div class="placeholder-card" data-testid="quiz-placeholder">
            <h2>{ "Not Available" }</h2>
            <p>{ "(Content not yet available)" }</p>
        </div>
    }
}
