use yew::prelude::*;
use yew_router::prelude::*;

use crate::pages::home::HomePage;
use crate::pages::quiz::QuizPage;
use crate::router::Route;
use crate::{catalog, storage};

fn switch(route: Route) -> Html {
    match route {
        Route::Home => html! { <HomePage /> },
        Route::Quiz { id } => html! { <QuizPage {id} /> },
        Route::NotFound => html! { <crate::components::placeholder::NotAvailable /> },
    }
}

/// Runs once per page load: jump back to the last-visited quiz, if any.
/// Restores navigation position only; graded state rehydrates on the quiz
/// page itself.
#[function_component(Bootstrap)]
fn bootstrap() -> Html {
    let navigator = use_navigator();
    use_effect_with((), move |_| {
        if let Some(navigator) = navigator
            && let Some(last) = storage::load_last_visited()
            && last.quiz_file.is_some()
            && catalog::find(&last.page_id).is_some()
        {
            navigator.push(&Route::Quiz { id: last.page_id });
        }
    });
    Html::default()
}

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <BrowserRouter>
            <Bootstrap />
            <header class="app-header">
                <h1 class="app-title">{ "Topaz" }</h1>
                <p class="app-subtitle">{ "Medical quiz platform" }</p>
            </header>
            <main id="main-content">
                <Switch<Route> render={switch} />
            </main>
        </BrowserRouter>
    }
}
