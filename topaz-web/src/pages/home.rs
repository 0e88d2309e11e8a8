use yew::prelude::*;
use yew_router::prelude::*;

use crate::catalog::CATALOG;
use crate::router::Route;

/// Lecture list: one entry per catalog quiz.
#[function_component(HomePage)]
pub fn home_page() -> Html {
    let entries = CATALOG
        .iter()
        .map(|info| {
            html! {
                <li class="lecture-btn" key={info.id}>
                    <Link<Route> to={Route::Quiz { id: info.id.to_string() }}>
                        <span class="lecture-title">{ info.title }</span>
                        <span class="lecture-subtitle">{ info.subtitle }</span>
                    </Link<Route>>
                </li>
            }
        })
        .collect::<Html>();

    html! {
        <div class="lecture-list" data-testid="home-screen">
            <p class="lecture-intro">{ "Pick a lecture to start its quiz." }</p>
            <ul>{ entries }</ul>
        </div>
    }
}
