use yew_router::prelude::*;

#[derive(Clone, Debug, Routable, PartialEq, Eq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/quiz/:id")]
    Quiz { id: String },
    #[at("/404")]
    #[not_found]
    NotFound,
}
