//! Routing definitions for the Reelshelf UI.
use reelshelf_core::gallery::Navigation;
use yew_router::prelude::*;

#[derive(Clone, Routable, PartialEq, Eq, Debug)]
pub(crate) enum Route {
    #[at("/")]
    Home,
    #[at("/movie/:index")]
    Movie { index: String },
    #[at("/season/:index")]
    Season { index: String },
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl From<Navigation> for Route {
    fn from(target: Navigation) -> Self {
        match target {
            Navigation::Movie(index) => Self::Movie {
                index: index.to_string(),
            },
            Navigation::Season(index) => Self::Season {
                index: index.to_string(),
            },
        }
    }
}
