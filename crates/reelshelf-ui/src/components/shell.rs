//! Page chrome: header with the sidebar button and theme toggle, plus the
//! not-found view.

use crate::app::Route;
use crate::components::atoms::EmptyState;
use crate::store::AppStore;
use reelshelf_core::AppContext;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

#[function_component(ShelfHeader)]
pub(crate) fn shelf_header() -> Html {
    let context = use_context::<AppContext>();
    let theme = use_selector(|store: &AppStore| store.preferences.theme);
    let dispatch = Dispatch::<AppStore>::new();

    let open_sidebar = {
        let dispatch = dispatch.clone();
        Callback::from(move |_: MouseEvent| dispatch.reduce_mut(|store| store.sidebar.open()))
    };
    let cycle_theme = Callback::from(move |_: MouseEvent| {
        let Some(context) = context.as_ref() else {
            return;
        };
        let next = context.preferences.cycle_theme();
        dispatch.reduce_mut(|store| store.preferences.theme = next);
    });

    html! {
        <header class="site-header">
            <button class="menu-btn" aria-label="Open navigation" onclick={open_sidebar}>
                {"☰"}
            </button>
            <Link<Route> to={Route::Home} classes="site-title">{"Reelshelf"}</Link<Route>>
            <button
                class="theme-toggle"
                aria-label={theme.toggle_label()}
                onclick={cycle_theme}
            >
                {theme.icon()}
            </button>
        </header>
    }
}

#[function_component(NotFoundPage)]
pub(crate) fn not_found_page() -> Html {
    html! {
        <EmptyState title="Page not found." class="not-found">
            <Link<Route> to={Route::Home}>{"Return to the home page"}</Link<Route>>
        </EmptyState>
    }
}
