//! Slide-in navigation drawer with search.
//!
//! # Design
//! - All state lives in `SidebarState` inside the store; this component only
//!   renders it and dispatches reducers.
//! - Collapsing a section never refetches; links come from the catalogs the
//!   galleries already loaded.

use crate::app::Route;
use crate::components::atoms::SearchInput;
use crate::components::watch_toggle::WatchedBadge;
use crate::store::{AppStore, watched_changed};
use reelshelf_core::AppContext;
use reelshelf_core::catalog::CatalogKind;
use reelshelf_core::config::DEFAULT_SEARCH_DEBOUNCE_MS;
use reelshelf_core::gallery::{GalleryAction, apply_action};
use reelshelf_core::sidebar::{SidebarLink, SidebarSection};
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

#[function_component(Sidebar)]
pub(crate) fn sidebar() -> Html {
    let context = use_context::<AppContext>();
    let state = use_selector(|store: &AppStore| store.sidebar.clone());
    let dispatch = Dispatch::<AppStore>::new();
    let debounce_ms = context
        .as_ref()
        .map_or(DEFAULT_SEARCH_DEBOUNCE_MS, |context| context.config.search_debounce_ms);
    let open = state.is_open();

    let close = {
        let dispatch = dispatch.clone();
        Callback::from(move |_: MouseEvent| dispatch.reduce_mut(|store| store.sidebar.close()))
    };
    let on_search = {
        let dispatch = dispatch.clone();
        Callback::from(move |query: String| {
            dispatch.reduce_mut(|store| store.sidebar.set_query(query));
        })
    };
    let on_toggle_section = {
        let dispatch = dispatch.clone();
        Callback::from(move |kind: CatalogKind| {
            dispatch.reduce_mut(|store| store.sidebar.toggle_section(kind));
        })
    };
    let on_unmark = Callback::from(move |(kind, index): (CatalogKind, usize)| {
        let Some(context) = context.as_ref() else {
            return;
        };
        apply_action(kind, GalleryAction::Unmark(index), &context.watched);
        dispatch.reduce_mut(|store| watched_changed(store, &context.watched));
    });

    html! {
        <>
            <div
                class={classes!("sidebar-overlay", open.then_some("active"))}
                onclick={close.clone()}
            />
            <nav
                class={classes!("sidebar", open.then_some("open"))}
                aria-label="Catalog navigation"
                aria-hidden={(!open).to_string()}
            >
                <button class="close-btn" aria-label="Close navigation" onclick={close.clone()}>
                    {"✕"}
                </button>
                <SearchInput
                    value={state.query().to_string()}
                    placeholder="Search titles..."
                    aria_label="Search titles"
                    {debounce_ms}
                    {on_search}
                />
                {state.result_summary().map(|summary| html! {
                    <p class="search-results" aria-live="polite">{summary}</p>
                }).unwrap_or_default()}
                { for state.sections().iter().map(|section| {
                    let links = state.visible_links(section.kind);
                    section_view(section, &links, &on_toggle_section, &on_unmark, &close)
                }) }
            </nav>
        </>
    }
}

fn section_view(
    section: &SidebarSection,
    links: &[&SidebarLink],
    on_toggle: &Callback<CatalogKind>,
    on_unmark: &Callback<(CatalogKind, usize)>,
    on_navigate: &Callback<MouseEvent>,
) -> Html {
    let kind = section.kind;
    let toggle = on_toggle.reform(move |_: MouseEvent| kind);
    let body = if section.collapsed {
        html! {}
    } else if let Some(placeholder) = section.placeholder() {
        html! { <p class="sidebar-placeholder">{placeholder}</p> }
    } else {
        html! {
            <ul class="sidebar-links">
                { for links.iter().map(|link| link_view(kind, link, on_unmark, on_navigate)) }
            </ul>
        }
    };
    html! {
        <div class="sidebar-section">
            <button
                class="section-toggle"
                aria-expanded={(!section.collapsed).to_string()}
                onclick={toggle}
            >
                <span>{kind.heading()}</span>
                <span class="arrow">{section.arrow()}</span>
            </button>
            {body}
        </div>
    }
}

fn link_view(
    kind: CatalogKind,
    link: &SidebarLink,
    on_unmark: &Callback<(CatalogKind, usize)>,
    on_navigate: &Callback<MouseEvent>,
) -> Html {
    let index = link.index;
    let badge = if link.watched {
        let on_unmark = on_unmark.reform(move |()| (kind, index));
        html! { <WatchedBadge compact=true {on_unmark} /> }
    } else {
        html! {}
    };
    html! {
        <li key={format!("{}-{index}", kind.param())} data-title={link.search_title.clone()} onclick={on_navigate.clone()}>
            <Link<Route> to={Route::from(link.target)}>{link.label.clone()}</Link<Route>>
            {badge}
        </li>
    }
}
