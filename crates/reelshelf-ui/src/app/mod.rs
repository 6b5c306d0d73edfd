//! Application shell: context wiring, routing, catalog loading and global
//! listeners.
//!
//! # Design
//! - `AppContext` is built once in [`run_app`] and provided to the tree.
//! - Catalogs load once per page; each section tracks its own outcome so a
//!   failed catalog never blocks the others.
//! - The cache sweep runs on an interval equal to the expiry window.

use crate::components::detail::{MoviePage, SeasonPage};
use crate::components::gallery::GallerySection;
use crate::components::shell::{NotFoundPage, ShelfHeader};
use crate::components::sidebar::Sidebar;
use crate::services::browser_platform;
use crate::services::config::{load_config, resolve_catalog_urls};
use crate::store::{AppStore, set_catalog};
use crate::telemetry::init_logging;
use gloo::events::EventListener;
use gloo::utils::window;
use gloo_timers::callback::Interval;
use reelshelf_core::catalog::CatalogKind;
use reelshelf_core::config::ShelfConfig;
use reelshelf_core::preferences::Theme;
use reelshelf_core::AppContext;
use tracing::{Level, debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::KeyboardEvent;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

mod routes;

pub(crate) use routes::Route;

#[derive(Properties, PartialEq)]
pub(crate) struct ShelfAppProps {
    pub context: AppContext,
}

#[function_component(ShelfApp)]
pub(crate) fn shelf_app(props: &ShelfAppProps) -> Html {
    let context = props.context.clone();
    let dispatch = Dispatch::<AppStore>::new();
    let theme = use_selector(|store: &AppStore| store.preferences.theme);
    let sidebar_open = use_selector(|store: &AppStore| store.sidebar.is_open());

    {
        let context = context.clone();
        let dispatch = dispatch.clone();
        use_effect_with_deps(
            move |_| {
                let preferences = &context.preferences;
                let (theme, muted) = (preferences.theme(), preferences.preview_muted());
                dispatch.reduce_mut(|store| {
                    store.preferences.theme = theme;
                    store.preferences.preview_muted = muted;
                });
                for kind in CatalogKind::ALL {
                    let context = context.clone();
                    let dispatch = dispatch.clone();
                    spawn_local(async move {
                        let result = context.catalogs.load(kind).await;
                        if let Err(err) = &result {
                            warn!(catalog = kind.param(), error = %err, "catalog load failed");
                        }
                        dispatch.reduce_mut(|store| {
                            set_catalog(store, kind, result, &context.watched);
                        });
                    });
                }
                || ()
            },
            (),
        );
    }

    {
        let cache = context.cache().clone();
        let expiry = cache.settings().expiry_ms;
        use_effect_with_deps(
            move |_| {
                let handle = Interval::new(u32::try_from(expiry).unwrap_or(u32::MAX), move || {
                    let removed = cache.sweep_expired();
                    if removed > 0 {
                        debug!(removed, "swept expired catalog responses");
                    }
                });
                move || drop(handle)
            },
            (),
        );
    }

    {
        let dispatch = dispatch.clone();
        use_effect_with_deps(
            move |_| {
                let handler = EventListener::new(&gloo::utils::document(), "keydown", move |event| {
                    let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                        return;
                    };
                    let key = event.key();
                    dispatch.reduce_mut(|store| {
                        store.sidebar.handle_key(&key);
                    });
                });
                move || drop(handler)
            },
            (),
        );
    }

    use_effect_with_deps(
        move |theme| {
            apply_theme(**theme);
            || ()
        },
        theme,
    );

    use_effect_with_deps(
        move |open| {
            lock_scroll(**open);
            || ()
        },
        sidebar_open,
    );

    html! {
        <ContextProvider<AppContext> context={context}>
            <BrowserRouter>
                <ShelfHeader />
                <Sidebar />
                <main class="content">
                    <Switch<Route> render={switch} />
                </main>
            </BrowserRouter>
        </ContextProvider<AppContext>>
    }
}

#[allow(clippy::needless_pass_by_value)]
fn switch(route: Route) -> Html {
    match route {
        Route::Home => html! {
            <>
                <GallerySection kind={CatalogKind::Movies} />
                <GallerySection kind={CatalogKind::Seasons} />
                <GallerySection kind={CatalogKind::ComingSoon} />
            </>
        },
        Route::Movie { index } => html! { <MoviePage {index} /> },
        Route::Season { index } => html! { <SeasonPage {index} /> },
        Route::NotFound => html! { <NotFoundPage /> },
    }
}

fn apply_theme(theme: Theme) {
    if let Some(document) = window().document() {
        if let Some(root) = document.document_element() {
            let _ = root.set_attribute("class", &theme.root_class());
        }
        if let Some(body) = document.body() {
            let _ = body.set_attribute("data-theme", theme.as_str());
        }
    }
}

fn lock_scroll(locked: bool) {
    let Some(body) = window().document().and_then(|document| document.body()) else {
        return;
    };
    let _ = body
        .style()
        .set_property("overflow", if locked { "hidden" } else { "" });
}

fn startup_config() -> ShelfConfig {
    let loaded = load_config();
    let config = loaded.as_ref().map_or_else(|_| ShelfConfig::default(), Clone::clone);
    let level = config.log_level().unwrap_or(Level::INFO);
    if init_logging(level).is_err() {
        gloo::console::warn!("logging already initialised");
    }
    if let Err(err) = loaded {
        warn!(error = %err, "ignoring invalid page configuration");
    }
    resolve_catalog_urls(config)
}

/// Entry point invoked by the wasm binary.
pub fn run_app() {
    console_error_panic_hook::set_once();
    let config = startup_config();
    let context = AppContext::new(config, browser_platform());
    let props = ShelfAppProps { context };
    if let Some(root) = gloo::utils::document().get_element_by_id("root") {
        yew::Renderer::<ShelfApp>::with_root_and_props(root, props).render();
    } else {
        yew::Renderer::<ShelfApp>::with_props(props).render();
    }
}
