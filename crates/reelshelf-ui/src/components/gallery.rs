//! Gallery sections on the home page.
//!
//! # Design
//! - Cards come from `reelshelf_core::gallery::render`, re-run on every store
//!   change so watched badges always reflect storage.
//! - Card actions go through `apply_action`; the store revision bump makes
//!   every gallery and the sidebar re-read watched state in the same tick.
//! - Previews start after a hover delay and share one persisted mute setting.

use crate::app::Route;
use crate::components::atoms::{EmptyState, ErrorBlock};
use crate::components::watch_toggle::WatchedBadge;
use crate::store::{AppStore, CatalogLoad, set_sort, sort_for, watched_changed};
use gloo_timers::callback::Timeout;
use reelshelf_core::AppContext;
use reelshelf_core::catalog::CatalogKind;
use reelshelf_core::gallery::{
    Card, DescriptionSegment, GalleryAction, GalleryView, SortMode, apply_action,
    preview_start_seconds, render,
};
use reelshelf_core::preferences::{mute_icon, mute_label};
use reelshelf_core::sidebar::LOADING_SECTION_MESSAGE;
use std::str::FromStr;
use web_sys::HtmlVideoElement;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

#[derive(Properties, PartialEq)]
pub(crate) struct GallerySectionProps {
    pub kind: CatalogKind,
}

#[function_component(GallerySection)]
pub(crate) fn gallery_section(props: &GallerySectionProps) -> Html {
    let kind = props.kind;
    let context = use_context::<AppContext>();
    let load = use_selector(move |store: &AppStore| store.catalogs.get(kind).clone());
    let mode = use_selector(move |store: &AppStore| sort_for(store, kind));
    let muted = use_selector(|store: &AppStore| store.preferences.preview_muted);
    let _revision = use_selector(|store: &AppStore| store.watched_revision);
    let navigator = use_navigator();
    let dispatch = Dispatch::<AppStore>::new();

    let Some(context) = context else {
        return html! {};
    };

    let on_action = {
        let watched = context.watched.clone();
        let dispatch = dispatch.clone();
        Callback::from(move |action: GalleryAction| {
            let target = apply_action(kind, action, &watched);
            dispatch.reduce_mut(|store| watched_changed(store, &watched));
            if let (Some(target), Some(navigator)) = (target, navigator.as_ref()) {
                navigator.push(&Route::from(target));
            }
        })
    };
    let on_toggle_mute = {
        let preferences = context.preferences.clone();
        let dispatch = dispatch.clone();
        Callback::from(move |()| {
            let muted = preferences.toggle_preview_mute();
            dispatch.reduce_mut(|store| store.preferences.preview_muted = muted);
        })
    };
    let on_sort = Callback::from(move |mode: SortMode| {
        dispatch.reduce_mut(|store| set_sort(store, kind, mode));
    });

    let preview_delay_ms = context.config.preview_delay_ms;
    let body = match &*load {
        CatalogLoad::Loading => html! { <p class="loading">{LOADING_SECTION_MESSAGE}</p> },
        CatalogLoad::Failed(_) => html! { <ErrorBlock message={kind.failure_message()} /> },
        CatalogLoad::Ready(items) => {
            match render(kind, Some(items.as_slice()), *mode, &context.watched) {
                GalleryView::Empty { message } => {
                    html! { <EmptyState title={message} class="gallery-empty" /> }
                }
                GalleryView::Cards(cards) => html! {
                    <div class="gallery">
                        { for cards.into_iter().map(|card| {
                            let key = card.render_key();
                            html! {
                                <GalleryCard
                                    key={key}
                                    {kind}
                                    {card}
                                    muted={*muted}
                                    {preview_delay_ms}
                                    on_action={on_action.clone()}
                                    on_toggle_mute={on_toggle_mute.clone()}
                                />
                            }
                        }) }
                    </div>
                },
            }
        }
    };

    html! {
        <section class="gallery-section" id={format!("{}-section", kind.param())}>
            <div class="section-header">
                <h2>{kind.heading()}</h2>
                {if kind == CatalogKind::ComingSoon {
                    html! {}
                } else {
                    html! { <SortSelect value={*mode} on_change={on_sort} /> }
                }}
            </div>
            {body}
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct SortSelectProps {
    value: SortMode,
    on_change: Callback<SortMode>,
}

#[function_component(SortSelect)]
fn sort_select(props: &SortSelectProps) -> Html {
    let onchange = {
        let on_change = props.on_change.clone();
        Callback::from(move |event: Event| {
            if let Some(select) = event.target_dyn_into::<web_sys::HtmlSelectElement>() {
                let Ok(mode) = SortMode::from_str(&select.value());
                on_change.emit(mode);
            }
        })
    };
    html! {
        <select class="sort-select" aria-label="Sort items" {onchange}>
            <option value={SortMode::Default.as_str()} selected={props.value == SortMode::Default}>
                {"Default order"}
            </option>
            <option value={SortMode::Title.as_str()} selected={props.value == SortMode::Title}>
                {"Title (A-Z)"}
            </option>
        </select>
    }
}

#[derive(Properties, PartialEq)]
struct GalleryCardProps {
    kind: CatalogKind,
    card: Card,
    muted: bool,
    preview_delay_ms: u32,
    on_action: Callback<GalleryAction>,
    on_toggle_mute: Callback<()>,
}

#[function_component(GalleryCard)]
fn gallery_card(props: &GalleryCardProps) -> Html {
    let previewing = use_state(|| false);
    let timer = use_mut_ref(|| None as Option<Timeout>);
    let video_ref = use_node_ref();
    let card = &props.card;
    let index = card.index;
    let clickable = card.target.is_some();

    {
        let video_ref = video_ref.clone();
        use_effect_with_deps(
            move |muted| {
                if let Some(video) = video_ref.cast::<HtmlVideoElement>() {
                    video.set_muted(*muted);
                }
                || ()
            },
            props.muted,
        );
    }

    let onmouseenter = {
        let previewing = previewing.clone();
        let timer = timer.clone();
        let delay = props.preview_delay_ms;
        let has_preview = card.preview.is_some();
        Callback::from(move |_: MouseEvent| {
            if !has_preview {
                return;
            }
            let previewing = previewing.clone();
            *timer.borrow_mut() = Some(Timeout::new(delay, move || previewing.set(true)));
        })
    };
    let onmouseleave = {
        let previewing = previewing.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(timeout) = timer.borrow_mut().take() {
                drop(timeout);
            }
            previewing.set(false);
        })
    };
    let onclick = {
        let on_action = props.on_action.clone();
        Callback::from(move |_: MouseEvent| {
            if clickable {
                on_action.emit(GalleryAction::Open(index));
            }
        })
    };
    let onkeydown = {
        let on_action = props.on_action.clone();
        Callback::from(move |event: KeyboardEvent| {
            if clickable && matches!(event.key().as_str(), "Enter" | " ") {
                event.prevent_default();
                on_action.emit(GalleryAction::Open(index));
            }
        })
    };
    let onloadedmetadata = {
        let video_ref = video_ref.clone();
        Callback::from(move |_: Event| {
            if let Some(video) = video_ref.cast::<HtmlVideoElement>() {
                video.set_current_time(preview_start_seconds(video.duration()));
            }
        })
    };

    let badge = if card.watched {
        let on_action = props.on_action.clone();
        let on_unmark = Callback::from(move |()| on_action.emit(GalleryAction::Unmark(index)));
        html! { <WatchedBadge {on_unmark} /> }
    } else {
        html! {}
    };

    let media = match (&card.preview, *previewing) {
        (Some(source), true) => {
            let toggle_mute = {
                let on_toggle_mute = props.on_toggle_mute.clone();
                Callback::from(move |event: MouseEvent| {
                    event.stop_propagation();
                    on_toggle_mute.emit(());
                })
            };
            html! {
                <>
                    <video
                        ref={video_ref}
                        class="card-preview"
                        src={source.clone()}
                        autoplay=true
                        loop=true
                        playsinline=true
                        muted={props.muted}
                        {onloadedmetadata}
                    />
                    <button
                        class="volume-btn"
                        aria-label={mute_label(props.muted)}
                        onclick={toggle_mute}
                    >
                        {mute_icon(props.muted)}
                    </button>
                </>
            }
        }
        _ => html! {
            <img src={card.thumbnail.clone()} alt={card.image_alt.clone()} loading="lazy" />
        },
    };

    let class = classes!(
        "card",
        (props.kind == CatalogKind::ComingSoon).then_some("coming-soon"),
        clickable.then_some("clickable")
    );

    html! {
        <div
            {class}
            role={clickable.then_some("button")}
            tabindex={clickable.then_some("0")}
            aria-label={card.aria_label.clone()}
            {onclick}
            {onkeydown}
            {onmouseenter}
            {onmouseleave}
        >
            <div class="card-media">
                {media}
                {badge}
            </div>
            <h3 id={card.dom_id.clone()}>{card.title.clone()}</h3>
            {description(&card.description)}
        </div>
    }
}

fn description(segments: &[DescriptionSegment]) -> Html {
    if segments.is_empty() {
        return html! {};
    }
    html! {
        <p class="card-description">
            { for segments.iter().map(|segment| match segment {
                DescriptionSegment::Plain(text) => html! { {text.clone()} },
                DescriptionSegment::Bold(text) => html! { <strong>{text.clone()}</strong> },
            }) }
        </p>
    }
}
