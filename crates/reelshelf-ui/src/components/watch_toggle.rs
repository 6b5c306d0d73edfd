//! Watched indicator that doubles as a toggle.
//!
//! # Design
//! - Presentation comes from `reelshelf_core::detail::watch_toggle`; this
//!   component only tracks hover and forwards activation.

use reelshelf_core::detail::{badge_label, watch_toggle};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct WatchToggleProps {
    pub watched: bool,
    pub on_toggle: Callback<()>,
}

#[function_component(WatchToggle)]
pub(crate) fn watch_toggle_view(props: &WatchToggleProps) -> Html {
    let hovered = use_state(|| false);
    let view = watch_toggle(props.watched, *hovered);

    let onclick = {
        let on_toggle = props.on_toggle.clone();
        let hovered = hovered.clone();
        Callback::from(move |_: MouseEvent| {
            hovered.set(false);
            on_toggle.emit(());
        })
    };
    let onkeydown = {
        let on_toggle = props.on_toggle.clone();
        Callback::from(move |event: KeyboardEvent| {
            if matches!(event.key().as_str(), "Enter" | " ") {
                event.prevent_default();
                on_toggle.emit(());
            }
        })
    };
    let onmouseenter = {
        let hovered = hovered.clone();
        Callback::from(move |_: MouseEvent| hovered.set(true))
    };
    let onmouseleave = Callback::from(move |_: MouseEvent| hovered.set(false));

    if view.watched {
        html! {
            <div
                class={view.class}
                role="button"
                tabindex="0"
                aria-label={view.aria_label}
                {onclick}
                {onkeydown}
                {onmouseenter}
                {onmouseleave}
            >
                {view.label}
            </div>
        }
    } else {
        html! {
            <button class={view.class} aria-label={view.aria_label} {onclick}>
                {view.label}
            </button>
        }
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct WatchedBadgeProps {
    /// Glyph-only variant used in the sidebar.
    #[prop_or_default]
    pub compact: bool,
    pub on_unmark: Callback<()>,
}

/// Badge on watched cards and sidebar links; activating it unmarks the item.
#[function_component(WatchedBadge)]
pub(crate) fn watched_badge(props: &WatchedBadgeProps) -> Html {
    let hovered = use_state(|| false);

    let onclick = {
        let on_unmark = props.on_unmark.clone();
        Callback::from(move |event: MouseEvent| {
            event.stop_propagation();
            event.prevent_default();
            on_unmark.emit(());
        })
    };
    let onkeydown = {
        let on_unmark = props.on_unmark.clone();
        Callback::from(move |event: KeyboardEvent| {
            if matches!(event.key().as_str(), "Enter" | " ") {
                event.stop_propagation();
                event.prevent_default();
                on_unmark.emit(());
            }
        })
    };
    let onmouseenter = {
        let hovered = hovered.clone();
        Callback::from(move |_: MouseEvent| hovered.set(true))
    };
    let onmouseleave = {
        let hovered = hovered.clone();
        Callback::from(move |_: MouseEvent| hovered.set(false))
    };

    let class = if props.compact {
        "watched-indicator-sidebar"
    } else {
        "watched-indicator"
    };
    html! {
        <span
            {class}
            role="button"
            tabindex="0"
            aria-label="Remove"
            {onclick}
            {onkeydown}
            {onmouseenter}
            {onmouseleave}
        >
            {badge_label(*hovered, props.compact)}
        </span>
    }
}
