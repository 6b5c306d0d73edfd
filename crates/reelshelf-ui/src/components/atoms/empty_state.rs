//! Placeholder panel for galleries and lists with nothing to show.
//!
//! # Design
//! - Keep copy entirely prop-driven.
//! - Render optional children (links, actions) only when provided.

use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct EmptyStateProps {
    pub title: AttrValue,
    #[prop_or_default]
    pub class: Classes,
    #[prop_or_default]
    pub children: Children,
}

#[function_component(EmptyState)]
pub(crate) fn empty_state(props: &EmptyStateProps) -> Html {
    let has_actions = props.children.iter().next().is_some();
    html! {
        <div class={classes!("empty-state", props.class.clone())}>
            <p>{props.title.clone()}</p>
            {if has_actions {
                html! { <div class="empty-actions">{ for props.children.iter() }</div> }
            } else {
                html! {}
            }}
        </div>
    }
}
