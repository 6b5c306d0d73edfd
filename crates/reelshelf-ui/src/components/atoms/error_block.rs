//! Inline error block for a failed section or an invalid detail route.

use crate::app::Route;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct ErrorBlockProps {
    pub message: AttrValue,
    /// Offer a link back to the gallery page.
    #[prop_or_default]
    pub home_link: bool,
}

#[function_component(ErrorBlock)]
pub(crate) fn error_block(props: &ErrorBlockProps) -> Html {
    html! {
        <div class="error-message" role="alert">
            <p>{props.message.clone()}</p>
            {if props.home_link {
                html! {
                    <p>
                        <Link<Route> to={Route::Home}>{"Return to the home page"}</Link<Route>>
                    </p>
                }
            } else {
                html! {}
            }}
        </div>
    }
}
