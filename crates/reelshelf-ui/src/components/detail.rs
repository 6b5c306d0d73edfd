//! Movie and season detail pages.
//!
//! # Design
//! - Pages resolve their route index against the already-loaded catalogs and
//!   render the pure view models from `reelshelf_core::detail`.
//! - Opening a movie page marks it watched once per visit.
//! - Invalid indices and failed catalogs render an inline error block with a
//!   link home.

use crate::components::atoms::ErrorBlock;
use crate::components::watch_toggle::WatchToggle;
use crate::store::{AppStore, CatalogLoad, watched_changed};
use reelshelf_core::AppContext;
use reelshelf_core::catalog::CatalogKind;
use reelshelf_core::detail::{
    DetailHeader, EPISODE_UNAVAILABLE, EpisodeList, EpisodeView, Player, movie_detail, open_movie,
    parse_index_param, season_detail,
};
use reelshelf_core::sidebar::LOADING_SECTION_MESSAGE;
use tracing::debug;
use yew::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

const VIDEO_LOAD_FAILED: &str = "Failed to load video. Please try again later.";

#[derive(Properties, PartialEq)]
pub(crate) struct DetailPageProps {
    /// Raw `:index` route segment.
    pub index: String,
}

#[function_component(MoviePage)]
pub(crate) fn movie_page(props: &DetailPageProps) -> Html {
    let context = use_context::<AppContext>();
    let load = use_selector(|store: &AppStore| store.catalogs.movies.clone());
    let _revision = use_selector(|store: &AppStore| store.watched_revision);
    let dispatch = Dispatch::<AppStore>::new();

    {
        let context = context.clone();
        let dispatch = dispatch.clone();
        use_effect_with_deps(
            move |(index, load)| {
                if let (Some(context), Some(items)) = (context.as_ref(), load.items()) {
                    match open_movie(items, parse_index_param(index), &context.watched) {
                        Ok(_) => dispatch.reduce_mut(|store| watched_changed(store, &context.watched)),
                        Err(err) => debug!(index = %index, error = %err, "movie route rejected"),
                    }
                }
                || ()
            },
            (props.index.clone(), (*load).clone()),
        );
    }

    let Some(context) = context else {
        return html! {};
    };
    let items = match &*load {
        CatalogLoad::Ready(items) => items.clone(),
        other => return load_placeholder(CatalogKind::Movies, other),
    };
    let detail = match movie_detail(&items, parse_index_param(&props.index), &context.watched) {
        Ok(detail) => detail,
        Err(err) => return html! { <ErrorBlock message={err.to_string()} home_link=true /> },
    };

    let toggle = if detail.watched {
        let watched = context.watched.clone();
        let index = detail.index;
        let on_toggle = Callback::from(move |()| {
            watched.unmark_movie_watched(index);
            dispatch.reduce_mut(|store| watched_changed(store, &watched));
        });
        html! { <WatchToggle watched=true {on_toggle} /> }
    } else {
        html! {}
    };

    html! {
        <article class="detail-page movie-page">
            {header_view(&detail.header, toggle)}
            <section class="embed-section">
                <PlayerView player={detail.player} failure={VIDEO_LOAD_FAILED} />
            </section>
        </article>
    }
}

#[function_component(SeasonPage)]
pub(crate) fn season_page(props: &DetailPageProps) -> Html {
    let context = use_context::<AppContext>();
    let load = use_selector(|store: &AppStore| store.catalogs.seasons.clone());
    let _revision = use_selector(|store: &AppStore| store.watched_revision);
    let dispatch = Dispatch::<AppStore>::new();

    let Some(context) = context else {
        return html! {};
    };
    let items = match &*load {
        CatalogLoad::Ready(items) => items.clone(),
        other => return load_placeholder(CatalogKind::Seasons, other),
    };
    let detail = match season_detail(&items, parse_index_param(&props.index), &context.watched) {
        Ok(detail) => detail,
        Err(err) => return html! { <ErrorBlock message={err.to_string()} home_link=true /> },
    };

    let season = detail.index;
    let episodes = match detail.episodes {
        EpisodeList::Empty(message) => html! { <p class="no-episodes">{message}</p> },
        EpisodeList::Episodes(episodes) => html! {
            <ul class="episodes-list">
                { for episodes.into_iter().map(|episode| {
                    let on_toggle = {
                        let watched = context.watched.clone();
                        let dispatch = dispatch.clone();
                        let (number, was_watched) = (episode.index, episode.watched);
                        Callback::from(move |()| {
                            if was_watched {
                                watched.unmark_episode_watched(season, number);
                            } else {
                                watched.mark_episode_watched(season, number);
                            }
                            dispatch.reduce_mut(|store| watched_changed(store, &watched));
                        })
                    };
                    episode_view(episode, on_toggle)
                }) }
            </ul>
        },
    };

    html! {
        <article class="detail-page season-page">
            {header_view(&detail.header, html! {})}
            <section class="episodes-section">{episodes}</section>
        </article>
    }
}

fn load_placeholder(kind: CatalogKind, load: &CatalogLoad) -> Html {
    match load {
        CatalogLoad::Failed(_) => {
            html! { <ErrorBlock message={kind.failure_message()} home_link=true /> }
        }
        CatalogLoad::Loading | CatalogLoad::Ready(_) => {
            html! { <p class="loading">{LOADING_SECTION_MESSAGE}</p> }
        }
    }
}

fn header_view(header: &DetailHeader, extra: Html) -> Html {
    html! {
        <header
            class="detail-header"
            style={format!("background-image: url('{}')", header.background)}
        >
            <img class="detail-thumbnail" src={header.thumbnail.clone()} alt={header.image_alt.clone()} />
            <div class="header-text">
                <h1>{header.title.clone()}</h1>
                <p>{header.description.clone()}</p>
            </div>
            {extra}
        </header>
    }
}

fn episode_view(episode: EpisodeView, on_toggle: Callback<()>) -> Html {
    html! {
        <li key={episode.dom_id.clone()} class="episode" aria-labelledby={episode.dom_id.clone()}>
            <div class="episode-heading">
                <h3 id={episode.dom_id}>{episode.title}</h3>
                <WatchToggle watched={episode.watched} {on_toggle} />
            </div>
            <p class="episode-description">{episode.description}</p>
            <PlayerView player={episode.player} failure={EPISODE_UNAVAILABLE} />
        </li>
    }
}

#[derive(Properties, PartialEq)]
struct PlayerViewProps {
    player: Player,
    /// Message shown when the browser fails to load the source.
    failure: AttrValue,
}

#[function_component(PlayerView)]
fn player_view(props: &PlayerViewProps) -> Html {
    let failed = use_state(|| false);
    match &props.player {
        Player::Unavailable(message) => unavailable(message),
        Player::Available { .. } if *failed => unavailable(&props.failure),
        Player::Available {
            source,
            poster,
            title,
            aria_label,
        } => {
            let onerror = Callback::from(move |_: Event| failed.set(true));
            html! {
                <video
                    class="content-video"
                    src={source.clone()}
                    poster={poster.clone()}
                    title={title.clone()}
                    aria-label={aria_label.clone()}
                    controls=true
                    loading="lazy"
                    {onerror}
                />
            }
        }
    }
}

fn unavailable(message: &str) -> Html {
    html! {
        <div class="error-message" role="alert">
            <p>{message.to_string()}</p>
        </div>
    }
}
