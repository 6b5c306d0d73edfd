//! Movie and season detail pages, plus the watched toggles they share with
//! the gallery.

use crate::catalog::CatalogItem;
use crate::error::DetailError;
use crate::watched::WatchedState;

/// Image used when an item has no thumbnail.
pub const PLACEHOLDER_IMAGE: &str = "placeholder.jpg";
/// Player text for a movie without a source.
pub const MOVIE_UNAVAILABLE: &str = "Video content is not available for this movie.";
/// Player text for an episode without a source.
pub const EPISODE_UNAVAILABLE: &str = "Video unavailable";
/// Shown instead of the episode list for an empty season.
pub const NO_EPISODES: &str = "No episodes available for this season.";
/// Episode description fallback.
pub const NO_DESCRIPTION: &str = "No description available";

/// Parse a detail-page index the way `parseInt` does: optional leading
/// whitespace and sign, then the longest run of digits. Negative, empty and
/// non-numeric inputs yield `None`.
#[must_use]
pub fn parse_index_param(raw: &str) -> Option<usize> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: usize = digits[..end].parse().ok()?;
    if negative && value != 0 {
        return None;
    }
    Some(value)
}

/// Video player block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Player {
    /// Playable source.
    Available {
        /// Video URL.
        source: String,
        /// Poster image, if any.
        poster: Option<String>,
        /// Element title.
        title: String,
        /// Accessible label, if any.
        aria_label: Option<String>,
    },
    /// No source; the message replaces the player.
    Unavailable(&'static str),
}

/// Header fields shared by both detail pages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailHeader {
    /// Page heading.
    pub title: String,
    /// Thumbnail URL, empty when missing.
    pub thumbnail: String,
    /// Thumbnail alt text.
    pub image_alt: String,
    /// Background image for the header band.
    pub background: String,
    /// Description, empty when missing.
    pub description: String,
}

impl DetailHeader {
    fn new(item: &CatalogItem, fallback_title: String) -> Self {
        let thumbnail = item.thumbnail.clone().unwrap_or_default();
        Self {
            image_alt: item
                .title
                .clone()
                .unwrap_or_else(|| format!("{fallback_title} thumbnail")),
            title: item.title.clone().unwrap_or(fallback_title),
            background: if thumbnail.is_empty() {
                PLACEHOLDER_IMAGE.to_string()
            } else {
                thumbnail.clone()
            },
            thumbnail,
            description: item.description.clone().unwrap_or_default(),
        }
    }
}

/// Movie page content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovieDetail {
    /// Stable catalog index.
    pub index: usize,
    /// Header fields.
    pub header: DetailHeader,
    /// Player block.
    pub player: Player,
    /// Whether the watched indicator is shown.
    pub watched: bool,
}

fn lookup<'a>(
    items: &'a [CatalogItem],
    index: Option<usize>,
    noun: &'static str,
) -> Result<(usize, &'a CatalogItem), DetailError> {
    index
        .and_then(|index| items.get(index).map(|item| (index, item)))
        .ok_or(DetailError::InvalidIndex { noun })
}

/// Build the movie page for `index`.
///
/// # Errors
/// Returns [`DetailError::InvalidIndex`] when `index` is missing or out of
/// range.
pub fn movie_detail(
    items: &[CatalogItem],
    index: Option<usize>,
    watched: &WatchedState,
) -> Result<MovieDetail, DetailError> {
    let (index, item) = lookup(items, index, "movie")?;
    let header = DetailHeader::new(item, format!("Movie {}", index + 1));
    let label = item.title.as_deref().unwrap_or("Movie");
    let player = item.embed_link.clone().map_or(
        Player::Unavailable(MOVIE_UNAVAILABLE),
        |source| Player::Available {
            source,
            poster: Some(
                item.thumbnail
                    .clone()
                    .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            ),
            title: format!("{label} content"),
            aria_label: Some(format!("{label} player")),
        },
    );
    Ok(MovieDetail {
        index,
        header,
        player,
        watched: watched.is_movie_watched(index),
    })
}

/// Opening a movie page marks the movie watched, then builds the page.
///
/// # Errors
/// Returns [`DetailError::InvalidIndex`] without touching watched state when
/// `index` is missing or out of range.
pub fn open_movie(
    items: &[CatalogItem],
    index: Option<usize>,
    watched: &WatchedState,
) -> Result<MovieDetail, DetailError> {
    let (index, _) = lookup(items, index, "movie")?;
    watched.mark_movie_watched(index);
    movie_detail(items, Some(index), watched)
}

/// One entry of the season episode list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EpisodeView {
    /// Index within the season.
    pub index: usize,
    /// DOM id of the episode heading.
    pub dom_id: String,
    /// Title with the `"Episode {n}"` fallback.
    pub title: String,
    /// Description with fallback.
    pub description: String,
    /// Player block.
    pub player: Player,
    /// Whether the episode is watched.
    pub watched: bool,
}

/// Episode list of a season page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EpisodeList {
    /// Episodes in season order.
    Episodes(Vec<EpisodeView>),
    /// Placeholder for a season without episodes.
    Empty(&'static str),
}

/// Season page content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeasonDetail {
    /// Stable catalog index.
    pub index: usize,
    /// Header fields.
    pub header: DetailHeader,
    /// Episode list.
    pub episodes: EpisodeList,
}

/// Build the season page for `index`. Watched flags are read from `watched`.
///
/// # Errors
/// Returns [`DetailError::InvalidIndex`] when `index` is missing or out of
/// range.
pub fn season_detail(
    items: &[CatalogItem],
    index: Option<usize>,
    watched: &WatchedState,
) -> Result<SeasonDetail, DetailError> {
    let (index, item) = lookup(items, index, "season")?;
    let header = DetailHeader::new(item, format!("Season {}", index + 1));
    let episodes = if item.episodes.is_empty() {
        EpisodeList::Empty(NO_EPISODES)
    } else {
        EpisodeList::Episodes(
            item.episodes
                .iter()
                .enumerate()
                .map(|(episode, entry)| {
                    let title = entry
                        .title
                        .clone()
                        .unwrap_or_else(|| format!("Episode {}", episode + 1));
                    EpisodeView {
                        index: episode,
                        dom_id: format!("episode-title-{episode}"),
                        description: entry
                            .description
                            .clone()
                            .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
                        player: entry.embed_link.clone().map_or(
                            Player::Unavailable(EPISODE_UNAVAILABLE),
                            |source| Player::Available {
                                source,
                                poster: entry.thumbnail.clone(),
                                title: title.clone(),
                                aria_label: None,
                            },
                        ),
                        watched: watched.is_episode_watched(index, episode),
                        title,
                    }
                })
                .collect(),
        )
    };
    Ok(SeasonDetail {
        index,
        header,
        episodes,
    })
}

/// Rendered watched toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToggleView {
    /// Visible text.
    pub label: &'static str,
    /// Accessible label.
    pub aria_label: &'static str,
    /// CSS class.
    pub class: &'static str,
    /// Whether activating the toggle unmarks.
    pub watched: bool,
}

/// Toggle shown on detail pages. A watched item offers removal on hover.
#[must_use]
pub const fn watch_toggle(watched: bool, hovered: bool) -> ToggleView {
    if watched {
        ToggleView {
            label: if hovered {
                "❌ Remove Watched Status"
            } else {
                "✔️ Watched"
            },
            aria_label: "Remove watched status",
            class: "watched-indicator",
            watched: true,
        }
    } else {
        ToggleView {
            label: "👁️ Mark as Watched",
            aria_label: "Mark as watched",
            class: "mark-watched-btn",
            watched: false,
        }
    }
}

/// Badge text on gallery cards and sidebar links. `compact` is the sidebar
/// form.
#[must_use]
pub const fn badge_label(hovered: bool, compact: bool) -> &'static str {
    match (hovered, compact) {
        (false, false) => "✔️ Watched",
        (true, false) => "❌ Remove",
        (false, true) => "✔️",
        (true, true) => "❌",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::decode_catalog;
    use crate::storage::{MemoryStore, PersistentStore};
    use serde_json::json;
    use std::rc::Rc;

    fn watched() -> WatchedState {
        WatchedState::new(PersistentStore::new(Rc::new(MemoryStore::new())))
    }

    #[test]
    fn index_param_parses_like_parse_int() {
        assert_eq!(parse_index_param("3"), Some(3));
        assert_eq!(parse_index_param(" 12abc"), Some(12));
        assert_eq!(parse_index_param("+4"), Some(4));
        assert_eq!(parse_index_param("-0"), Some(0));
        assert_eq!(parse_index_param("-1"), None);
        assert_eq!(parse_index_param("abc"), None);
        assert_eq!(parse_index_param(""), None);
    }

    #[test]
    fn movie_page_fallbacks() {
        let items = decode_catalog(&json!([{}]));
        let state = watched();
        let page = movie_detail(&items, Some(0), &state).unwrap();
        assert_eq!(page.header.title, "Movie 1");
        assert_eq!(page.header.image_alt, "Movie 1 thumbnail");
        assert_eq!(page.header.background, PLACEHOLDER_IMAGE);
        assert_eq!(page.player, Player::Unavailable(MOVIE_UNAVAILABLE));
        assert!(!page.watched);
    }

    #[test]
    fn opening_movie_marks_it_watched() {
        let items = decode_catalog(&json!([{"title": "Heat", "embed_link": "heat.mp4"}]));
        let state = watched();
        let page = open_movie(&items, Some(0), &state).unwrap();
        assert!(page.watched);
        assert!(state.is_movie_watched(0));
        assert_eq!(
            page.player,
            Player::Available {
                source: "heat.mp4".into(),
                poster: Some(PLACEHOLDER_IMAGE.into()),
                title: "Heat content".into(),
                aria_label: Some("Heat player".into()),
            }
        );
    }

    #[test]
    fn invalid_index_reports_noun() {
        let items = decode_catalog(&json!([{}]));
        let state = watched();
        let err = open_movie(&items, Some(5), &state).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid movie ID. Please return to the home page."
        );
        assert!(state.movies().is_empty());
        assert_eq!(
            season_detail(&items, None, &state).unwrap_err(),
            DetailError::InvalidIndex { noun: "season" }
        );
    }

    #[test]
    fn season_page_lists_episodes_with_fallbacks() {
        let items = decode_catalog(&json!([{
            "embed_links": [
                {"title": "Pilot", "embed_link": "e1.mp4", "thumbnail": "e1.jpg"},
                {}
            ]
        }]));
        let state = watched();
        state.mark_episode_watched(0, 1);
        let page = season_detail(&items, Some(0), &state).unwrap();
        assert_eq!(page.header.title, "Season 1");
        let EpisodeList::Episodes(episodes) = page.episodes else {
            panic!("expected episodes");
        };
        assert_eq!(episodes[0].title, "Pilot");
        assert!(!episodes[0].watched);
        assert_eq!(episodes[1].title, "Episode 2");
        assert_eq!(episodes[1].dom_id, "episode-title-1");
        assert_eq!(episodes[1].description, NO_DESCRIPTION);
        assert_eq!(episodes[1].player, Player::Unavailable(EPISODE_UNAVAILABLE));
        assert!(episodes[1].watched);
    }

    #[test]
    fn empty_season_shows_placeholder() {
        let items = decode_catalog(&json!([{"title": "S"}]));
        let page = season_detail(&items, Some(0), &watched()).unwrap();
        assert_eq!(page.episodes, EpisodeList::Empty(NO_EPISODES));
    }

    #[test]
    fn toggle_states() {
        assert_eq!(watch_toggle(true, false).label, "✔️ Watched");
        assert_eq!(watch_toggle(true, true).label, "❌ Remove Watched Status");
        assert_eq!(watch_toggle(false, true).label, "👁️ Mark as Watched");
        assert_eq!(watch_toggle(false, false).class, "mark-watched-btn");
        assert_eq!(badge_label(true, false), "❌ Remove");
        assert_eq!(badge_label(false, true), "✔️");
    }
}
