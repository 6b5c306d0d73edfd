//! Gallery view model: sorting, card content and card actions.
//!
//! # Design
//! - `render` is a pure function of the catalog, the sort mode and the
//!   watched engine; callers re-render the whole gallery after any action.
//! - Cards carry the stable catalog index, never a title lookup, so items
//!   with duplicate titles still open the right detail page.

use crate::catalog::{CatalogItem, CatalogKind, IndexedItem, indexed};
use crate::watched::WatchedState;
use feruca::Collator;
use std::cmp::Ordering;
use std::convert::Infallible;
use std::str::FromStr;

/// Gallery ordering selected by the sort control.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Catalog order.
    #[default]
    Default,
    /// Alphabetical by title.
    Title,
}

impl SortMode {
    /// Value used by the sort `<select>`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Title => "title",
        }
    }
}

impl FromStr for SortMode {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(if value == "title" {
            Self::Title
        } else {
            Self::Default
        })
    }
}

/// Order two titles with the Unicode collation algorithm (CLDR root order):
/// base letters decide first, accents and case only break ties. Titles with
/// equal collation keys fall back to code point order to keep the order total.
#[must_use]
pub fn compare_titles(left: &str, right: &str) -> Ordering {
    collate_titles(&mut Collator::default(), left, right)
}

fn collate_titles(collator: &mut Collator, left: &str, right: &str) -> Ordering {
    collator.collate(left, right).then_with(|| left.cmp(right))
}

/// Sorted copy of `items`. The source slice is left untouched and each entry
/// keeps its catalog index.
#[must_use]
pub fn sort_items(items: &[CatalogItem], mode: SortMode) -> Vec<IndexedItem<'_>> {
    let mut sorted = indexed(items);
    if mode == SortMode::Title {
        let mut collator = Collator::default();
        sorted.sort_by(|a, b| {
            collate_titles(&mut collator, a.item.sort_title(), b.item.sort_title())
        });
    }
    sorted
}

/// Detail page a card or sidebar link leads to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// Movie page for the catalog index.
    Movie(usize),
    /// Season page for the catalog index.
    Season(usize),
}

impl Navigation {
    /// Target for a catalog entry, if its catalog has detail pages.
    #[must_use]
    pub const fn for_item(kind: CatalogKind, index: usize) -> Option<Self> {
        match kind {
            CatalogKind::Movies => Some(Self::Movie(index)),
            CatalogKind::Seasons => Some(Self::Season(index)),
            CatalogKind::ComingSoon => None,
        }
    }

    /// Router path.
    #[must_use]
    pub fn path(self) -> String {
        match self {
            Self::Movie(index) => format!("/movie/{index}"),
            Self::Season(index) => format!("/season/{index}"),
        }
    }
}

/// Run of description text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DescriptionSegment {
    /// Text rendered as-is.
    Plain(String),
    /// Text that was wrapped in `**`.
    Bold(String),
}

/// Split `text` on non-greedy `**bold**` runs. An unpaired `**` stays literal.
#[must_use]
pub fn parse_description(text: &str) -> Vec<DescriptionSegment> {
    let mut segments = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find("**") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("**") else {
            break;
        };
        if open > 0 {
            segments.push(DescriptionSegment::Plain(rest[..open].to_string()));
        }
        segments.push(DescriptionSegment::Bold(after_open[..close].to_string()));
        rest = &after_open[close + 2..];
    }
    if !rest.is_empty() {
        segments.push(DescriptionSegment::Plain(rest.to_string()));
    }
    segments
}

/// Source for the hover preview clip of a card.
#[must_use]
pub fn preview_source(kind: CatalogKind, item: &CatalogItem) -> Option<String> {
    if kind == CatalogKind::ComingSoon && item.trailer.is_some() {
        return item.trailer.clone();
    }
    if kind == CatalogKind::Seasons && !item.episodes.is_empty() {
        return item.episodes[0].embed_link.clone();
    }
    if kind == CatalogKind::Movies && item.embed_link.is_some() {
        return item.embed_link.clone();
    }
    item.preview.clone().or_else(|| item.embed_link.clone())
}

/// Playback offset for a hover preview: ten seconds before the midpoint,
/// clamped at the start.
#[must_use]
pub fn preview_start_seconds(duration: f64) -> f64 {
    if duration.is_finite() {
        (duration / 2.0 - 10.0).max(0.0)
    } else {
        0.0
    }
}

/// Everything a gallery card displays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    /// Stable catalog index.
    pub index: usize,
    /// DOM id of the card title, `card-{param}-{position}`.
    pub dom_id: String,
    /// Title with the `"Untitled"` fallback.
    pub title: String,
    /// Thumbnail URL, empty when missing.
    pub thumbnail: String,
    /// Thumbnail alt text.
    pub image_alt: String,
    /// Accessible label for clickable cards.
    pub aria_label: Option<String>,
    /// Detail page opened by the card.
    pub target: Option<Navigation>,
    /// Hover preview clip.
    pub preview: Option<String>,
    /// Description runs; empty when there is no description.
    pub description: Vec<DescriptionSegment>,
    /// Whether the watched badge is shown.
    pub watched: bool,
}

impl Card {
    /// Identity for keyed rendering. Follows the item across sort changes,
    /// unlike `dom_id` which follows the display slot.
    #[must_use]
    pub const fn render_key(&self) -> usize {
        self.index
    }
}

/// Rendered gallery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GalleryView {
    /// One card per item, in display order.
    Cards(Vec<Card>),
    /// Placeholder for an empty or missing catalog.
    Empty {
        /// Text shown in place of cards.
        message: &'static str,
    },
}

/// Build the gallery for `items`. Watched badges are re-read from `watched`
/// on every call.
#[must_use]
pub fn render(
    kind: CatalogKind,
    items: Option<&[CatalogItem]>,
    mode: SortMode,
    watched: &WatchedState,
) -> GalleryView {
    let items = items.unwrap_or_default();
    if items.is_empty() {
        return GalleryView::Empty {
            message: kind.empty_message(),
        };
    }
    let sorted = if kind == CatalogKind::ComingSoon {
        indexed(items)
    } else {
        sort_items(items, mode)
    };
    GalleryView::Cards(
        sorted
            .into_iter()
            .enumerate()
            .map(|(position, entry)| build_card(kind, position, entry, watched))
            .collect(),
    )
}

fn build_card(
    kind: CatalogKind,
    position: usize,
    entry: IndexedItem<'_>,
    watched: &WatchedState,
) -> Card {
    let IndexedItem { index, item } = entry;
    let title = item.title.clone().unwrap_or_else(|| "Untitled".to_string());
    let target = Navigation::for_item(kind, index);
    let badge = match kind {
        CatalogKind::Movies => watched.is_movie_watched(index),
        CatalogKind::Seasons => watched.is_season_complete(index, item.episodes.len()),
        CatalogKind::ComingSoon => false,
    };
    Card {
        index,
        dom_id: format!("card-{}-{position}", kind.param()),
        image_alt: format!("{title} thumbnail"),
        aria_label: target.map(|_| {
            format!("View {} details", item.title.as_deref().unwrap_or("item"))
        }),
        target,
        thumbnail: item.thumbnail.clone().unwrap_or_default(),
        preview: preview_source(kind, item),
        description: item
            .description
            .as_deref()
            .map(parse_description)
            .unwrap_or_default(),
        watched: badge,
        title,
    }
}

/// User interaction on a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GalleryAction {
    /// Card clicked or activated with Enter/Space.
    Open(usize),
    /// Watched badge clicked.
    Unmark(usize),
}

/// Apply `action` to the watched engine and report where to navigate.
/// Opening a movie marks it watched; opening a season does not. Unmarking a
/// season clears all of its episodes. Callers re-render after any action.
pub fn apply_action(
    kind: CatalogKind,
    action: GalleryAction,
    watched: &WatchedState,
) -> Option<Navigation> {
    match action {
        GalleryAction::Open(index) => {
            if kind == CatalogKind::Movies {
                watched.mark_movie_watched(index);
            }
            Navigation::for_item(kind, index)
        }
        GalleryAction::Unmark(index) => {
            match kind {
                CatalogKind::Movies => watched.unmark_movie_watched(index),
                CatalogKind::Seasons => watched.unmark_season(index),
                CatalogKind::ComingSoon => {}
            }
            None
        }
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
    fn sort_mode_parses_title_only() {
        assert_eq!("title".parse::<SortMode>(), Ok(SortMode::Title));
        assert_eq!("newest".parse::<SortMode>(), Ok(SortMode::Default));
    }

    #[test]
    fn title_sort_puts_missing_titles_first_and_keeps_source() {
        let items = decode_catalog(&json!([{"title": "B"}, {}, {"title": "A"}]));
        let sorted: Vec<_> = sort_items(&items, SortMode::Title)
            .iter()
            .map(|entry| entry.item.sort_title().to_string())
            .collect();
        assert_eq!(sorted, ["", "A", "B"]);
        assert_eq!(items[0].sort_title(), "B");

        let default: Vec<_> = sort_items(&items, SortMode::Default)
            .iter()
            .map(|entry| entry.index)
            .collect();
        assert_eq!(default, [0, 1, 2]);
    }

    #[test]
    fn title_comparison_ignores_case_first() {
        assert_eq!(compare_titles("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_titles("Zed", "alpha"), Ordering::Greater);
    }

    #[test]
    fn title_sort_files_accented_titles_under_their_base_letter() {
        let items = decode_catalog(&json!([
            {"title": "Zulu"},
            {"title": "Éclair"},
            {"title": "apple"},
            {"title": "B"},
            {"title": "A"},
            {},
        ]));
        let sorted: Vec<_> = sort_items(&items, SortMode::Title)
            .iter()
            .map(|entry| entry.item.sort_title().to_string())
            .collect();
        assert_eq!(sorted, ["", "A", "apple", "B", "Éclair", "Zulu"]);
        assert_eq!(compare_titles("Amélie", "Amelie"), Ordering::Greater);
        assert_eq!(compare_titles("Amélie", "Amelia"), Ordering::Greater);
        assert_eq!(compare_titles("Ödipus", "Zorro"), Ordering::Less);
    }

    #[test]
    fn description_bold_runs() {
        assert_eq!(
            parse_description("A **bold** move and **more**"),
            vec![
                DescriptionSegment::Plain("A ".into()),
                DescriptionSegment::Bold("bold".into()),
                DescriptionSegment::Plain(" move and ".into()),
                DescriptionSegment::Bold("more".into()),
            ]
        );
        assert_eq!(
            parse_description("open ** only"),
            vec![DescriptionSegment::Plain("open ** only".into())]
        );
    }

    #[test]
    fn preview_source_follows_catalog_rules() {
        let season = CatalogItem::from_value(&json!({
            "preview": "p.mp4",
            "embed_links": [{"embed_link": "ep1.mp4"}]
        }));
        assert_eq!(
            preview_source(CatalogKind::Seasons, &season).as_deref(),
            Some("ep1.mp4")
        );
        let upcoming = CatalogItem::from_value(&json!({"trailer": "t.mp4", "preview": "p.mp4"}));
        assert_eq!(
            preview_source(CatalogKind::ComingSoon, &upcoming).as_deref(),
            Some("t.mp4")
        );
        let bare = CatalogItem::from_value(&json!({"preview": "p.mp4"}));
        assert_eq!(
            preview_source(CatalogKind::Movies, &bare).as_deref(),
            Some("p.mp4")
        );
        assert_eq!(preview_start_seconds(12.0), 0.0);
        assert_eq!(preview_start_seconds(100.0), 40.0);
    }

    #[test]
    fn cards_carry_stable_index_and_fallbacks() {
        let items = decode_catalog(&json!([{"title": "B"}, {"description": "x"}]));
        let GalleryView::Cards(cards) =
            render(CatalogKind::Movies, Some(items.as_slice()), SortMode::Title, &watched())
        else {
            panic!("expected cards");
        };
        assert_eq!(cards[0].index, 1);
        assert_eq!(cards[0].title, "Untitled");
        assert_eq!(cards[0].dom_id, "card-movie-0");
        assert_eq!(cards[0].image_alt, "Untitled thumbnail");
        assert_eq!(cards[0].aria_label.as_deref(), Some("View item details"));
        assert_eq!(cards[0].target, Some(Navigation::Movie(1)));
        assert_eq!(cards[1].target.map(Navigation::path).as_deref(), Some("/movie/0"));
    }

    #[test]
    fn render_key_follows_item_across_sort_modes() {
        let items = decode_catalog(&json!([{"title": "Zulu"}, {"title": "Alpha"}]));
        let state = watched();
        let keys = |mode| match render(CatalogKind::Movies, Some(items.as_slice()), mode, &state) {
            GalleryView::Cards(cards) => cards
                .iter()
                .map(|card| (card.title.clone(), card.render_key(), card.dom_id.clone()))
                .collect::<Vec<_>>(),
            GalleryView::Empty { .. } => panic!("expected cards"),
        };
        assert_eq!(
            keys(SortMode::Default),
            [
                ("Zulu".to_string(), 0, "card-movie-0".to_string()),
                ("Alpha".to_string(), 1, "card-movie-1".to_string()),
            ]
        );
        assert_eq!(
            keys(SortMode::Title),
            [
                ("Alpha".to_string(), 1, "card-movie-0".to_string()),
                ("Zulu".to_string(), 0, "card-movie-1".to_string()),
            ]
        );
    }

    #[test]
    fn empty_or_missing_catalog_renders_placeholder() {
        let state = watched();
        assert_eq!(
            render(CatalogKind::Movies, None, SortMode::Default, &state),
            GalleryView::Empty {
                message: "Nothing to show here."
            }
        );
        assert_eq!(
            render(CatalogKind::ComingSoon, Some(&[][..]), SortMode::Default, &state),
            GalleryView::Empty {
                message: "No upcoming projects scheduled."
            }
        );
    }

    #[test]
    fn opening_movie_marks_and_unmark_rerenders_without_badge() {
        let state = watched();
        let items = decode_catalog(&json!([{"title": "Only"}]));
        assert_eq!(
            apply_action(CatalogKind::Movies, GalleryAction::Open(0), &state),
            Some(Navigation::Movie(0))
        );
        let GalleryView::Cards(cards) =
            render(CatalogKind::Movies, Some(items.as_slice()), SortMode::Default, &state)
        else {
            panic!("expected cards");
        };
        assert!(cards[0].watched);

        assert_eq!(
            apply_action(CatalogKind::Movies, GalleryAction::Unmark(0), &state),
            None
        );
        assert!(!state.is_movie_watched(0));
    }

    #[test]
    fn season_badge_requires_every_episode() {
        let state = watched();
        let items = decode_catalog(&json!([{"embed_links": [{}, {}]}]));
        assert_eq!(
            apply_action(CatalogKind::Seasons, GalleryAction::Open(0), &state),
            Some(Navigation::Season(0))
        );
        assert_eq!(state.watched_episode_count(0), 0);

        state.mark_episode_watched(0, 0);
        state.mark_episode_watched(0, 1);
        let GalleryView::Cards(cards) =
            render(CatalogKind::Seasons, Some(items.as_slice()), SortMode::Default, &state)
        else {
            panic!("expected cards");
        };
        assert!(cards[0].watched);

        apply_action(CatalogKind::Seasons, GalleryAction::Unmark(0), &state);
        assert!(!state.is_episode_watched(0, 1));
    }

    #[test]
    fn coming_soon_cards_are_not_clickable() {
        let state = watched();
        let items = decode_catalog(&json!([{"title": "Soon", "trailer": "t.mp4"}]));
        let GalleryView::Cards(cards) =
            render(CatalogKind::ComingSoon, Some(items.as_slice()), SortMode::Title, &state)
        else {
            panic!("expected cards");
        };
        assert_eq!(cards[0].dom_id, "card-item-0");
        assert_eq!(cards[0].aria_label, None);
        assert_eq!(
            apply_action(CatalogKind::ComingSoon, GalleryAction::Open(0), &state),
            None
        );
    }
}
