//! Catalog model decoded from the static JSON descriptors.
//!
//! # Design
//! - Decoding is tolerant: unknown fields are ignored, missing or non-string
//!   fields become `None`, and empty strings count as missing so title
//!   fallbacks behave the same for `""` and absent values.
//! - Identity is positional. [`IndexedItem`] carries the index from the
//!   fetched array through every sort and copy.

use serde_json::{Map, Value};

/// The three catalogs served by the site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    /// Feature films with a single player link.
    Movies,
    /// Episodic seasons.
    Seasons,
    /// Announced items with an optional trailer.
    ComingSoon,
}

impl CatalogKind {
    /// Every catalog in page order.
    pub const ALL: [Self; 3] = [Self::Movies, Self::Seasons, Self::ComingSoon];

    /// Route/query parameter name used in card ids and detail links.
    #[must_use]
    pub const fn param(self) -> &'static str {
        match self {
            Self::Movies => "movie",
            Self::Seasons => "season",
            Self::ComingSoon => "item",
        }
    }

    /// Whether cards of this catalog open a detail page.
    #[must_use]
    pub const fn has_detail_page(self) -> bool {
        !matches!(self, Self::ComingSoon)
    }

    /// Placeholder shown when the catalog is empty.
    #[must_use]
    pub const fn empty_message(self) -> &'static str {
        match self {
            Self::Movies | Self::Seasons => "Nothing to show here.",
            Self::ComingSoon => "No upcoming projects scheduled.",
        }
    }

    /// Section error shown when the catalog cannot be loaded.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Movies => "Failed to load movies. Please try again later.",
            Self::Seasons => "Failed to load episodes. Please try again later.",
            Self::ComingSoon => "Failed to load upcoming releases. Please try again later.",
        }
    }

    /// Section heading.
    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::Movies => "Movies",
            Self::Seasons => "Seasons",
            Self::ComingSoon => "Coming Soon",
        }
    }
}

/// One episode of a season.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EpisodeRef {
    /// Episode title.
    pub title: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Player source.
    pub embed_link: Option<String>,
    /// Poster image.
    pub thumbnail: Option<String>,
}

impl EpisodeRef {
    /// Decode one episode entry. Non-object entries decode as an empty
    /// episode so sibling indices stay stable.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(fields) = value.as_object() else {
            return Self::default();
        };
        Self {
            title: text(fields, &["title"]),
            description: text(fields, &["description"]),
            embed_link: text(fields, &["embed_link", "embedLink", "video"]),
            thumbnail: text(fields, &["thumbnail"]),
        }
    }
}

/// A movie, season or coming-soon entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogItem {
    /// Display title.
    pub title: Option<String>,
    /// Card and header image.
    pub thumbnail: Option<String>,
    /// Description; may contain `**bold**` runs.
    pub description: Option<String>,
    /// Player source for movies.
    pub embed_link: Option<String>,
    /// Trailer for coming-soon entries.
    pub trailer: Option<String>,
    /// Explicit hover-preview clip.
    pub preview: Option<String>,
    /// Ordered episodes for seasons.
    pub episodes: Vec<EpisodeRef>,
}

impl CatalogItem {
    /// Decode one catalog entry from its JSON value.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(fields) = value.as_object() else {
            return Self::default();
        };
        let episodes = ["embed_links", "episodes"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_array))
            .map(|list| list.iter().map(EpisodeRef::from_value).collect())
            .unwrap_or_default();
        Self {
            title: text(fields, &["title"]),
            thumbnail: text(fields, &["thumbnail"]),
            description: text(fields, &["description"]),
            embed_link: text(fields, &["embed_link", "embedLink", "video"]),
            trailer: text(fields, &["trailer"]),
            preview: text(fields, &["preview"]),
            episodes,
        }
    }

    /// Title or the empty string, the key used for title sorting.
    #[must_use]
    pub fn sort_title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }
}

/// Decode a catalog payload. Anything other than a JSON array yields an
/// empty catalog.
#[must_use]
pub fn decode_catalog(value: &Value) -> Vec<CatalogItem> {
    value
        .as_array()
        .map(|items| items.iter().map(CatalogItem::from_value).collect())
        .unwrap_or_default()
}

/// A catalog entry paired with its position in the fetched array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexedItem<'a> {
    /// Stable index in the source catalog.
    pub index: usize,
    /// The entry itself.
    pub item: &'a CatalogItem,
}

/// Pair every entry with its source index, preserving catalog order.
#[must_use]
pub fn indexed(items: &[CatalogItem]) -> Vec<IndexedItem<'_>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| IndexedItem { index, item })
        .collect()
}

fn text(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| fields.get(*key).and_then(Value::as_str))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
