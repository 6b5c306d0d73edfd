//! Sidebar navigation state.
//!
//! # Design
//! - The sidebar lists movies and seasons from the same catalogs as the
//!   galleries; collapsing a section only hides it and never refetches.
//! - Search matches the raw title (missing titles match only an empty query),
//!   case-insensitively, after trimming the query.
//! - The UI debounces keystrokes before calling [`SidebarState::set_query`].

use crate::catalog::{CatalogItem, CatalogKind};
use crate::gallery::Navigation;
use crate::watched::WatchedState;

/// Placeholder for a section with an empty catalog.
pub const EMPTY_SECTION_MESSAGE: &str = "No items available";
/// Placeholder for a section whose catalog failed to load.
pub const FAILED_SECTION_MESSAGE: &str = "Failed to load data.";
/// Placeholder while a section is loading.
pub const LOADING_SECTION_MESSAGE: &str = "Loading...";

/// One navigation link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidebarLink {
    /// Stable catalog index.
    pub index: usize,
    /// Link text: the title, or `"Item {n}"` (1-based).
    pub label: String,
    /// Raw title used for search; empty when missing.
    pub search_title: String,
    /// Detail page opened by the link.
    pub target: Navigation,
    /// Whether the watched badge is shown.
    pub watched: bool,
}

/// Load status of a section.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SectionStatus {
    /// Catalog request in flight.
    #[default]
    Loading,
    /// Catalog loaded.
    Ready(Vec<SidebarLink>),
    /// Catalog request failed.
    Failed,
}

/// A collapsible group of links.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidebarSection {
    /// Catalog feeding this section.
    pub kind: CatalogKind,
    /// Load status.
    pub status: SectionStatus,
    /// Whether the links are hidden.
    pub collapsed: bool,
}

impl SidebarSection {
    const fn new(kind: CatalogKind) -> Self {
        Self {
            kind,
            status: SectionStatus::Loading,
            collapsed: false,
        }
    }

    /// Arrow glyph on the section toggle.
    #[must_use]
    pub const fn arrow(&self) -> &'static str {
        if self.collapsed { "⌄" } else { "˄" }
    }

    /// Placeholder text when there are no links to list.
    #[must_use]
    pub fn placeholder(&self) -> Option<&'static str> {
        match &self.status {
            SectionStatus::Loading => Some(LOADING_SECTION_MESSAGE),
            SectionStatus::Failed => Some(FAILED_SECTION_MESSAGE),
            SectionStatus::Ready(links) if links.is_empty() => Some(EMPTY_SECTION_MESSAGE),
            SectionStatus::Ready(_) => None,
        }
    }
}

/// Open/closed state, sections and search query of the sidebar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidebarState {
    open: bool,
    query: String,
    sections: [SidebarSection; 2],
}

impl Default for SidebarState {
    fn default() -> Self {
        Self {
            open: false,
            query: String::new(),
            sections: [
                SidebarSection::new(CatalogKind::Movies),
                SidebarSection::new(CatalogKind::Seasons),
            ],
        }
    }
}

impl SidebarState {
    /// Closed sidebar with both sections loading.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the drawer is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Open the drawer; page scrolling is locked while open.
    pub const fn open(&mut self) {
        self.open = true;
    }

    /// Close the drawer.
    pub const fn close(&mut self) {
        self.open = false;
    }

    /// Handle a document key press. Returns `true` when the key closed the
    /// drawer.
    pub fn handle_key(&mut self, key: &str) -> bool {
        if key == "Escape" && self.open {
            self.close();
            return true;
        }
        false
    }

    /// Sections in display order.
    #[must_use]
    pub const fn sections(&self) -> &[SidebarSection; 2] {
        &self.sections
    }

    /// Section for `kind`, if the sidebar lists that catalog.
    #[must_use]
    pub fn section(&self, kind: CatalogKind) -> Option<&SidebarSection> {
        self.sections.iter().find(|section| section.kind == kind)
    }

    fn section_mut(&mut self, kind: CatalogKind) -> Option<&mut SidebarSection> {
        self.sections.iter_mut().find(|section| section.kind == kind)
    }

    /// Flip a section between collapsed and expanded.
    pub fn toggle_section(&mut self, kind: CatalogKind) {
        if let Some(section) = self.section_mut(kind) {
            section.collapsed = !section.collapsed;
        }
    }

    /// Populate a section from its loaded catalog.
    pub fn load_section(&mut self, kind: CatalogKind, items: &[CatalogItem], watched: &WatchedState) {
        let Some(section) = self.section_mut(kind) else {
            return;
        };
        let links = items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let target = Navigation::for_item(kind, index)?;
                Some(SidebarLink {
                    index,
                    label: item
                        .title
                        .clone()
                        .unwrap_or_else(|| format!("Item {}", index + 1)),
                    search_title: item.title.clone().unwrap_or_default(),
                    target,
                    watched: kind == CatalogKind::Movies && watched.is_movie_watched(index),
                })
            })
            .collect();
        section.status = SectionStatus::Ready(links);
    }

    /// Mark a section as failed.
    pub fn fail_section(&mut self, kind: CatalogKind) {
        if let Some(section) = self.section_mut(kind) {
            section.status = SectionStatus::Failed;
        }
    }

    /// Re-read watched badges after a mark or unmark elsewhere on the page.
    pub fn refresh_watched(&mut self, watched: &WatchedState) {
        for section in &mut self.sections {
            let is_movies = section.kind == CatalogKind::Movies;
            if let SectionStatus::Ready(links) = &mut section.status {
                for link in links {
                    link.watched = is_movies && watched.is_movie_watched(link.index);
                }
            }
        }
    }

    /// Current search query as typed.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Apply a (debounced) search query.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Links of `kind` matching the current query.
    #[must_use]
    pub fn visible_links(&self, kind: CatalogKind) -> Vec<&SidebarLink> {
        let needle = self.query.trim().to_lowercase();
        match self.section(kind).map(|section| &section.status) {
            Some(SectionStatus::Ready(links)) => links
                .iter()
                .filter(|link| link.search_title.to_lowercase().contains(&needle))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Number of links matching the query across every section.
    #[must_use]
    pub fn result_count(&self) -> usize {
        self.sections
            .iter()
            .map(|section| self.visible_links(section.kind).len())
            .sum()
    }

    /// Result count announcement, shown only while a query is active.
    #[must_use]
    pub fn result_summary(&self) -> Option<String> {
        if self.query.trim().is_empty() {
            return None;
        }
        Some(match self.result_count() {
            1 => "1 result".to_string(),
            count => format!("{count} results"),
        })
    }
}
