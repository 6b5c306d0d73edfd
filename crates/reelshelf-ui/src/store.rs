//! App-wide yewdux store slices.
//!
//! # Design
//! - Keep shared UI state in one store to avoid ad-hoc contexts.
//! - Reducers are plain functions over `&mut AppStore` so they test natively.
//! - Watched state itself lives in storage; the store only carries a revision
//!   counter that forces dependants to re-read it after a mutation.

use reelshelf_core::catalog::{CatalogItem, CatalogKind};
use reelshelf_core::error::FetchError;
use reelshelf_core::gallery::SortMode;
use reelshelf_core::preferences::Theme;
use reelshelf_core::sidebar::SidebarState;
use reelshelf_core::watched::WatchedState;
use std::rc::Rc;
use yewdux::store::Store;

/// Global application store for shared state.
#[derive(Clone, Debug, PartialEq, Store, Default)]
pub struct AppStore {
    /// Loaded catalogs.
    pub catalogs: CatalogSlice,
    /// Gallery sort selections.
    pub sort: SortSlice,
    /// Sidebar drawer state.
    pub sidebar: SidebarState,
    /// Viewer preferences mirrored from storage.
    pub preferences: PreferenceSlice,
    /// Bumped after every watched mutation.
    pub watched_revision: u64,
}

/// Load state of one catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CatalogLoad {
    /// Request in flight.
    #[default]
    Loading,
    /// Catalog decoded.
    Ready(Rc<Vec<CatalogItem>>),
    /// Request failed; holds the error text for logging.
    Failed(String),
}

impl CatalogLoad {
    /// Items when loaded.
    #[must_use]
    pub fn items(&self) -> Option<&[CatalogItem]> {
        match self {
            Self::Ready(items) => Some(items.as_slice()),
            Self::Loading | Self::Failed(_) => None,
        }
    }
}

/// Catalog load states.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogSlice {
    /// Movie catalog.
    pub movies: CatalogLoad,
    /// Season catalog.
    pub seasons: CatalogLoad,
    /// Coming-soon catalog.
    pub coming_soon: CatalogLoad,
}

impl CatalogSlice {
    /// Load state for `kind`.
    #[must_use]
    pub const fn get(&self, kind: CatalogKind) -> &CatalogLoad {
        match kind {
            CatalogKind::Movies => &self.movies,
            CatalogKind::Seasons => &self.seasons,
            CatalogKind::ComingSoon => &self.coming_soon,
        }
    }

    fn get_mut(&mut self, kind: CatalogKind) -> &mut CatalogLoad {
        match kind {
            CatalogKind::Movies => &mut self.movies,
            CatalogKind::Seasons => &mut self.seasons,
            CatalogKind::ComingSoon => &mut self.coming_soon,
        }
    }
}

/// Sort selections for the sortable galleries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortSlice {
    /// Movie gallery order.
    pub movies: SortMode,
    /// Season gallery order.
    pub seasons: SortMode,
}

/// Preferences mirrored into the store so toggles re-render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreferenceSlice {
    /// Active theme.
    pub theme: Theme,
    /// Whether previews play muted.
    pub preview_muted: bool,
}

impl Default for PreferenceSlice {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            preview_muted: true,
        }
    }
}

/// Record the outcome of a catalog load and feed the sidebar.
pub fn set_catalog(
    store: &mut AppStore,
    kind: CatalogKind,
    result: Result<Vec<CatalogItem>, FetchError>,
    watched: &WatchedState,
) {
    match result {
        Ok(items) => {
            store.sidebar.load_section(kind, &items, watched);
            *store.catalogs.get_mut(kind) = CatalogLoad::Ready(Rc::new(items));
        }
        Err(err) => {
            store.sidebar.fail_section(kind);
            *store.catalogs.get_mut(kind) = CatalogLoad::Failed(err.to_string());
        }
    }
}

/// Change the sort mode of a gallery. Coming soon keeps catalog order.
pub fn set_sort(store: &mut AppStore, kind: CatalogKind, mode: SortMode) {
    match kind {
        CatalogKind::Movies => store.sort.movies = mode,
        CatalogKind::Seasons => store.sort.seasons = mode,
        CatalogKind::ComingSoon => {}
    }
}

/// Sort mode of a gallery.
#[must_use]
pub const fn sort_for(store: &AppStore, kind: CatalogKind) -> SortMode {
    match kind {
        CatalogKind::Movies => store.sort.movies,
        CatalogKind::Seasons => store.sort.seasons,
        CatalogKind::ComingSoon => SortMode::Default,
    }
}

/// Signal that watched state changed and refresh sidebar badges.
pub fn watched_changed(store: &mut AppStore, watched: &WatchedState) {
    store.watched_revision = store.watched_revision.wrapping_add(1);
    store.sidebar.refresh_watched(watched);
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelshelf_core::storage::{MemoryStore, PersistentStore};
    use reelshelf_core::sidebar::SectionStatus;

    fn watched() -> WatchedState {
        WatchedState::new(PersistentStore::new(Rc::new(MemoryStore::new())))
    }

    fn movie(title: &str) -> CatalogItem {
        CatalogItem {
            title: Some(title.to_string()),
            ..CatalogItem::default()
        }
    }

    #[test]
    fn catalogs_start_loading() {
        let store = AppStore::default();
        for kind in CatalogKind::ALL {
            assert_eq!(store.catalogs.get(kind), &CatalogLoad::Loading);
        }
        assert!(store.preferences.preview_muted);
    }

    #[test]
    fn successful_load_feeds_gallery_and_sidebar() {
        let mut store = AppStore::default();
        set_catalog(
            &mut store,
            CatalogKind::Movies,
            Ok(vec![movie("Heat"), movie("Ran")]),
            &watched(),
        );
        assert_eq!(store.catalogs.movies.items().map(<[_]>::len), Some(2));
        assert_eq!(store.sidebar.visible_links(CatalogKind::Movies).len(), 2);
    }

    #[test]
    fn failed_load_marks_section_failed() {
        let mut store = AppStore::default();
        set_catalog(
            &mut store,
            CatalogKind::Seasons,
            Err(FetchError::TimedOut),
            &watched(),
        );
        assert_eq!(
            store.catalogs.seasons,
            CatalogLoad::Failed("Request timed out".to_string())
        );
        assert_eq!(
            store.sidebar.section(CatalogKind::Seasons).map(|s| &s.status),
            Some(&SectionStatus::Failed)
        );
        assert_eq!(store.catalogs.seasons.items(), None);
    }

    #[test]
    fn sort_is_tracked_per_gallery() {
        let mut store = AppStore::default();
        set_sort(&mut store, CatalogKind::Seasons, SortMode::Title);
        set_sort(&mut store, CatalogKind::ComingSoon, SortMode::Title);
        assert_eq!(sort_for(&store, CatalogKind::Seasons), SortMode::Title);
        assert_eq!(sort_for(&store, CatalogKind::Movies), SortMode::Default);
        assert_eq!(sort_for(&store, CatalogKind::ComingSoon), SortMode::Default);
    }

    #[test]
    fn watched_change_bumps_revision_and_badges() {
        let state = watched();
        let mut store = AppStore::default();
        set_catalog(&mut store, CatalogKind::Movies, Ok(vec![movie("Heat")]), &state);
        state.mark_movie_watched(0);
        watched_changed(&mut store, &state);
        assert_eq!(store.watched_revision, 1);
        assert!(store.sidebar.visible_links(CatalogKind::Movies)[0].watched);
    }
}
