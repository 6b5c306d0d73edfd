//! Watched-state engine.
//!
//! # Design
//! - Movies are tracked as a set of catalog indices under `watchedMovies`.
//! - Episodes are tracked per season under `watchedEpisodes`, keyed by the
//!   stringified season index. A missing season key reads as an empty set.
//! - Every query reads through the store so other tabs' writes are visible;
//!   every effective mutation writes the whole structure back immediately.
//! - Unmarking the last episode of a season keeps the (now empty) season key.
//! - Stored lists decode element by element: entries that are not
//!   non-negative integers are dropped instead of discarding the whole list.

use crate::storage::PersistentStore;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Storage key for the watched movie set.
pub const WATCHED_MOVIES_KEY: &str = "watchedMovies";
/// Storage key for the watched episode map.
pub const WATCHED_EPISODES_KEY: &str = "watchedEpisodes";

/// Watched movie indices.
pub type WatchedMovies = BTreeSet<usize>;
/// Watched episode indices keyed by stringified season index.
pub type WatchedEpisodes = BTreeMap<String, BTreeSet<usize>>;

/// Tracks which movies and episodes the viewer has seen.
#[derive(Clone, Debug)]
pub struct WatchedState {
    store: PersistentStore,
}

impl WatchedState {
    /// Engine backed by `store`.
    #[must_use]
    pub const fn new(store: PersistentStore) -> Self {
        Self { store }
    }

    /// Snapshot of the watched movie set.
    #[must_use]
    pub fn movies(&self) -> WatchedMovies {
        indices(&self.store.get(WATCHED_MOVIES_KEY, Vec::<Value>::new()))
    }

    /// Snapshot of the watched episode map.
    #[must_use]
    pub fn episodes(&self) -> WatchedEpisodes {
        self.store
            .get(WATCHED_EPISODES_KEY, BTreeMap::<String, Value>::new())
            .into_iter()
            .filter_map(|(season, episodes)| match episodes {
                Value::Array(entries) => Some((season, indices(&entries))),
                _ => None,
            })
            .collect()
    }

    /// Whether the movie at `index` is marked watched.
    #[must_use]
    pub fn is_movie_watched(&self, index: usize) -> bool {
        self.movies().contains(&index)
    }

    /// Mark a movie watched. Returns `true` when the set changed; storage is
    /// only written in that case.
    pub fn mark_movie_watched(&self, index: usize) -> bool {
        let mut movies = self.movies();
        let changed = movies.insert(index);
        if changed {
            debug!(index, "marking movie watched");
            self.store.set(WATCHED_MOVIES_KEY, &movies);
        }
        changed
    }

    /// Remove a movie from the watched set. Storage is rewritten even when the
    /// movie was not watched.
    pub fn unmark_movie_watched(&self, index: usize) {
        let mut movies = self.movies();
        movies.remove(&index);
        debug!(index, "unmarking movie watched");
        self.store.set(WATCHED_MOVIES_KEY, &movies);
    }

    /// Whether `episode` of `season` is marked watched.
    #[must_use]
    pub fn is_episode_watched(&self, season: usize, episode: usize) -> bool {
        self.episodes()
            .get(&season_key(season))
            .is_some_and(|set| set.contains(&episode))
    }

    /// Mark an episode watched, creating the season entry when needed. Returns
    /// `true` when the map changed; storage is only written in that case.
    pub fn mark_episode_watched(&self, season: usize, episode: usize) -> bool {
        let mut episodes = self.episodes();
        let changed = episodes.entry(season_key(season)).or_default().insert(episode);
        if changed {
            debug!(season, episode, "marking episode watched");
            self.store.set(WATCHED_EPISODES_KEY, &episodes);
        }
        changed
    }

    /// Remove an episode from its season's watched set. Does nothing when the
    /// season has never been recorded.
    pub fn unmark_episode_watched(&self, season: usize, episode: usize) {
        let mut episodes = self.episodes();
        let Some(set) = episodes.get_mut(&season_key(season)) else {
            return;
        };
        set.remove(&episode);
        debug!(season, episode, "unmarking episode watched");
        self.store.set(WATCHED_EPISODES_KEY, &episodes);
    }

    /// Unmark every episode of `season` in one write.
    pub fn unmark_season(&self, season: usize) {
        let mut episodes = self.episodes();
        let Some(set) = episodes.get_mut(&season_key(season)) else {
            return;
        };
        set.clear();
        self.store.set(WATCHED_EPISODES_KEY, &episodes);
    }

    /// Number of watched episodes recorded for `season`.
    #[must_use]
    pub fn watched_episode_count(&self, season: usize) -> usize {
        self.episodes()
            .get(&season_key(season))
            .map_or(0, BTreeSet::len)
    }

    /// Whether every one of `episode_count` episodes is watched. A season with
    /// no episodes is never complete.
    #[must_use]
    pub fn is_season_complete(&self, season: usize, episode_count: usize) -> bool {
        if episode_count == 0 {
            return false;
        }
        self.episodes()
            .get(&season_key(season))
            .is_some_and(|set| (0..episode_count).all(|episode| set.contains(&episode)))
    }

    /// Overwrite both structures with empty values.
    pub fn clear_all(&self) {
        debug!("clearing all watched state");
        self.store.set(WATCHED_MOVIES_KEY, &WatchedMovies::new());
        self.store.set(WATCHED_EPISODES_KEY, &WatchedEpisodes::new());
    }
}

fn season_key(season: usize) -> String {
    season.to_string()
}

fn indices(entries: &[Value]) -> BTreeSet<usize> {
    entries
        .iter()
        .filter_map(Value::as_u64)
        .filter_map(|index| usize::try_from(index).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};
    use std::rc::Rc;

    fn engine() -> (Rc<MemoryStore>, WatchedState) {
        let backend = Rc::new(MemoryStore::new());
        let state = WatchedState::new(PersistentStore::new(backend.clone()));
        (backend, state)
    }

    #[test]
    fn movie_mark_and_unmark_are_idempotent() {
        let (_, state) = engine();
        assert!(state.mark_movie_watched(3));
        assert!(!state.mark_movie_watched(3));
        assert!(state.is_movie_watched(3));
        assert_eq!(state.movies().len(), 1);

        state.unmark_movie_watched(3);
        state.unmark_movie_watched(3);
        assert!(!state.is_movie_watched(3));
    }

    #[test]
    fn repeated_mark_does_not_rewrite_storage() {
        let (backend, state) = engine();
        state.mark_movie_watched(1);
        backend.set(WATCHED_MOVIES_KEY, "[1,2]").unwrap();
        state.mark_movie_watched(1);
        assert_eq!(
            backend.get(WATCHED_MOVIES_KEY).unwrap().as_deref(),
            Some("[1,2]")
        );
    }

    #[test]
    fn malformed_entries_are_dropped_individually() {
        let (backend, state) = engine();
        backend
            .set(WATCHED_MOVIES_KEY, r#"[0, 1, 2.5, -1, "3", null]"#)
            .unwrap();
        assert!(state.is_movie_watched(0));
        assert!(state.is_movie_watched(1));
        assert!(!state.is_movie_watched(3));

        assert!(state.mark_movie_watched(5));
        assert_eq!(
            backend.get(WATCHED_MOVIES_KEY).unwrap().as_deref(),
            Some("[0,1,5]")
        );
    }

    #[test]
    fn malformed_episode_entries_keep_their_season() {
        let (backend, state) = engine();
        backend
            .set(WATCHED_EPISODES_KEY, r#"{"0": [0, "x", 2], "1": "bad"}"#)
            .unwrap();
        assert!(state.is_episode_watched(0, 0));
        assert!(state.is_episode_watched(0, 2));
        assert_eq!(state.watched_episode_count(0), 2);
        assert_eq!(state.watched_episode_count(1), 0);

        assert!(state.mark_episode_watched(1, 4));
        assert_eq!(
            backend.get(WATCHED_EPISODES_KEY).unwrap().as_deref(),
            Some(r#"{"0":[0,2],"1":[4]}"#)
        );
    }

    #[test]
    fn unmark_movie_writes_even_without_change() {
        let (backend, state) = engine();
        state.unmark_movie_watched(4);
        assert_eq!(
            backend.get(WATCHED_MOVIES_KEY).unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn seasons_are_independent() {
        let (_, state) = engine();
        state.mark_episode_watched(0, 2);
        assert!(state.is_episode_watched(0, 2));
        assert!(!state.is_episode_watched(1, 2));
        assert!(!state.is_episode_watched(0, 1));
    }

    #[test]
    fn unmark_episode_on_unknown_season_writes_nothing() {
        let (backend, state) = engine();
        state.unmark_episode_watched(5, 0);
        assert!(backend.is_empty());
    }

    #[test]
    fn emptied_season_key_is_kept() {
        let (backend, state) = engine();
        state.mark_episode_watched(2, 0);
        state.unmark_episode_watched(2, 0);
        assert!(!state.is_episode_watched(2, 0));
        assert_eq!(
            backend.get(WATCHED_EPISODES_KEY).unwrap().as_deref(),
            Some(r#"{"2":[]}"#)
        );
    }

    #[test]
    fn season_completion_requires_every_episode() {
        let (_, state) = engine();
        assert!(!state.is_season_complete(0, 0));
        state.mark_episode_watched(0, 0);
        assert!(!state.is_season_complete(0, 2));
        state.mark_episode_watched(0, 1);
        assert!(state.is_season_complete(0, 2));
        assert_eq!(state.watched_episode_count(0), 2);

        state.unmark_season(0);
        assert_eq!(state.watched_episode_count(0), 0);
    }

    #[test]
    fn reads_legacy_payloads_written_by_other_tabs() {
        let (backend, state) = engine();
        backend
            .set(WATCHED_EPISODES_KEY, r#"{"0":[1,1,3],"7":[]}"#)
            .unwrap();
        assert!(state.is_episode_watched(0, 3));
        assert_eq!(state.watched_episode_count(0), 2);
    }

    #[test]
    fn clear_all_overwrites_both_structures() {
        let (backend, state) = engine();
        state.mark_movie_watched(0);
        state.mark_episode_watched(1, 1);
        state.clear_all();
        assert!(state.movies().is_empty());
        assert!(state.episodes().is_empty());
        assert_eq!(
            backend.get(WATCHED_EPISODES_KEY).unwrap().as_deref(),
            Some("{}")
        );
    }
}
