//! Watched-state persistence across engine instances and storage failures.

use reelshelf_core::storage::{KeyValueStore, PersistentStore};
use reelshelf_core::watched::{WATCHED_EPISODES_KEY, WATCHED_MOVIES_KEY, WatchedState};
use reelshelf_test_support::fixtures::TestPlatform;
use reelshelf_test_support::mocks::FailingStore;
use std::rc::Rc;

#[test]
fn state_survives_a_reload() {
    let platform = TestPlatform::new();
    {
        let context = platform.context();
        context.watched.mark_movie_watched(2);
        context.watched.mark_episode_watched(0, 1);
        context.watched.mark_episode_watched(3, 0);
    }

    let reloaded = platform.context();
    assert!(reloaded.watched.is_movie_watched(2));
    assert!(reloaded.watched.is_episode_watched(0, 1));
    assert!(reloaded.watched.is_episode_watched(3, 0));
    assert!(!reloaded.watched.is_episode_watched(0, 0));
}

#[test]
fn persisted_layout_matches_storage_format() {
    let platform = TestPlatform::new();
    let context = platform.context();
    context.watched.mark_movie_watched(4);
    context.watched.mark_movie_watched(1);
    context.watched.mark_episode_watched(10, 2);

    assert_eq!(
        platform.store.get(WATCHED_MOVIES_KEY).unwrap().as_deref(),
        Some("[1,4]")
    );
    assert_eq!(
        platform.store.get(WATCHED_EPISODES_KEY).unwrap().as_deref(),
        Some(r#"{"10":[2]}"#)
    );
}

#[test]
fn two_engines_on_one_store_see_each_other() {
    let platform = TestPlatform::new();
    let first = platform.context();
    let second = platform.context();

    first.watched.mark_movie_watched(0);
    assert!(second.watched.is_movie_watched(0));
    second.watched.unmark_movie_watched(0);
    assert!(!first.watched.is_movie_watched(0));
}

#[test]
fn unavailable_storage_reads_empty_and_never_fails() {
    let watched = WatchedState::new(PersistentStore::new(Rc::new(FailingStore)));

    watched.mark_movie_watched(1);
    assert!(!watched.is_movie_watched(1));
    watched.unmark_movie_watched(1);
    watched.mark_episode_watched(0, 0);
    watched.unmark_episode_watched(0, 0);
    watched.clear_all();

    assert!(watched.movies().is_empty());
    assert!(!watched.is_episode_watched(0, 0));
}

#[test]
fn corrupt_payload_reads_as_empty() {
    let platform = TestPlatform::new();
    platform.store.set(WATCHED_MOVIES_KEY, "not json").unwrap();
    platform.store.set(WATCHED_EPISODES_KEY, "[1,2]").unwrap();
    let context = platform.context();

    assert!(!context.watched.is_movie_watched(0));
    assert!(context.watched.episodes().is_empty());

    context.watched.mark_movie_watched(0);
    assert_eq!(
        platform.store.get(WATCHED_MOVIES_KEY).unwrap().as_deref(),
        Some("[0]")
    );
}

#[test]
fn clear_all_resets_after_reload() {
    let platform = TestPlatform::new();
    let context = platform.context();
    context.watched.mark_movie_watched(0);
    context.watched.mark_episode_watched(1, 1);
    context.watched.clear_all();

    let reloaded = platform.context();
    assert!(reloaded.watched.movies().is_empty());
    assert!(reloaded.watched.episodes().is_empty());
}
