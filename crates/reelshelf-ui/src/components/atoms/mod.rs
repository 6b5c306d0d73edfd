//! Shared UI atoms used across the shell and views.

pub(crate) mod empty_state;
pub(crate) mod error_block;
pub(crate) mod search_input;

pub(crate) use empty_state::EmptyState;
pub(crate) use error_block::ErrorBlock;
pub(crate) use search_input::SearchInput;
