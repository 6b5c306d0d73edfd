//! Page configuration loader.
//!
//! Reads an optional `<script id="reelshelf-config" type="application/json">`
//! block and resolves catalog URLs against the app root.

use reelshelf_core::config::ShelfConfig;
use reelshelf_core::error::ConfigError;

/// Element id of the inline configuration block.
pub const CONFIG_ELEMENT_ID: &str = "reelshelf-config";

/// Parse the inline configuration block; defaults when the page has none.
///
/// # Errors
/// Returns [`ConfigError`] when the block is present but invalid.
pub fn load_config() -> Result<ShelfConfig, ConfigError> {
    inline_config().map_or_else(|| Ok(ShelfConfig::default()), |raw| ShelfConfig::from_json(&raw))
}

/// Make every catalog URL absolute against the configured base path, so deep
/// links such as `/movie/3` fetch the same files as the gallery.
#[must_use]
pub fn resolve_catalog_urls(config: ShelfConfig) -> ShelfConfig {
    match page_href() {
        Some(href) => config.resolve_catalogs(&href),
        None => config,
    }
}

fn inline_config() -> Option<String> {
    let document = web_sys::window()?.document()?;
    document
        .get_element_by_id(CONFIG_ELEMENT_ID)?
        .text_content()
        .filter(|raw| !raw.trim().is_empty())
}

fn page_href() -> Option<String> {
    web_sys::window()?.location().href().ok()
}
