//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::pagination::DEFAULT_ITEMS_PER_PAGE;

fn default_per_page() -> usize {
    DEFAULT_ITEMS_PER_PAGE
}

#[derive(Clone, Debug, Deserialize)]
/// Settings shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    /// Signing key for the flash message cookie; at least 64 bytes.
    pub secret: String,
    /// Base address of the content API, e.g. `http://localhost:1337`.
    pub api_url: String,
    /// Events shown per listing page.
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}
