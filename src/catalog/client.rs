//! HTTP client for the storefront product listing.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use super::product::{select_matching, Product, ProductListing};
use super::{CatalogError, SearchQuery};
use crate::constants::{MIN_STORE_URL_LEN, PRODUCTS_PATH};

/// Fetches and filters products from a remote catalog.
///
/// One GET per search, no caching. The base URL is passed per call so the
/// client itself holds no store-specific state.
#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    page_size: Option<u32>,
}

impl CatalogClient {
    /// Builds a client whose requests time out after `timeout`.
    ///
    /// `page_size`, when set, is sent as `?limit=N`.
    pub fn new(timeout: Duration, page_size: Option<u32>) -> Result<Self, CatalogError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, page_size })
    }

    /// Searches the catalog at `base_url` for products matching `query`.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Configuration`] if `base_url` is unusable (before any request)
    /// - [`CatalogError::Upstream`] on a non-success status
    /// - [`CatalogError::Transport`] on network failure or timeout
    /// - [`CatalogError::Decode`] if the body is not a product listing
    pub async fn search(&self, base_url: &str, query: &SearchQuery) -> Result<Vec<Product>, CatalogError> {
        let base = validate_base_url(base_url)?;
        let url = match self.page_size {
            Some(n) => format!("{base}{PRODUCTS_PATH}?limit={n}"),
            None => format!("{base}{PRODUCTS_PATH}"),
        };

        debug!(%url, keywords = ?query.keywords, limit = query.limit, "fetching catalog");
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "catalog request failed");
            return Err(CatalogError::Upstream {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let listing: ProductListing = serde_json::from_slice(&body)?;
        let total = listing.products.len();
        let products = select_matching(listing.products, &query.keywords, query.limit);
        debug!(total, returned = products.len(), "catalog search complete");
        Ok(products)
    }
}

/// Minimal sanity check on the store URL. Returns it without trailing slashes.
pub fn validate_base_url(base_url: &str) -> Result<String, CatalogError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.len() < MIN_STORE_URL_LEN {
        return Err(CatalogError::Configuration(base_url.to_string()));
    }
    Ok(trimmed.to_string())
}
