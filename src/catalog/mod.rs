//! Storefront catalog access.
//!
//! [`CatalogClient`] fetches the store's full product listing in one request
//! and filters it locally: a product matches when any keyword is a
//! case-insensitive substring of its title. Matches keep catalog order and are
//! truncated from the tail to the requested limit.

mod client;
mod product;

pub use client::CatalogClient;
pub use product::Product;

use thiserror::Error;

use crate::constants::{DEFAULT_MAX_RESULTS, MAX_RESULTS_CAP};

/// Failures of a single catalog search.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The configured base URL failed validation; no request was made.
    #[error("store url invalid: {0:?}")]
    Configuration(String),
    /// The catalog answered with a non-success status.
    #[error("catalog responded with HTTP {status}")]
    Upstream { status: u16 },
    /// Network failure or timeout. Handled like [`CatalogError::Upstream`].
    #[error("catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The body was not a product listing.
    #[error("catalog response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Keywords plus a bounded result count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keywords: Vec<String>,
    pub limit: usize,
}

impl SearchQuery {
    /// Builds a query, clamping `limit` to the hard cap.
    pub fn new(keywords: Vec<String>, limit: u32) -> Self {
        Self {
            keywords,
            limit: limit.min(MAX_RESULTS_CAP) as usize,
        }
    }

    /// Human-readable form used in badges and error cards.
    pub fn display(&self) -> String {
        self.keywords.join(", ")
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self::new(Vec::new(), DEFAULT_MAX_RESULTS)
    }
}

#[cfg(test)]
mod tests;
