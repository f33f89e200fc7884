//! Product records: the raw storefront shape and the trimmed [`Product`]
//! surfaced to the model and UI.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// A product as handed to the model. Built per search, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    /// Rich-text (HTML) description.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// First image of the listing, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<Value>,
}

/// Body of `GET {store}/products.json`.
#[derive(Debug, Deserialize)]
pub struct ProductListing {
    pub products: Vec<RawProduct>,
}

#[derive(Debug, Deserialize)]
pub struct RawProduct {
    title: String,
    #[serde(default)]
    body_html: Option<String>,
    #[serde(default)]
    product_type: Option<String>,
    #[serde(default)]
    tags: Option<RawTags>,
    #[serde(default)]
    images: Vec<RawImage>,
    #[serde(default)]
    variants: Vec<Value>,
    #[serde(default)]
    options: Vec<Value>,
}

/// Storefronts return tags either as a list or as one comma-separated string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTags {
    List(Vec<String>),
    Csv(String),
}

#[derive(Debug, Deserialize)]
struct RawImage {
    src: String,
}

impl RawTags {
    fn into_set(self) -> BTreeSet<String> {
        let items: Vec<String> = match self {
            RawTags::List(list) => list,
            RawTags::Csv(csv) => csv.split(',').map(str::to_string).collect(),
        };
        items
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

impl RawProduct {
    /// True when any needle is a substring of the lowercased title.
    /// Needles must already be lowercase; stops at the first hit.
    fn title_matches(&self, needles: &[String]) -> bool {
        let title = self.title.to_lowercase();
        needles.iter().any(|n| title.contains(n.as_str()))
    }
}

impl From<RawProduct> for Product {
    fn from(raw: RawProduct) -> Self {
        Self {
            title: raw.title,
            description: raw.body_html.unwrap_or_default(),
            category: raw.product_type.unwrap_or_default(),
            tags: raw.tags.map(RawTags::into_set).unwrap_or_default(),
            image: raw.images.into_iter().next().map(|img| img.src),
            variants: raw.variants,
            options: raw.options,
        }
    }
}

/// Filters a listing down to the products whose title contains any keyword.
///
/// Every product is scanned and included at most once. Matches keep catalog
/// order; when there are more than `limit`, the tail is dropped.
pub fn select_matching(products: Vec<RawProduct>, keywords: &[String], limit: usize) -> Vec<Product> {
    let needles: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    let mut matched: Vec<RawProduct> = products
        .into_iter()
        .filter(|p| p.title_matches(&needles))
        .collect();
    if matched.len() > limit {
        tracing::debug!(matched = matched.len(), limit, "truncating catalog matches");
        matched.truncate(limit);
    }
    matched.into_iter().map(Product::from).collect()
}
