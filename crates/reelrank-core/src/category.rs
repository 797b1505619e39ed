//! Category expansion
//!
//! Genre strings arrive as `Comedy|Drama|Romance`. Splitting keeps token
//! order and duplicates, drops empty tokens, and applies no trimming or case
//! folding, so matching later is exact-string containment.

use reelrank_stats::{count_labels, LabelCount};
use tracing::debug;

use crate::records::{CategorizedItem, ItemId, ItemRecord};

/// Separator between labels in a raw genre string
pub const CATEGORY_DELIMITER: char = '|';

/// Split a raw genre string into its non-empty labels
pub fn split_categories(raw: &str) -> Vec<String> {
    raw.split(CATEGORY_DELIMITER)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Attach a category list to every item. Null genres yield an empty list.
pub fn expand_items(items: &[ItemRecord]) -> Vec<CategorizedItem> {
    items
        .iter()
        .map(|item| CategorizedItem {
            item_id: item.item_id,
            title: item.title.clone(),
            categories: item
                .genres
                .as_deref()
                .map(split_categories)
                .unwrap_or_default(),
        })
        .collect()
}

/// One row per (item, category) pair
pub fn explode_categories(items: &[CategorizedItem]) -> Vec<(ItemId, &str)> {
    items
        .iter()
        .flat_map(|item| {
            item.categories
                .iter()
                .map(move |category| (item.item_id, category.as_str()))
        })
        .collect()
}

/// Number of item rows per category, most frequent first
pub fn category_frequency(items: &[CategorizedItem]) -> Vec<LabelCount> {
    let exploded = explode_categories(items);
    debug!(rows = exploded.len(), "exploded categories");
    count_labels(exploded.into_iter().map(|(_, category)| category))
}
