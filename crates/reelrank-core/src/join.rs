//! Hash inner join of rating aggregates to item metadata

use std::collections::HashMap;
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};
use crate::records::{CategorizedItem, ItemId, JoinedRow, RatingAggregate};

/// Items keyed by id. Ids must be unique.
#[derive(Debug)]
pub struct ItemIndex<'a> {
    by_id: HashMap<ItemId, &'a CategorizedItem>,
}

impl<'a> ItemIndex<'a> {
    /// Index items by id, rejecting duplicate ids
    pub fn build(items: &'a [CategorizedItem]) -> PipelineResult<Self> {
        let mut by_id = HashMap::with_capacity(items.len());
        for item in items {
            if by_id.insert(item.item_id, item).is_some() {
                return Err(PipelineError::DuplicateItem {
                    item_id: item.item_id,
                });
            }
        }
        Ok(Self { by_id })
    }

    pub fn get(&self, item_id: ItemId) -> Option<&'a CategorizedItem> {
        self.by_id.get(&item_id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Joined rows plus what the join dropped on each side
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    pub rows: Vec<JoinedRow>,
    /// Rated ids with no metadata row
    pub aggregates_without_item: usize,
    /// Items nobody rated
    pub items_without_ratings: usize,
}

/// Inner join on item id, preserving aggregate order
pub fn inner_join(aggregates: &[RatingAggregate], index: &ItemIndex<'_>) -> JoinOutcome {
    let rows: Vec<JoinedRow> = aggregates
        .iter()
        .filter_map(|agg| {
            index.get(agg.item_id).map(|item| JoinedRow {
                item_id: agg.item_id,
                rating_sum: agg.rating_sum,
                rating_count: agg.rating_count,
                mean_rating: agg.mean_rating,
                title: item.title.clone(),
                categories: item.categories.clone(),
            })
        })
        .collect();

    let aggregates_without_item = aggregates.len() - rows.len();
    let items_without_ratings = index.len() - rows.len();
    debug!(
        joined = rows.len(),
        aggregates_without_item, items_without_ratings, "inner join complete"
    );

    JoinOutcome {
        rows,
        aggregates_without_item,
        items_without_ratings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: ItemId, categories: &[&str]) -> CategorizedItem {
        CategorizedItem {
            item_id: id,
            title: Some(format!("Item {}", id)),
            categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn agg(id: ItemId, sum: f64, count: u64) -> RatingAggregate {
        RatingAggregate {
            item_id: id,
            rating_sum: sum,
            rating_count: count,
            mean_rating: sum / count as f64,
        }
    }

    #[test]
    fn test_inner_join_drops_both_sides() {
        let items = vec![item(10, &["Comedy"]), item(30, &["Drama"])];
        let index = ItemIndex::build(&items).unwrap();
        let aggregates = vec![agg(10, 12.0, 3), agg(20, 2.0, 1)];

        let outcome = inner_join(&aggregates, &index);

        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.rows[0].item_id, 10);
        assert_eq!(outcome.rows[0].categories, vec!["Comedy"]);
        assert_eq!(outcome.rows[0].title.as_deref(), Some("Item 10"));
        assert_eq!(outcome.aggregates_without_item, 1);
        assert_eq!(outcome.items_without_ratings, 1);
    }

    #[test]
    fn test_duplicate_item_rejected() {
        let items = vec![item(10, &["Comedy"]), item(10, &["Drama"])];
        let err = ItemIndex::build(&items).unwrap_err();
        assert!(matches!(err, PipelineError::DuplicateItem { item_id: 10 }));
    }

    #[test]
    fn test_join_preserves_aggregate_order() {
        let items = vec![item(3, &[]), item(1, &[]), item(2, &[])];
        let index = ItemIndex::build(&items).unwrap();
        let aggregates = vec![agg(1, 1.0, 1), agg(2, 2.0, 1), agg(3, 3.0, 1)];

        let ids: Vec<ItemId> = inner_join(&aggregates, &index)
            .rows
            .iter()
            .map(|r| r.item_id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_sides() {
        let items: Vec<CategorizedItem> = Vec::new();
        let index = ItemIndex::build(&items).unwrap();
        assert!(index.is_empty());

        let outcome = inner_join(&[agg(1, 4.0, 1)], &index);
        assert!(outcome.rows.is_empty());
        assert_eq!(outcome.aggregates_without_item, 1);
        assert_eq!(outcome.items_without_ratings, 0);
    }
}
