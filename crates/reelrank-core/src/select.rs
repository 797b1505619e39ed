//! Selection and ordering of joined rows
//!
//! Keeps rows whose category list contains the target category and whose
//! review count is strictly above the threshold, then orders them by mean
//! rating, highest first.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::records::{JoinedRow, ResultRecord};

/// Resolved selection parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Exact, case-sensitive category to require. `None` keeps every row.
    pub category: Option<String>,

    /// Rows need strictly more reviews than this
    pub min_reviews: u64,

    /// Keep only the first `limit` rows after sorting
    pub limit: Option<usize>,
}

impl Selection {
    pub fn new(category: impl Into<String>, min_reviews: u64) -> Self {
        Self {
            category: Some(category.into()),
            min_reviews,
            limit: None,
        }
    }

    /// Selection with no category filter
    pub fn any_category(min_reviews: u64) -> Self {
        Self {
            category: None,
            min_reviews,
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches_category(&self, row: &JoinedRow) -> bool {
        match &self.category {
            Some(category) => row.categories.iter().any(|c| c == category),
            None => true,
        }
    }

    pub fn passes_threshold(&self, row: &JoinedRow) -> bool {
        row.rating_count > self.min_reviews
    }
}

/// Selected rows plus the intermediate count before the threshold
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOutcome {
    /// Rows in the target category, before the review-count threshold
    pub category_matches: usize,
    pub results: Vec<ResultRecord>,
}

/// Descending by mean rating. Stable, so ties keep their input order.
pub fn sort_by_mean_desc(rows: &mut [JoinedRow]) {
    rows.sort_by(|a, b| b.mean_rating.total_cmp(&a.mean_rating));
}

/// Filter, sort and project joined rows
pub fn select_top(rows: Vec<JoinedRow>, selection: &Selection) -> SelectOutcome {
    let in_category: Vec<JoinedRow> = rows
        .into_iter()
        .filter(|row| selection.matches_category(row))
        .collect();
    let category_matches = in_category.len();

    let mut kept: Vec<JoinedRow> = in_category
        .into_iter()
        .filter(|row| selection.passes_threshold(row))
        .collect();
    sort_by_mean_desc(&mut kept);

    if let Some(limit) = selection.limit {
        kept.truncate(limit);
    }

    debug!(
        category = selection.category.as_deref().unwrap_or("*"),
        min_reviews = selection.min_reviews,
        category_matches,
        selected = kept.len(),
        "selection complete"
    );

    SelectOutcome {
        category_matches,
        results: kept.into_iter().map(ResultRecord::from).collect(),
    }
}
