//! Record types flowing between pipeline stages
//!
//! Source rows are decoded straight from their schemas; derived rows are
//! built once by a stage and handed to the next one unchanged.

use reelrank_io::{ColumnDescriptor, ColumnType, FromRow, IoResult, RowView, TableSchema};
use reelrank_stats::KeyedAggregate;
use serde::{Deserialize, Serialize};

/// Item (movie) identifier shared by both source tables
pub type ItemId = i64;

/// One review event from the ratings source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub user_id: i64,
    pub item_id: ItemId,
    pub rating: f64,
    pub rating_id: Option<i64>,
}

impl RatingRecord {
    pub fn new(user_id: i64, item_id: ItemId, rating: f64) -> Self {
        Self {
            user_id,
            item_id,
            rating,
            rating_id: None,
        }
    }
}

impl FromRow for RatingRecord {
    fn schema() -> TableSchema {
        TableSchema::new(
            "ratings",
            vec![
                ColumnDescriptor::required("user_id", ColumnType::Int64),
                ColumnDescriptor::required("item_id", ColumnType::Int64),
                ColumnDescriptor::required("rating", ColumnType::Float64)
                    .with_description("Rating on the 0-5 scale"),
                ColumnDescriptor::new("rating_id", ColumnType::Int64),
            ],
        )
    }

    fn from_row(row: &RowView<'_>) -> IoResult<Self> {
        Ok(Self {
            user_id: row.int("user_id")?,
            item_id: row.int("item_id")?,
            rating: row.float("rating")?,
            rating_id: row.opt_int("rating_id")?,
        })
    }
}

/// One row of item metadata as loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub item_id: ItemId,
    pub title: Option<String>,
    /// Raw pipe-delimited genre string
    pub genres: Option<String>,
}

impl ItemRecord {
    pub fn new(item_id: ItemId, title: &str, genres: &str) -> Self {
        Self {
            item_id,
            title: Some(title.to_string()),
            genres: Some(genres.to_string()),
        }
    }
}

impl FromRow for ItemRecord {
    fn schema() -> TableSchema {
        TableSchema::new(
            "items",
            vec![
                ColumnDescriptor::required("item_id", ColumnType::Int64),
                ColumnDescriptor::new("title", ColumnType::String),
                ColumnDescriptor::new("genres", ColumnType::String)
                    .with_description("Pipe-delimited genre labels"),
            ],
        )
    }

    fn from_row(row: &RowView<'_>) -> IoResult<Self> {
        Ok(Self {
            item_id: row.int("item_id")?,
            title: row.opt_string("title")?.map(str::to_string),
            genres: row.opt_string("genres")?.map(str::to_string),
        })
    }
}

/// An item with its genre string split into labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizedItem {
    pub item_id: ItemId,
    pub title: Option<String>,
    pub categories: Vec<String>,
}

/// Per-item rating totals. `rating_count` is never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingAggregate {
    pub item_id: ItemId,
    pub rating_sum: f64,
    pub rating_count: u64,
    pub mean_rating: f64,
}

impl From<KeyedAggregate<ItemId>> for RatingAggregate {
    fn from(agg: KeyedAggregate<ItemId>) -> Self {
        Self {
            item_id: agg.key,
            rating_sum: agg.sum,
            rating_count: agg.count,
            mean_rating: agg.mean,
        }
    }
}

/// Aggregate joined with its item metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRow {
    pub item_id: ItemId,
    pub rating_sum: f64,
    pub rating_count: u64,
    pub mean_rating: f64,
    pub title: Option<String>,
    pub categories: Vec<String>,
}

/// Final output row. Field order is the output column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub item_id: ItemId,
    pub mean_rating: f64,
    pub rating_count: u64,
    pub title: Option<String>,
}

impl From<JoinedRow> for ResultRecord {
    fn from(row: JoinedRow) -> Self {
        Self {
            item_id: row.item_id,
            mean_rating: row.mean_rating,
            rating_count: row.rating_count,
            title: row.title,
        }
    }
}
