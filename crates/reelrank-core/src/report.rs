//! Run reports and rating profiles

use reelrank_stats::{Histogram, SummaryStats};
use serde::Serialize;
use std::path::PathBuf;

use crate::config::DeploymentMode;
use crate::error::PipelineResult;
use crate::records::{RatingRecord, ResultRecord};

/// Lowest histogram edge for the rating scale
pub const RATING_HISTOGRAM_MIN: i64 = 0;
/// Highest histogram edge; one past the top rating so 5.0 lands in `[5, 6]`
pub const RATING_HISTOGRAM_MAX: i64 = 6;
/// Ratings strictly above this count as high
pub const HIGH_RATING_FLOOR: f64 = 4.0;
/// Top of the rating scale
pub const TOP_RATING: f64 = 5.0;

/// Distribution of the rating column
#[derive(Debug, Clone, Serialize)]
pub struct RatingProfile {
    pub summary: SummaryStats,
    pub histogram: Histogram,
    /// Ratings above `HIGH_RATING_FLOOR`
    pub high_ratings: usize,
    /// Ratings equal to `TOP_RATING`
    pub top_ratings: usize,
}

/// Summarize the rating column and bucket it into unit-width bins
pub fn profile_ratings(ratings: &[RatingRecord]) -> PipelineResult<RatingProfile> {
    let values: Vec<f64> = ratings.iter().map(|r| r.rating).collect();
    let mut histogram = Histogram::integer_edges(RATING_HISTOGRAM_MIN, RATING_HISTOGRAM_MAX)?;
    for &v in &values {
        histogram.push(v);
    }

    Ok(RatingProfile {
        summary: SummaryStats::from_data(&values),
        histogram,
        high_ratings: values.iter().filter(|&&v| v > HIGH_RATING_FLOOR).count(),
        top_ratings: values.iter().filter(|&&v| v == TOP_RATING).count(),
    })
}

/// What one run loaded, dropped, selected and wrote
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub mode: DeploymentMode,
    pub category: Option<String>,
    pub min_reviews: u64,

    pub ratings_loaded: usize,
    pub items_loaded: usize,
    pub aggregates: usize,
    pub joined_rows: usize,
    pub aggregates_without_item: usize,
    pub items_without_ratings: usize,
    pub category_matches: usize,
    pub results: usize,

    pub results_dir: Option<PathBuf>,
    pub genre_report_dir: Option<PathBuf>,

    pub profile: Option<RatingProfile>,

    /// Leading rows of the result
    pub top: Vec<ResultRecord>,
}

impl RunReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
