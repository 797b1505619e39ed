//! Pipeline orchestration
//!
//! `rank_items` is the pure core: ratings and categorized items in, ranked
//! rows out. `Pipeline` wraps it with loading, the genre report, result
//! writing and the run report. Any stage error aborts the run.

use reelrank_io::{read_records, IoError, OutputDir, WriteOptions};
use reelrank_stats::{aggregate_partitioned, LabelCount};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::category::{category_frequency, expand_items};
use crate::config::PipelineConfig;
use crate::error::PipelineResult;
use crate::join::{inner_join, ItemIndex};
use crate::records::{
    CategorizedItem, ItemId, ItemRecord, RatingAggregate, RatingRecord, ResultRecord,
};
use crate::report::{profile_ratings, RunReport};
use crate::select::{select_top, Selection};

/// Rows kept in the run report preview
pub const PREVIEW_ROWS: usize = 10;

/// Both source tables, as loaded
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub ratings: Vec<RatingRecord>,
    pub items: Vec<ItemRecord>,
}

/// Output of the ranking stages with the counts each stage observed
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub aggregates: usize,
    pub joined_rows: usize,
    pub aggregates_without_item: usize,
    pub items_without_ratings: usize,
    pub category_matches: usize,
    pub results: Vec<ResultRecord>,
}

/// Group ratings by item and compute sum, count and mean
pub fn aggregate_ratings(
    ratings: &[RatingRecord],
    partitions: usize,
) -> PipelineResult<Vec<RatingAggregate>> {
    let pairs: Vec<(ItemId, f64)> = ratings.iter().map(|r| (r.item_id, r.rating)).collect();
    let aggregates = aggregate_partitioned(&pairs, partitions)?;
    Ok(aggregates.into_iter().map(RatingAggregate::from).collect())
}

/// Aggregate, join, filter and sort
pub fn rank_items(
    ratings: &[RatingRecord],
    items: &[CategorizedItem],
    selection: &Selection,
    partitions: usize,
) -> PipelineResult<Ranking> {
    let aggregates = aggregate_ratings(ratings, partitions)?;
    info!(groups = aggregates.len(), "aggregated ratings by item");

    let index = ItemIndex::build(items)?;
    let joined = inner_join(&aggregates, &index);
    if joined.aggregates_without_item > 0 {
        warn!(
            dropped = joined.aggregates_without_item,
            "rated items missing from metadata were dropped by the join"
        );
    }
    info!(rows = joined.rows.len(), "joined aggregates to items");

    let joined_rows = joined.rows.len();
    let selected = select_top(joined.rows, selection);
    info!(
        category_matches = selected.category_matches,
        results = selected.results.len(),
        "selected and sorted rows"
    );

    Ok(Ranking {
        aggregates: aggregates.len(),
        joined_rows,
        aggregates_without_item: joined.aggregates_without_item,
        items_without_ratings: joined.items_without_ratings,
        category_matches: selected.category_matches,
        results: selected.results,
    })
}

/// Write ranked rows as a part-file directory
pub fn write_results(
    results: &[ResultRecord],
    dir: &Path,
    options: WriteOptions,
) -> PipelineResult<PathBuf> {
    let mut out = OutputDir::create(dir)?;
    out.write_csv_part(results, options)?;
    Ok(out.finish()?)
}

/// Write `category,count` rows as a part-file directory
pub fn write_genre_report(counts: &[LabelCount], dir: &Path) -> PipelineResult<PathBuf> {
    let mut out = OutputDir::create(dir)?;
    out.write_csv_part(counts, WriteOptions::default())?;
    Ok(out.finish()?)
}

/// A configured, validated pipeline
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn load_ratings(&self) -> PipelineResult<Vec<RatingRecord>> {
        let path = &self.config.ratings.path;
        let ratings: Vec<RatingRecord> = read_records(path, self.config.ratings_read_options())?;
        info!(path = %path.display(), rows = ratings.len(), "loaded ratings");
        Ok(ratings)
    }

    pub fn load_items(&self) -> PipelineResult<Vec<ItemRecord>> {
        let path = &self.config.items.path;
        let items: Vec<ItemRecord> = read_records(path, self.config.items_read_options())?;
        info!(path = %path.display(), rows = items.len(), "loaded items");
        Ok(items)
    }

    pub fn load_tables(&self) -> PipelineResult<Tables> {
        Ok(Tables {
            ratings: self.load_ratings()?,
            items: self.load_items()?,
        })
    }

    /// Load items and count them per category, writing the report if configured
    pub fn genre_report(&self) -> PipelineResult<(Vec<LabelCount>, Option<PathBuf>)> {
        let items = expand_items(&self.load_items()?);
        self.emit_genre_report(&items)
    }

    fn emit_genre_report(
        &self,
        items: &[CategorizedItem],
    ) -> PipelineResult<(Vec<LabelCount>, Option<PathBuf>)> {
        let counts = category_frequency(items);
        info!(categories = counts.len(), "counted items per category");

        let written = match &self.config.output.genre_report_dir {
            Some(dir) => {
                let path = write_genre_report(&counts, dir)?;
                info!(path = %path.display(), "wrote genre report");
                Some(path)
            }
            None => None,
        };
        Ok((counts, written))
    }

    /// Fail if any destination directory already exists
    pub fn check_destinations(&self) -> PipelineResult<()> {
        let output = &self.config.output;
        let dirs = std::iter::once(&output.results_dir).chain(output.genre_report_dir.as_ref());
        for dir in dirs {
            if dir.exists() {
                return Err(IoError::OutputExists(dir.display().to_string()).into());
            }
        }
        Ok(())
    }

    /// Run every stage and write both outputs. Nothing is written unless
    /// every stage before the writes succeeded.
    pub fn run(&self) -> PipelineResult<RunReport> {
        self.check_destinations()?;
        let tables = self.load_tables()?;
        let selection = self.config.selection();
        let profile = profile_ratings(&tables.ratings)?;
        info!(
            mean = profile.summary.mean,
            median = profile.summary.median,
            high = profile.high_ratings,
            top = profile.top_ratings,
            outside = profile.histogram.outside(),
            "profiled rating column"
        );

        let items = expand_items(&tables.items);
        let ranking = rank_items(
            &tables.ratings,
            &items,
            &selection,
            self.config.partitions,
        )?;

        let (_, genre_report_dir) = self.emit_genre_report(&items)?;

        let results_dir = write_results(
            &ranking.results,
            &self.config.output.results_dir,
            self.config.write_options(),
        )?;
        info!(
            path = %results_dir.display(),
            rows = ranking.results.len(),
            "wrote results"
        );

        Ok(RunReport {
            mode: self.config.mode,
            category: selection.category,
            min_reviews: selection.min_reviews,
            ratings_loaded: tables.ratings.len(),
            items_loaded: tables.items.len(),
            aggregates: ranking.aggregates,
            joined_rows: ranking.joined_rows,
            aggregates_without_item: ranking.aggregates_without_item,
            items_without_ratings: ranking.items_without_ratings,
            category_matches: ranking.category_matches,
            results: ranking.results.len(),
            results_dir: Some(results_dir),
            genre_report_dir,
            profile: Some(profile),
            top: ranking.results.into_iter().take(PREVIEW_ROWS).collect(),
        })
    }
}
