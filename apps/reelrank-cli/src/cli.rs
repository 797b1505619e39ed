//! Command-line arguments
//!
//! Flags layer over the config file, which layers over the mode preset.

use clap::{Args, Parser, Subcommand};
use reelrank_core::{ConfigError, DeploymentMode, PipelineConfig};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "reelrank",
    version,
    about = "Rank the highest-rated movies in a genre from ratings and movie metadata"
)]
pub struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full pipeline and write the results and genre report
    Run {
        #[command(flatten)]
        args: RunArgs,

        /// Print the run report as JSON instead of a results table
        #[arg(long)]
        report: bool,
    },

    /// Count items per genre and write the genre report
    Genres {
        #[command(flatten)]
        args: RunArgs,
    },

    /// Summarize and bucket the rating column
    Stats {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print the resolved configuration as TOML
    Config {
        #[command(flatten)]
        args: RunArgs,
    },
}

/// Input and preset flags
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// TOML or JSON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Deployment preset: local (header rows, threshold 10) or cluster (no header, threshold 100)
    #[arg(long)]
    pub mode: Option<DeploymentMode>,

    /// Ratings file (user_id,item_id,rating,rating_id)
    #[arg(long)]
    pub ratings: Option<PathBuf>,

    /// Movies file (item_id,title,genres)
    #[arg(long)]
    pub items: Option<PathBuf>,

    /// Both inputs start with a header row
    #[arg(long, conflicts_with = "no_header")]
    pub header: bool,

    /// Neither input has a header row
    #[arg(long)]
    pub no_header: bool,

    /// Field delimiter
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Partitions to aggregate separately before merging
    #[arg(long)]
    pub partitions: Option<usize>,
}

impl SourceArgs {
    /// Build the configuration these flags describe
    pub fn resolve(&self) -> Result<PipelineConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::for_mode(self.mode.unwrap_or_default()),
        };

        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(path) = &self.ratings {
            config.ratings.path = path.clone();
        }
        if let Some(path) = &self.items {
            config.items.path = path.clone();
        }

        let header = if self.header {
            Some(true)
        } else if self.no_header {
            Some(false)
        } else {
            None
        };
        if header.is_some() {
            config.ratings.has_header = header;
            config.items.has_header = header;
        }

        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        if let Some(partitions) = self.partitions {
            config.partitions = partitions;
        }

        Ok(config)
    }
}

/// Selection flags
#[derive(Debug, Clone, Default, Args)]
pub struct SelectionArgs {
    /// Genre to rank (exact, case-sensitive)
    #[arg(long, conflicts_with = "all_categories")]
    pub category: Option<String>,

    /// Rank across every genre
    #[arg(long)]
    pub all_categories: bool,

    /// Keep movies with strictly more reviews than this
    #[arg(long)]
    pub min_reviews: Option<u64>,

    /// Keep only the top N movies
    #[arg(long)]
    pub limit: Option<usize>,
}

impl SelectionArgs {
    pub fn apply(&self, config: &mut PipelineConfig) {
        if self.all_categories {
            config.selection.all_categories = true;
        } else if let Some(category) = &self.category {
            config.selection.category = category.clone();
            config.selection.all_categories = false;
        }
        if let Some(min_reviews) = self.min_reviews {
            config.selection.min_reviews = Some(min_reviews);
        }
        if let Some(limit) = self.limit {
            config.selection.limit = Some(limit);
        }
    }
}

/// Output flags
#[derive(Debug, Clone, Default, Args)]
pub struct OutputArgs {
    /// Results directory (must not exist)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Genre report directory (must not exist)
    #[arg(long, conflicts_with = "no_genre_report")]
    pub genre_report: Option<PathBuf>,

    /// Skip writing the genre report
    #[arg(long)]
    pub no_genre_report: bool,

    /// Write a header row in the results file
    #[arg(long)]
    pub write_header: bool,
}

impl OutputArgs {
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(dir) = &self.output {
            config.output.results_dir = dir.clone();
        }
        if self.no_genre_report {
            config.output.genre_report_dir = None;
        } else if let Some(dir) = &self.genre_report {
            config.output.genre_report_dir = Some(dir.clone());
        }
        if self.write_header {
            config.output.write_header = true;
        }
    }
}

/// Everything a pipeline run can be configured with
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl RunArgs {
    pub fn resolve(&self) -> Result<PipelineConfig, ConfigError> {
        let mut config = self.source.resolve()?;
        self.selection.apply(&mut config);
        self.output.apply(&mut config);
        Ok(config)
    }
}
