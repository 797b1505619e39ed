//! Configuration for reelrank runs
//!
//! One structure covers both deployment modes. `local` expects header rows
//! and uses a review threshold of 10; `cluster` expects headerless files and
//! a threshold of 100. Explicit values in the file always win over the
//! mode preset.

use reelrank_io::{ReadOptions, WriteOptions};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::select::Selection;

/// Default target category
pub const DEFAULT_CATEGORY: &str = "Comedy";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {message}")]
    Read { path: String, message: String },

    #[error("Cannot parse {format} config: {message}")]
    Parse { format: String, message: String },

    #[error("Cannot serialize config: {0}")]
    Serialize(String),

    #[error("Unknown deployment mode '{0}' (expected 'local' or 'cluster')")]
    UnknownMode(String),

    #[error("{0}")]
    Invalid(String),
}

/// Deployment preset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    /// Small datasets with header rows
    #[default]
    Local,
    /// Large headerless datasets
    Cluster,
}

impl DeploymentMode {
    pub fn has_header(&self) -> bool {
        matches!(self, DeploymentMode::Local)
    }

    pub fn default_min_reviews(&self) -> u64 {
        match self {
            DeploymentMode::Local => 10,
            DeploymentMode::Cluster => 100,
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentMode::Local => write!(f, "local"),
            DeploymentMode::Cluster => write!(f, "cluster"),
        }
    }
}

impl FromStr for DeploymentMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(DeploymentMode::Local),
            "cluster" => Ok(DeploymentMode::Cluster),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

/// One delimited input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub path: PathBuf,
    /// Overrides the mode's header preset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_header: Option<bool>,
}

impl SourceConfig {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            has_header: None,
        }
    }
}

/// Selection settings as written in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub category: String,
    /// Ignore `category` and rank every item
    pub all_categories: bool,
    /// Overrides the mode's threshold preset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_reviews: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_string(),
            all_categories: false,
            min_reviews: None,
            limit: None,
        }
    }
}

/// Output locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for the ranked results; must not exist yet
    pub results_dir: PathBuf,
    /// Directory for the genre frequency report; skipped when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_report_dir: Option<PathBuf>,
    /// Write a header row in the results file
    pub write_header: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("output/top_rated"),
            genre_report_dir: Some(PathBuf::from("output/genre_counts")),
            write_header: false,
        }
    }
}

/// Full run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub mode: DeploymentMode,
    /// Field delimiter for both inputs and the results file
    pub delimiter: char,
    /// Partitions folded separately during aggregation
    pub partitions: usize,
    pub ratings: SourceConfig,
    pub items: SourceConfig,
    pub selection: SelectionConfig,
    pub output: OutputConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::for_mode(DeploymentMode::Local)
    }
}

impl PipelineConfig {
    /// Preset for a deployment mode
    pub fn for_mode(mode: DeploymentMode) -> Self {
        Self {
            mode,
            delimiter: ',',
            partitions: 1,
            ratings: SourceConfig::at("data/ratings.csv"),
            items: SourceConfig::at("data/movies.csv"),
            selection: SelectionConfig::default(),
            output: OutputConfig::default(),
        }
    }

    pub fn ratings_read_options(&self) -> ReadOptions {
        self.read_options(&self.ratings)
    }

    pub fn items_read_options(&self) -> ReadOptions {
        self.read_options(&self.items)
    }

    fn read_options(&self, source: &SourceConfig) -> ReadOptions {
        ReadOptions {
            delimiter: self.delimiter as u8,
            has_header: source.has_header.unwrap_or(self.mode.has_header()),
        }
    }

    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            delimiter: self.delimiter as u8,
            header: self.output.write_header,
        }
    }

    /// Selection with the mode's threshold filled in
    pub fn selection(&self) -> Selection {
        Selection {
            category: (!self.selection.all_categories)
                .then(|| self.selection.category.clone()),
            min_reviews: self
                .selection
                .min_reviews
                .unwrap_or(self.mode.default_min_reviews()),
            limit: self.selection.limit,
        }
    }

    /// Load from a `.toml` or `.json` file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_toml(&content),
        }
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse {
            format: "TOML".to_string(),
            message: e.to_string(),
        })
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            format: "JSON".to_string(),
            message: e.to_string(),
        })
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ratings.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("ratings.path must be set".to_string()));
        }
        if self.items.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("items.path must be set".to_string()));
        }
        if self.output.results_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "output.results_dir must be set".to_string(),
            ));
        }
        if self.output.genre_report_dir.as_ref() == Some(&self.output.results_dir) {
            return Err(ConfigError::Invalid(
                "output.genre_report_dir must differ from output.results_dir".to_string(),
            ));
        }

        if !self.delimiter.is_ascii() || self.delimiter == '"' {
            return Err(ConfigError::Invalid(format!(
                "delimiter must be a single ASCII character other than '\"', got {:?}",
                self.delimiter
            )));
        }

        if self.partitions == 0 {
            return Err(ConfigError::Invalid(
                "partitions must be at least 1".to_string(),
            ));
        }

        if !self.selection.all_categories && self.selection.category.is_empty() {
            return Err(ConfigError::Invalid(
                "selection.category must not be empty".to_string(),
            ));
        }

        if self.selection.limit == Some(0) {
            return Err(ConfigError::Invalid(
                "selection.limit must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
