//! Shared fixtures for pipeline integration tests

#![allow(dead_code)]

use reelrank_core::{DeploymentMode, PipelineConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const RATINGS_HEADER: &str = "userId,movieId,rating,timestamp";
pub const MOVIES_HEADER: &str = "movieId,title,genres";

/// Twelve ratings over five rated ids; id 99 has no metadata row
pub const RATINGS_ROWS: &[&str] = &[
    "1,1,4.0,964982703",
    "2,1,5.0,964981247",
    "3,1,3.0,",
    "1,3,4.0,964982224",
    "2,3,5.0,964983815",
    "3,3,4.5,964982931",
    "4,3,4.5,964982400",
    "1,4,5.0,964980868",
    "1,5,2.0,964982176",
    "2,5,3.0,964984041",
    "3,5,4.0,964984100",
    "1,99,5.0,964984200",
];

/// Five movies; Jumanji (2) is never rated
pub const MOVIES_ROWS: &[&str] = &[
    "1,Toy Story (1995),Adventure|Animation|Children|Comedy|Fantasy",
    "2,Jumanji (1995),Adventure|Children|Fantasy",
    "3,Grumpier Old Men (1995),Comedy|Romance",
    "4,Heat (1995),Action|Crime|Thriller",
    "5,Sabrina (1995),Comedy|Romance",
];

pub fn write_table(dir: &Path, name: &str, header: Option<&str>, rows: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut content = String::new();
    if let Some(header) = header {
        content.push_str(header);
        content.push('\n');
    }
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    fs::write(&path, content).unwrap();
    path
}

/// Fixture tables on disk plus a config pointing at them
pub struct Workspace {
    pub dir: TempDir,
    pub config: PipelineConfig,
}

impl Workspace {
    pub fn new(mode: DeploymentMode) -> Self {
        let (ratings_header, movies_header) = if mode.has_header() {
            (Some(RATINGS_HEADER), Some(MOVIES_HEADER))
        } else {
            (None, None)
        };
        Self::with_rows(mode, ratings_header, RATINGS_ROWS, movies_header, MOVIES_ROWS)
    }

    pub fn with_rows(
        mode: DeploymentMode,
        ratings_header: Option<&str>,
        ratings: &[&str],
        movies_header: Option<&str>,
        movies: &[&str],
    ) -> Self {
        let dir = TempDir::new().unwrap();
        let ratings_path = write_table(dir.path(), "ratings.csv", ratings_header, ratings);
        let movies_path = write_table(dir.path(), "movies.csv", movies_header, movies);

        let mut config = PipelineConfig::for_mode(mode);
        config.ratings.path = ratings_path;
        config.items.path = movies_path;
        config.output.results_dir = dir.path().join("top_rated");
        config.output.genre_report_dir = Some(dir.path().join("genre_counts"));

        Self { dir, config }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

pub fn read_part(dir: &Path) -> String {
    fs::read_to_string(dir.join("part-00000.csv")).unwrap()
}
