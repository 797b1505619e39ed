//! Part-file output directories
//!
//! Results are written the way batch jobs lay them out on shared storage:
//! a fresh directory holding numbered `part-NNNNN` files and an empty
//! `_SUCCESS` marker once every part has been flushed.

use crate::reader::{IoError, IoResult};
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the completion marker
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// Options for delimited part files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    pub delimiter: u8,

    /// Emit a header row derived from the record's field names
    pub header: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            header: false,
        }
    }
}

/// A freshly created output directory
#[derive(Debug)]
pub struct OutputDir {
    root: PathBuf,
    next_part: usize,
}

impl OutputDir {
    /// Create the directory; an existing path is an error
    pub fn create(path: impl AsRef<Path>) -> IoResult<Self> {
        let root = path.as_ref().to_path_buf();
        if root.exists() {
            return Err(IoError::OutputExists(root.display().to_string()));
        }

        fs::create_dir_all(&root).map_err(|e| write_error(&root, e))?;
        debug!(path = %root.display(), "created output directory");

        Ok(Self { root, next_part: 0 })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    fn next_part_path(&mut self, extension: &str) -> PathBuf {
        let name = format!("part-{:05}.{}", self.next_part, extension);
        self.next_part += 1;
        self.root.join(name)
    }

    /// Write serializable records as one delimited part file
    pub fn write_csv_part<T: Serialize>(
        &mut self,
        records: &[T],
        options: WriteOptions,
    ) -> IoResult<PathBuf> {
        let path = self.next_part_path("csv");
        let file = File::create(&path).map_err(|e| write_error(&path, e))?;

        let mut writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(options.header)
            .from_writer(BufWriter::new(file));

        for record in records {
            writer.serialize(record).map_err(|e| write_error(&path, e))?;
        }
        writer.flush().map_err(|e| write_error(&path, e))?;

        debug!(path = %path.display(), rows = records.len(), "wrote csv part");
        Ok(path)
    }

    /// Drop the `_SUCCESS` marker and return the directory path
    pub fn finish(self) -> IoResult<PathBuf> {
        let marker = self.root.join(SUCCESS_MARKER);
        File::create(&marker).map_err(|e| write_error(&marker, e))?;
        Ok(self.root)
    }
}

fn write_error(path: &Path, err: impl std::fmt::Display) -> IoError {
    IoError::Write {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Serialize)]
    struct Row {
        id: i64,
        score: f64,
        label: Option<String>,
    }

    #[test]
    fn test_csv_part_and_marker() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("out");

        let mut dir = OutputDir::create(&target).unwrap();
        let part = dir
            .write_csv_part(
                &[
                    Row {
                        id: 1,
                        score: 4.0,
                        label: Some("A".to_string()),
                    },
                    Row {
                        id: 2,
                        score: 3.5,
                        label: None,
                    },
                ],
                WriteOptions::default(),
            )
            .unwrap();
        let root = dir.finish().unwrap();

        assert_eq!(part.file_name().unwrap(), "part-00000.csv");
        assert!(root.join(SUCCESS_MARKER).exists());
        let content = fs::read_to_string(part).unwrap();
        assert_eq!(content, "1,4.0,A\n2,3.5,\n");
    }

    #[test]
    fn test_csv_part_with_header() {
        let tmp = TempDir::new().unwrap();
        let mut dir = OutputDir::create(tmp.path().join("out")).unwrap();
        let options = WriteOptions {
            header: true,
            ..WriteOptions::default()
        };
        let part = dir
            .write_csv_part(
                &[Row {
                    id: 7,
                    score: 1.0,
                    label: None,
                }],
                options,
            )
            .unwrap();

        let content = fs::read_to_string(part).unwrap();
        assert!(content.starts_with("id,score,label\n"));
    }

    #[test]
    fn test_parts_are_numbered() {
        let tmp = TempDir::new().unwrap();
        let mut dir = OutputDir::create(tmp.path().join("report")).unwrap();

        let first = dir.write_csv_part::<Row>(&[], WriteOptions::default()).unwrap();
        let second = dir.write_csv_part::<Row>(&[], WriteOptions::default()).unwrap();

        assert_eq!(first.file_name().unwrap(), "part-00000.csv");
        assert_eq!(second.file_name().unwrap(), "part-00001.csv");
        assert_eq!(fs::read_to_string(first).unwrap(), "");
    }

    #[test]
    fn test_existing_directory_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let err = OutputDir::create(tmp.path()).unwrap_err();
        assert!(matches!(err, IoError::OutputExists(_)));
    }
}
