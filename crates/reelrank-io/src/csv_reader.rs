//! Delimited-text reader with schema validation

use crate::reader::{decode_fields, FromRow, IoError, IoResult, RowView, TableReader};
use crate::schema::TableSchema;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options controlling how a delimited source is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadOptions {
    /// Field delimiter byte
    pub delimiter: u8,

    /// Whether the first line is a header row to skip
    pub has_header: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
        }
    }
}

impl ReadOptions {
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Delimited (CSV/TSV) file reader
pub struct DelimitedReader {
    path: PathBuf,
    /// Display form of `path` for error messages
    label: String,
    schema: TableSchema,
    options: ReadOptions,
}

impl DelimitedReader {
    /// Open a delimited file that must satisfy `schema`
    pub fn open(
        path: impl AsRef<Path>,
        schema: TableSchema,
        options: ReadOptions,
    ) -> IoResult<Self> {
        let path = path.as_ref();
        let label = path.display().to_string();
        if !path.exists() {
            return Err(IoError::FileNotFound(label));
        }

        File::open(path).map_err(|e| IoError::OpenFailed {
            path: label.clone(),
            message: e.to_string(),
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            label,
            schema,
            options,
        })
    }

    /// Open a file using the schema declared by `T`
    pub fn for_record<T: FromRow>(
        path: impl AsRef<Path>,
        options: ReadOptions,
    ) -> IoResult<Self> {
        Self::open(path, T::schema(), options)
    }

    pub fn options(&self) -> ReadOptions {
        self.options
    }

    fn csv_reader(&self) -> IoResult<csv::Reader<BufReader<File>>> {
        let file = File::open(&self.path).map_err(|e| IoError::OpenFailed {
            path: self.label.clone(),
            message: e.to_string(),
        })?;

        // Arity is checked against the schema, so the csv reader stays flexible
        Ok(csv::ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .has_headers(self.options.has_header)
            .flexible(true)
            .from_reader(BufReader::new(file)))
    }
}

impl TableReader for DelimitedReader {
    fn schema(&self) -> &TableSchema {
        &self.schema
    }

    fn visit_rows(
        &self,
        visitor: &mut dyn FnMut(&RowView<'_>) -> IoResult<()>,
    ) -> IoResult<()> {
        let mut reader = self.csv_reader()?;
        let mut record = csv::StringRecord::new();
        let mut rows = 0usize;

        loop {
            let more = reader
                .read_record(&mut record)
                .map_err(|e| IoError::InvalidFormat {
                    path: self.label.clone(),
                    message: e.to_string(),
                })?;
            if !more {
                break;
            }

            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let fields: Vec<&str> = record.iter().collect();
            let values = decode_fields(&self.schema, &fields, &self.label, line)?;
            visitor(&RowView::new(&self.schema, &values, line))?;
            rows += 1;
        }

        debug!(table = %self.schema.table, path = %self.label, rows, "read delimited table");
        Ok(())
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn format_name(&self) -> &'static str {
        "CSV"
    }
}

/// Read a whole delimited file into records of type `T`
pub fn read_records<T: FromRow>(
    path: impl AsRef<Path>,
    options: ReadOptions,
) -> IoResult<Vec<T>> {
    DelimitedReader::for_record::<T>(path, options)?.read_table()
}
