//! Table reader trait and common types
//!
//! The `TableReader` trait provides a uniform, schema-checked way of
//! streaming rows out of a source and decoding them into record types.

use crate::schema::{FieldValue, TableSchema};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during I/O operations
#[derive(Debug, Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to open {path}: {message}")]
    OpenFailed { path: String, message: String },

    #[error("Invalid format in {path}: {message}")]
    InvalidFormat { path: String, message: String },

    #[error("{path}:{line}: expected {expected} fields, found {found}")]
    Arity {
        path: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("{path}:{line}: column '{column}': {message}")]
    Schema {
        path: String,
        line: u64,
        column: String,
        message: String,
    },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Type mismatch for column '{column}': expected {expected}, got {actual}")]
    TypeMismatch {
        column: String,
        expected: String,
        actual: String,
    },

    #[error("Output path already exists: {0}")]
    OutputExists(String),

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;

/// A validated row, borrowed from the reader while it is visited
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    schema: &'a TableSchema,
    values: &'a [FieldValue],
    line: u64,
}

impl<'a> RowView<'a> {
    /// Wrap decoded values; `values` must follow the schema's column order
    pub fn new(schema: &'a TableSchema, values: &'a [FieldValue], line: u64) -> Self {
        Self {
            schema,
            values,
            line,
        }
    }

    /// 1-based line number the row was read from
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Get a field by column name
    pub fn get(&self, column: &str) -> IoResult<&'a FieldValue> {
        self.schema
            .column_index(column)
            .and_then(|i| self.values.get(i))
            .ok_or_else(|| IoError::ColumnNotFound(column.to_string()))
    }

    pub fn opt_int(&self, column: &str) -> IoResult<Option<i64>> {
        match self.get(column)? {
            FieldValue::Null => Ok(None),
            FieldValue::Int64(v) => Ok(Some(*v)),
            other => Err(mismatch(column, "Int64", other)),
        }
    }

    pub fn int(&self, column: &str) -> IoResult<i64> {
        self.opt_int(column)?
            .ok_or_else(|| mismatch(column, "Int64", &FieldValue::Null))
    }

    pub fn opt_float(&self, column: &str) -> IoResult<Option<f64>> {
        match self.get(column)? {
            FieldValue::Null => Ok(None),
            FieldValue::Float64(v) => Ok(Some(*v)),
            FieldValue::Int64(v) => Ok(Some(*v as f64)),
            other => Err(mismatch(column, "Float64", other)),
        }
    }

    pub fn float(&self, column: &str) -> IoResult<f64> {
        self.opt_float(column)?
            .ok_or_else(|| mismatch(column, "Float64", &FieldValue::Null))
    }

    pub fn opt_string(&self, column: &str) -> IoResult<Option<&'a str>> {
        match self.get(column)? {
            FieldValue::Null => Ok(None),
            FieldValue::String(v) => Ok(Some(v.as_str())),
            other => Err(mismatch(column, "String", other)),
        }
    }
}

fn mismatch(column: &str, expected: &str, actual: &FieldValue) -> IoError {
    IoError::TypeMismatch {
        column: column.to_string(),
        expected: expected.to_string(),
        actual: actual.type_name().to_string(),
    }
}

/// A record type that can be decoded from a validated row
pub trait FromRow: Sized {
    /// Schema the source must satisfy
    fn schema() -> TableSchema;

    /// Decode one row
    fn from_row(row: &RowView<'_>) -> IoResult<Self>;
}

/// Trait for reading schema-checked rows from a source
pub trait TableReader {
    /// Schema rows are validated against
    fn schema(&self) -> &TableSchema;

    /// Visit every row in source order, stopping at the first error
    fn visit_rows(
        &self,
        visitor: &mut dyn FnMut(&RowView<'_>) -> IoResult<()>,
    ) -> IoResult<()>;

    /// Get the source path (if applicable)
    fn path(&self) -> Option<&Path> {
        None
    }

    /// Get the format name
    fn format_name(&self) -> &'static str;

    /// Decode every row into `T`
    fn read_table<T: FromRow>(&self) -> IoResult<Vec<T>>
    where
        Self: Sized,
    {
        let mut records = Vec::new();
        self.visit_rows(&mut |row| {
            records.push(T::from_row(row)?);
            Ok(())
        })?;
        Ok(records)
    }
}

/// Decode raw fields against a schema, reporting the first violation
pub fn decode_fields(
    schema: &TableSchema,
    fields: &[&str],
    path: &str,
    line: u64,
) -> IoResult<Vec<FieldValue>> {
    if fields.len() != schema.num_columns() {
        return Err(IoError::Arity {
            path: path.to_string(),
            line,
            expected: schema.num_columns(),
            found: fields.len(),
        });
    }

    schema
        .columns
        .iter()
        .zip(fields)
        .map(|(column, &raw)| {
            column.decode(raw).map_err(|message| IoError::Schema {
                path: path.to_string(),
                line,
                column: column.name.clone(),
                message,
            })
        })
        .collect()
}

/// An in-memory table of raw string rows, validated on read
#[derive(Debug, Clone)]
pub struct MemoryTable {
    schema: TableSchema,
    rows: Vec<Vec<String>>,
}

impl MemoryTable {
    pub fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Append a raw row
    pub fn push_row<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(fields.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl TableReader for MemoryTable {
    fn schema(&self) -> &TableSchema {
        &self.schema
    }

    fn visit_rows(
        &self,
        visitor: &mut dyn FnMut(&RowView<'_>) -> IoResult<()>,
    ) -> IoResult<()> {
        for (i, raw) in self.rows.iter().enumerate() {
            let line = i as u64 + 1;
            let fields: Vec<&str> = raw.iter().map(String::as_str).collect();
            let values = decode_fields(&self.schema, &fields, "<memory>", line)?;
            visitor(&RowView::new(&self.schema, &values, line))?;
        }
        Ok(())
    }

    fn format_name(&self) -> &'static str {
        "memory"
    }
}
