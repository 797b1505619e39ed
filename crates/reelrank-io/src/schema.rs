//! Schema and field types for delimited tables

use serde::{Deserialize, Serialize};

/// Fixed column order of a delimited source. Columns are matched by
/// position; header names in the file are never consulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Logical table name used in logs
    pub table: String,
    pub columns: Vec<ColumnDescriptor>,
}

impl TableSchema {
    pub fn new(table: impl Into<String>, columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            table: table.into(),
            columns,
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Position of `name` in a row
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }
}

/// One typed column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub dtype: ColumnType,
    pub description: Option<String>,
    /// Blank fields decode to `FieldValue::Null` instead of failing
    pub nullable: bool,
}

impl ColumnDescriptor {
    /// A nullable column
    pub fn new(name: impl Into<String>, dtype: ColumnType) -> Self {
        Self {
            name: name.into(),
            dtype,
            description: None,
            nullable: true,
        }
    }

    /// A column that must hold a value on every row
    pub fn required(name: impl Into<String>, dtype: ColumnType) -> Self {
        Self {
            nullable: false,
            ..Self::new(name, dtype)
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Decode a raw field against this column.
    ///
    /// Blank fields become `FieldValue::Null` when the column is nullable.
    /// Numeric literals are trimmed before parsing; strings are kept verbatim.
    pub fn decode(&self, raw: &str) -> Result<FieldValue, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return if self.nullable {
                Ok(FieldValue::Null)
            } else {
                Err("missing value in non-nullable column".to_string())
            };
        }

        match self.dtype {
            ColumnType::Int64 => trimmed
                .parse::<i64>()
                .map(FieldValue::Int64)
                .map_err(|_| format!("invalid integer literal '{}'", trimmed)),
            ColumnType::Float64 => match trimmed.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(FieldValue::Float64(v)),
                _ => Err(format!("invalid float literal '{}'", trimmed)),
            },
            ColumnType::String => Ok(FieldValue::String(raw.to_string())),
        }
    }
}

/// Value type a column decodes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Int64,
    Float64,
    String,
}

impl ColumnType {
    /// Display name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Int64 => "Int64",
            ColumnType::Float64 => "Float64",
            ColumnType::String => "String",
        }
    }
}

/// A single decoded field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Int64(i64),
    Float64(f64),
    String(String),
}

impl FieldValue {
    /// Type name of the held value ("null" for nulls)
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Int64(_) => ColumnType::Int64.name(),
            FieldValue::Float64(_) => ColumnType::Float64.name(),
            FieldValue::String(_) => ColumnType::String.name(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}
