//! reelrank-io - Data I/O for rating datasets
//!
//! This crate provides the table plumbing the ranking pipeline sits on:
//!
//! - **Schema**: ordered, typed column descriptors with nullability
//! - **Reader**: delimited-text reader that validates every row against a schema
//! - **Writer**: part-file output directories (`part-00000`, `_SUCCESS`)
//!
//! # Design
//!
//! Rows are decoded through the `FromRow` trait so each table gets a plain
//! Rust record type. A row that violates its schema aborts the read with the
//! offending line and column.

pub mod csv_reader;
pub mod reader;
pub mod schema;
pub mod writer;

pub use csv_reader::*;
pub use reader::*;
pub use schema::*;
pub use writer::*;
