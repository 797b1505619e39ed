//! reelrank-core - Genre-filtered movie ranking over ratings tables
//!
//! This crate implements the ranking pipeline:
//!
//! - **Records**: typed rating, item, aggregate and result rows
//! - **Category**: splits pipe-delimited genre strings and counts genres
//! - **Join**: hash inner join of rating aggregates to item metadata
//! - **Select**: genre containment filter, review-count threshold, sort by mean
//! - **Pipeline**: loads both sources, runs every stage, writes outputs
//! - **Config**: one configuration struct with local/cluster presets
//!
//! # Dataflow
//!
//! ```text
//! ratings ──► aggregate ──┐
//!                         ├──► inner join ──► select ──► sort ──► results
//! items ──► categories ───┘
//!              └──► genre frequency report
//! ```
//!
//! Every stage takes the previous stage's output by reference or value and
//! returns a new table; nothing is mutated in place across stages.

pub mod category;
pub mod config;
pub mod error;
pub mod join;
pub mod pipeline;
pub mod records;
pub mod report;
pub mod select;

pub use category::*;
pub use config::*;
pub use error::*;
pub use join::*;
pub use pipeline::*;
pub use records::*;
pub use report::*;
pub use select::*;

pub use reelrank_stats::{Histogram, LabelCount, SummaryStats};
