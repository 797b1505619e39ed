//! reelrank-stats - Statistical primitives for rating datasets
//!
//! This crate provides the aggregation pieces of the ranking pipeline:
//!
//! - **Aggregate**: per-key sum/count/mean with mergeable partial accumulators
//! - **Frequency**: label counts for exploded multi-valued columns
//! - **Histogram**: bucket counts over fixed edges
//! - **Summary**: count, extrema, mean, spread and median of a sample
//!
//! # Design Philosophy
//!
//! Every accumulator is associative and commutative so that partitions can
//! be folded independently and merged afterwards. With the `parallel`
//! feature the partition folds run on a rayon pool.

pub mod aggregate;
pub mod frequency;
pub mod histogram;
pub mod summary;

pub use aggregate::*;
pub use frequency::*;
pub use histogram::*;
pub use summary::*;
