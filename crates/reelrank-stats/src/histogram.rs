//! Fixed-edge histograms
//!
//! Buckets are half-open `[edge[i], edge[i+1])` except the last, which is
//! closed so the top edge itself is counted. Values outside the edges and
//! non-finite values are tallied separately in `outside`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Histogram construction errors
#[derive(Debug, Error, PartialEq)]
pub enum HistogramError {
    #[error("Histogram needs at least two edges, got {0}")]
    TooFewEdges(usize),

    #[error("Histogram edges must be finite and strictly increasing")]
    UnorderedEdges,
}

/// Counts of values falling into consecutive buckets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    edges: Vec<f64>,
    counts: Vec<u64>,
    outside: u64,
}

/// One bucket of a histogram
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}

impl Histogram {
    /// Create an empty histogram over explicit edges
    pub fn new(edges: Vec<f64>) -> Result<Self, HistogramError> {
        if edges.len() < 2 {
            return Err(HistogramError::TooFewEdges(edges.len()));
        }
        let ordered = edges.iter().all(|e| e.is_finite())
            && edges.windows(2).all(|w| w[0] < w[1]);
        if !ordered {
            return Err(HistogramError::UnorderedEdges);
        }

        let buckets = edges.len() - 1;
        Ok(Self {
            edges,
            counts: vec![0; buckets],
            outside: 0,
        })
    }

    /// Unit-width buckets with integer edges `start..=end`
    pub fn integer_edges(start: i64, end: i64) -> Result<Self, HistogramError> {
        Self::new((start..=end).map(|e| e as f64).collect())
    }

    /// Build from data in one pass
    pub fn from_data(edges: Vec<f64>, data: &[f64]) -> Result<Self, HistogramError> {
        let mut hist = Self::new(edges)?;
        for &x in data {
            hist.push(x);
        }
        Ok(hist)
    }

    /// Bucket index for a value, if it falls inside the edges
    pub fn bucket_index(&self, x: f64) -> Option<usize> {
        let first = self.edges[0];
        let last = self.edges[self.edges.len() - 1];
        if !x.is_finite() || x < first || x > last {
            return None;
        }
        if x == last {
            return Some(self.counts.len() - 1);
        }
        // Number of edges <= x, minus one, is the bucket.
        let upper = self.edges.partition_point(|&e| e <= x);
        Some(upper - 1)
    }

    /// Count one value
    pub fn push(&mut self, x: f64) {
        match self.bucket_index(x) {
            Some(i) => self.counts[i] += 1,
            None => self.outside += 1,
        }
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Values that fell outside the edges or were not finite
    pub fn outside(&self) -> u64 {
        self.outside
    }

    /// Values counted in some bucket
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn buckets(&self) -> Vec<Bucket> {
        self.edges
            .windows(2)
            .zip(self.counts.iter())
            .map(|(w, &count)| Bucket {
                lower: w[0],
                upper: w[1],
                count,
            })
            .collect()
    }
}
