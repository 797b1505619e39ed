//! Rating column summary
//!
//! Non-finite values are counted as missing and skipped. Spread is the
//! population standard deviation, accumulated in one pass with Welford's
//! update so the mean is not subtracted from a large running sum.

use serde::{Deserialize, Serialize};

/// Describes one numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Finite values seen
    pub count: usize,
    /// NaN or infinite values skipped
    pub missing: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub median: f64,
}

#[derive(Debug, Clone, Copy)]
struct Moments {
    n: usize,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl Moments {
    fn new() -> Self {
        Self {
            n: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn push(&mut self, x: f64) {
        self.n += 1;
        let delta = x - self.mean;
        self.mean += delta / self.n as f64;
        self.m2 += delta * (x - self.mean);
        self.min = self.min.min(x);
        self.max = self.max.max(x);
    }
}

/// Middle value, or the mean of the two middle values. `values` is reordered.
fn median_in_place(values: &mut [f64]) -> f64 {
    let n = values.len();
    let mid = n / 2;
    let (lower, upper, _) = values.select_nth_unstable_by(mid, f64::total_cmp);
    let upper = *upper;
    if n % 2 == 1 {
        return upper;
    }
    let below = lower.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (below + upper) / 2.0
}

impl SummaryStats {
    pub fn from_data(data: &[f64]) -> Self {
        let mut finite = Vec::with_capacity(data.len());
        let mut moments = Moments::new();
        for &x in data.iter().filter(|x| x.is_finite()) {
            moments.push(x);
            finite.push(x);
        }
        let missing = data.len() - finite.len();

        if finite.is_empty() {
            return Self {
                count: 0,
                missing,
                min: f64::NAN,
                max: f64::NAN,
                mean: f64::NAN,
                std_dev: f64::NAN,
                median: f64::NAN,
            };
        }

        Self {
            count: moments.n,
            missing,
            min: moments.min,
            max: moments.max,
            mean: moments.mean,
            std_dev: (moments.m2 / moments.n as f64).sqrt(),
            median: median_in_place(&mut finite),
        }
    }
}
