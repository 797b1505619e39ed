//! Label frequency counts
//!
//! Counts occurrences of string labels, as produced by exploding a
//! multi-valued column into one row per value.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of occurrences of one label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

/// Count labels. Ordered by count descending, then label ascending.
pub fn count_labels<I, S>(labels: I) -> Vec<LabelCount>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: HashMap<String, u64> = HashMap::new();
    for label in labels {
        let label = label.as_ref();
        match counts.get_mut(label) {
            Some(count) => *count += 1,
            None => {
                counts.insert(label.to_string(), 1);
            }
        }
    }

    let mut out: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount { label, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    out
}
