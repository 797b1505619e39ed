//! Terminal tables

use comfy_table::presets::UTF8_FULL;
use comfy_table::{CellAlignment, Table};
use reelrank_core::{LabelCount, RatingProfile, ResultRecord, RunReport};

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header.to_vec());
    table
}

fn right_align(table: &mut Table, columns: &[usize]) {
    for &index in columns {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
}

/// Ranked rows, best first
pub fn results_table(rows: &[ResultRecord]) -> Table {
    let mut table = new_table(&["#", "item_id", "mean", "reviews", "title"]);
    for (rank, row) in rows.iter().enumerate() {
        table.add_row(vec![
            (rank + 1).to_string(),
            row.item_id.to_string(),
            format!("{:.3}", row.mean_rating),
            row.rating_count.to_string(),
            row.title.clone().unwrap_or_default(),
        ]);
    }
    right_align(&mut table, &[0, 1, 2, 3]);
    table
}

pub fn genres_table(counts: &[LabelCount]) -> Table {
    let mut table = new_table(&["genre", "movies"]);
    for entry in counts {
        table.add_row(vec![entry.label.clone(), entry.count.to_string()]);
    }
    right_align(&mut table, &[1]);
    table
}

/// Summary statistics followed by the histogram buckets
pub fn profile_tables(profile: &RatingProfile) -> (Table, Table) {
    let s = &profile.summary;
    let mut summary = new_table(&[
        "count", "min", "max", "mean", "std_dev", "median", "above 4", "equal 5",
    ]);
    summary.add_row(vec![
        s.count.to_string(),
        format!("{:.3}", s.min),
        format!("{:.3}", s.max),
        format!("{:.3}", s.mean),
        format!("{:.3}", s.std_dev),
        format!("{:.3}", s.median),
        profile.high_ratings.to_string(),
        profile.top_ratings.to_string(),
    ]);

    let mut histogram = new_table(&["bucket", "ratings"]);
    let buckets = profile.histogram.buckets();
    let last = buckets.len().saturating_sub(1);
    for (i, bucket) in buckets.iter().enumerate() {
        let close = if i == last { ']' } else { ')' };
        histogram.add_row(vec![
            format!("[{}, {}{}", bucket.lower, bucket.upper, close),
            bucket.count.to_string(),
        ]);
    }
    if profile.histogram.outside() > 0 {
        histogram.add_row(vec![
            "outside".to_string(),
            profile.histogram.outside().to_string(),
        ]);
    }
    right_align(&mut histogram, &[1]);

    (summary, histogram)
}

/// Stage counts of a finished run
pub fn run_summary_table(report: &RunReport) -> Table {
    let mut table = new_table(&["stage", "rows"]);
    let stages = [
        ("ratings loaded", report.ratings_loaded),
        ("items loaded", report.items_loaded),
        ("rated items", report.aggregates),
        ("joined", report.joined_rows),
        ("rated but unknown", report.aggregates_without_item),
        ("known but unrated", report.items_without_ratings),
        ("in category", report.category_matches),
        ("results", report.results),
    ];
    for (stage, rows) in stages {
        table.add_row(vec![stage.to_string(), rows.to_string()]);
    }
    right_align(&mut table, &[1]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelrank_core::{profile_ratings, RatingRecord};

    #[test]
    fn test_results_table_lists_rows_in_order() {
        let rows = vec![
            ResultRecord {
                item_id: 10,
                mean_rating: 4.0,
                rating_count: 3,
                title: Some("Toy Story (1995)".to_string()),
            },
            ResultRecord {
                item_id: 20,
                mean_rating: 3.5,
                rating_count: 12,
                title: None,
            },
        ];

        let text = results_table(&rows).to_string();
        assert!(text.contains("Toy Story (1995)"));
        assert!(text.contains("4.000"));
        let first = text.find("Toy Story").unwrap();
        let second = text.find("3.500").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_profile_tables_close_last_bucket() {
        let profile = profile_ratings(&[
            RatingRecord::new(1, 10, 5.0),
            RatingRecord::new(2, 10, 0.5),
        ])
        .unwrap();

        let (summary, histogram) = profile_tables(&profile);
        let summary = summary.to_string();
        assert!(summary.contains("2.750"));
        assert!(summary.contains("above 4"));
        assert!(summary.contains("equal 5"));
        let text = histogram.to_string();
        assert!(text.contains("[0, 1)"));
        assert!(text.contains("[5, 6]"));
        assert!(!text.contains("outside"));
    }

    #[test]
    fn test_genres_table() {
        let text = genres_table(&[LabelCount {
            label: "Comedy".to_string(),
            count: 2,
        }])
        .to_string();
        assert!(text.contains("Comedy"));
    }
}
