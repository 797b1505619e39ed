//! Property tests for the in-memory ranking stages

use proptest::prelude::*;
use reelrank_core::{
    category_frequency, expand_items, rank_items, ItemRecord, RatingRecord, Selection,
};
use std::collections::{HashMap, HashSet};

const GENRES: &[&str] = &["Action", "Comedy", "Drama", "Horror", "Romance"];

/// Ratings on the half-star scale; half-integers keep sums exact in any order
fn ratings_strategy() -> impl Strategy<Value = Vec<RatingRecord>> {
    prop::collection::vec((0i64..20, 0i64..15, 0u8..=10), 0..80).prop_map(|rows| {
        rows.into_iter()
            .map(|(user, item, half_stars)| {
                RatingRecord::new(user, item, f64::from(half_stars) / 2.0)
            })
            .collect()
    })
}

/// Metadata for ids 0..12, so some rated ids go unmatched
fn items_strategy() -> impl Strategy<Value = Vec<ItemRecord>> {
    prop::collection::vec(prop::sample::subsequence(GENRES.to_vec(), 0..=3), 12).prop_map(
        |genre_sets| {
            genre_sets
                .into_iter()
                .enumerate()
                .map(|(id, genres)| {
                    ItemRecord::new(id as i64, &format!("Movie {id}"), &genres.join("|"))
                })
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn test_results_satisfy_filter_and_order(
        ratings in ratings_strategy(),
        items in items_strategy(),
        genre in prop::sample::select(GENRES.to_vec()),
        min_reviews in 0u64..5,
    ) {
        let categorized = expand_items(&items);
        let by_id: HashMap<i64, &Vec<String>> = categorized
            .iter()
            .map(|item| (item.item_id, &item.categories))
            .collect();

        let ranking = rank_items(&ratings, &categorized, &Selection::new(genre, min_reviews), 1)
            .unwrap();

        for row in &ranking.results {
            prop_assert!(row.rating_count > min_reviews);
            prop_assert!(by_id[&row.item_id].iter().any(|g| g == genre));
        }
        for pair in ranking.results.windows(2) {
            prop_assert!(pair[0].mean_rating >= pair[1].mean_rating);
        }
        prop_assert!(ranking.results.len() <= ranking.category_matches);
    }

    #[test]
    fn test_open_selection_keeps_every_joined_id(
        ratings in ratings_strategy(),
        items in items_strategy(),
    ) {
        let categorized = expand_items(&items);
        let known: HashSet<i64> = categorized.iter().map(|item| item.item_id).collect();
        let rated: HashSet<i64> = ratings.iter().map(|r| r.item_id).collect();

        let ranking = rank_items(&ratings, &categorized, &Selection::any_category(0), 1).unwrap();

        prop_assert_eq!(ranking.results.len(), rated.intersection(&known).count());
        prop_assert_eq!(ranking.aggregates_without_item, rated.difference(&known).count());
        prop_assert_eq!(ranking.items_without_ratings, known.difference(&rated).count());
    }

    #[test]
    fn test_partitioning_does_not_change_results(
        ratings in ratings_strategy(),
        items in items_strategy(),
        partitions in 1usize..8,
    ) {
        let categorized = expand_items(&items);
        let selection = Selection::any_category(1);

        let single = rank_items(&ratings, &categorized, &selection, 1).unwrap();
        let split = rank_items(&ratings, &categorized, &selection, partitions).unwrap();

        prop_assert_eq!(single, split);
    }

    #[test]
    fn test_rating_counts_add_up(ratings in ratings_strategy(), items in items_strategy()) {
        let categorized = expand_items(&items);
        let ranking = rank_items(&ratings, &categorized, &Selection::any_category(0), 1).unwrap();

        let known: HashSet<i64> = categorized.iter().map(|item| item.item_id).collect();
        let joined_ratings = ratings.iter().filter(|r| known.contains(&r.item_id)).count() as u64;
        let counted: u64 = ranking.results.iter().map(|r| r.rating_count).sum();
        prop_assert_eq!(counted, joined_ratings);
    }

    #[test]
    fn test_genre_frequency_totals(items in items_strategy()) {
        let categorized = expand_items(&items);
        let counts = category_frequency(&categorized);

        let labels: usize = categorized.iter().map(|item| item.categories.len()).sum();
        prop_assert_eq!(counts.iter().map(|c| c.count).sum::<u64>(), labels as u64);
        for pair in counts.windows(2) {
            prop_assert!(
                pair[0].count > pair[1].count
                    || (pair[0].count == pair[1].count && pair[0].label < pair[1].label)
            );
        }
    }
}
