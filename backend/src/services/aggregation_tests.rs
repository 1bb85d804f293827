use super::*;
use proptest::prelude::*;

fn summary(site: &str, block_type: &str, count: u64, percent: f64, pos: f64) -> BlockSummary {
    BlockSummary::new(site, block_type, count, percent, pos)
}

fn two_site_dataset() -> Vec<BlockSummary> {
    vec![
        summary("A", "Claim", 10, 50.0, 1.0),
        summary("A", "Example", 4, 20.0, 2.0),
        summary("B", "Claim", 5, 20.0, 3.0),
        summary("B", "Analogy", 2, 10.0, 4.0),
    ]
}

// ===== Grouping =====

#[test]
fn test_group_keeps_first_seen_order() {
    let data = two_site_dataset();
    let rows = group_by_block_type(&data);
    let types: Vec<&str> = rows.iter().map(|r| r.block_type.as_str()).collect();
    assert_eq!(types, vec!["Claim", "Example", "Analogy"]);
}

#[test]
fn test_group_claim_across_sites() {
    let data = two_site_dataset();
    let rows = group_by_block_type(&data);
    let claim = &rows[0];
    assert_eq!(claim.count, 15);
    assert_eq!(claim.records, 2);
    assert!((claim.percent - 35.0).abs() < 1e-9);
    assert!((claim.avg_position - 25.0 / 15.0).abs() < 1e-9);
}

#[test]
fn test_weighted_position_zero_counts_is_zero() {
    let data = vec![
        summary("A", "Claim", 0, 10.0, 3.0),
        summary("B", "Claim", 0, 30.0, 5.0),
    ];
    let value = weighted_avg_position(&data);
    assert_eq!(value, 0.0);

    let rows = group_by_block_type(&data);
    assert_eq!(rows[0].avg_position, 0.0);
    assert!(!rows[0].avg_position.is_nan());
}

// ===== Scope and normalization =====

#[test]
fn test_filter_by_site() {
    let data = two_site_dataset();
    let filtered = filter_by_scope(&data, &Scope::Site("B".to_string()));
    assert_eq!(filtered.len(), 2);
    assert!(filtered.iter().all(|s| s.site == "B"));
}

#[test]
fn test_normalization_all_sites_percent_sums_to_100() {
    let data = vec![
        summary("A", "Claim", 10, 40.0, 1.0),
        summary("A", "Example", 6, 30.0, 2.0),
        summary("B", "Claim", 8, 50.0, 1.5),
        summary("B", "Example", 2, 10.0, 2.5),
        summary("C", "Claim", 3, 25.0, 1.0),
        summary("C", "Example", 9, 45.0, 3.0),
    ];
    let rows = aggregate(&data, &Scope::All, Metric::Percent, 10);
    let total: f64 = rows.iter().map(|r| r.percent).sum();
    assert!((total - 100.0).abs() < 1e-9);
}

#[test]
fn test_no_normalization_for_single_site() {
    let data = two_site_dataset();
    let rows = aggregate(&data, &Scope::Site("A".to_string()), Metric::Percent, 10);
    let total: f64 = rows.iter().map(|r| r.percent).sum();
    assert!((total - 70.0).abs() < 1e-9);
}

#[test]
fn test_no_normalization_for_count_metric() {
    let data = two_site_dataset();
    let rows = aggregate(&data, &Scope::All, Metric::Count, 10);
    let claim = rows.iter().find(|r| r.block_type == "Claim").unwrap();
    assert!((claim.percent - 35.0).abs() < 1e-9);
}

#[test]
fn test_normalization_zero_total_is_untouched() {
    let mut rows = group_by_block_type(&[
        summary("A", "Claim", 1, 0.0, 1.0),
        summary("A", "Example", 1, 0.0, 1.0),
    ]);
    normalize_percents(&mut rows);
    assert!(rows.iter().all(|r| r.percent == 0.0));
}

// ===== Ranking =====

#[test]
fn test_rank_descending_count() {
    let data = two_site_dataset();
    let rows = aggregate(&data, &Scope::All, Metric::Count, 10);
    let counts: Vec<u64> = rows.iter().map(|r| r.count).collect();
    assert_eq!(counts, vec![15, 4, 2]);
}

#[test]
fn test_rank_ascending_position() {
    let data = two_site_dataset();
    let rows = aggregate(&data, &Scope::All, Metric::AvgPosition, 10);
    let types: Vec<&str> = rows.iter().map(|r| r.block_type.as_str()).collect();
    assert_eq!(types, vec!["Claim", "Example", "Analogy"]);
    assert!(rows[0].avg_position <= rows[1].avg_position);
}

#[test]
fn test_rank_ties_keep_prior_order() {
    let data = vec![
        summary("A", "Story", 5, 10.0, 1.0),
        summary("A", "Claim", 7, 10.0, 1.0),
        summary("A", "Rule", 5, 10.0, 1.0),
    ];
    let rows = aggregate(&data, &Scope::All, Metric::Count, 10);
    let types: Vec<&str> = rows.iter().map(|r| r.block_type.as_str()).collect();
    assert_eq!(types, vec!["Claim", "Story", "Rule"]);
}

#[test]
fn test_truncate_to_top_n() {
    let data = two_site_dataset();
    let rows = aggregate(&data, &Scope::All, Metric::Count, 2);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].block_type, "Claim");
}

#[test]
fn test_empty_input() {
    let rows = aggregate(&[], &Scope::All, Metric::Percent, 5);
    assert!(rows.is_empty());
}

proptest! {
    #[test]
    fn prop_weighted_position_matches_formula(
        entries in prop::collection::vec((0u64..500, 0.0f64..50.0), 1..20)
    ) {
        let data: Vec<BlockSummary> = entries
            .iter()
            .map(|(count, pos)| summary("S", "Claim", *count, 1.0, *pos))
            .collect();
        let total: u64 = data.iter().map(|s| s.count).sum();
        let expected = if total == 0 {
            0.0
        } else {
            data.iter().map(|s| s.avg_position * s.count as f64).sum::<f64>() / total as f64
        };
        let got = weighted_avg_position(&data);
        prop_assert!(!got.is_nan());
        prop_assert!((got - expected).abs() < 1e-9);
    }
}
