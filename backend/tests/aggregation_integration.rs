//! End-to-end tests of the aggregation pipeline over a repository.

mod support;

use blockscope::db::{DatasetRepository, LocalRepository};
use blockscope::models::{ChartKind, Metric, Scope};
use blockscope::services::aggregation::aggregate;
use blockscope::services::block_stats::{block_type_stats, site_stats};
use blockscope::services::charts::{detail_chart, overview_chart, ChartData};
use blockscope::services::explorer::ExplorerState;

#[tokio::test]
async fn test_claim_aggregated_across_two_sites() {
    let repo = LocalRepository::with_records(support::two_site_summaries(), vec![]);
    let summaries = repo.block_summaries().await.unwrap();

    let rows = aggregate(&summaries, &Scope::All, Metric::Count, 10);
    let claim = rows.iter().find(|r| r.block_type == "Claim").unwrap();

    assert_eq!(claim.count, 15);
    assert!((claim.percent - 35.0).abs() < 1e-9);
    assert!((claim.avg_position - 25.0 / 15.0).abs() < 1e-9);
    assert_eq!(claim.records, 2);
}

#[tokio::test]
async fn test_count_ranking_descending() {
    let repo = LocalRepository::with_records(support::two_site_summaries(), vec![]);
    let summaries = repo.block_summaries().await.unwrap();

    let rows = aggregate(&summaries, &Scope::All, Metric::Count, 3);
    let order: Vec<&str> = rows.iter().map(|r| r.block_type.as_str()).collect();
    assert_eq!(order, vec!["Definition", "Claim", "Example"]);
}

#[tokio::test]
async fn test_percent_renormalized_for_all_sites() {
    let repo = LocalRepository::with_records(support::two_site_summaries(), vec![]);
    let summaries = repo.block_summaries().await.unwrap();

    let rows = aggregate(&summaries, &Scope::All, Metric::Percent, 10);
    let total: f64 = rows.iter().map(|r| r.percent).sum();
    assert!((total - 100.0).abs() < 1e-9);

    let site_rows = aggregate(&summaries, &Scope::Site("A".to_string()), Metric::Percent, 10);
    let site_total: f64 = site_rows.iter().map(|r| r.percent).sum();
    assert!((site_total - 100.0).abs() < 1e-9);
    assert_eq!(site_rows.len(), 2);
}

#[tokio::test]
async fn test_position_ranking_ascending() {
    let repo = LocalRepository::with_records(support::two_site_summaries(), vec![]);
    let summaries = repo.block_summaries().await.unwrap();

    let rows = aggregate(&summaries, &Scope::All, Metric::AvgPosition, 1);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].block_type, "Definition");
}

#[test]
fn test_overview_pie_shares() {
    let summaries = support::two_site_summaries();
    let rows = aggregate(&summaries, &Scope::All, Metric::Count, 3);

    match overview_chart(&rows, Metric::Count, ChartKind::Pie) {
        ChartData::Pie(pie) => {
            assert_eq!(pie.labels.len(), 3);
            let total: f64 = pie.percentages.iter().sum();
            assert!((total - 100.0).abs() < 1e-9);
        }
        other => panic!("expected pie chart, got {:?}", other),
    }
}

#[test]
fn test_detail_bar_covers_every_site() {
    let summaries = support::two_site_summaries();
    match detail_chart(&summaries, "Example", Metric::Count, ChartKind::Bar) {
        ChartData::Bar(bar) => {
            assert_eq!(bar.labels, vec!["A", "B"]);
            assert_eq!(bar.values, vec![10.0, 0.0]);
            assert_eq!(bar.title.as_deref(), Some("Example by Count Across Sites"));
        }
        other => panic!("expected bar chart, got {:?}", other),
    }
}

#[test]
fn test_explorer_switches_to_detail_on_selection() {
    let summaries = support::two_site_summaries();
    let mut view = ExplorerState::new();
    assert!(matches!(view.chart(&summaries), ChartData::Bar(_)));

    view.chart = ChartKind::Pie;
    view.toggle_selected("Claim");
    assert!(matches!(view.chart(&summaries), ChartData::MiniPies(_)));

    view.toggle_selected("Claim");
    assert!(matches!(view.chart(&summaries), ChartData::Pie(_)));
}

#[test]
fn test_stats_cards() {
    let summaries = support::two_site_summaries();

    let claim = block_type_stats(&summaries, "Claim").unwrap();
    assert_eq!(claim.total_count, 15);
    assert_eq!(claim.sites[0].site, "A");
    assert!(block_type_stats(&summaries, "Story").is_none());

    let sites = site_stats(&summaries);
    assert_eq!(sites.len(), 2);
    let b = sites.iter().find(|s| s.site == "B").unwrap();
    assert_eq!(b.total_blocks, 25);
    assert_eq!(b.unique_types, 2);
    assert_eq!(b.top_blocks[0].block_type, "Definition");
}
