//! Chart-ready datasets built from aggregated rows.
//!
//! Every shape is plain data (parallel label/value/color arrays) that the
//! frontend hands straight to its plotting library.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::aggregation::AggregatedBlock;
use crate::models::{
    block_color, with_alpha, BlockSummary, ChartKind, Metric, Scope, MUTED_COLOR,
};

/// At most this many sites get a mini pie in the detail view.
pub const MAX_MINI_PIES: usize = 12;

/// Columns in the mini-pie grid.
pub const MINI_PIE_COLUMNS: usize = 3;

/// Fill of the per-site parent tiles in the site comparison treemap.
pub const SITE_NODE_COLOR: &str = "rgba(220,220,220,0.8)";

pub const OVERVIEW_X_AXIS_TITLE: &str = "Block Type";
pub const DETAIL_X_AXIS_TITLE: &str = "Site";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieChart {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// Each value's share of the slice total, summing to 100.
    pub percentages: Vec<f64>,
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreemapChart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub labels: Vec<String>,
    pub parents: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_values: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiniPie {
    pub site: String,
    pub row: usize,
    pub column: usize,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiniPieGrid {
    pub title: String,
    pub rows: usize,
    pub columns: usize,
    pub pies: Vec<MiniPie>,
}

/// One site's top block types in the site comparison view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSeries {
    pub site: String,
    /// Position of this site's pie in a single-row layout.
    pub column: usize,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSeriesChart {
    pub title: String,
    pub series: Vec<SiteSeries>,
}

/// A chart in one of the supported shapes, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartData {
    Bar(BarChart),
    Pie(PieChart),
    Treemap(TreemapChart),
    MiniPies(MiniPieGrid),
    SiteBars(SiteSeriesChart),
    SitePies(SiteSeriesChart),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub block_type: String,
    pub color: String,
}

/// Distinct sites in first-seen order.
pub fn unique_sites(summaries: &[BlockSummary]) -> Vec<String> {
    let mut sites: Vec<String> = Vec::new();
    for s in summaries {
        if !sites.iter().any(|known| known == &s.site) {
            sites.push(s.site.clone());
        }
    }
    sites
}

/// Sorted distinct block types with their palette colors.
pub fn legend(summaries: &[BlockSummary]) -> Vec<LegendEntry> {
    let mut types: Vec<&str> = summaries.iter().map(|s| s.block_type.as_str()).collect();
    types.sort_unstable();
    types.dedup();
    types
        .into_iter()
        .map(|t| LegendEntry {
            block_type: t.to_string(),
            color: block_color(t).to_string(),
        })
        .collect()
}

fn shares_of(values: &[f64]) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    values
        .iter()
        .map(|v| if total > 0.0 { v / total * 100.0 } else { 0.0 })
        .collect()
}

/// Shape ranked rows for the overview panel.
pub fn overview_chart(rows: &[AggregatedBlock], metric: Metric, kind: ChartKind) -> ChartData {
    match kind {
        ChartKind::Bar => ChartData::Bar(BarChart {
            title: None,
            x_axis_title: OVERVIEW_X_AXIS_TITLE.to_string(),
            y_axis_title: metric.axis_title().to_string(),
            labels: rows.iter().map(|r| r.block_type.clone()).collect(),
            values: rows.iter().map(|r| r.value(metric)).collect(),
            colors: rows
                .iter()
                .map(|r| block_color(&r.block_type).to_string())
                .collect(),
        }),
        ChartKind::Pie => {
            let mut seen: Vec<&AggregatedBlock> = Vec::new();
            for row in rows {
                if !seen.iter().any(|s| s.block_type == row.block_type) {
                    seen.push(row);
                }
            }
            let values: Vec<f64> = seen.iter().map(|r| r.value(metric)).collect();
            ChartData::Pie(PieChart {
                labels: seen.iter().map(|r| r.block_type.clone()).collect(),
                percentages: shares_of(&values),
                values,
                colors: seen
                    .iter()
                    .map(|r| block_color(&r.block_type).to_string())
                    .collect(),
            })
        }
        ChartKind::Treemap => ChartData::Treemap(TreemapChart {
            title: None,
            labels: rows.iter().map(|r| r.block_type.clone()).collect(),
            parents: rows.iter().map(|_| String::new()).collect(),
            values: rows.iter().map(|r| r.value(metric)).collect(),
            colors: rows
                .iter()
                .map(|r| block_color(&r.block_type).to_string())
                .collect(),
            branch_values: None,
        }),
    }
}

fn detail_title(block_type: &str, metric: Metric) -> String {
    format!("{} by {} Across Sites", block_type, metric.title_word())
}

/// Opacity of the i-th site tile in the detail treemap.
fn ramp_opacity(index: usize) -> f64 {
    ((0.4 + 0.05 * index as f64) * 100.0).round() / 100.0
}

/// Cross-site view of a single block type.
///
/// Bar and treemap shapes carry one value per site (0 where the site has no
/// record of that type). The pie shape is a grid of per-site pies, valued by
/// count, with only `block_type` in color.
pub fn detail_chart(
    summaries: &[BlockSummary],
    block_type: &str,
    metric: Metric,
    kind: ChartKind,
) -> ChartData {
    let sites = unique_sites(summaries);
    let value_for = |site: &str| -> f64 {
        summaries
            .iter()
            .find(|s| s.site == site && s.block_type == block_type)
            .map(|s| metric.of_summary(s))
            .unwrap_or(0.0)
    };
    let color = block_color(block_type);

    match kind {
        ChartKind::Bar => ChartData::Bar(BarChart {
            title: Some(detail_title(block_type, metric)),
            x_axis_title: DETAIL_X_AXIS_TITLE.to_string(),
            y_axis_title: metric.axis_title().to_string(),
            values: sites.iter().map(|s| value_for(s)).collect(),
            colors: sites.iter().map(|_| color.to_string()).collect(),
            labels: sites,
        }),
        ChartKind::Treemap => ChartData::Treemap(TreemapChart {
            title: Some(detail_title(block_type, metric)),
            parents: sites.iter().map(|_| block_type.to_string()).collect(),
            values: sites.iter().map(|s| value_for(s)).collect(),
            colors: (0..sites.len())
                .map(|i| with_alpha(color, ramp_opacity(i)))
                .collect(),
            labels: sites,
            branch_values: Some("total".to_string()),
        }),
        ChartKind::Pie => {
            let pies: Vec<MiniPie> = sites
                .iter()
                .take(MAX_MINI_PIES)
                .enumerate()
                .map(|(index, site)| {
                    let site_rows: Vec<&BlockSummary> =
                        summaries.iter().filter(|s| &s.site == site).collect();
                    MiniPie {
                        site: site.clone(),
                        row: index / MINI_PIE_COLUMNS,
                        column: index % MINI_PIE_COLUMNS,
                        labels: site_rows.iter().map(|s| s.block_type.clone()).collect(),
                        values: site_rows.iter().map(|s| s.count as f64).collect(),
                        colors: site_rows
                            .iter()
                            .map(|s| {
                                if s.block_type == block_type {
                                    color.to_string()
                                } else {
                                    MUTED_COLOR.to_string()
                                }
                            })
                            .collect(),
                    }
                })
                .collect();
            ChartData::MiniPies(MiniPieGrid {
                title: format!("{} - Block Type Distribution by Site", block_type),
                rows: pies.len().div_ceil(MINI_PIE_COLUMNS),
                columns: MINI_PIE_COLUMNS,
                pies,
            })
        }
    }
}

fn comparison_title(metric: Metric, top_n: usize) -> String {
    format!("Top {} Block Types by {}", top_n, metric.title_word())
}

fn raw_value(summary: &BlockSummary, metric: Metric) -> f64 {
    metric.of_summary(summary)
}

/// Value plotted by area-based shapes: position is inverted so that earlier
/// blocks get larger slices. A zero position plots as 0.
fn area_value(summary: &BlockSummary, metric: Metric) -> f64 {
    match metric {
        Metric::AvgPosition if summary.avg_position > 0.0 => 1.0 / summary.avg_position,
        Metric::AvgPosition => 0.0,
        _ => metric.of_summary(summary),
    }
}

/// Each site's own records ranked by `metric`, cut to `top_n` per site.
pub fn top_blocks_per_site<'a>(
    summaries: &'a [BlockSummary],
    scope: &Scope,
    metric: Metric,
    top_n: usize,
) -> Vec<(String, Vec<&'a BlockSummary>)> {
    let sites = match scope {
        Scope::All => unique_sites(summaries),
        Scope::Site(site) => vec![site.clone()],
    };
    sites
        .into_iter()
        .map(|site| {
            let mut rows: Vec<&BlockSummary> =
                summaries.iter().filter(|s| s.site == site).collect();
            rows.sort_by(|a, b| {
                let ord = metric
                    .of_summary(a)
                    .partial_cmp(&metric.of_summary(b))
                    .unwrap_or(Ordering::Equal);
                if metric.ascending() {
                    ord
                } else {
                    ord.reverse()
                }
            });
            rows.truncate(top_n);
            (site, rows)
        })
        .collect()
}

/// Side-by-side view of every site's own top block types.
///
/// Bar gives one series per site, pie gives one pie per site, and treemap
/// nests block types under a tile per site. Pie and treemap plot
/// `1 / avg_position` for the position metric.
pub fn site_comparison_chart(
    summaries: &[BlockSummary],
    scope: &Scope,
    metric: Metric,
    top_n: usize,
    kind: ChartKind,
) -> ChartData {
    let per_site = top_blocks_per_site(summaries, scope, metric, top_n);
    let title = comparison_title(metric, top_n);

    let series = |value: fn(&BlockSummary, Metric) -> f64| -> Vec<SiteSeries> {
        per_site
            .iter()
            .enumerate()
            .map(|(column, (site, rows))| SiteSeries {
                site: site.clone(),
                column,
                labels: rows.iter().map(|s| s.block_type.clone()).collect(),
                values: rows.iter().map(|s| value(s, metric)).collect(),
                colors: rows
                    .iter()
                    .map(|s| block_color(&s.block_type).to_string())
                    .collect(),
            })
            .collect()
    };

    match kind {
        ChartKind::Bar => ChartData::SiteBars(SiteSeriesChart {
            title,
            series: series(raw_value),
        }),
        ChartKind::Pie => ChartData::SitePies(SiteSeriesChart {
            title,
            series: series(area_value),
        }),
        ChartKind::Treemap => {
            let mut tm = TreemapChart {
                title: Some(title),
                labels: Vec::new(),
                parents: Vec::new(),
                values: Vec::new(),
                colors: Vec::new(),
                branch_values: None,
            };
            for (site, rows) in &per_site {
                tm.labels.push(site.clone());
                tm.parents.push(String::new());
                tm.values.push(0.0);
                tm.colors.push(SITE_NODE_COLOR.to_string());
                for row in rows {
                    tm.labels.push(row.block_type.clone());
                    tm.parents.push(site.clone());
                    tm.values.push(area_value(row, metric));
                    tm.colors.push(block_color(&row.block_type).to_string());
                }
            }
            ChartData::Treemap(tm)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_BLOCK_COLOR;
    use crate::services::aggregation::aggregate;

    fn data() -> Vec<BlockSummary> {
        vec![
            BlockSummary::new("A", "Claim", 10, 50.0, 1.0),
            BlockSummary::new("A", "Example", 4, 20.0, 2.0),
            BlockSummary::new("B", "Claim", 5, 20.0, 3.0),
            BlockSummary::new("C", "Mystery", 1, 5.0, 1.0),
        ]
    }

    #[test]
    fn test_unique_sites_first_seen() {
        assert_eq!(unique_sites(&data()), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_legend_sorted_with_default_color() {
        let legend = legend(&data());
        let types: Vec<&str> = legend.iter().map(|l| l.block_type.as_str()).collect();
        assert_eq!(types, vec!["Claim", "Example", "Mystery"]);
        assert_eq!(legend[2].color, DEFAULT_BLOCK_COLOR);
    }

    #[test]
    fn test_overview_bar() {
        let rows = aggregate(&data(), &Scope::All, Metric::Count, 2);
        let ChartData::Bar(bar) = overview_chart(&rows, Metric::Count, ChartKind::Bar) else {
            panic!("expected bar chart");
        };
        assert_eq!(bar.labels, vec!["Claim", "Example"]);
        assert_eq!(bar.values, vec![15.0, 4.0]);
        assert_eq!(bar.x_axis_title, "Block Type");
        assert_eq!(bar.y_axis_title, "Count");
    }

    #[test]
    fn test_overview_pie_percentages_sum_to_100() {
        let rows = aggregate(&data(), &Scope::All, Metric::Count, 10);
        let ChartData::Pie(pie) = overview_chart(&rows, Metric::Count, ChartKind::Pie) else {
            panic!("expected pie chart");
        };
        let total: f64 = pie.percentages.iter().sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert_eq!(pie.labels.len(), 3);
    }

    #[test]
    fn test_overview_treemap_has_root_parent() {
        let rows = aggregate(&data(), &Scope::All, Metric::Count, 10);
        let ChartData::Treemap(tm) = overview_chart(&rows, Metric::Count, ChartKind::Treemap)
        else {
            panic!("expected treemap");
        };
        assert!(tm.parents.iter().all(|p| p.is_empty()));
    }

    #[test]
    fn test_detail_bar_zero_for_missing_site() {
        let ChartData::Bar(bar) = detail_chart(&data(), "Claim", Metric::Percent, ChartKind::Bar)
        else {
            panic!("expected bar chart");
        };
        assert_eq!(bar.labels, vec!["A", "B", "C"]);
        assert_eq!(bar.values, vec![50.0, 20.0, 0.0]);
        assert_eq!(bar.title.as_deref(), Some("Claim by Percentage Across Sites"));
    }

    #[test]
    fn test_detail_treemap_opacity_ramp() {
        let ChartData::Treemap(tm) =
            detail_chart(&data(), "Claim", Metric::Count, ChartKind::Treemap)
        else {
            panic!("expected treemap");
        };
        assert_eq!(tm.parents, vec!["Claim", "Claim", "Claim"]);
        assert_eq!(tm.colors[0], "hsla(39, 86.50%, 56.30%, 0.4)");
        assert_eq!(tm.colors[1], "hsla(39, 86.50%, 56.30%, 0.45)");
        assert_eq!(tm.branch_values.as_deref(), Some("total"));
    }

    #[test]
    fn test_detail_mini_pies_grid() {
        let ChartData::MiniPies(grid) =
            detail_chart(&data(), "Claim", Metric::Count, ChartKind::Pie)
        else {
            panic!("expected mini pies");
        };
        assert_eq!(grid.pies.len(), 3);
        assert_eq!(grid.rows, 1);
        let a = &grid.pies[0];
        assert_eq!(a.labels, vec!["Claim", "Example"]);
        assert_eq!(a.values, vec![10.0, 4.0]);
        assert_eq!(a.colors[1], MUTED_COLOR);
        assert_eq!(grid.pies[2].column, 2);
    }

    #[test]
    fn test_mini_pies_capped_at_twelve() {
        let many: Vec<BlockSummary> = (0..15)
            .map(|i| BlockSummary::new(format!("site{}", i), "Claim", 1, 1.0, 1.0))
            .collect();
        let ChartData::MiniPies(grid) = detail_chart(&many, "Claim", Metric::Count, ChartKind::Pie)
        else {
            panic!("expected mini pies");
        };
        assert_eq!(grid.pies.len(), MAX_MINI_PIES);
        assert_eq!(grid.rows, 4);
        assert_eq!(grid.pies[11].row, 3);
    }

    #[test]
    fn test_chart_data_tagged_on_wire() {
        let rows = aggregate(&data(), &Scope::All, Metric::Count, 1);
        let json = serde_json::to_value(overview_chart(&rows, Metric::Count, ChartKind::Bar)).unwrap();
        assert_eq!(json["type"], "bar");
        let json = serde_json::to_value(detail_chart(&data(), "Claim", Metric::Count, ChartKind::Pie))
            .unwrap();
        assert_eq!(json["type"], "mini_pies");
    }

    #[test]
    fn test_site_comparison_ranks_each_site_separately() {
        let mut rows = data();
        rows.push(BlockSummary::new("B", "Example", 9, 60.0, 2.5));
        let ChartData::SiteBars(chart) =
            site_comparison_chart(&rows, &Scope::All, Metric::Count, 1, ChartKind::Bar)
        else {
            panic!("expected site bars");
        };
        assert_eq!(chart.title, "Top 1 Block Types by Count");
        let tops: Vec<(&str, &str)> = chart
            .series
            .iter()
            .map(|s| (s.site.as_str(), s.labels[0].as_str()))
            .collect();
        assert_eq!(tops, vec![("A", "Claim"), ("B", "Example"), ("C", "Mystery")]);
        assert!(chart.series.iter().all(|s| s.labels.len() == 1));
    }

    #[test]
    fn test_site_comparison_position_ascending_and_inverted() {
        let ChartData::SitePies(chart) = site_comparison_chart(
            &data(),
            &Scope::Site("A".to_string()),
            Metric::AvgPosition,
            5,
            ChartKind::Pie,
        ) else {
            panic!("expected site pies");
        };
        assert_eq!(chart.series.len(), 1);
        let a = &chart.series[0];
        assert_eq!(a.labels, vec!["Claim", "Example"]);
        assert_eq!(a.values, vec![1.0, 0.5]);

        let ChartData::SiteBars(bars) = site_comparison_chart(
            &data(),
            &Scope::Site("A".to_string()),
            Metric::AvgPosition,
            5,
            ChartKind::Bar,
        ) else {
            panic!("expected site bars");
        };
        assert_eq!(bars.series[0].values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_site_comparison_zero_position_plots_zero() {
        let rows = vec![BlockSummary::new("A", "Claim", 3, 100.0, 0.0)];
        let ChartData::Treemap(tm) =
            site_comparison_chart(&rows, &Scope::All, Metric::AvgPosition, 5, ChartKind::Treemap)
        else {
            panic!("expected treemap");
        };
        assert_eq!(tm.values, vec![0.0, 0.0]);
        assert!(tm.values.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_site_comparison_treemap_nests_under_sites() {
        let ChartData::Treemap(tm) =
            site_comparison_chart(&data(), &Scope::All, Metric::Count, 1, ChartKind::Treemap)
        else {
            panic!("expected treemap");
        };
        assert_eq!(tm.labels, vec!["A", "Claim", "B", "Claim", "C", "Mystery"]);
        assert_eq!(tm.parents, vec!["", "A", "", "B", "", "C"]);
        assert_eq!(tm.values, vec![0.0, 10.0, 0.0, 5.0, 0.0, 1.0]);
        assert_eq!(tm.colors[0], SITE_NODE_COLOR);
        let pies = site_comparison_chart(&data(), &Scope::All, Metric::Count, 2, ChartKind::Pie);
        let json = serde_json::to_value(pies).unwrap();
        assert_eq!(json["type"], "site_pies");
        assert_eq!(json["series"][2]["column"], 2);
    }
}
