//! Per-block-type and per-site statistics cards.

use serde::{Deserialize, Serialize};

use super::aggregation::{group_by_block_type, rank, weighted_avg_position};
use super::charts::unique_sites;
use crate::models::{block_color, BlockSummary, Metric};

/// How many sites (or block types) a stats card lists.
pub const TOP_ENTRIES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteShare {
    pub site: String,
    pub count: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockTypeStats {
    pub block_type: String,
    pub total_count: u64,
    pub avg_percent: f64,
    pub avg_position: f64,
    /// Top sites by count, highest first.
    pub sites: Vec<SiteShare>,
}

/// Cross-site statistics for one block type, or `None` when no record carries it.
pub fn block_type_stats(summaries: &[BlockSummary], block_type: &str) -> Option<BlockTypeStats> {
    let records: Vec<&BlockSummary> = summaries
        .iter()
        .filter(|s| s.block_type == block_type)
        .collect();
    if records.is_empty() {
        return None;
    }

    let total_count = records.iter().map(|s| s.count).sum();
    let avg_percent = records.iter().map(|s| s.percent).sum::<f64>() / records.len() as f64;
    let avg_position = weighted_avg_position(records.iter().copied());

    let mut sites: Vec<SiteShare> = records
        .iter()
        .map(|s| SiteShare {
            site: s.site.clone(),
            count: s.count,
            percent: s.percent,
        })
        .collect();
    sites.sort_by(|a, b| b.count.cmp(&a.count));
    sites.truncate(TOP_ENTRIES);

    Some(BlockTypeStats {
        block_type: block_type.to_string(),
        total_count,
        avg_percent,
        avg_position,
        sites,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteTopBlock {
    pub block_type: String,
    pub count: u64,
    pub percent: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteStats {
    pub site: String,
    pub total_blocks: u64,
    pub unique_types: usize,
    pub top_blocks: Vec<SiteTopBlock>,
}

/// One card per site, in first-seen site order.
pub fn site_stats(summaries: &[BlockSummary]) -> Vec<SiteStats> {
    unique_sites(summaries)
        .into_iter()
        .map(|site| {
            let records: Vec<&BlockSummary> =
                summaries.iter().filter(|s| s.site == site).collect();
            let mut grouped = group_by_block_type(records.iter().copied());
            let unique_types = grouped.len();
            rank(&mut grouped, Metric::Count);
            grouped.truncate(TOP_ENTRIES);

            SiteStats {
                total_blocks: records.iter().map(|s| s.count).sum(),
                unique_types,
                top_blocks: grouped
                    .into_iter()
                    .map(|g| SiteTopBlock {
                        color: block_color(&g.block_type).to_string(),
                        block_type: g.block_type,
                        count: g.count,
                        percent: g.percent,
                    })
                    .collect(),
                site,
            }
        })
        .collect()
}
