//! Block aggregation and ranking.
//!
//! Turns the flat per-(site, block_type) summary records into the ranked
//! top-N rows that back every overview chart:
//!
//! 1. filter by scope
//! 2. group by block type in first-seen order
//! 3. renormalize percents to 100 (all sites + percent metric only)
//! 4. rank by metric (ascending for position, descending otherwise, stable)
//! 5. truncate to `top_n`

use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{BlockSummary, Metric, Scope};

/// One block type after grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedBlock {
    pub block_type: String,
    /// Sum of counts across the contributing records.
    pub count: u64,
    /// Simple mean of the contributing percents (or its renormalized share).
    pub percent: f64,
    /// Count-weighted mean position.
    pub avg_position: f64,
    /// Number of summary records folded into this row.
    pub records: usize,
}

impl AggregatedBlock {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Count => self.count as f64,
            Metric::Percent => self.percent,
            Metric::AvgPosition => self.avg_position,
        }
    }
}

/// Running sums for one block type.
#[derive(Debug, Default)]
struct Accumulator {
    count: u64,
    percent_sum: f64,
    weighted_position: f64,
    records: usize,
}

impl Accumulator {
    fn push(&mut self, summary: &BlockSummary) {
        self.count += summary.count;
        self.percent_sum += summary.percent;
        self.weighted_position += summary.avg_position * summary.count as f64;
        self.records += 1;
    }

    fn finish(self, block_type: String) -> AggregatedBlock {
        let percent = if self.records == 0 {
            0.0
        } else {
            self.percent_sum / self.records as f64
        };
        AggregatedBlock {
            block_type,
            count: self.count,
            percent,
            avg_position: weighted_mean(self.weighted_position, self.count),
            records: self.records,
        }
    }
}

fn weighted_mean(weighted_sum: f64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        weighted_sum / total as f64
    }
}

/// Count-weighted mean of `avg_position`. Returns `0.0` when the counts sum to zero.
pub fn weighted_avg_position<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a BlockSummary>,
{
    let (weighted, total) = records.into_iter().fold((0.0_f64, 0_u64), |(w, t), s| {
        (w + s.avg_position * s.count as f64, t + s.count)
    });
    weighted_mean(weighted, total)
}

/// Keep the records that fall inside `scope`.
pub fn filter_by_scope<'a>(summaries: &'a [BlockSummary], scope: &Scope) -> Vec<&'a BlockSummary> {
    summaries.iter().filter(|s| scope.matches(&s.site)).collect()
}

/// Group records by block type, keeping the order in which types first appear.
pub fn group_by_block_type<'a, I>(records: I) -> Vec<AggregatedBlock>
where
    I: IntoIterator<Item = &'a BlockSummary>,
{
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Accumulator> = HashMap::new();

    for summary in records {
        if !groups.contains_key(&summary.block_type) {
            order.push(summary.block_type.clone());
        }
        groups
            .entry(summary.block_type.clone())
            .or_default()
            .push(summary);
    }

    order
        .into_iter()
        .filter_map(|block_type| {
            groups
                .remove(&block_type)
                .map(|acc| acc.finish(block_type))
        })
        .collect()
}

/// Rescale percents so they sum to 100. Leaves the rows untouched when the total is 0.
pub fn normalize_percents(rows: &mut [AggregatedBlock]) {
    let total: f64 = rows.iter().map(|r| r.percent).sum();
    if total > 0.0 {
        for row in rows.iter_mut() {
            row.percent = row.percent / total * 100.0;
        }
    }
}

/// Stable sort by `metric`; ascending for position, descending otherwise.
pub fn rank(rows: &mut [AggregatedBlock], metric: Metric) {
    let ascending = metric.ascending();
    rows.sort_by(|a, b| {
        let ord = a
            .value(metric)
            .partial_cmp(&b.value(metric))
            .unwrap_or(Ordering::Equal);
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    });
}

/// Run the whole pipeline and return at most `top_n` ranked rows.
pub fn aggregate(
    summaries: &[BlockSummary],
    scope: &Scope,
    metric: Metric,
    top_n: usize,
) -> Vec<AggregatedBlock> {
    let filtered = filter_by_scope(summaries, scope);
    let mut rows = group_by_block_type(filtered.iter().copied());

    if scope.is_all() && metric == Metric::Percent {
        normalize_percents(&mut rows);
    }

    rank(&mut rows, metric);
    rows.truncate(top_n);

    debug!(
        "aggregated {} summaries (scope={}, metric={}) into {} rows",
        filtered.len(),
        String::from(scope.clone()),
        metric,
        rows.len()
    );

    rows
}

#[cfg(test)]
#[path = "aggregation_tests.rs"]
mod aggregation_tests;
