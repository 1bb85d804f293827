//! View state of the analysis explorer panel.

use serde::{Deserialize, Serialize};

use super::aggregation::{aggregate, AggregatedBlock};
use super::charts::{detail_chart, overview_chart, ChartData};
use crate::models::{BlockSummary, ChartKind, Metric, Scope};

pub const DEFAULT_TOP_N: usize = 3;

/// The choices offered by the panel's "Top" selector.
pub const TOP_N_CHOICES: [usize; 4] = [3, 5, 10, 15];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerState {
    pub scope: Scope,
    pub metric: Metric,
    pub chart: ChartKind,
    pub top_n: usize,
    pub current_hover: Option<String>,
    pub current_selection: Option<String>,
}

impl Default for ExplorerState {
    fn default() -> Self {
        Self {
            scope: Scope::All,
            metric: Metric::Count,
            chart: ChartKind::Bar,
            top_n: DEFAULT_TOP_N,
            current_hover: None,
            current_selection: None,
        }
    }
}

impl ExplorerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_hovered(&mut self, block_type: Option<String>) {
        self.current_hover = block_type;
    }

    pub fn set_selected(&mut self, block_type: Option<String>) {
        self.current_selection = block_type;
    }

    /// Select `block_type`, or clear the selection if it is already selected.
    pub fn toggle_selected(&mut self, block_type: &str) {
        if self.current_selection.as_deref() == Some(block_type) {
            self.current_selection = None;
        } else {
            self.current_selection = Some(block_type.to_string());
        }
    }

    /// Ranked rows for the current scope/metric/top-N.
    pub fn rows(&self, summaries: &[BlockSummary]) -> Vec<AggregatedBlock> {
        aggregate(summaries, &self.scope, self.metric, self.top_n)
    }

    /// The chart currently shown: the detail view when a block type is
    /// selected, otherwise the ranked overview.
    pub fn chart(&self, summaries: &[BlockSummary]) -> ChartData {
        match &self.current_selection {
            Some(block_type) => detail_chart(summaries, block_type, self.metric, self.chart),
            None => overview_chart(&self.rows(summaries), self.metric, self.chart),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = ExplorerState::new();
        assert_eq!(state.top_n, 3);
        assert!(state.scope.is_all());
        assert!(state.current_selection.is_none());
    }

    #[test]
    fn test_toggle_selected_twice_clears() {
        let mut state = ExplorerState::new();
        state.toggle_selected("Claim");
        assert_eq!(state.current_selection.as_deref(), Some("Claim"));
        state.toggle_selected("Example");
        assert_eq!(state.current_selection.as_deref(), Some("Example"));
        state.toggle_selected("Example");
        assert!(state.current_selection.is_none());
    }

    #[test]
    fn test_hover_is_plain_setter() {
        let mut state = ExplorerState::new();
        state.set_hovered(Some("Claim".to_string()));
        state.set_hovered(Some("Claim".to_string()));
        assert_eq!(state.current_hover.as_deref(), Some("Claim"));
        state.set_hovered(None);
        assert!(state.current_hover.is_none());
    }

    #[test]
    fn test_chart_switches_to_detail_on_selection() {
        let data = vec![
            BlockSummary::new("A", "Claim", 3, 30.0, 1.0),
            BlockSummary::new("B", "Claim", 2, 10.0, 1.0),
        ];
        let mut state = ExplorerState::new();
        let ChartData::Bar(overview) = state.chart(&data) else {
            panic!("expected bar chart");
        };
        assert_eq!(overview.labels, vec!["Claim"]);

        state.set_selected(Some("Claim".to_string()));
        let ChartData::Bar(detail) = state.chart(&data) else {
            panic!("expected bar chart");
        };
        assert_eq!(detail.labels, vec!["A", "B"]);
    }
}
