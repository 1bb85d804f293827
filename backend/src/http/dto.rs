//! Data Transfer Objects for the HTTP API.
//!
//! Chart, statistics and playground payloads are serialized straight from the
//! service types; this module holds the request bodies, query strings and the
//! few response envelopes that wrap them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use crate::db::DatasetStatus;
pub use crate::models::{
    BlockId, ChainId, ChartKind, ExplanationBlock, HistoryEntry, Metric, QASample,
};
pub use crate::services::aggregation::AggregatedBlock;
pub use crate::services::block_stats::{BlockTypeStats, SiteStats};
pub use crate::services::charts::{ChartData, LegendEntry};
pub use crate::services::explorer::ExplorerState;
pub use crate::services::export::ExportFormat;
pub use crate::services::playground::{
    ForestTree, GenerateOutcome, HistoryComparison, PlaygroundSnapshot,
};
pub use crate::services::samples::SampleBlockView;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// `ok`, or the repository error
    pub repository: String,
    pub datasets: Vec<DatasetStatus>,
    pub sessions: usize,
}

// ==================== Aggregation ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitesResponse {
    pub sites: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegendResponse {
    pub block_types: Vec<LegendEntry>,
}

/// Query parameters for `/v1/overview`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverviewQuery {
    /// Site name or `all` (default)
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub metric: Option<Metric>,
    #[serde(default)]
    pub top_n: Option<usize>,
    #[serde(default)]
    pub chart: Option<ChartKind>,
    /// Selected block type; switches the chart to the per-site detail view.
    #[serde(default)]
    pub selected: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewResponse {
    pub view: ExplorerState,
    pub rows: Vec<AggregatedBlock>,
    pub chart: ChartData,
}

/// Query parameters for `/v1/site-comparison`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteComparisonQuery {
    /// Site name or `all` (default)
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub metric: Option<Metric>,
    #[serde(default)]
    pub top_n: Option<usize>,
    #[serde(default)]
    pub chart: Option<ChartKind>,
}

/// Query parameters for `/v1/block-types/{block_type}/detail`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetailQuery {
    #[serde(default)]
    pub metric: Option<Metric>,
    #[serde(default)]
    pub chart: Option<ChartKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteStatsResponse {
    pub sites: Vec<SiteStats>,
}

// ==================== Samples ====================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleQuery {
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleResponse {
    pub sample: QASample,
    pub block_types: Vec<String>,
    pub blocks: Vec<SampleBlockView>,
    /// Number of samples that matched the filters.
    pub matches: usize,
}

// ==================== Explainer ====================

/// Body of the stateless explainer proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainRequest {
    pub prompt: String,
    #[serde(default)]
    pub structure: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainResponse {
    pub output: String,
}

// ==================== Playground ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub snapshot: PlaygroundSnapshot,
}

/// Result of a playground mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
    pub changed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<BlockId>,
    pub snapshot: PlaygroundSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBlockRequest {
    /// Template name (e.g. `Claim`, or a custom template)
    #[serde(rename = "type")]
    pub block_type: String,
    /// Target chain; the active chain when omitted.
    #[serde(default)]
    pub chain: Option<ChainId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditBlockRequest {
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomTemplateRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub chain: ChainId,
    pub from: BlockId,
    pub to: BlockId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRequest {
    pub block_id: BlockId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlendRequest {
    pub block_ids: Vec<BlockId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendResponse {
    pub block: ExplanationBlock,
    pub snapshot: PlaygroundSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivateRequest {
    pub chain: ChainId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    /// Chain to explain; the active chain when omitted.
    #[serde(default)]
    pub chain: Option<ChainId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompareQuery {
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: Option<ExportFormat>,
}
