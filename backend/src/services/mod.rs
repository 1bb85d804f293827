//! Service layer.
//!
//! The aggregation engine (`aggregation`, `charts`, `block_stats`) is a set of
//! pure functions over block summary records. The playground (`playground`,
//! `session_store`) owns the chain forest and talks to the explainer through
//! the `llm` capability. The rest are small collaborators.

pub mod aggregation;
pub mod block_stats;
pub mod charts;
pub mod explorer;
pub mod export;
pub mod ids;
pub mod playground;
pub mod prompts;
pub mod samples;
pub mod session_store;

pub use aggregation::{aggregate, AggregatedBlock};
pub use block_stats::{block_type_stats, site_stats, BlockTypeStats, SiteStats};
pub use charts::{
    detail_chart, legend, overview_chart, site_comparison_chart, unique_sites, ChartData,
    LegendEntry,
};
pub use explorer::ExplorerState;
pub use export::{ExportDocument, ExportFormat};
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use playground::{Playground, PlaygroundError};
pub use samples::{random_sample, SampleView};
pub use session_store::{SessionStore, TicketGuard};
