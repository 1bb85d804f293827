//! Dataset repository trait.
//!
//! The datasets are static and read-only: one array of block summary records
//! and one array of QA samples. Implementations hand out owned copies so the
//! aggregation code never holds a lock.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::RepositoryResult;
use crate::models::{BlockSummary, QASample};

/// Load status of one dataset, reported by `/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStatus {
    pub name: String,
    pub records: usize,
    pub loaded: bool,
    /// SHA-256 of the raw file contents, hex encoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DatasetStatus {
    pub fn loaded(name: impl Into<String>, records: usize, checksum: String) -> Self {
        Self {
            name: name.into(),
            records,
            loaded: true,
            checksum: Some(checksum),
            error: None,
        }
    }

    pub fn failed(name: impl Into<String>, error: impl ToString) -> Self {
        Self {
            name: name.into(),
            records: 0,
            loaded: false,
            checksum: None,
            error: Some(error.to_string()),
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: 0,
            loaded: false,
            checksum: None,
            error: None,
        }
    }
}

/// Read access to the block datasets.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to be shared through the app state.
#[async_trait]
pub trait DatasetRepository: Send + Sync {
    /// `Ok(true)` when the repository is usable. An empty dataset is still usable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// All block summary records, in file order.
    async fn block_summaries(&self) -> RepositoryResult<Vec<BlockSummary>>;

    /// All QA samples, in file order.
    async fn samples(&self) -> RepositoryResult<Vec<QASample>>;

    /// Load status of every dataset.
    async fn dataset_status(&self) -> RepositoryResult<Vec<DatasetStatus>>;
}
