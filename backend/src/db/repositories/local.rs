//! In-memory dataset repository.
//!
//! Datasets are read from JSON files once at startup. A file that cannot be
//! read or parsed is logged and leaves that dataset empty; the failure is kept
//! in the dataset status so `/health` can report it.

use async_trait::async_trait;
use log::{error, info};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

use crate::db::checksum::calculate_checksum;
use crate::db::repository::{
    DatasetRepository, DatasetStatus, ErrorContext, RepositoryError, RepositoryResult,
};
use crate::models::{BlockSummary, QASample};

pub const BLOCK_SUMMARY_DATASET: &str = "block_summary";
pub const ANSWER_SAMPLES_DATASET: &str = "answer_samples";

#[derive(Debug)]
struct LocalData {
    summaries: Vec<BlockSummary>,
    samples: Vec<QASample>,
    status: Vec<DatasetStatus>,
}

/// Dataset repository backed by process memory.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

impl LocalRepository {
    /// Empty repository.
    pub fn new() -> Self {
        Self::from_parts(
            Vec::new(),
            Vec::new(),
            vec![
                DatasetStatus::empty(BLOCK_SUMMARY_DATASET),
                DatasetStatus::empty(ANSWER_SAMPLES_DATASET),
            ],
        )
    }

    /// Repository holding the given records, as if loaded from files.
    pub fn with_records(summaries: Vec<BlockSummary>, samples: Vec<QASample>) -> Self {
        let status = vec![
            in_memory_status(BLOCK_SUMMARY_DATASET, &summaries),
            in_memory_status(ANSWER_SAMPLES_DATASET, &samples),
        ];
        Self::from_parts(summaries, samples, status)
    }

    /// Load both datasets from disk. Never fails; see the module docs.
    pub fn load(summary_path: &Path, samples_path: &Path) -> Self {
        let (summaries, summary_status) =
            load_or_empty::<BlockSummary>(BLOCK_SUMMARY_DATASET, summary_path);
        let (samples, samples_status) =
            load_or_empty::<QASample>(ANSWER_SAMPLES_DATASET, samples_path);
        Self::from_parts(summaries, samples, vec![summary_status, samples_status])
    }

    fn from_parts(
        summaries: Vec<BlockSummary>,
        samples: Vec<QASample>,
        status: Vec<DatasetStatus>,
    ) -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData {
                summaries,
                samples,
                status,
            })),
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn in_memory_status<T: serde::Serialize>(name: &str, records: &[T]) -> DatasetStatus {
    let checksum = serde_json::to_vec(records)
        .map(|bytes| calculate_checksum(&bytes))
        .unwrap_or_default();
    DatasetStatus::loaded(name, records.len(), checksum)
}

/// Read and parse one JSON array dataset.
pub fn read_dataset<T: DeserializeOwned>(
    name: &str,
    path: &Path,
) -> RepositoryResult<(Vec<T>, String)> {
    let context = || {
        ErrorContext::new("load_dataset")
            .with_dataset(name)
            .with_path(path.display())
    };
    let bytes = std::fs::read(path)
        .map_err(|e| RepositoryError::load_with_context(e.to_string(), context()))?;
    let records: Vec<T> = serde_json::from_slice(&bytes)
        .map_err(|e| RepositoryError::parse_with_context(e.to_string(), context()))?;
    Ok((records, calculate_checksum(&bytes)))
}

fn load_or_empty<T: DeserializeOwned>(name: &str, path: &Path) -> (Vec<T>, DatasetStatus) {
    match read_dataset::<T>(name, path) {
        Ok((records, checksum)) => {
            info!(
                "loaded {} {} records from {}",
                records.len(),
                name,
                path.display()
            );
            let status = DatasetStatus::loaded(name, records.len(), checksum);
            (records, status)
        }
        Err(e) => {
            error!("failed to load {} dataset: {}", name, e);
            (Vec::new(), DatasetStatus::failed(name, &e))
        }
    }
}

#[async_trait]
impl DatasetRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }

    async fn block_summaries(&self) -> RepositoryResult<Vec<BlockSummary>> {
        Ok(self.data.read().summaries.clone())
    }

    async fn samples(&self) -> RepositoryResult<Vec<QASample>> {
        Ok(self.data.read().samples.clone())
    }

    async fn dataset_status(&self) -> RepositoryResult<Vec<DatasetStatus>> {
        Ok(self.data.read().status.clone())
    }
}
