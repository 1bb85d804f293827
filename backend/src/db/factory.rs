//! Repository factory for dependency injection.
//!
//! Creates repository instances from runtime configuration.

use std::path::Path;
use std::sync::Arc;

use super::repositories::LocalRepository;
use super::repository::DatasetRepository;
use crate::config::{AppConfig, DataSettings};

/// Repository factory for creating repository instances.
///
/// # Example
/// ```ignore
/// use blockscope::config::AppConfig;
/// use blockscope::db::RepositoryFactory;
///
/// let config = AppConfig::load()?;
/// let repo = RepositoryFactory::from_config(&config);
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create an empty in-memory repository.
    pub fn create_local() -> Arc<dyn DatasetRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Load the datasets from explicit file paths.
    pub fn from_paths(summary_path: &Path, samples_path: &Path) -> Arc<dyn DatasetRepository> {
        Arc::new(LocalRepository::load(summary_path, samples_path))
    }

    /// Load the datasets named by the `[data]` settings.
    pub fn from_data_settings(data: &DataSettings) -> Arc<dyn DatasetRepository> {
        Self::from_paths(&data.block_summary_path(), &data.answer_samples_path())
    }

    /// Load the datasets named by the application configuration.
    pub fn from_config(config: &AppConfig) -> Arc<dyn DatasetRepository> {
        Self::from_data_settings(&config.data)
    }
}
