//! Dataset storage.
//!
//! Provides the block datasets through the Repository pattern so the HTTP
//! layer and tests can swap the source freely.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers / binary                                 │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  DatasetRepository trait (repository/dataset.rs)        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────▼──────────────────────────────┐
//!     │             Local Repository                  │
//!     │  (JSON files loaded into memory at startup)   │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! The module includes:
//! - `repository`: trait definition and error types
//! - `repositories::local`: in-memory implementation
//! - `factory`: creates repository instances from configuration
//! - `checksum`: dataset fingerprints reported by `/health`

pub mod checksum;
pub mod factory;
pub mod repositories;
pub mod repository;

pub use checksum::calculate_checksum;
pub use factory::RepositoryFactory;
pub use repositories::LocalRepository;
pub use repository::{
    DatasetRepository, DatasetStatus, ErrorContext, RepositoryError, RepositoryResult,
};

use std::sync::{Arc, OnceLock};

use crate::config::AppConfig;

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn DatasetRepository>> = OnceLock::new();

/// Initialize the global repository from configuration.
///
/// Later calls are no-ops and return the instance created first.
pub fn init_repository(config: &AppConfig) -> Arc<dyn DatasetRepository> {
    REPOSITORY
        .get_or_init(|| RepositoryFactory::from_config(config))
        .clone()
}
