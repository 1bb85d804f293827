//! Repository trait definitions.

pub mod dataset;
pub mod error;

pub use dataset::{DatasetRepository, DatasetStatus};
pub use error::{ErrorContext, RepositoryError, RepositoryResult};
