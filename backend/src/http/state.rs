//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::DatasetRepository;
use crate::llm::ExplanationGenerator;
use crate::services::session_store::SessionStore;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Block datasets
    pub repository: Arc<dyn DatasetRepository>,
    /// Language-model client behind `/v1/explain`, generate and blend
    pub generator: Arc<dyn ExplanationGenerator>,
    /// Playground sessions
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn DatasetRepository>,
        generator: Arc<dyn ExplanationGenerator>,
    ) -> Self {
        Self::with_sessions(repository, generator, SessionStore::new())
    }

    pub fn with_sessions(
        repository: Arc<dyn DatasetRepository>,
        generator: Arc<dyn ExplanationGenerator>,
        sessions: SessionStore,
    ) -> Self {
        Self {
            repository,
            generator,
            sessions,
        }
    }
}
