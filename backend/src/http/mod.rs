//! HTTP server module.
//!
//! Exposes the aggregation views, the explainer proxy and the playground
//! sessions as a REST API over the library's service layer.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Request parsing and validation                         │
//! │  - JSON serialization/deserialization                     │
//! │  - CORS, compression, error handling                      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services/)                                │
//! │  - Aggregation, charts, block statistics                  │
//! │  - Playground sessions                                    │
//! └─────────┬─────────────────────────────────┬──────────────┘
//!           │                                 │
//! ┌─────────▼──────────────────┐   ┌──────────▼───────────────┐
//! │  Repository Layer (db/)    │   │  Explainer (llm/)        │
//! │  - LocalRepository         │   │  - OpenAiGenerator       │
//! └────────────────────────────┘   └──────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
