//! # Blockscope Backend
//!
//! Analytics and authoring backend for "explanation blocks": the typed spans
//! (Definition, Example, Claim, ...) found in question/answer text.
//!
//! ## Features
//!
//! - **Aggregation**: rank per-site block statistics into top-N chart datasets
//! - **Charts**: bar, pie and treemap shapes, plus per-site detail views
//! - **Samples**: random QA samples with block highlighting
//! - **Playground**: compose branching chains of blocks and have a language
//!   model turn them into an explanation
//! - **HTTP API**: RESTful endpoints for the single-page client
//!
//! ## Architecture
//!
//! - [`models`]: block summaries, samples, blocks, chains and the palette
//! - [`services`]: aggregation engine, playground and their collaborators
//! - [`db`]: dataset repository loaded from JSON files
//! - [`llm`]: explanation generator capability and its OpenAI client
//! - [`config`]: TOML + environment configuration
//! - [`http`]: Axum-based HTTP server and request handlers
//!

pub mod config;
pub mod db;
pub mod llm;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
