//! Repository implementations.
//!
//! - `local`: in-memory datasets loaded from JSON files
pub mod local;

pub use local::LocalRepository;
