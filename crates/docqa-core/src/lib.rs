//! docqa-core
//!
//! Shared vocabulary for the document QA pipeline: chunk and hit types, the
//! error taxonomy, the component traits the engine is wired from, the
//! figment-backed configuration, and the fixed-width chunker.

pub mod chunker;
pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
