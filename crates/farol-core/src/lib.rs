//! # farol-core
//!
//! Core types, traits, and abstractions for the Farol knowledge engine.
//!
//! This crate provides the catalog/taxonomy data model, the suggestion
//! record and its status machine, the error taxonomy, and the repository
//! traits that the other farol crates depend on.

pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
