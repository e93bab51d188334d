//! # farol-taxonomy
//!
//! Catalog hierarchy assembly and free-text entity matching.
//!
//! Three pieces: the [`scorer`] ranks a free-text mention against candidate
//! names and synonyms, the [`resolver`] turns a mention into zero, one, or
//! many catalog entities, and the [`hierarchy`] builder assembles the flat
//! catalog plus loosely-linked subjects/intents/articles into the navigable
//! product → subproduct → subject → intent tree.

pub mod hierarchy;
pub mod resolver;
pub mod scorer;

pub use hierarchy::build;
pub use resolver::{resolve, resolve_all, resolve_one, Matchable, ProductRef, Resolution, Scored};
pub use scorer::{rank, score, MatchScore, CONFIDENT};
