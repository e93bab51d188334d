//! # farol-review
//!
//! The suggestion lifecycle: AI-proposed knowledge changes enter as
//! `pending` records, a human reviewer approves, rejects, or merges them,
//! and approval/merge is the only place the engine writes articles. The
//! generator can also short-circuit a proposal straight to `skipped` when
//! it decides no improvement is warranted.
//!
//! All terminal states are final; concurrent reviewers are arbitrated with
//! a compare-and-swap on the suggestion status.

pub mod lifecycle;
pub mod memory;

pub use lifecycle::ReviewService;
pub use memory::{InMemoryArticleStore, InMemorySuggestionStore};
