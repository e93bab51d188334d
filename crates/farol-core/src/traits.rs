//! Core traits for farol store abstractions.
//!
//! These traits define the seams between the engine and the persistent
//! store, enabling pluggable backends and testability. The store is assumed
//! to commit each mutation atomically.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

/// Repository for knowledge article reads and writes.
///
/// Writes are invoked only from suggestion approval/merge; everything else
/// in the engine treats articles as read-only snapshots.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Insert a new article, returning the stored record.
    async fn insert(&self, req: NewArticle) -> Result<Article>;

    /// Fetch an article by ID.
    async fn fetch(&self, id: Uuid) -> Result<Article>;

    /// Apply a partial update to an article's text fields.
    async fn update(&self, id: Uuid, req: ArticleUpdate) -> Result<Article>;

    /// Check if an article exists.
    async fn exists(&self, id: Uuid) -> Result<bool>;

    /// List all articles.
    async fn list(&self) -> Result<Vec<Article>>;
}

/// Review metadata applied together with a status transition.
///
/// Fields are set verbatim: `None` clears, which is what releasing a claim
/// back to `pending` relies on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusChange {
    pub to: SuggestionStatus,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
}

/// Repository for suggestion records.
#[async_trait]
pub trait SuggestionRepository: Send + Sync {
    /// Insert a new suggestion record.
    async fn insert(&self, suggestion: &KnowledgeSuggestion) -> Result<()>;

    /// Fetch a suggestion by ID.
    async fn fetch(&self, id: Uuid) -> Result<KnowledgeSuggestion>;

    /// List suggestions, optionally filtered by status.
    async fn list(&self, status: Option<SuggestionStatus>) -> Result<Vec<KnowledgeSuggestion>>;

    /// Compare-and-swap status transition.
    ///
    /// Applies `change` only if the suggestion's current status equals
    /// `from`, returning whether the swap happened. A `false` return is how
    /// the loser of a concurrent review race finds out.
    async fn transition(
        &self,
        id: Uuid,
        from: SuggestionStatus,
        change: StatusChange,
    ) -> Result<bool>;
}
