//! In-memory store implementations of the repository traits.
//!
//! Reference implementation and test double in one: each mutation commits
//! atomically under a single lock, matching the store contract the
//! lifecycle assumes.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use farol_core::{
    Article, ArticleRepository, ArticleUpdate, Error, KnowledgeSuggestion, NewArticle, Result,
    StatusChange, SuggestionRepository, SuggestionStatus,
};

/// In-memory article store.
#[derive(Clone, Default)]
pub struct InMemoryArticleStore {
    inner: Arc<Mutex<HashMap<Uuid, Article>>>,
}

impl InMemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing article, keeping its id. Test setup helper.
    pub async fn seed(&self, article: Article) {
        self.inner.lock().await.insert(article.id, article);
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleStore {
    async fn insert(&self, req: NewArticle) -> Result<Article> {
        let now = Utc::now();
        let article = Article {
            id: Uuid::new_v4(),
            description: req.description,
            resolution: req.resolution,
            observations: req.observations,
            product_id: req.product_id,
            subject_id: req.subject_id,
            intent_id: req.intent_id,
            product_standard: req.product_standard,
            subproduct_standard: req.subproduct_standard,
            created_at: now,
            updated_at: now,
        };
        self.inner.lock().await.insert(article.id, article.clone());
        Ok(article)
    }

    async fn fetch(&self, id: Uuid) -> Result<Article> {
        self.inner
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or(Error::ArticleNotFound(id))
    }

    async fn update(&self, id: Uuid, req: ArticleUpdate) -> Result<Article> {
        let mut guard = self.inner.lock().await;
        let article = guard.get_mut(&id).ok_or(Error::ArticleNotFound(id))?;
        if let Some(description) = req.description {
            article.description = description;
        }
        if let Some(resolution) = req.resolution {
            article.resolution = resolution;
        }
        if let Some(observations) = req.observations {
            article.observations = Some(observations);
        }
        article.updated_at = Utc::now();
        Ok(article.clone())
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        Ok(self.inner.lock().await.contains_key(&id))
    }

    async fn list(&self) -> Result<Vec<Article>> {
        let mut articles: Vec<Article> = self.inner.lock().await.values().cloned().collect();
        articles.sort_by_key(|a| a.created_at);
        Ok(articles)
    }
}

/// In-memory suggestion store.
#[derive(Clone, Default)]
pub struct InMemorySuggestionStore {
    inner: Arc<Mutex<HashMap<Uuid, KnowledgeSuggestion>>>,
}

impl InMemorySuggestionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SuggestionRepository for InMemorySuggestionStore {
    async fn insert(&self, suggestion: &KnowledgeSuggestion) -> Result<()> {
        self.inner
            .lock()
            .await
            .insert(suggestion.id, suggestion.clone());
        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> Result<KnowledgeSuggestion> {
        self.inner
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or(Error::SuggestionNotFound(id))
    }

    async fn list(&self, status: Option<SuggestionStatus>) -> Result<Vec<KnowledgeSuggestion>> {
        let mut suggestions: Vec<KnowledgeSuggestion> = self
            .inner
            .lock()
            .await
            .values()
            .filter(|s| status.map_or(true, |wanted| s.status == wanted))
            .cloned()
            .collect();
        suggestions.sort_by_key(|s| s.created_at);
        Ok(suggestions)
    }

    async fn transition(
        &self,
        id: Uuid,
        from: SuggestionStatus,
        change: StatusChange,
    ) -> Result<bool> {
        let mut guard = self.inner.lock().await;
        let suggestion = guard.get_mut(&id).ok_or(Error::SuggestionNotFound(id))?;
        if suggestion.status != from {
            return Ok(false);
        }
        suggestion.status = change.to;
        suggestion.reviewed_by = change.reviewed_by;
        suggestion.reviewed_at = change.reviewed_at;
        suggestion.rejection_reason = change.rejection_reason;
        suggestion.updated_at = Utc::now();
        Ok(true)
    }
}
