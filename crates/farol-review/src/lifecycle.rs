//! The suggestion lifecycle state machine.
//!
//! `pending → {approved, rejected, merged}` by reviewer action, plus
//! `skipped` as a generator-chosen initial terminal state. Terminal states
//! admit no further transition; concurrent reviewers race on a
//! compare-and-swap claim and the loser is told so.
//!
//! Approval and merge pair a status transition with an article write. The
//! claim is taken first and released again if the write fails, so a
//! suggestion is never left terminal without its corresponding article.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use farol_core::{
    Article, ArticleRepository, ArticleUpdate, Error, GeneratorOutcome, KnowledgeSuggestion,
    NewArticle, QualityFlags, Result, StatusChange, SuggestionCandidate, SuggestionRepository,
    SuggestionStatus, SuggestionType,
};
use farol_diff::{diff_words, DiffRun};

/// Review workflow over pluggable article and suggestion stores.
#[derive(Clone)]
pub struct ReviewService {
    articles: Arc<dyn ArticleRepository>,
    suggestions: Arc<dyn SuggestionRepository>,
}

impl ReviewService {
    pub fn new(
        articles: Arc<dyn ArticleRepository>,
        suggestions: Arc<dyn SuggestionRepository>,
    ) -> Self {
        Self {
            articles,
            suggestions,
        }
    }

    /// Record what the generation pipeline produced for one conversation.
    ///
    /// A candidate enters review as `pending`; its type is `update` iff the
    /// generator identified a similar article to revise. A skip signal is
    /// recorded directly in `skipped` — it never enters human review, and
    /// no later operation can produce `skipped`.
    pub async fn submit(&self, outcome: GeneratorOutcome) -> Result<KnowledgeSuggestion> {
        let suggestion = match outcome {
            GeneratorOutcome::Candidate(candidate) => from_candidate(candidate),
            GeneratorOutcome::Skip { reason } => skipped_record(reason),
        };
        self.suggestions.insert(&suggestion).await?;
        info!(
            suggestion_id = %suggestion.id,
            status = %suggestion.status,
            "suggestion submitted"
        );
        Ok(suggestion)
    }

    /// Approve a pending suggestion, applying its article write.
    ///
    /// `create` suggestions insert a new article; `update` suggestions
    /// mutate `similar_article_id`. A missing update target is
    /// [`Error::ArticleNotFound`] and leaves the suggestion `pending`.
    pub async fn approve(&self, id: Uuid, reviewer: &str) -> Result<KnowledgeSuggestion> {
        let suggestion = self.suggestions.fetch(id).await?;
        self.ensure_pending(&suggestion, "approve")?;

        let target = match suggestion.suggestion_type {
            SuggestionType::Update => {
                let target = suggestion.similar_article_id.ok_or_else(|| {
                    Error::InvalidInput(format!("update suggestion {} has no target article", id))
                })?;
                if !self.articles.exists(target).await? {
                    return Err(Error::ArticleNotFound(target));
                }
                Some(target)
            }
            SuggestionType::Create => None,
        };

        self.claim(id, SuggestionStatus::Approved, reviewer, "approve")
            .await?;

        let write = match target {
            Some(target) => self
                .articles
                .update(target, article_update_from(&suggestion))
                .await,
            None => self.articles.insert(new_article_from(&suggestion)).await,
        };
        let article = self.release_on_failure(id, write, "approve").await?;

        info!(
            suggestion_id = %id,
            article_id = %article.id,
            "suggestion approved"
        );
        self.suggestions.fetch(id).await
    }

    /// Reject a pending suggestion with an optional reason.
    pub async fn reject(
        &self,
        id: Uuid,
        reviewer: &str,
        reason: Option<String>,
    ) -> Result<KnowledgeSuggestion> {
        let suggestion = self.suggestions.fetch(id).await?;
        self.ensure_pending(&suggestion, "reject")?;

        let won = self
            .suggestions
            .transition(
                id,
                SuggestionStatus::Pending,
                StatusChange {
                    to: SuggestionStatus::Rejected,
                    reviewed_by: Some(reviewer.to_string()),
                    reviewed_at: Some(Utc::now()),
                    rejection_reason: reason,
                },
            )
            .await?;
        if !won {
            return Err(self.lost_race(id, "reject").await);
        }

        info!(suggestion_id = %id, "suggestion rejected");
        self.suggestions.fetch(id).await
    }

    /// Fold a pending suggestion's content into an explicitly chosen
    /// article, which may differ from `similar_article_id`.
    pub async fn merge(
        &self,
        id: Uuid,
        reviewer: &str,
        target_article_id: Uuid,
    ) -> Result<KnowledgeSuggestion> {
        let suggestion = self.suggestions.fetch(id).await?;
        self.ensure_pending(&suggestion, "merge")?;

        if !self.articles.exists(target_article_id).await? {
            return Err(Error::ArticleNotFound(target_article_id));
        }

        self.claim(id, SuggestionStatus::Merged, reviewer, "merge")
            .await?;

        let write = self
            .articles
            .update(target_article_id, article_update_from(&suggestion))
            .await;
        self.release_on_failure(id, write, "merge").await?;

        info!(
            suggestion_id = %id,
            article_id = %target_article_id,
            "suggestion merged"
        );
        self.suggestions.fetch(id).await
    }

    /// The before/after comparison shown to a reviewer.
    ///
    /// An `update` suggestion diffs the current target article against the
    /// proposed text; a `create` suggestion renders as all-added.
    pub async fn review_diff(&self, id: Uuid) -> Result<Vec<DiffRun>> {
        let suggestion = self.suggestions.fetch(id).await?;
        let proposed = suggestion.proposed_text();

        let before = match (suggestion.suggestion_type, suggestion.similar_article_id) {
            (SuggestionType::Update, Some(target)) => {
                self.articles.fetch(target).await?.review_text()
            }
            _ => String::new(),
        };

        let runs = diff_words(&before, &proposed);
        debug!(
            suggestion_id = %id,
            result_count = runs.len(),
            "review diff computed"
        );
        Ok(runs)
    }

    fn ensure_pending(
        &self,
        suggestion: &KnowledgeSuggestion,
        action: &'static str,
    ) -> Result<()> {
        if suggestion.status != SuggestionStatus::Pending {
            return Err(Error::InvalidStateTransition {
                status: suggestion.status,
                action,
            });
        }
        Ok(())
    }

    /// Claim the suggestion for a terminal state via CAS.
    async fn claim(
        &self,
        id: Uuid,
        to: SuggestionStatus,
        reviewer: &str,
        action: &'static str,
    ) -> Result<()> {
        let won = self
            .suggestions
            .transition(
                id,
                SuggestionStatus::Pending,
                StatusChange {
                    to,
                    reviewed_by: Some(reviewer.to_string()),
                    reviewed_at: Some(Utc::now()),
                    rejection_reason: None,
                },
            )
            .await?;
        if !won {
            return Err(self.lost_race(id, action).await);
        }
        Ok(())
    }

    /// Release a claim when the paired article write fails, so the
    /// suggestion drops back to `pending` instead of sitting terminal with
    /// no article behind it.
    async fn release_on_failure(
        &self,
        id: Uuid,
        write: Result<Article>,
        action: &'static str,
    ) -> Result<Article> {
        match write {
            Ok(article) => Ok(article),
            Err(err) => {
                warn!(
                    suggestion_id = %id,
                    op = action,
                    error = %err,
                    "article write failed, releasing claim"
                );
                let current = self.suggestions.fetch(id).await?.status;
                self.suggestions
                    .transition(
                        id,
                        current,
                        StatusChange {
                            to: SuggestionStatus::Pending,
                            ..Default::default()
                        },
                    )
                    .await?;
                Err(err)
            }
        }
    }

    /// Report the loser of a concurrent review race.
    async fn lost_race(&self, id: Uuid, action: &'static str) -> Error {
        let status = match self.suggestions.fetch(id).await {
            Ok(current) => current.status,
            Err(_) => SuggestionStatus::Pending,
        };
        debug!(suggestion_id = %id, status = %status, "lost review race");
        Error::InvalidStateTransition { status, action }
    }
}

fn from_candidate(candidate: SuggestionCandidate) -> KnowledgeSuggestion {
    let now = Utc::now();
    let suggestion_type = if candidate.similar_article_id.is_some() {
        SuggestionType::Update
    } else {
        SuggestionType::Create
    };
    KnowledgeSuggestion {
        id: Uuid::new_v4(),
        suggestion_type,
        product_standard: candidate.product_standard,
        subproduct_standard: candidate.subproduct_standard,
        description: candidate.description,
        resolution: candidate.resolution,
        observations: candidate.observations,
        confidence_score: candidate.confidence_score,
        quality_flags: candidate.quality_flags,
        similar_article_id: candidate.similar_article_id,
        similarity_score: candidate.similarity_score,
        update_reason: candidate.update_reason,
        status: SuggestionStatus::Pending,
        reviewed_by: None,
        reviewed_at: None,
        rejection_reason: None,
        skip_reason: None,
        raw_extraction: candidate.raw_extraction,
        created_at: now,
        updated_at: now,
    }
}

fn skipped_record(reason: String) -> KnowledgeSuggestion {
    let now = Utc::now();
    KnowledgeSuggestion {
        id: Uuid::new_v4(),
        suggestion_type: SuggestionType::Create,
        product_standard: None,
        subproduct_standard: None,
        description: None,
        resolution: None,
        observations: None,
        confidence_score: None,
        quality_flags: QualityFlags::default(),
        similar_article_id: None,
        similarity_score: None,
        update_reason: None,
        status: SuggestionStatus::Skipped,
        reviewed_by: None,
        reviewed_at: None,
        rejection_reason: None,
        skip_reason: Some(reason),
        raw_extraction: None,
        created_at: now,
        updated_at: now,
    }
}

fn new_article_from(suggestion: &KnowledgeSuggestion) -> NewArticle {
    NewArticle {
        description: suggestion.description.clone().unwrap_or_default(),
        resolution: suggestion.resolution.clone().unwrap_or_default(),
        observations: suggestion.observations.clone(),
        product_id: None,
        subject_id: None,
        intent_id: None,
        product_standard: suggestion.product_standard.clone(),
        subproduct_standard: suggestion.subproduct_standard.clone(),
    }
}

fn article_update_from(suggestion: &KnowledgeSuggestion) -> ArticleUpdate {
    ArticleUpdate {
        description: suggestion.description.clone(),
        resolution: suggestion.resolution.clone(),
        observations: suggestion.observations.clone(),
    }
}
