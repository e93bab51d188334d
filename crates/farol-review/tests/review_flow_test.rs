//! End-to-end review flow: generator output through reviewer disposition,
//! with the resulting articles feeding a hierarchy rebuild.

use std::sync::Arc;

use farol_core::{
    ArticleRepository, CatalogProduct, Error, GeneratorOutcome, QualityFlags, RawExtraction,
    SuggestionCandidate, SuggestionRepository, SuggestionStatus, SuggestionType,
};
use farol_review::{InMemoryArticleStore, InMemorySuggestionStore, ReviewService};
use uuid::Uuid;

fn candidate(description: &str, resolution: &str) -> SuggestionCandidate {
    SuggestionCandidate {
        product_standard: Some("Cards".to_string()),
        subproduct_standard: None,
        description: Some(description.to_string()),
        resolution: Some(resolution.to_string()),
        observations: None,
        confidence_score: Some(0.9),
        quality_flags: QualityFlags::default(),
        similar_article_id: None,
        similarity_score: None,
        update_reason: None,
        raw_extraction: Some(RawExtraction {
            source_articles: vec!["conv-42".to_string()],
        }),
    }
}

fn setup() -> (ReviewService, InMemoryArticleStore, InMemorySuggestionStore) {
    // RUST_LOG=debug surfaces lifecycle decisions when a test fails.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    let articles = InMemoryArticleStore::new();
    let suggestions = InMemorySuggestionStore::new();
    let service = ReviewService::new(Arc::new(articles.clone()), Arc::new(suggestions.clone()));
    (service, articles, suggestions)
}

#[tokio::test]
async fn approved_create_flows_into_hierarchy_rebuild() {
    let (service, articles, _) = setup();

    let suggestion = service
        .submit(GeneratorOutcome::Candidate(candidate(
            "Blocked card",
            "Unblock from the security tab.",
        )))
        .await
        .unwrap();
    service.approve(suggestion.id, "ana").await.unwrap();

    // Rebuild the tree from the mutated article snapshot, the way the
    // console does after every catalog or article change.
    let catalog = vec![CatalogProduct {
        id: Uuid::new_v4(),
        product_name: "Cards".to_string(),
        subproduct_name: None,
    }];
    let snapshot = articles.list().await.unwrap();
    let tree = farol_taxonomy::build(&catalog, &[], &[], &snapshot);

    assert_eq!(tree.roots.len(), 1);
    assert_eq!(tree.roots[0].articles.len(), 1);
    assert_eq!(tree.roots[0].articles[0].description, "Blocked card");
    assert!(tree.unclassified.is_empty());
}

#[tokio::test]
async fn update_suggestion_full_review_cycle() {
    let (service, articles, suggestions) = setup();

    let existing = articles
        .insert(farol_core::NewArticle {
            description: "How to dispute a charge".to_string(),
            resolution: "Call support and wait on the line.".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let mut c = candidate(
        "How to dispute a charge",
        "Open a dispute from the statement view.",
    );
    c.similar_article_id = Some(existing.id);
    c.similarity_score = Some(0.94);
    c.update_reason = Some("self-service flow replaced the phone flow".to_string());

    let suggestion = service.submit(GeneratorOutcome::Candidate(c)).await.unwrap();
    assert_eq!(suggestion.suggestion_type, SuggestionType::Update);

    // The reviewer sees removed-then-added runs for the changed region.
    let runs = service.review_diff(suggestion.id).await.unwrap();
    assert!(runs
        .iter()
        .any(|r| r.kind == farol_diff::DiffKind::Removed && r.value.contains("Call support")));

    service.approve(suggestion.id, "ana").await.unwrap();

    let mutated = articles.fetch(existing.id).await.unwrap();
    assert_eq!(
        mutated.resolution,
        "Open a dispute from the statement view."
    );

    // Terminal from here on, for every operation.
    for result in [
        service.approve(suggestion.id, "bea").await,
        service.reject(suggestion.id, "bea", None).await,
        service.merge(suggestion.id, "bea", existing.id).await,
    ] {
        assert!(matches!(
            result,
            Err(Error::InvalidStateTransition {
                status: SuggestionStatus::Approved,
                ..
            })
        ));
    }

    let stored = suggestions.fetch(suggestion.id).await.unwrap();
    assert_eq!(stored.status, SuggestionStatus::Approved);
}

#[tokio::test]
async fn skipped_suggestions_never_enter_review() {
    let (service, _, suggestions) = setup();

    service
        .submit(GeneratorOutcome::Skip {
            reason: "no improvement over existing coverage".to_string(),
        })
        .await
        .unwrap();

    let pending = suggestions
        .list(Some(SuggestionStatus::Pending))
        .await
        .unwrap();
    assert!(pending.is_empty());

    let skipped = suggestions
        .list(Some(SuggestionStatus::Skipped))
        .await
        .unwrap();
    assert_eq!(skipped.len(), 1);
    assert!(skipped[0].skip_reason.is_some());
}
