//! Data model for the Farol knowledge engine.
//!
//! The catalog (products and subproducts) organizes the knowledge taxonomy:
//! subjects group intents, intents group articles, and articles may instead
//! hang off a subject directly or carry only legacy free-text product
//! labels. Suggestions are AI-proposed article changes awaiting human
//! disposition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// CATALOG & TAXONOMY
// =============================================================================

/// One product/subproduct combination in the catalog.
///
/// Multiple rows may share `product_name` with different subproducts. The
/// row with no subproduct is the "generic" variant for that product name and
/// is the one whose id surfaces at the product level of the hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub id: Uuid,
    pub product_name: String,
    pub subproduct_name: Option<String>,
}

impl CatalogProduct {
    /// Whether this row is the generic (no-subproduct) variant.
    pub fn is_generic(&self) -> bool {
        self.subproduct_name.is_none()
    }
}

/// A knowledge subject, owned by exactly one catalog row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub product_catalog_id: Uuid,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

/// A customer intent, owned by exactly one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub id: Uuid,
    pub name: String,
    pub subject_id: Uuid,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

/// A knowledge article.
///
/// Linkage granularity is exclusive by precedence: when `intent_id` is set
/// it is authoritative, else `subject_id`, else the legacy free-text
/// `product_standard`/`subproduct_standard` labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: Uuid,
    pub description: String,
    pub resolution: String,
    pub observations: Option<String>,
    pub product_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    pub intent_id: Option<Uuid>,
    pub product_standard: Option<String>,
    pub subproduct_standard: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// The text a reviewer compares a proposed edit against.
    pub fn review_text(&self) -> String {
        join_text_fields(
            &self.description,
            &self.resolution,
            self.observations.as_deref(),
        )
    }
}

/// Join the article text fields into one reviewable blob.
///
/// Empty segments are skipped so diffs never show phantom blank sections.
pub(crate) fn join_text_fields(
    description: &str,
    resolution: &str,
    observations: Option<&str>,
) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if !description.is_empty() {
        parts.push(description);
    }
    if !resolution.is_empty() {
        parts.push(resolution);
    }
    if let Some(obs) = observations {
        if !obs.is_empty() {
            parts.push(obs);
        }
    }
    parts.join("\n\n")
}

// =============================================================================
// HIERARCHY
// =============================================================================

/// Level of a node in the product → subproduct → subject → intent tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeLevel {
    Product,
    Subproduct,
    Subject,
    Intent,
}

impl std::fmt::Display for NodeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Product => write!(f, "product"),
            Self::Subproduct => write!(f, "subproduct"),
            Self::Subject => write!(f, "subject"),
            Self::Intent => write!(f, "intent"),
        }
    }
}

/// One level of the navigable taxonomy tree.
///
/// `full_path` is the human-readable breadcrumb from root to this node
/// (`" > "`-joined). It is unique within one built tree and doubles as the
/// expand/collapse key in the consuming UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyNode {
    pub name: String,
    pub level: NodeLevel,
    pub full_path: String,
    pub children: Vec<HierarchyNode>,
    pub articles: Vec<Article>,
    pub product_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    pub intent_id: Option<Uuid>,
}

impl HierarchyNode {
    /// Total number of articles in this node and all descendants.
    pub fn article_count(&self) -> usize {
        self.articles.len()
            + self
                .children
                .iter()
                .map(HierarchyNode::article_count)
                .sum::<usize>()
    }
}

/// Result of one hierarchy build.
///
/// Entities whose parent references could not be resolved are surfaced here
/// rather than silently dropped, so operators can be alerted to stale
/// catalog links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hierarchy {
    /// Root product nodes, sorted alphabetically.
    pub roots: Vec<HierarchyNode>,
    /// Articles with no resolvable linkage and no free-text product label.
    pub unclassified: Vec<Article>,
    /// Subjects whose `product_catalog_id` matched no catalog row.
    pub unplaced_subjects: Vec<Subject>,
    /// Intents whose `subject_id` matched no placed subject.
    pub unplaced_intents: Vec<Intent>,
}

impl Hierarchy {
    /// Total number of articles placed in the tree (excludes unclassified).
    pub fn placed_article_count(&self) -> usize {
        self.roots.iter().map(HierarchyNode::article_count).sum()
    }
}

// =============================================================================
// SUGGESTIONS
// =============================================================================

/// Whether a suggestion proposes a brand-new article or an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    Create,
    Update,
}

impl std::fmt::Display for SuggestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
        }
    }
}

/// Disposition state of a suggestion.
///
/// `Pending` is the only non-terminal state. Once a suggestion reaches any
/// other state no further transition is permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum SuggestionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Merged,
    Skipped,
}

impl SuggestionStatus {
    /// Whether this status admits no further transition.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
            Self::Merged => write!(f, "merged"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

impl std::str::FromStr for SuggestionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "merged" => Ok(Self::Merged),
            "skipped" => Ok(Self::Skipped),
            _ => Err(format!("Invalid suggestion status: {}", s)),
        }
    }
}

/// Generator-provided quality hints attached to a suggestion.
///
/// Consumed but never computed by this engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityFlags {
    pub is_complete: Option<bool>,
    pub is_uncertain: Option<bool>,
    pub possible_error: Option<bool>,
    pub needs_review: Option<bool>,
}

/// Provenance of a suggestion: which source conversations/articles the
/// generator extracted it from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExtraction {
    #[serde(default)]
    pub source_articles: Vec<String>,
}

/// An AI-proposed new or revised knowledge article awaiting disposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeSuggestion {
    pub id: Uuid,
    pub suggestion_type: SuggestionType,
    pub product_standard: Option<String>,
    pub subproduct_standard: Option<String>,
    pub description: Option<String>,
    pub resolution: Option<String>,
    pub observations: Option<String>,
    pub confidence_score: Option<f32>,
    #[serde(default)]
    pub quality_flags: QualityFlags,
    pub similar_article_id: Option<Uuid>,
    pub similarity_score: Option<f32>,
    pub update_reason: Option<String>,
    pub status: SuggestionStatus,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub skip_reason: Option<String>,
    pub raw_extraction: Option<RawExtraction>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl KnowledgeSuggestion {
    /// The text a reviewer sees as the proposed article content.
    pub fn proposed_text(&self) -> String {
        join_text_fields(
            self.description.as_deref().unwrap_or_default(),
            self.resolution.as_deref().unwrap_or_default(),
            self.observations.as_deref(),
        )
    }
}

// =============================================================================
// GENERATOR INTERFACE
// =============================================================================

/// A candidate suggestion payload produced by the generation pipeline.
///
/// Opaque to this engine beyond field access: confidence, quality flags,
/// and the similar-article reference are taken as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionCandidate {
    pub product_standard: Option<String>,
    pub subproduct_standard: Option<String>,
    pub description: Option<String>,
    pub resolution: Option<String>,
    pub observations: Option<String>,
    pub confidence_score: Option<f32>,
    #[serde(default)]
    pub quality_flags: QualityFlags,
    /// Set when the generator found an existing article the candidate
    /// revises; makes the suggestion an `Update`.
    pub similar_article_id: Option<Uuid>,
    pub similarity_score: Option<f32>,
    pub update_reason: Option<String>,
    pub raw_extraction: Option<RawExtraction>,
}

/// What the generation pipeline returned for one analyzed conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum GeneratorOutcome {
    /// A candidate worth human review.
    Candidate(SuggestionCandidate),
    /// The generator itself determined no improvement is warranted.
    Skip { reason: String },
}

// =============================================================================
// WRITE REQUESTS
// =============================================================================

/// Request for creating a new article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    pub description: String,
    pub resolution: String,
    pub observations: Option<String>,
    pub product_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    pub intent_id: Option<Uuid>,
    pub product_standard: Option<String>,
    pub subproduct_standard: Option<String>,
}

/// Partial update of an article's text fields. `None` leaves a field
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleUpdate {
    pub description: Option<String>,
    pub resolution: Option<String>,
    pub observations: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_status_terminal() {
        assert!(!SuggestionStatus::Pending.is_terminal());
        assert!(SuggestionStatus::Approved.is_terminal());
        assert!(SuggestionStatus::Rejected.is_terminal());
        assert!(SuggestionStatus::Merged.is_terminal());
        assert!(SuggestionStatus::Skipped.is_terminal());
    }

    #[test]
    fn test_suggestion_status_roundtrip() {
        for status in [
            SuggestionStatus::Pending,
            SuggestionStatus::Approved,
            SuggestionStatus::Rejected,
            SuggestionStatus::Merged,
            SuggestionStatus::Skipped,
        ] {
            let parsed: SuggestionStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_suggestion_status_parse_invalid() {
        let result = "archived".parse::<SuggestionStatus>();
        assert!(result.is_err());
    }

    #[test]
    fn test_catalog_product_is_generic() {
        let generic = CatalogProduct {
            id: Uuid::new_v4(),
            product_name: "Cards".to_string(),
            subproduct_name: None,
        };
        let specific = CatalogProduct {
            id: Uuid::new_v4(),
            product_name: "Cards".to_string(),
            subproduct_name: Some("Credit".to_string()),
        };
        assert!(generic.is_generic());
        assert!(!specific.is_generic());
    }

    #[test]
    fn test_join_text_fields_skips_empty() {
        assert_eq!(join_text_fields("a", "b", Some("c")), "a\n\nb\n\nc");
        assert_eq!(join_text_fields("a", "", None), "a");
        assert_eq!(join_text_fields("", "", Some("")), "");
    }

    #[test]
    fn test_node_level_display() {
        assert_eq!(NodeLevel::Product.to_string(), "product");
        assert_eq!(NodeLevel::Subproduct.to_string(), "subproduct");
        assert_eq!(NodeLevel::Subject.to_string(), "subject");
        assert_eq!(NodeLevel::Intent.to_string(), "intent");
    }

    #[test]
    fn test_generator_outcome_serde_tag() {
        let skip = GeneratorOutcome::Skip {
            reason: "no improvement".to_string(),
        };
        let json = serde_json::to_value(&skip).unwrap();
        assert_eq!(json["outcome"], "skip");

        let parsed: GeneratorOutcome = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, skip);
    }

    #[test]
    fn test_suggestion_serde_camel_case() {
        let now = Utc::now();
        let suggestion = KnowledgeSuggestion {
            id: Uuid::new_v4(),
            suggestion_type: SuggestionType::Create,
            product_standard: Some("Cards".to_string()),
            subproduct_standard: None,
            description: Some("How to dispute a charge".to_string()),
            resolution: Some("Open a dispute from the statement view.".to_string()),
            observations: None,
            confidence_score: Some(0.91),
            quality_flags: QualityFlags::default(),
            similar_article_id: None,
            similarity_score: None,
            update_reason: None,
            status: SuggestionStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            rejection_reason: None,
            skip_reason: None,
            raw_extraction: None,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&suggestion).unwrap();
        assert_eq!(json["suggestionType"], "create");
        assert_eq!(json["productStandard"], "Cards");
        assert_eq!(json["status"], "pending");
    }
}
