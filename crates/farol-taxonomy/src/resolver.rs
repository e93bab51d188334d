//! Resolution of free-text mentions to catalog entities.
//!
//! A mention ("fatura atrasada", "cartão") arrives from conversation
//! analysis or an operator search box and must land on zero, one, or many
//! catalog entities. The scorer ranks the candidates; this module decides
//! what that ranking means: a unique winner at or above the threshold is
//! confident, anything else is handed back for disambiguation.

use tracing::debug;

use farol_core::{CatalogProduct, Error, Intent, Result, Subject};

use crate::scorer::{self, MatchScore};

/// A candidate entity that can be matched by name and synonyms.
pub trait Matchable {
    fn match_name(&self) -> &str;
    fn match_synonyms(&self) -> &[String] {
        &[]
    }
}

impl Matchable for Subject {
    fn match_name(&self) -> &str {
        &self.name
    }
    fn match_synonyms(&self) -> &[String] {
        &self.synonyms
    }
}

impl Matchable for Intent {
    fn match_name(&self) -> &str {
        &self.name
    }
    fn match_synonyms(&self) -> &[String] {
        &self.synonyms
    }
}

/// A distinct product name drawn from the catalog.
///
/// Catalog rows are one row per product/subproduct pair, so resolving a
/// product mention first collapses rows to distinct product names. The id
/// carried is the generic row's when one exists, else the first row seen
/// for that name.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRef {
    pub name: String,
    pub catalog_id: uuid::Uuid,
}

impl Matchable for ProductRef {
    fn match_name(&self) -> &str {
        &self.name
    }
}

impl ProductRef {
    /// Collapse catalog rows into distinct product names, catalog order
    /// preserved.
    pub fn from_catalog(products: &[CatalogProduct]) -> Vec<ProductRef> {
        let mut refs: Vec<ProductRef> = Vec::new();
        for row in products {
            match refs
                .iter_mut()
                .find(|r| r.name.eq_ignore_ascii_case(&row.product_name))
            {
                Some(existing) => {
                    if row.is_generic() {
                        existing.catalog_id = row.id;
                    }
                }
                None => refs.push(ProductRef {
                    name: row.product_name.clone(),
                    catalog_id: row.id,
                }),
            }
        }
        refs
    }
}

/// One scored candidate surviving resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored<T> {
    pub entity: T,
    pub score: MatchScore,
}

/// Outcome of resolving a mention when a single entity is wanted.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    /// A unique candidate at or above the threshold.
    Confident(Scored<T>),
    /// Candidates needing human disambiguation: either several tied at the
    /// top score, or everything scored below the threshold.
    Ambiguous(Vec<Scored<T>>),
    /// Nothing scored above zero.
    NoMatch,
}

/// Resolve a free-text mention against a candidate collection.
///
/// `threshold` is the caller's acceptance boundary; [`scorer::CONFIDENT`]
/// is the conventional default.
pub fn resolve<T: Matchable + Clone>(
    query: &str,
    candidates: &[T],
    threshold: u8,
) -> Resolution<T> {
    let scored = resolve_all(query, candidates);
    if scored.is_empty() {
        return Resolution::NoMatch;
    }

    let top = scored[0].score.score;
    if top < threshold {
        debug!(
            query = query,
            score = top,
            result_count = scored.len(),
            "below threshold, returning all candidates"
        );
        return Resolution::Ambiguous(scored);
    }

    let tied: Vec<Scored<T>> = scored
        .iter()
        .take_while(|s| s.score.score == top)
        .cloned()
        .collect();
    if tied.len() > 1 {
        debug!(
            query = query,
            score = top,
            result_count = tied.len(),
            "top score tied"
        );
        return Resolution::Ambiguous(tied);
    }

    match scored.into_iter().next() {
        Some(winner) => Resolution::Confident(winner),
        None => Resolution::NoMatch,
    }
}

/// Every candidate scoring above zero, ranked descending, ties in input
/// order.
pub fn resolve_all<T: Matchable + Clone>(query: &str, candidates: &[T]) -> Vec<Scored<T>> {
    scorer::rank(
        query,
        candidates
            .iter()
            .map(|c| (c.match_name(), c.match_synonyms())),
    )
    .into_iter()
    .map(|(i, score)| Scored {
        entity: candidates[i].clone(),
        score,
    })
    .collect()
}

/// Resolve to exactly one entity or fail.
///
/// Ambiguity is the caller's problem to present, so it surfaces as
/// [`Error::AmbiguousMatch`] rather than an arbitrary pick.
pub fn resolve_one<T: Matchable + Clone>(query: &str, candidates: &[T], threshold: u8) -> Result<T> {
    match resolve(query, candidates, threshold) {
        Resolution::Confident(scored) => Ok(scored.entity),
        Resolution::Ambiguous(scored) => Err(Error::AmbiguousMatch {
            query: query.to_string(),
            candidates: scored.len(),
        }),
        Resolution::NoMatch => Err(Error::NotFound(format!(
            "no candidate matched '{}'",
            query
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn subject(name: &str, synonyms: &[&str]) -> Subject {
        Subject {
            id: Uuid::new_v4(),
            name: name.to_string(),
            product_catalog_id: Uuid::new_v4(),
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_confident_resolution() {
        let candidates = vec![subject("Fatura", &["boleto"]), subject("Emprestimo", &[])];
        match resolve("fatura", &candidates, scorer::CONFIDENT) {
            Resolution::Confident(s) => {
                assert_eq!(s.entity.name, "Fatura");
                assert_eq!(s.score.score, 100);
            }
            other => panic!("Expected Confident, got {:?}", other),
        }
    }

    #[test]
    fn test_tie_is_ambiguous() {
        // Both names contain the query, so both land on 80.
        let candidates = vec![subject("Cartao Credito", &[]), subject("Cartao Debito", &[])];
        match resolve("cartao", &candidates, scorer::CONFIDENT) {
            Resolution::Ambiguous(scored) => {
                assert_eq!(scored.len(), 2);
                // Input order preserved on ties.
                assert_eq!(scored[0].entity.name, "Cartao Credito");
                assert_eq!(scored[1].entity.name, "Cartao Debito");
            }
            other => panic!("Expected Ambiguous, got {:?}", other),
        }
    }

    #[test]
    fn test_below_threshold_returns_all_scored() {
        let candidates = vec![
            subject("Cartao de Credito", &[]),
            subject("Conta Corrente", &[]),
        ];
        // Word overlap only; top score well below 70.
        match resolve("limite cartao bloqueado", &candidates, scorer::CONFIDENT) {
            Resolution::Ambiguous(scored) => {
                assert_eq!(scored.len(), 1);
                assert!(scored[0].score.score < scorer::CONFIDENT);
            }
            other => panic!("Expected Ambiguous, got {:?}", other),
        }
    }

    #[test]
    fn test_no_match() {
        let candidates = vec![subject("Fatura", &[])];
        assert_eq!(
            resolve("pix", &candidates, scorer::CONFIDENT),
            Resolution::NoMatch
        );
    }

    #[test]
    fn test_resolve_one_ambiguous_errors() {
        let candidates = vec![subject("Cartao Credito", &[]), subject("Cartao Debito", &[])];
        let err = resolve_one("cartao", &candidates, scorer::CONFIDENT).unwrap_err();
        match err {
            Error::AmbiguousMatch { query, candidates } => {
                assert_eq!(query, "cartao");
                assert_eq!(candidates, 2);
            }
            other => panic!("Expected AmbiguousMatch, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_one_no_match_errors() {
        let candidates = vec![subject("Fatura", &[])];
        assert!(matches!(
            resolve_one("pix", &candidates, scorer::CONFIDENT),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_product_refs_collapse_rows() {
        let generic = Uuid::new_v4();
        let specific = Uuid::new_v4();
        let rows = vec![
            CatalogProduct {
                id: specific,
                product_name: "Cards".to_string(),
                subproduct_name: Some("Credit".to_string()),
            },
            CatalogProduct {
                id: generic,
                product_name: "Cards".to_string(),
                subproduct_name: None,
            },
            CatalogProduct {
                id: Uuid::new_v4(),
                product_name: "Loans".to_string(),
                subproduct_name: None,
            },
        ];

        let refs = ProductRef::from_catalog(&rows);
        assert_eq!(refs.len(), 2);
        // The generic row's id wins even when a specific row came first.
        assert_eq!(refs[0].name, "Cards");
        assert_eq!(refs[0].catalog_id, generic);
        assert_eq!(refs[1].name, "Loans");
    }

    #[test]
    fn test_resolve_products() {
        let rows = vec![
            CatalogProduct {
                id: Uuid::new_v4(),
                product_name: "Cards".to_string(),
                subproduct_name: None,
            },
            CatalogProduct {
                id: Uuid::new_v4(),
                product_name: "Loans".to_string(),
                subproduct_name: None,
            },
        ];
        let refs = ProductRef::from_catalog(&rows);
        let resolved = resolve_one("cards", &refs, scorer::CONFIDENT).unwrap();
        assert_eq!(resolved.name, "Cards");
    }
}
