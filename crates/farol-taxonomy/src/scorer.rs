//! Free-text match scoring against candidate names and synonyms.
//!
//! Scores are 0..=100 with a fixed rule ladder, evaluated in order with
//! first match winning. Callers own the acceptance decision; [`CONFIDENT`]
//! marks the default auto-resolution boundary.

use tracing::trace;

/// Minimum score treated as a confident auto-resolution by default.
///
/// Rule 4 (synonym containment) lands exactly here, so a query that is a
/// fragment of a declared synonym still auto-resolves while looser word
/// overlap (rule 6, capped at 50) does not.
pub const CONFIDENT: u8 = 70;

/// Outcome of scoring one query against one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchScore {
    /// 0..=100; 0 means no match at all.
    pub score: u8,
    /// Human-readable explanation shown in disambiguation UIs.
    pub reason: String,
}

impl MatchScore {
    fn new(score: u8, reason: impl Into<String>) -> Self {
        Self {
            score,
            reason: reason.into(),
        }
    }
}

/// Score a free-text query against a candidate name and its synonyms.
///
/// Rules, evaluated in order, first match wins:
///
/// 1. exact name equality (case-insensitive) → 100
/// 2. exact synonym equality → 95
/// 3. name contains query → 80
/// 4. a synonym contains query → 70
/// 5. query contains name → 60
/// 6. per-word containment in name or synonyms → `round(50 · matched/total)`
/// 7. otherwise → 0
pub fn score(query: &str, candidate_name: &str, synonyms: &[String]) -> MatchScore {
    let query_lc = query.trim().to_lowercase();
    if query_lc.is_empty() {
        // Empty queries match nothing.
        return MatchScore::new(0, "no match");
    }
    let name_lc = candidate_name.to_lowercase();
    let synonyms_lc: Vec<(usize, String)> = synonyms
        .iter()
        .enumerate()
        .map(|(i, s)| (i, s.to_lowercase()))
        .collect();

    if query_lc == name_lc {
        return MatchScore::new(100, "exact name match");
    }

    for (i, syn_lc) in &synonyms_lc {
        if &query_lc == syn_lc {
            return MatchScore::new(95, format!("exact synonym match: '{}'", synonyms[*i]));
        }
    }

    if name_lc.contains(&query_lc) {
        return MatchScore::new(80, "name contains query");
    }

    for (i, syn_lc) in &synonyms_lc {
        if syn_lc.contains(&query_lc) {
            return MatchScore::new(70, format!("synonym contains query: '{}'", synonyms[*i]));
        }
    }

    if query_lc.contains(&name_lc) {
        return MatchScore::new(60, "query contains name");
    }

    let words: Vec<&str> = query_lc.split_whitespace().collect();
    let matched: Vec<&str> = words
        .iter()
        .copied()
        .filter(|w| name_lc.contains(w) || synonyms_lc.iter().any(|(_, s)| s.contains(w)))
        .collect();
    if !matched.is_empty() {
        let ratio = 50.0 * matched.len() as f64 / words.len() as f64;
        let partial = ratio.round() as u8;
        trace!(
            query = query,
            candidate = candidate_name,
            score = partial,
            "partial word match"
        );
        return MatchScore::new(partial, format!("matched words: {}", matched.join(", ")));
    }

    MatchScore::new(0, "no match")
}

/// Rank candidate `(name, synonyms)` pairs against a query, descending by
/// score.
///
/// The sort is stable, so candidates tying on score keep their input
/// (catalog-declared) ordering. Zero-score candidates are dropped.
pub fn rank<'a>(
    query: &str,
    candidates: impl IntoIterator<Item = (&'a str, &'a [String])>,
) -> Vec<(usize, MatchScore)> {
    let mut scored: Vec<(usize, MatchScore)> = candidates
        .into_iter()
        .enumerate()
        .map(|(i, (name, synonyms))| (i, score(query, name, synonyms)))
        .filter(|(_, m)| m.score > 0)
        .collect();
    scored.sort_by(|a, b| b.1.score.cmp(&a.1.score));
    scored
}
