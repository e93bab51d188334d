//! Structured logging schema and field name constants for farol.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized field names across
//! every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied (dangling refs) |
//! | INFO  | Lifecycle completions (suggestion dispositioned, tree rebuilt) |
//! | DEBUG | Decision points (scoring, placement, claim results) |
//! | TRACE | Per-item iteration (per-candidate scores, per-token runs) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "taxonomy", "diff", "review"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "scorer", "resolver", "hierarchy", "lifecycle"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "build", "resolve", "approve", "merge"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Suggestion UUID being operated on.
pub const SUGGESTION_ID: &str = "suggestion_id";

/// Article UUID being operated on.
pub const ARTICLE_ID: &str = "article_id";

/// Free-text query being scored or resolved.
pub const QUERY: &str = "query";

/// Suggestion status involved in a transition.
pub const STATUS: &str = "status";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a resolution or ranking.
pub const RESULT_COUNT: &str = "result_count";

/// Number of nodes in a built tree.
pub const NODE_COUNT: &str = "node_count";

/// Number of articles that landed in the unclassified set.
pub const UNCLASSIFIED_COUNT: &str = "unclassified_count";

/// Match score assigned to a candidate (0..=100).
pub const SCORE: &str = "score";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
