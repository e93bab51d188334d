//! # farol-diff
//!
//! Word-level diff engine used to present a proposed article edit against
//! the current article. Rendering only — never used to auto-merge.
//!
//! Two interchangeable strategies produce the same run shape:
//!
//! - [`diff_words`] is backed by the `similar` crate's word-level diff.
//! - [`lcs::diff_words`] is self-contained (tokenizer + LCS table) for
//!   consumers that cannot carry the dependency.
//!
//! Both guarantee the round-trip property: concatenating the values of all
//! non-removed runs reconstructs `after`, and all non-added runs
//! reconstruct `before`.

use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};

pub mod lcs;

/// Kind of one diff run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    Equal,
    Added,
    Removed,
}

/// One contiguous run of equal, added, or removed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRun {
    #[serde(rename = "type")]
    pub kind: DiffKind,
    pub value: String,
}

impl DiffRun {
    pub fn new(kind: DiffKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Compute the word-level diff between two text blobs.
///
/// Runs are coalesced: consecutive runs of one kind merge, and within one
/// changed region deletions come before insertions so a reviewer reads
/// "what went away, what replaced it".
pub fn diff_words(before: &str, after: &str) -> Vec<DiffRun> {
    let diff = TextDiff::from_words(before, after);
    let changes = diff.iter_all_changes().map(|change| {
        let kind = match change.tag() {
            ChangeTag::Equal => DiffKind::Equal,
            ChangeTag::Insert => DiffKind::Added,
            ChangeTag::Delete => DiffKind::Removed,
        };
        (kind, change.value().to_string())
    });
    coalesce(changes)
}

/// Fold a raw change stream into coalesced runs.
///
/// Within one changed region (between equal stretches) removed text is
/// emitted before added text. Filtering by kind still reconstructs either
/// side exactly, since relative order within each kind is preserved.
pub(crate) fn coalesce(changes: impl IntoIterator<Item = (DiffKind, String)>) -> Vec<DiffRun> {
    let mut runs: Vec<DiffRun> = Vec::new();
    let mut equal = String::new();
    let mut removed = String::new();
    let mut added = String::new();

    fn flush(runs: &mut Vec<DiffRun>, kind: DiffKind, buf: &mut String) {
        if !buf.is_empty() {
            runs.push(DiffRun::new(kind, std::mem::take(buf)));
        }
    }

    for (kind, value) in changes {
        match kind {
            DiffKind::Equal => {
                flush(&mut runs, DiffKind::Removed, &mut removed);
                flush(&mut runs, DiffKind::Added, &mut added);
                equal.push_str(&value);
            }
            DiffKind::Removed => {
                flush(&mut runs, DiffKind::Equal, &mut equal);
                removed.push_str(&value);
            }
            DiffKind::Added => {
                flush(&mut runs, DiffKind::Equal, &mut equal);
                added.push_str(&value);
            }
        }
    }
    flush(&mut runs, DiffKind::Equal, &mut equal);
    flush(&mut runs, DiffKind::Removed, &mut removed);
    flush(&mut runs, DiffKind::Added, &mut added);
    runs
}

/// Reconstruct one side of the diff from its runs.
///
/// `DiffKind::Removed` skips removed runs (yielding `after`);
/// `DiffKind::Added` skips added runs (yielding `before`).
pub fn reconstruct(runs: &[DiffRun], skip: DiffKind) -> String {
    runs.iter()
        .filter(|r| r.kind != skip)
        .map(|r| r.value.as_str())
        .collect()
}

/// Render runs as a compact inline string for logs and debugging:
/// `[-removed-]` and `{+added+}` markers around changed spans.
pub fn render_compact(runs: &[DiffRun]) -> String {
    let mut out = String::new();
    for run in runs {
        match run.kind {
            DiffKind::Equal => out.push_str(&run.value),
            DiffKind::Removed => {
                out.push_str("[-");
                out.push_str(&run.value);
                out.push_str("-]");
            }
            DiffKind::Added => {
                out.push_str("{+");
                out.push_str(&run.value);
                out.push_str("+}");
            }
        }
    }
    out
}
