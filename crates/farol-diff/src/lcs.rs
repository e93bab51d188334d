//! Self-contained word-level diff via longest common subsequence.
//!
//! Equivalent in shape to the `similar`-backed [`crate::diff_words`] but
//! with no dependency: whitespace-preserving tokenizer, O(n·m) LCS table,
//! deterministic backtrack. The two strategies may split runs differently
//! for ambiguous regions; both satisfy the round-trip property.

use crate::{coalesce, DiffKind, DiffRun};

/// Split text into alternating runs of non-whitespace and whitespace.
///
/// Whitespace is kept as its own token so reconstruction is byte-exact.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_whitespace: Option<bool> = None;

    for (i, c) in text.char_indices() {
        let is_ws = c.is_whitespace();
        match in_whitespace {
            None => in_whitespace = Some(is_ws),
            Some(prev) if prev != is_ws => {
                tokens.push(&text[start..i]);
                start = i;
                in_whitespace = Some(is_ws);
            }
            _ => {}
        }
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// Compute the word-level diff between two text blobs without external
/// primitives.
pub fn diff_words(before: &str, after: &str) -> Vec<DiffRun> {
    let a = tokenize(before);
    let b = tokenize(after);
    let n = a.len();
    let m = b.len();

    // LCS length table: table[i][j] is the LCS of a[..i] and b[..j].
    let mut table = vec![vec![0u32; m + 1]; n + 1];
    for i in 1..=n {
        for j in 1..=m {
            table[i][j] = if a[i - 1] == b[j - 1] {
                table[i - 1][j - 1] + 1
            } else {
                table[i - 1][j].max(table[i][j - 1])
            };
        }
    }

    // Backtrack from the bottom-right cell. On ties between the two
    // predecessor cells an added token is emitted, which after reversal
    // puts removals ahead of additions inside a changed region.
    let mut reversed: Vec<(DiffKind, String)> = Vec::new();
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && a[i - 1] == b[j - 1] {
            reversed.push((DiffKind::Equal, a[i - 1].to_string()));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || table[i][j - 1] >= table[i - 1][j]) {
            reversed.push((DiffKind::Added, b[j - 1].to_string()));
            j -= 1;
        } else {
            reversed.push((DiffKind::Removed, a[i - 1].to_string()));
            i -= 1;
        }
    }
    reversed.reverse();
    coalesce(reversed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconstruct;

    fn assert_round_trip(before: &str, after: &str) {
        let runs = diff_words(before, after);
        assert_eq!(
            reconstruct(&runs, DiffKind::Removed),
            after,
            "after side for {:?} -> {:?}",
            before,
            after
        );
        assert_eq!(
            reconstruct(&runs, DiffKind::Added),
            before,
            "before side for {:?} -> {:?}",
            before,
            after
        );
    }

    #[test]
    fn test_tokenize_keeps_whitespace() {
        assert_eq!(tokenize("a b  c"), vec!["a", " ", "b", "  ", "c"]);
        assert_eq!(tokenize("  lead"), vec!["  ", "lead"]);
        assert_eq!(tokenize("trail "), vec!["trail", " "]);
        assert_eq!(tokenize(""), Vec::<&str>::new());
    }

    #[test]
    fn test_identical_texts_single_equal_run() {
        let runs = diff_words("the same text", "the same text");
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].kind, DiffKind::Equal);
    }

    #[test]
    fn test_empty_sides() {
        assert!(diff_words("", "").is_empty());

        let added = diff_words("", "all new");
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].kind, DiffKind::Added);
        assert_eq!(added[0].value, "all new");

        let removed = diff_words("all gone", "");
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].kind, DiffKind::Removed);
    }

    #[test]
    fn test_word_replacement() {
        let runs = diff_words("pay the fee", "pay a fine");
        let removed_pos = runs.iter().position(|r| r.kind == DiffKind::Removed).unwrap();
        let added_pos = runs.iter().position(|r| r.kind == DiffKind::Added).unwrap();
        assert!(removed_pos < added_pos);
        assert_round_trip("pay the fee", "pay a fine");
    }

    #[test]
    fn test_round_trip_matrix() {
        let cases = [
            ("", ""),
            ("a", "a"),
            ("a", "b"),
            ("a b c", "a c"),
            ("a c", "a b c"),
            ("one two three four", "one three five four"),
            ("  spaced   out  ", "spaced out"),
            ("line one\nline two", "line one\nline 2"),
            ("é ü ñ", "é u ñ"),
        ];
        for (before, after) in cases {
            assert_round_trip(before, after);
        }
    }

    #[test]
    fn test_no_adjacent_runs_share_kind() {
        let runs = diff_words("a b c d e", "a x c y e");
        for pair in runs.windows(2) {
            assert_ne!(pair[0].kind, pair[1].kind);
        }
    }

    #[test]
    fn test_agrees_with_library_backed_on_round_trip() {
        let before = "open a dispute from the statement view";
        let after = "open a dispute from the transactions screen instead";
        for runs in [diff_words(before, after), crate::diff_words(before, after)] {
            assert_eq!(reconstruct(&runs, DiffKind::Removed), after);
            assert_eq!(reconstruct(&runs, DiffKind::Added), before);
        }
    }
}
