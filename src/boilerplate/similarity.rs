//! Normalized edit similarity.

/// Default minimum similarity for two lines to count as the same pattern.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.8;

/// Similarity of two strings in `[0, 1]`: `1 - levenshtein / max(len)`.
///
/// Lengths are counted in characters. Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f32 {
    strsim::normalized_levenshtein(a, b) as f32
}

/// Check whether `line` is at least `threshold`-similar to any of `phrases`.
pub(crate) fn matches_any<S: AsRef<str>>(line: &str, phrases: &[S], threshold: f32) -> bool {
    let line = line.trim();
    !line.is_empty()
        && phrases
            .iter()
            .any(|phrase| similarity(phrase.as_ref(), line) >= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("abc", "abc"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_similarity_counts_chars() {
        // one substitution over ten characters
        let s = similarity("Page 1 of9", "Page 2 of9");
        assert!((s - 0.9).abs() < 1e-6);

        let s = similarity("Confidential — Page 1", "Confidential — Page 10");
        assert!(s > 0.9);
    }

    #[test]
    fn test_matches_any() {
        let phrases = ["(No file attached)", "Please upload supporting document"];
        assert!(matches_any("  (No file attached) ", &phrases, 0.8));
        assert!(matches_any("Please upload supporting documents", &phrases, 0.8));
        assert!(!matches_any("Annual revenue", &phrases, 0.8));
        assert!(!matches_any("   ", &phrases, 0.8));
    }
}
