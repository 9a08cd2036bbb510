//! Term matching over normalized text
//!
//! A term matches where it starts on a word boundary; the end is left open
//! so inflections match ("crash" finds "crashing", "refund" finds
//! "refunded"). Multi-word terms match as written.

/// Number of occurrences of `term` in `text` that start on a word boundary
pub fn count_term(text: &str, term: &str) -> usize {
    if term.is_empty() {
        return 0;
    }
    text.match_indices(term)
        .filter(|(idx, _)| starts_on_boundary(text, *idx))
        .count()
}

/// True when `term` occurs in `text` starting on a word boundary
pub fn contains_term(text: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    text.match_indices(term)
        .any(|(idx, _)| starts_on_boundary(text, idx))
}

/// True when any of `terms` occurs in `text`
pub fn contains_any<S: AsRef<str>>(text: &str, terms: &[S]) -> bool {
    terms.iter().any(|t| contains_term(text, t.as_ref()))
}

/// Number of distinct `terms` present in `text`
pub fn distinct_hits<S: AsRef<str>>(text: &str, terms: &[S]) -> usize {
    terms.iter().filter(|t| contains_term(text, t.as_ref())).count()
}

/// First of `terms` present in `text`, in list order
pub fn first_hit<'a, S: AsRef<str>>(text: &str, terms: &'a [S]) -> Option<&'a str> {
    terms
        .iter()
        .map(|t| t.as_ref())
        .find(|t| contains_term(text, t))
}

/// Plain substring containment, used by the context gates
pub fn contains_phrase<S: AsRef<str>>(text: &str, phrases: &[S]) -> bool {
    phrases.iter().any(|p| {
        let p = p.as_ref();
        !p.is_empty() && text.contains(p)
    })
}

fn starts_on_boundary(text: &str, idx: usize) -> bool {
    text[..idx]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_matching() {
        assert!(contains_term("the app keeps crashing", "crash"));
        assert!(contains_term("refunded yesterday", "refund"));
        assert!(!contains_term("a non-refundable fee", "fund"));
    }

    #[test]
    fn test_leading_boundary_required() {
        assert!(!contains_term("software update", "war"));
        assert!(contains_term("software-war", "war"));
        assert!(!contains_term("every day", "very"));
    }

    #[test]
    fn test_multi_word_terms() {
        assert!(contains_term("give me my money back", "money back"));
        assert!(!contains_term("money is back", "money back"));
    }

    #[test]
    fn test_count_and_hits() {
        let text = "error after error, bug";
        assert_eq!(count_term(text, "error"), 2);
        assert_eq!(distinct_hits(text, &["error", "bug", "crash"]), 2);
        assert_eq!(first_hit(text, &["crash", "bug", "error"]), Some("bug"));
        assert!(contains_any(text, &["glitch", "bug"]));
    }

    #[test]
    fn test_empty_term_never_matches() {
        assert!(!contains_term("anything", ""));
        assert_eq!(count_term("anything", ""), 0);
        assert!(!contains_phrase("anything", &[""]));
    }
}
