//! String similarity for catalog search
//!
//! Scores a free-text query against template fields in the range 0.0-1.0.

use ahash::AHashSet;

/// Similarity of `query` to one field of text (0.0-1.0)
///
/// 1. Field contains the query verbatim -> 1.0
/// 2. Case-folded containment -> 0.95
/// 3. Share of query tokens present in the field, blended with an LCS ratio
pub fn similarity(query: &str, field: &str) -> f64 {
    if query.is_empty() || field.is_empty() {
        return 0.0;
    }

    if field.contains(query) {
        return 1.0;
    }

    let query_lower = query.to_lowercase();
    let field_lower = field.to_lowercase();

    if field_lower.contains(&query_lower) {
        return 0.95;
    }

    let query_tokens = tokens(&query_lower);
    let field_tokens = tokens(&field_lower);
    if query_tokens.is_empty() {
        return 0.0;
    }

    let overlap = query_tokens.intersection(&field_tokens).count() as f64 / query_tokens.len() as f64;

    // Skip the quadratic LCS when few tokens are shared.
    if overlap < 0.3 {
        return overlap * 0.6;
    }

    overlap * 0.6 + lcs_ratio(&query_lower, &field_lower) * 0.4
}

/// Best similarity of `query` across several fields.
pub fn field_similarity(query: &str, fields: &[&str]) -> f64 {
    fields
        .iter()
        .map(|field| similarity(query, field))
        .fold(0.0, f64::max)
}

fn tokens(text: &str) -> AHashSet<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect()
}

/// 2 * LCS / (len(a) + len(b)), counted in characters
fn lcs_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in &a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    (2 * prev[b.len()]) as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_containment() {
        assert!((similarity("minimal", "minimal") - 1.0).abs() < 0.001);
        assert!((similarity("Minimal", "Minimal Portfolio") - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_case_folded_containment() {
        assert!((similarity("minimal", "Minimal Portfolio") - 0.95).abs() < 0.001);
    }

    #[test]
    fn test_partial_token_overlap() {
        let score = similarity("modern cafe", "Cafe and bakery");
        assert!(score > 0.3);
        assert!(score < 0.95);
    }

    #[test]
    fn test_unrelated_text() {
        assert!(similarity("wedding invitation", "Corporate Business") < 0.3);
        assert_eq!(similarity("", "anything"), 0.0);
    }

    #[test]
    fn test_field_similarity_takes_best() {
        let score = field_similarity("portfolio", &["Modern Restaurant", "portfolio"]);
        assert!((score - 1.0).abs() < 0.001);
        assert_eq!(field_similarity("portfolio", &[]), 0.0);
    }

    #[test]
    fn test_lcs_ratio_counts_characters() {
        assert!((lcs_ratio("카페", "카페") - 1.0).abs() < 0.001);
        assert!((lcs_ratio("abc", "xyz")).abs() < 0.001);
    }
}
