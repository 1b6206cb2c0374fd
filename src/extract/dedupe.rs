use itertools::Itertools;

/// Drop repeated words, keeping the first occurrence of each.
/// Comparison is exact (case-sensitive).
pub fn dedupe(text: &str) -> String {
    text.split_whitespace().unique().join(" ")
}
