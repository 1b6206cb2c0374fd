use super::segment::Candidate;
use super::NameSource;

/// Longest candidate by word count; on a tie the earliest one wins.
pub fn best<'c, 'a>(candidates: &'c [Candidate<'a>]) -> Option<&'c Candidate<'a>> {
    candidates.iter().fold(None, |best, c| match best {
        Some(b) if b.word_count() >= c.word_count() => Some(b),
        _ => Some(c),
    })
}

/// Pick the name from the candidates, or fall back to the whole text.
pub fn select(candidates: &[Candidate<'_>], fallback: &str) -> (String, NameSource) {
    match best(candidates) {
        Some(c) => (c.text(), NameSource::Candidate),
        None => (fallback.to_string(), NameSource::Fallback),
    }
}
