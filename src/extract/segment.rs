use std::sync::LazyLock;

use itertools::Itertools;
use regex::{Regex, RegexBuilder};

use crate::error::RulesError;

/// Keywords that open or close a structural field (model, certification,
/// code, ratings). Matched as whole words, case-insensitively.
pub const DELIMITERS: &[&str] = &[
    "MODEL", "ETA", "BIS", "NO.", "R-", "CODE", "MAX", "INV.", "P.LIST", "BL",
];

pub const MIN_WORDS: usize = 3;
pub const MAX_WORDS: usize = 20;

static MODEL_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9\-]{5,}$").unwrap());
// Decimal digits plus the superscript/subscript digit forms; fractions and
// roman numerals are numeric but not digits.
static DIGIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{Nd}\x{00B2}\x{00B3}\x{00B9}\x{2070}\x{2074}-\x{2079}\x{2080}-\x{2089}]")
        .unwrap()
});

const MAX_HYPHENS: usize = 2;
const MAX_DIGITS: usize = 4;

/// True for part/model/serial tokens such as `A362-019-5017-00`.
///
/// A word is a code when it is 5+ chars of `[A-Z0-9-]` with at least one
/// digit, or when it has more than two hyphens or more than four digits.
pub fn is_model_code(word: &str) -> bool {
    let digits = DIGIT_RE.find_iter(word).count();
    if MODEL_CODE_RE.is_match(word) && digits > 0 {
        return true;
    }
    word.matches('-').count() > MAX_HYPHENS || digits > MAX_DIGITS
}

/// Words of one delimiter-bounded slice that survived code filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'a> {
    words: Vec<&'a str>,
}

impl<'a> Candidate<'a> {
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn text(&self) -> String {
        self.words.join(" ")
    }
}

#[derive(Debug, Clone)]
pub struct Segmenter {
    delimiters: Option<Regex>,
    min_words: usize,
    max_words: usize,
}

impl Segmenter {
    pub fn new<S: AsRef<str>>(
        delimiters: &[S],
        min_words: usize,
        max_words: usize,
    ) -> Result<Self, RulesError> {
        if min_words > max_words {
            return Err(RulesError::WordBounds {
                min: min_words,
                max: max_words,
            });
        }
        let delimiters = if delimiters.is_empty() {
            None
        } else {
            let alternation = delimiters
                .iter()
                .map(|d| regex::escape(d.as_ref()))
                .join("|");
            let re = RegexBuilder::new(&format!(r"\b(?:{})\b", alternation))
                .case_insensitive(true)
                .build()
                .map_err(RulesError::Delimiters)?;
            Some(re)
        };
        Ok(Segmenter {
            delimiters,
            min_words,
            max_words,
        })
    }

    /// Split on delimiters, drop model codes, keep slices within the word
    /// bounds. Candidates come back in text order.
    pub fn segment<'a>(&self, text: &'a str) -> Vec<Candidate<'a>> {
        let segments: Vec<&'a str> = match &self.delimiters {
            Some(re) => re.split(text).collect(),
            None => vec![text],
        };

        segments
            .into_iter()
            .filter_map(|segment| {
                let words: Vec<&'a str> = segment
                    .split_whitespace()
                    .filter(|w| !is_model_code(w))
                    .collect();
                let n = words.len();
                (self.min_words..=self.max_words)
                    .contains(&n)
                    .then_some(Candidate { words })
            })
            .collect()
    }
}

// ── Tests ──
