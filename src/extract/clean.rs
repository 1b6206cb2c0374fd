use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::error::RulesError;
use crate::table::CellValue;

static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Certification tags, date stamps and content percentages, applied in this
/// order. The labelled forms must run before the bare `\d+%` catch-all.
pub const NOISE_PATTERNS: &[&str] = &[
    r"ETA[\s\-]*NO\.\s*[\w\-]+",
    r"BIS[\s\-]*NO\.\s*\w+",
    r"DT\.\d{2}\.\d{2}\.\d{2}",
    r"\d{2}\.\d{2}\.\d{2}",
    r"\bR-\d{8,}\b",
    r"CONTENT\s*[:\-]?\s*\d+\.?\d*%",
    r"AVERAGE\s+OF\s+CONTENT\s*\d+\.?\d*%",
    r"\d+\.?\d*%",
];

#[derive(Debug, Clone)]
pub struct Cleaner {
    patterns: Vec<Regex>,
}

impl Cleaner {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, RulesError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p.as_ref())
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| RulesError::Pattern {
                        pattern: p.as_ref().to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Cleaner { patterns })
    }

    /// Strip every noise pattern, then collapse whitespace runs to one space.
    pub fn clean(&self, text: &str) -> String {
        let mut text = text.to_string();
        for re in &self.patterns {
            text = re.replace_all(&text, "").into_owned();
        }
        WS_RE.replace_all(&text, " ").trim().to_string()
    }

    /// Non-text cells clean to an empty string.
    pub fn clean_cell(&self, cell: &CellValue) -> String {
        cell.as_text().map(|t| self.clean(t)).unwrap_or_default()
    }
}

// ── Tests ──
