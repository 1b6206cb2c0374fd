pub mod clean;
pub mod dedupe;
pub mod prefix;
pub mod segment;
pub mod select;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RulesError;
use crate::table::CellValue;
use clean::Cleaner;
use prefix::PrefixMatcher;
use segment::Segmenter;

/// Tunable lists and bounds behind the extractor. `Default` reproduces the
/// stock rule set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub noise_patterns: Vec<String>,
    pub known_prefixes: Vec<String>,
    pub delimiters: Vec<String>,
    pub min_words: usize,
    pub max_words: usize,
}

impl Default for Rules {
    fn default() -> Self {
        let owned = |xs: &[&str]| -> Vec<String> { xs.iter().map(|s| s.to_string()).collect() };
        Rules {
            noise_patterns: owned(clean::NOISE_PATTERNS),
            known_prefixes: owned(prefix::KNOWN_PREFIXES),
            delimiters: owned(segment::DELIMITERS),
            min_words: segment::MIN_WORDS,
            max_words: segment::MAX_WORDS,
        }
    }
}

/// Which stage produced the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameSource {
    Blank,
    KnownPrefix,
    Candidate,
    Fallback,
}

impl NameSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            NameSource::Blank => "blank",
            NameSource::KnownPrefix => "known prefix",
            NameSource::Candidate => "candidate",
            NameSource::Fallback => "fallback",
        }
    }
}

impl fmt::Display for NameSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name plus the text it was derived from. For blank or non-text input,
/// `cleaned` is the input itself, untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction<T = String> {
    pub name: String,
    pub cleaned: T,
    pub source: NameSource,
}

impl<T> Extraction<T> {
    fn blank(original: T) -> Self {
        Extraction {
            name: String::new(),
            cleaned: original,
            source: NameSource::Blank,
        }
    }
}

/// Pipeline: clean → dedupe → known prefix → segment → select.
/// Holds compiled rules only; safe to share across threads.
#[derive(Debug, Clone)]
pub struct Extractor {
    cleaner: Cleaner,
    prefixes: PrefixMatcher,
    segmenter: Segmenter,
}

impl Extractor {
    pub fn new(rules: &Rules) -> Result<Self, RulesError> {
        Ok(Extractor {
            cleaner: Cleaner::new(&rules.noise_patterns)?,
            prefixes: PrefixMatcher::new(&rules.known_prefixes),
            segmenter: Segmenter::new(&rules.delimiters, rules.min_words, rules.max_words)?,
        })
    }

    pub fn extract(&self, raw: &str) -> Extraction {
        if raw.trim().is_empty() {
            return Extraction::blank(raw.to_string());
        }

        let cleaned = dedupe::dedupe(&self.cleaner.clean(raw));

        if let Some(label) = self.prefixes.match_known_prefix(&cleaned) {
            debug!(name = label, "known prefix");
            return Extraction {
                name: label.to_string(),
                cleaned,
                source: NameSource::KnownPrefix,
            };
        }

        let candidates = self.segmenter.segment(&cleaned);
        let (name, source) = select::select(&candidates, &cleaned);
        debug!(candidates = candidates.len(), %source, name = %name, "selected");

        Extraction {
            name,
            cleaned,
            source,
        }
    }

    /// Cell form of [`Extractor::extract`]: anything that is not text comes
    /// back unchanged with an empty name.
    pub fn extract_cell(&self, cell: &CellValue) -> Extraction<CellValue> {
        match cell.as_text() {
            Some(text) => {
                let e = self.extract(text);
                let cleaned = match e.source {
                    NameSource::Blank => cell.clone(),
                    _ => CellValue::Text(e.cleaned),
                };
                Extraction {
                    name: e.name,
                    cleaned,
                    source: e.source,
                }
            }
            None => Extraction::blank(cell.clone()),
        }
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> Extractor {
        Extractor::new(&Rules::default()).unwrap()
    }

    #[test]
    fn non_text_cells_pass_through() {
        let x = extractor();
        for cell in [
            CellValue::Empty,
            CellValue::Number(1234.0),
            CellValue::Bool(true),
            CellValue::Other("2024-01-31".into()),
        ] {
            let e = x.extract_cell(&cell);
            assert_eq!(e.name, "");
            assert_eq!(e.cleaned, cell);
            assert_eq!(e.source, NameSource::Blank);
        }
    }

    #[test]
    fn whitespace_only_keeps_original() {
        let x = extractor();
        let e = x.extract("  \t ");
        assert_eq!(e.name, "");
        assert_eq!(e.cleaned, "  \t ");

        let cell = CellValue::Text(" \n".into());
        assert_eq!(x.extract_cell(&cell).cleaned, cell);
    }

    #[test]
    fn known_prefix_short_circuits() {
        let x = extractor();
        let e = x.extract("Solar Inverter Model ABC-123-99");
        assert_eq!(e.name, "SOLAR INVERTER");
        assert_eq!(e.source, NameSource::KnownPrefix);
        assert_eq!(e.cleaned, "Solar Inverter Model ABC-123-99");
    }

    #[test]
    fn prefix_checked_after_cleaning() {
        let x = extractor();
        let e = x.extract("ETA-NO. ETA-77 Grid Connected Inverter 3KW DT.01.02.23");
        assert_eq!(e.name, "GRID CONNECTED INVERTER");
        assert_eq!(e.cleaned, "Grid Connected Inverter 3KW");
    }

    #[test]
    fn leading_model_tag_blocks_prefix() {
        let x = extractor();
        let e = x.extract(
            "MODEL NO. XYZ-9988-01 Grid Connected Inverter Max Power Rating CONTENT: 10%",
        );
        assert_eq!(e.source, NameSource::Candidate);
        assert_eq!(e.name, "NO. Grid Connected Inverter");
        assert_eq!(
            e.cleaned,
            "MODEL NO. XYZ-9988-01 Grid Connected Inverter Max Power Rating"
        );
    }

    #[test]
    fn picks_longest_segment() {
        let x = extractor();
        let e = x.extract(
            "Lithium Ion Battery Pack for Energy Storage MODEL LFP-48100 CODE 7731 MAX 5.12 KWH",
        );
        assert_eq!(e.name, "Lithium Ion Battery Pack for Energy Storage");
        assert_eq!(e.source, NameSource::Candidate);
    }

    #[test]
    fn repeated_words_removed_before_segmenting() {
        let x = extractor();
        let e = x.extract("Power Bank Power Bank 10000mAh");
        assert_eq!(e.cleaned, "Power Bank 10000mAh");
        assert_eq!(e.name, "Power Bank 10000mAh");
        assert_eq!(e.source, NameSource::Fallback);
    }

    #[test]
    fn fallback_is_whole_cleaned_text() {
        let x = extractor();
        let e = x.extract("Charger 45%");
        assert_eq!(e.name, "Charger");
        assert_eq!(e.source, NameSource::Fallback);
    }

    #[test]
    fn noise_only_input_yields_empty_name() {
        let x = extractor();
        let e = x.extract("CONTENT: 99.9%");
        assert_eq!(e.name, "");
        assert_eq!(e.cleaned, "");
        assert_eq!(e.source, NameSource::Fallback);
    }

    #[test]
    fn rules_are_configurable() {
        let rules = Rules {
            known_prefixes: vec!["Power Bank".into()],
            min_words: 2,
            ..Rules::default()
        };
        let x = Extractor::new(&rules).unwrap();
        assert_eq!(x.extract("power bank 10000mAh").name, "Power Bank");
        assert_eq!(x.extract("Solar Inverter unit").name, "Solar Inverter unit");
        assert_eq!(x.extract("USB Cable MODEL C-100").name, "USB Cable");
    }

    #[test]
    fn invalid_rules_fail_construction() {
        let rules = Rules {
            min_words: 10,
            max_words: 2,
            ..Rules::default()
        };
        assert!(matches!(
            Extractor::new(&rules),
            Err(RulesError::WordBounds { min: 10, max: 2 })
        ));
    }
}
