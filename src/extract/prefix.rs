/// Regulatory boilerplate headers taken verbatim as the product name.
/// Order is match priority.
pub const KNOWN_PREFIXES: &[&str] = &[
    "GRID CONNECTED INVERTER",
    "SOLAR INVERTER",
    "GRID TIE SOLAR PV INVERTER",
    "UTILITY INTERCONNECTED PHOTOVOLTAIC INVERTERS",
    "Crystalline Silicon Terrestrial Photovoltaic PV Module",
];

#[derive(Debug, Clone)]
struct KnownPrefix {
    label: String,
    upper: String,
}

#[derive(Debug, Clone)]
pub struct PrefixMatcher {
    prefixes: Vec<KnownPrefix>,
}

impl PrefixMatcher {
    pub fn new<S: AsRef<str>>(prefixes: &[S]) -> Self {
        let prefixes = prefixes
            .iter()
            .filter_map(|p| {
                let p: &str = p.as_ref();
                // a blank label would match every description
                if p.trim().is_empty() {
                    return None;
                }
                Some(KnownPrefix {
                    label: p.trim().to_string(),
                    upper: p.to_uppercase(),
                })
            })
            .collect();
        PrefixMatcher { prefixes }
    }

    /// Case-insensitive `starts_with` against each label; first hit wins and
    /// the label itself (not the matched text) is returned.
    pub fn match_known_prefix(&self, text: &str) -> Option<&str> {
        let upper = text.to_uppercase();
        self.prefixes
            .iter()
            .find(|p| upper.starts_with(&p.upper))
            .map(|p| p.label.as_str())
    }
}
