//! Heuristic evidence hints.
//!
//! Loose groupings of the kind a curator would look at first. These are not
//! ACMG/AMP adjudication and never feed the tally or the badge.

use mutantscope_common::VariantSummary;
use serde::{Deserialize, Serialize};

use crate::thresholds::Thresholds;

const ULTRA_RARE_AF: f64 = 1e-6;
const COMMON_AF: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HintKind {
    PathogenicLeaning,
    BenignLeaning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hint {
    pub code: String,
    pub kind: HintKind,
    pub text: String,
}

impl Hint {
    fn new(code: &str, kind: HintKind, text: &str) -> Self {
        Self { code: code.to_string(), kind, text: text.to_string() }
    }
}

/// Hints for one summary. Never empty: with no signal a single INFO hint is returned.
pub fn heuristic_hints(s: &VariantSummary, t: &Thresholds) -> Vec<Hint> {
    let mut hints = Vec::new();

    // Joint cohort first; the narrower cohorts stand in when it is missing.
    let af = s.population.joint
        .or(s.population.controls)
        .or(s.population.popmax)
        .map(|f| f.af);

    if af.is_some_and(|af| af <= ULTRA_RARE_AF) {
        hints.push(Hint::new("PM2", HintKind::PathogenicLeaning, "Very rare in population (PM2-like)"));
    }
    if s.alphamissense.label.as_deref().is_some_and(|l| {
        matches!(l.to_lowercase().as_str(), "pathogenic" | "likely_pathogenic")
    }) {
        hints.push(Hint::new("PP3", HintKind::PathogenicLeaning, "In-silico support (AlphaMissense) (PP3-like)"));
    }
    if s.cadd_phred.is_some_and(|x| x >= t.cadd_cutoff) {
        hints.push(Hint::new("PP3", HintKind::PathogenicLeaning, "High CADD PHRED (PP3-like)"));
    }
    if s.revel.is_some_and(|x| x >= t.revel_strong) {
        hints.push(Hint::new("PP3", HintKind::PathogenicLeaning, "High REVEL (PP3-like)"));
    }
    if af.is_some_and(|af| af >= COMMON_AF) {
        hints.push(Hint::new("BA1", HintKind::BenignLeaning, "Too common for severe Mendelian (BA1-like)"));
    }

    if hints.is_empty() {
        hints.push(Hint::new("INFO", HintKind::Info, "No strong heuristic flags; combine multiple evidence lines."));
    }
    hints
}

#[cfg(test)]
mod tests {
    use super::*;
    use mutantscope_common::{AlleleFrequency, PredictorCall};

    #[test]
    fn test_no_signal_is_info() {
        let hints = heuristic_hints(&VariantSummary::default(), &Thresholds::default());
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].kind, HintKind::Info);
    }

    #[test]
    fn test_pathogenic_leaning_hints() {
        let mut s = VariantSummary::default();
        s.population.joint = Some(AlleleFrequency::new(4e-7, None));
        s.alphamissense = PredictorCall::new(Some("likely_pathogenic".into()), None);
        s.cadd_phred = Some(28.0);
        s.revel = Some(0.9);
        let hints = heuristic_hints(&s, &Thresholds::default());
        let codes: Vec<_> = hints.iter().map(|h| h.code.as_str()).collect();
        assert_eq!(codes, vec!["PM2", "PP3", "PP3", "PP3"]);
        assert!(hints.iter().all(|h| h.kind == HintKind::PathogenicLeaning));
    }

    #[test]
    fn test_common_variant_is_ba1() {
        let mut s = VariantSummary::default();
        s.population.popmax = Some(AlleleFrequency::new(0.02, None));
        let hints = heuristic_hints(&s, &Thresholds::default());
        assert_eq!(hints[0].code, "BA1");
        assert_eq!(hints[0].kind, HintKind::BenignLeaning);
    }
}
