//! Plain-language rules of thumb shown beside each evidence row, and the
//! value formatting shared by the aggregator and the reports.

use mutantscope_common::{AlleleFrequency, PredictorCall};

/// Scores print with up to four decimals, trailing zeros dropped.
pub fn fmt_score(x: f64) -> String {
    let s = format!("{:.4}", x);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// Allele frequencies print in scientific notation, e.g. "3.98e-6".
pub fn fmt_af(x: f64) -> String {
    if x == 0.0 { "0".to_string() } else { format!("{:.2e}", x) }
}

pub fn fmt_cohort(freq: &AlleleFrequency) -> String {
    match freq.allele_number {
        Some(an) => format!("{} (AN={})", fmt_af(freq.af), an),
        None => fmt_af(freq.af),
    }
}

/// "label (score)", "label" or "score".
pub fn fmt_call(call: &PredictorCall) -> String {
    match (&call.label, call.score) {
        (Some(l), Some(s)) => format!("{} ({})", l, fmt_score(s)),
        (Some(l), None) => l.clone(),
        (None, Some(s)) => fmt_score(s),
        (None, None) => String::new(),
    }
}

pub fn cadd(phred: f64, cutoff: f64) -> String {
    if phred >= 30.0 {
        "Very high (top 0.1% deleterious); concerning.".to_string()
    } else if phred >= cutoff && phred >= 20.0 {
        "High (top ~1% deleterious); concerning.".to_string()
    } else if phred >= cutoff {
        format!("At or above the configured cutoff ({}); weigh against other evidence.", fmt_score(cutoff))
    } else {
        format!("Below common pathogenic threshold ({}); weigh against other evidence.", fmt_score(cutoff))
    }
}

pub fn revel(score: f64, suggestive: f64, strong: f64) -> String {
    if score >= strong && score >= 0.85 {
        "Very strong damaging signal.".to_string()
    } else if score >= strong {
        "Strong; often supportive pathogenic evidence.".to_string()
    } else if score >= suggestive {
        "Suggestive of damage.".to_string()
    } else {
        "Below common damaging cutoffs.".to_string()
    }
}

/// Population rarity band; thresholds are the classic Mendelian rules of thumb.
pub fn rarity(af: f64) -> &'static str {
    if af <= 1e-6 {
        "Ultra-rare; consistent with severe rare disease."
    } else if af <= 1e-5 {
        "Extremely rare; consistent with rare disease."
    } else if af <= 1e-4 {
        "Rare; could be compatible depending on phenotype."
    } else {
        "Too common for most severe Mendelian disorders."
    }
}

pub fn gerp(score: f64) -> &'static str {
    if score > 4.0 {
        "GERP++ >4: very strong constraint."
    } else if score > 2.0 {
        "GERP++ >2: conserved."
    } else {
        "GERP++ low."
    }
}

pub fn phastcons(score: f64) -> &'static str {
    if score >= 0.99 {
        "PhastCons ≈1: highly conserved across vertebrates."
    } else if score >= 0.8 {
        "PhastCons high."
    } else if score >= 0.5 {
        "PhastCons moderate."
    } else {
        "PhastCons low."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_score_trims() {
        assert_eq!(fmt_score(0.5), "0.5");
        assert_eq!(fmt_score(28.7), "28.7");
        assert_eq!(fmt_score(0.99521), "0.9952");
        assert_eq!(fmt_score(3.0), "3");
        assert_eq!(fmt_score(0.0), "0");
    }

    #[test]
    fn test_fmt_af() {
        assert_eq!(fmt_af(3.98e-6), "3.98e-6");
        assert_eq!(fmt_af(0.0), "0");
        assert_eq!(
            fmt_cohort(&AlleleFrequency::new(1.2e-5, Some(251196))),
            "1.20e-5 (AN=251196)"
        );
    }

    #[test]
    fn test_cadd_bands() {
        assert!(cadd(31.0, 20.0).contains("top 0.1%"));
        assert!(cadd(22.0, 20.0).contains("top ~1%"));
        assert!(cadd(12.0, 20.0).starts_with("Below"));
        assert!(cadd(17.0, 15.0).starts_with("At or above"));
    }

    #[test]
    fn test_rarity_bands() {
        assert!(rarity(0.0).starts_with("Ultra-rare"));
        assert!(rarity(5e-6).starts_with("Extremely rare"));
        assert!(rarity(5e-5).starts_with("Rare"));
        assert!(rarity(0.02).starts_with("Too common"));
    }
}
