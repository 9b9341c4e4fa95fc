//! Accessor-key table for VEP payload fields.
//!
//! VEP, its plugins and dbNSFP releases spell the same concept differently
//! (`sift_prediction` vs `sift_pred`). Each logical field below lists its
//! candidate keys in priority order. The first key holding a non-empty value
//! wins; later keys are never merged in, and a winning value that fails to
//! parse yields "absent" rather than falling through.

use std::collections::HashSet;

use serde_json::Value;

// ── Top-level record ─────────────────────────────────────────────────────────

pub const HGVSG: &[&str] = &["input", "id"];
pub const MOST_SEVERE_CONSEQUENCE: &[&str] = &["most_severe_consequence"];
pub const IMPACT: &[&str] = &["impact"];

// ── Transcript consequence: identity ─────────────────────────────────────────

pub const GENE_SYMBOL: &[&str] = &["gene_symbol", "genename"];
pub const HGVSP: &[&str] = &["hgvsp", "hgvsp_vep", "hgvsp_snpeff"];
pub const TRANSCRIPT_ID: &[&str] = &["transcript_id", "ensembl_transcriptid"];
pub const PROTEIN_ID: &[&str] = &["protein_id", "ensembl_proteinid"];
pub const CONSEQUENCE_TERMS: &[&str] = &["consequence_terms"];
pub const PROTEIN_START: &[&str] = &["protein_start", "protein_end"];

// ── Clinical ─────────────────────────────────────────────────────────────────

pub const CLINVAR_SIGNIFICANCE: &[&str] = &["clinvar_clnsig", "clinvar_clin_sig"];
pub const CLINVAR_REVIEW: &[&str] = &["clinvar_review", "review_status"];
pub const COLOCATED_CLIN_SIG: &[&str] = &["clin_sig"];
pub const COLOCATED_PUBMED: &[&str] = &["pubmed"];
pub const PHENOTYPE_NAME: &[&str] = &["phenotype", "description"];
pub const PHENOTYPE_PUBMED: &[&str] = &["pubmed_id", "pubmed"];

// ── Predictors ───────────────────────────────────────────────────────────────

/// Keys inside the nested `alphamissense` object.
pub const ALPHAMISSENSE_CLASS: &[&str] = &["am_class"];
pub const ALPHAMISSENSE_SCORE: &[&str] = &["am_pathogenicity"];
/// dbNSFP flat spellings, consulted only when the nested object is absent.
pub const ALPHAMISSENSE_CLASS_FLAT: &[&str] = &["alphamissense_class", "alphamissense_pred"];
pub const ALPHAMISSENSE_SCORE_FLAT: &[&str] = &["alphamissense_score"];

pub const SIFT_PREDICTION: &[&str] = &["sift_prediction", "sift_pred"];
pub const SIFT_SCORE: &[&str] = &["sift_score", "sift4g_score"];
pub const POLYPHEN_PREDICTION: &[&str] = &["polyphen_prediction", "polyphen2_hvar_pred"];
pub const POLYPHEN_SCORE: &[&str] = &["polyphen_score", "polyphen2_hvar_score"];
pub const CADD_PHRED: &[&str] = &["cadd_phred"];
pub const REVEL: &[&str] = &["revel", "revel_score"];

// ── Population (gnomAD via dbNSFP) ───────────────────────────────────────────

pub const GNOMAD_JOINT_AF: &[&str] = &["gnomad4.1_joint_af", "gnomad_exomes_af", "gnomad_genomes_af"];
pub const GNOMAD_JOINT_AN: &[&str] = &["gnomad4.1_joint_an", "gnomad_exomes_an", "gnomad_genomes_an"];
pub const GNOMAD_CONTROLS_AF: &[&str] = &[
    "gnomad_exomes_controls_af",
    "gnomad_genomes_controls_and_biobanks_af",
];
pub const GNOMAD_CONTROLS_AN: &[&str] = &[
    "gnomad_exomes_controls_an",
    "gnomad_genomes_controls_and_biobanks_an",
];
pub const GNOMAD_POPMAX_AF: &[&str] = &["gnomad4.1_joint_popmax_af", "gnomad_exomes_popmax_af"];
pub const GNOMAD_POPMAX_AN: &[&str] = &["gnomad4.1_joint_popmax_an", "gnomad_exomes_popmax_an"];
/// Controls cohort first: healthy homozygotes are the informative count.
pub const GNOMAD_HOMOZYGOTES: &[&str] = &[
    "gnomad_exomes_controls_nhomalt",
    "gnomad4.1_joint_nhomalt",
    "gnomad_exomes_nhomalt",
];

// ── Conservation ─────────────────────────────────────────────────────────────

pub const GERP: &[&str] = &["gerp++_rs", "gerp++_nr", "gerp_91_mammals"];
pub const PHASTCONS: &[&str] = &["phastcons100way_vertebrate", "phastcons470way_mammalian"];

// ── Annotation term lists ────────────────────────────────────────────────────

pub const DOMAIN_NAME: &[&str] = &["name", "description"];
pub const GO_TERM: &[&str] = &["description", "go_term", "name"];
pub const INTERACTOR_NAME: &[&str] = &["interaction_participants", "partner", "name"];

// ── dbNSFP single-letter prediction codes ────────────────────────────────────

pub const ALPHAMISSENSE_CODES: &[(&str, &str)] =
    &[("P", "likely_pathogenic"), ("B", "likely_benign"), ("A", "ambiguous")];
pub const SIFT_CODES: &[(&str, &str)] = &[("D", "deleterious"), ("T", "tolerated")];
pub const POLYPHEN_CODES: &[(&str, &str)] =
    &[("D", "probably_damaging"), ("P", "possibly_damaging"), ("B", "benign")];

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Null, blank strings, and empty arrays or objects carry no evidence.
pub fn is_present(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        _ => true,
    }
}

/// First non-empty value among `keys`. Non-objects yield `None`.
pub fn first_present<'a>(obj: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| is_present(v))
}

/// Parse-or-absent numeric coercion. Numeric strings are accepted; NaN and
/// infinities are not.
pub fn to_f64(v: &Value) -> Option<f64> {
    let x = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    x.is_finite().then_some(x)
}

/// Non-negative whole number, e.g. allele numbers and carrier counts.
pub fn to_u64(v: &Value) -> Option<u64> {
    if let Some(n) = v.as_u64() {
        return Some(n);
    }
    let x = to_f64(v)?;
    (x >= 0.0 && x.fract() == 0.0 && x <= u64::MAX as f64).then_some(x as u64)
}

/// Scalar rendered as display text.
pub fn to_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn first_text(obj: &Value, keys: &[&str]) -> Option<String> {
    first_present(obj, keys).and_then(to_text)
}

pub fn first_f64(obj: &Value, keys: &[&str]) -> Option<f64> {
    first_present(obj, keys).and_then(to_f64)
}

pub fn first_u64(obj: &Value, keys: &[&str]) -> Option<u64> {
    first_present(obj, keys).and_then(to_u64)
}

/// Scalars or arrays of scalars, flattened to text values.
pub fn texts(v: &Value) -> Vec<String> {
    match v {
        Value::Array(items) => items.iter().flat_map(texts).collect(),
        other => to_text(other).into_iter().collect(),
    }
}

/// Publication identifiers from a comma-joined string, a number, or a list of either.
pub fn split_ids(v: &Value) -> Vec<String> {
    match v {
        Value::Array(items) => items.iter().flat_map(split_ids).collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect(),
        Value::Number(n) => vec![n.to_string()],
        _ => vec![],
    }
}

/// A term that is either a plain string or a small object with a name field.
pub fn term_text(v: &Value, keys: &[&str]) -> Option<String> {
    match v {
        Value::Object(_) => first_text(v, keys),
        other => to_text(other),
    }
}

/// Expand a dbNSFP single-letter code; full labels pass through unchanged.
pub fn expand_code(label: String, codes: &[(&str, &str)]) -> String {
    codes
        .iter()
        .find(|(code, _)| label.eq_ignore_ascii_case(code))
        .map(|(_, full)| full.to_string())
        .unwrap_or(label)
}

/// De-duplicate in first-seen order, dropping blanks. Idempotent.
pub fn dedup_in_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_match_wins_and_skips_empty() {
        let obj = json!({ "sift_prediction": "", "sift_pred": "deleterious", "x": null });
        assert_eq!(first_text(&obj, SIFT_PREDICTION).as_deref(), Some("deleterious"));

        let obj = json!({ "sift_prediction": "tolerated", "sift_pred": "deleterious" });
        assert_eq!(first_text(&obj, SIFT_PREDICTION).as_deref(), Some("tolerated"));
    }

    #[test]
    fn test_parse_failure_does_not_fall_through() {
        let obj = json!({ "sift_score": "n/a", "sift4g_score": 0.01 });
        assert_eq!(first_f64(&obj, SIFT_SCORE), None);
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(to_f64(&json!("0.25")), Some(0.25));
        assert_eq!(to_f64(&json!(3)), Some(3.0));
        assert_eq!(to_f64(&json!("NaN")), None);
        assert_eq!(to_f64(&json!(true)), None);
        assert_eq!(to_u64(&json!("12")), Some(12));
        assert_eq!(to_u64(&json!(2.5)), None);
        assert_eq!(to_u64(&json!(-1)), None);
    }

    #[test]
    fn test_split_ids_forms() {
        assert_eq!(split_ids(&json!("123, 456,,789")), vec!["123", "456", "789"]);
        assert_eq!(split_ids(&json!([111, "222,333"])), vec!["111", "222", "333"]);
        assert!(split_ids(&json!(null)).is_empty());
    }

    #[test]
    fn test_term_text_forms() {
        assert_eq!(term_text(&json!("PF00870"), DOMAIN_NAME).as_deref(), Some("PF00870"));
        assert_eq!(
            term_text(&json!({ "db": "Pfam", "name": "P53" }), DOMAIN_NAME).as_deref(),
            Some("P53")
        );
        assert_eq!(term_text(&json!({ "db": "Pfam" }), DOMAIN_NAME), None);
    }

    #[test]
    fn test_expand_code() {
        assert_eq!(expand_code("D".into(), SIFT_CODES), "deleterious");
        assert_eq!(expand_code("tolerated".into(), SIFT_CODES), "tolerated");
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let once = dedup_in_order(vec!["b".into(), "a".into(), "b".into(), "".into(), "c".into()]);
        assert_eq!(once, vec!["b", "a", "c"]);
        let twice = dedup_in_order(once.clone());
        assert_eq!(once, twice);
    }
}
