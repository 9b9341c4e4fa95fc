//! VEP record → `VariantSummary`.
//!
//! Extraction is per-field and independent: a missing sub-structure (no
//! transcript consequences, no colocated variants) leaves the dependent
//! fields absent and never aborts the record.

use mutantscope_common::{
    AlleleFrequency, ConservationScores, MutantscopeError, PopulationFrequencies, PredictorCall,
    RawAnnotationPayload, Result, VariantSummary,
};
use serde_json::Value;
use tracing::debug;

use super::fields::{self, *};
use super::hgvs::protein_position;

static ABSENT: Value = Value::Null;

/// Normalise the first record of a VEP response.
///
/// An empty response is a recoverable `NoData` condition. Multi-allele
/// responses are not merged; records after the first are ignored.
pub fn normalise_payload(payload: &RawAnnotationPayload) -> Result<VariantSummary> {
    let Some(record) = payload.first() else {
        return Err(MutantscopeError::NoData("Empty VEP response.".to_string()));
    };
    if payload.len() > 1 {
        debug!(records = payload.len(), "Only the first VEP record is normalised");
    }
    Ok(normalise_record(record))
}

/// Normalise a single VEP record.
pub fn normalise_record(v: &Value) -> VariantSummary {
    let tc0 = v
        .get("transcript_consequences")
        .and_then(Value::as_array)
        .and_then(|tcs| tcs.first())
        .unwrap_or(&ABSENT);

    let hgvsp = first_text(tc0, HGVSP);

    let mut phenotypes = Vec::new();
    let mut pubmed_ids = Vec::new();
    collect_phenotypes(tc0, &mut phenotypes, &mut pubmed_ids);

    let mut clin_sig = Vec::new();
    for cv in array_at(v, "colocated_variants") {
        if let Some(sig) = first_present(cv, COLOCATED_CLIN_SIG) {
            clin_sig.extend(texts(sig));
        }
        if let Some(pm) = first_present(cv, COLOCATED_PUBMED) {
            pubmed_ids.extend(split_ids(pm));
        }
        collect_phenotypes(cv, &mut phenotypes, &mut pubmed_ids);
    }
    if let Some(sig) = first_present(tc0, CLINVAR_SIGNIFICANCE) {
        clin_sig.extend(texts(sig));
    }
    let review = first_present(tc0, CLINVAR_REVIEW).map(texts).unwrap_or_default();

    let domains = array_at(tc0, "domains")
        .filter_map(|d| term_text(d, DOMAIN_NAME));
    let go_terms = array_at(tc0, "go")
        .filter_map(|g| term_text(g, GO_TERM))
        .map(|t| t.replace('_', " "));
    let interactors = array_at(tc0, "intact")
        .filter_map(|i| term_text(i, INTERACTOR_NAME));

    VariantSummary {
        gene: first_text(tc0, GENE_SYMBOL),
        hgvsg: first_text(v, HGVSG),
        protein_position: resolve_position(tc0, hgvsp.as_deref()),
        hgvsp,
        transcript_id: first_text(tc0, TRANSCRIPT_ID),
        protein_id: first_text(tc0, PROTEIN_ID),
        consequence: first_text(v, MOST_SEVERE_CONSEQUENCE)
            .or_else(|| first_present(tc0, CONSEQUENCE_TERMS).and_then(|t| texts(t).into_iter().next())),
        impact: first_text(v, IMPACT).or_else(|| first_text(tc0, IMPACT)),
        protein_length: None,

        clinvar_significance: dedup_in_order(clin_sig.into_iter().map(|s| s.to_lowercase())),
        clinvar_review: dedup_in_order(review.into_iter().map(|s| s.to_lowercase())),
        phenotypes: dedup_in_order(phenotypes),

        alphamissense: alphamissense(tc0),
        sift: PredictorCall::new(
            first_text(tc0, SIFT_PREDICTION).map(|l| expand_code(l, SIFT_CODES)),
            first_f64(tc0, SIFT_SCORE),
        ),
        polyphen: PredictorCall::new(
            first_text(tc0, POLYPHEN_PREDICTION).map(|l| expand_code(l, POLYPHEN_CODES)),
            first_f64(tc0, POLYPHEN_SCORE),
        ),
        cadd_phred: first_f64(tc0, CADD_PHRED),
        revel: first_f64(tc0, REVEL),

        population: population(tc0),
        conservation: ConservationScores {
            gerp: first_f64(tc0, GERP),
            phastcons: first_f64(tc0, PHASTCONS),
        },

        domains: dedup_in_order(domains),
        go_terms: dedup_in_order(go_terms),
        pubmed_ids: dedup_in_order(pubmed_ids),
        interactors: dedup_in_order(interactors),
    }
}

fn array_at<'a>(obj: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    obj.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

/// Phenotype names and their publication ids from an object's `phenotypes` list.
fn collect_phenotypes(obj: &Value, phenotypes: &mut Vec<String>, pubmed_ids: &mut Vec<String>) {
    for p in array_at(obj, "phenotypes") {
        if let Some(name) = term_text(p, PHENOTYPE_NAME) {
            phenotypes.push(name);
        }
        if let Some(pm) = first_present(p, PHENOTYPE_PUBMED) {
            pubmed_ids.extend(split_ids(pm));
        }
    }
}

/// Explicit positive coordinate first, then the HGVSp parse.
fn resolve_position(tc0: &Value, hgvsp: Option<&str>) -> Option<u32> {
    let explicit = first_f64(tc0, PROTEIN_START)
        .filter(|p| *p >= 1.0 && p.fract() == 0.0 && *p <= u32::MAX as f64)
        .map(|p| p as u32);
    explicit.or_else(|| hgvsp.and_then(protein_position))
}

fn alphamissense(tc0: &Value) -> PredictorCall {
    match tc0.get("alphamissense").filter(|am| fields::is_present(am)) {
        Some(am) => PredictorCall::new(
            first_text(am, ALPHAMISSENSE_CLASS),
            first_f64(am, ALPHAMISSENSE_SCORE),
        ),
        None => PredictorCall::new(
            first_text(tc0, ALPHAMISSENSE_CLASS_FLAT).map(|l| expand_code(l, ALPHAMISSENSE_CODES)),
            first_f64(tc0, ALPHAMISSENSE_SCORE_FLAT),
        ),
    }
}

fn cohort(tc0: &Value, af_keys: &[&str], an_keys: &[&str]) -> Option<AlleleFrequency> {
    first_f64(tc0, af_keys).map(|af| AlleleFrequency::new(af, first_u64(tc0, an_keys)))
}

fn population(tc0: &Value) -> PopulationFrequencies {
    PopulationFrequencies {
        joint: cohort(tc0, GNOMAD_JOINT_AF, GNOMAD_JOINT_AN),
        controls: cohort(tc0, GNOMAD_CONTROLS_AF, GNOMAD_CONTROLS_AN),
        popmax: cohort(tc0, GNOMAD_POPMAX_AF, GNOMAD_POPMAX_AN),
        homozygotes: first_u64(tc0, GNOMAD_HOMOZYGOTES),
    }
}
