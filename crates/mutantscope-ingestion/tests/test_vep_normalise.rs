//! Normalisation of realistic VEP payloads.

use mutantscope_common::{MutantscopeError, RawAnnotationPayload};
use mutantscope_ingestion::normalise::fields::dedup_in_order;
use mutantscope_ingestion::{normalise_payload, normalise_record};
use pretty_assertions::assert_eq;
use serde_json::json;

fn tp53_r175h() -> serde_json::Value {
    json!({
        "input": "NC_000017.11:g.7675088C>T",
        "most_severe_consequence": "missense_variant",
        "colocated_variants": [
            {
                "id": "rs28934578",
                "clin_sig": ["pathogenic", "likely_pathogenic", "pathogenic"],
                "pubmed": [8718514, 11900253],
                "phenotypes": [{ "phenotype": "Li-Fraumeni syndrome", "pubmed_id": "11900253,15977174" }]
            },
            { "id": "COSV52661038" }
        ],
        "transcript_consequences": [
            {
                "gene_symbol": "TP53",
                "transcript_id": "ENST00000269305",
                "protein_id": "ENSP00000269305",
                "hgvsp": "ENSP00000269305.4:p.Arg175His",
                "impact": "MODERATE",
                "consequence_terms": ["missense_variant"],
                "sift_prediction": "deleterious",
                "sift_score": 0.0,
                "polyphen_prediction": "probably_damaging",
                "polyphen_score": 0.998,
                "cadd_phred": 28.7,
                "revel": "0.931",
                "alphamissense": { "am_class": "likely_pathogenic", "am_pathogenicity": 0.9952 },
                "gnomad_exomes_controls_af": 3.98e-6,
                "gnomad_exomes_controls_an": 251196,
                "gnomad4.1_joint_popmax_af": "1.2e-5",
                "gnomad_exomes_controls_nhomalt": 0,
                "gerp++_rs": 4.64,
                "phastcons100way_vertebrate": 1.0,
                "clinvar_review": "criteria_provided,_multiple_submitters,_no_conflicts",
                "phenotypes": [
                    { "phenotype": "Li-Fraumeni syndrome", "pubmed": 8718514 },
                    { "phenotype": "Hereditary cancer-predisposing syndrome" }
                ],
                "domains": [
                    { "db": "Pfam", "name": "PF00870" },
                    "PROSITE_PATTERNS:PS00348",
                    { "db": "Pfam", "name": "PF00870" }
                ],
                "go": ["DNA_binding", { "description": "apoptotic process" }],
                "intact": [{ "interaction_participants": "MDM2" }, "MDM2", "EP300"]
            }
        ]
    })
}

#[test]
fn test_empty_payload_populates_nothing() {
    let err = normalise_payload(&RawAnnotationPayload::new(vec![])).unwrap_err();
    assert!(matches!(err, MutantscopeError::NoData(_)));
    assert!(err.is_recoverable());
}

#[test]
fn test_identity_fields() {
    let s = normalise_record(&tp53_r175h());
    assert_eq!(s.gene.as_deref(), Some("TP53"));
    assert_eq!(s.hgvsg.as_deref(), Some("NC_000017.11:g.7675088C>T"));
    assert_eq!(s.hgvsp.as_deref(), Some("ENSP00000269305.4:p.Arg175His"));
    assert_eq!(s.consequence.as_deref(), Some("missense_variant"));
    assert_eq!(s.impact.as_deref(), Some("MODERATE"));
    assert_eq!(s.protein_position, Some(175));
}

#[test]
fn test_predictors_and_population() {
    let s = normalise_record(&tp53_r175h());
    assert_eq!(s.sift.score, Some(0.0));
    assert_eq!(s.polyphen.label.as_deref(), Some("probably_damaging"));
    assert_eq!(s.revel, Some(0.931));
    assert_eq!(s.alphamissense.score, Some(0.9952));
    let controls = s.population.controls.unwrap();
    assert_eq!(controls.af, 3.98e-6);
    assert_eq!(controls.allele_number, Some(251196));
    assert_eq!(s.population.popmax.unwrap().af, 1.2e-5);
    assert_eq!(s.population.homozygotes, Some(0));
    assert!(s.population.joint.is_none());
    assert_eq!(s.conservation.gerp, Some(4.64));
}

#[test]
fn test_clinical_lists_are_deduplicated() {
    let s = normalise_record(&tp53_r175h());
    assert_eq!(s.clinvar_significance, vec!["pathogenic", "likely_pathogenic"]);
    assert_eq!(
        s.clinvar_review,
        vec!["criteria_provided,_multiple_submitters,_no_conflicts"]
    );
    assert_eq!(
        s.phenotypes,
        vec!["Li-Fraumeni syndrome", "Hereditary cancer-predisposing syndrome"]
    );
}

#[test]
fn test_pubmed_ids_merged_from_both_locations() {
    let s = normalise_record(&tp53_r175h());
    // Transcript phenotypes first, then colocated entries; comma-joined ids split.
    assert_eq!(s.pubmed_ids, vec!["8718514", "11900253", "15977174"]);
}

#[test]
fn test_term_lists() {
    let s = normalise_record(&tp53_r175h());
    assert_eq!(s.domains, vec!["PF00870", "PROSITE_PATTERNS:PS00348"]);
    assert_eq!(s.go_terms, vec!["DNA binding", "apoptotic process"]);
    assert_eq!(s.interactors, vec!["MDM2", "EP300"]);
}

#[test]
fn test_only_first_record_is_used() {
    let second = json!({ "input": "other", "transcript_consequences": [{ "gene_symbol": "BRCA1" }] });
    let payload = RawAnnotationPayload::new(vec![tp53_r175h(), second]);
    let s = normalise_payload(&payload).unwrap();
    assert_eq!(s.gene.as_deref(), Some("TP53"));
}

#[test]
fn test_position_from_hgvsp_when_no_coordinate() {
    let s = normalise_record(&json!({
        "transcript_consequences": [{ "hgvsp": "ENSP00000288602.6:p.Val600Glu" }]
    }));
    assert_eq!(s.protein_position, Some(600));
}

#[test]
fn test_unparseable_values_are_absent() {
    let s = normalise_record(&json!({
        "transcript_consequences": [{
            "cadd_phred": ".",
            "revel": null,
            "gnomad_exomes_controls_af": "NA",
            "hgvsp": "p.?"
        }]
    }));
    assert!(s.cadd_phred.is_none());
    assert!(s.revel.is_none());
    assert!(s.population.controls.is_none());
    assert!(s.protein_position.is_none());
}

#[test]
fn test_dedup_twice_is_stable() {
    let s = normalise_record(&tp53_r175h());
    assert_eq!(dedup_in_order(s.pubmed_ids.clone()), s.pubmed_ids);
}
