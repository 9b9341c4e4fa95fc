//! Aggregation properties over realistic summaries.

use mutantscope_common::{AlleleFrequency, ConservationScores, PredictorCall, VariantSummary};
use mutantscope_ranker::{aggregate, classify, heuristic_hints, Assessment, Badge, Thresholds};
use pretty_assertions::assert_eq;

fn tp53_r175h() -> VariantSummary {
    VariantSummary {
        gene: Some("TP53".into()),
        hgvsg: Some("NC_000017.11:g.7675088C>T".into()),
        hgvsp: Some("ENSP00000269305.4:p.Arg175His".into()),
        protein_position: Some(175),
        clinvar_significance: vec!["pathogenic".into(), "likely_pathogenic".into()],
        alphamissense: PredictorCall::new(Some("likely_pathogenic".into()), Some(0.9952)),
        sift: PredictorCall::new(Some("deleterious".into()), Some(0.0)),
        polyphen: PredictorCall::new(Some("probably_damaging".into()), Some(0.998)),
        cadd_phred: Some(28.7),
        revel: Some(0.931),
        conservation: ConservationScores { gerp: Some(4.64), phastcons: Some(1.0) },
        ..Default::default()
    }
}

fn common_benign() -> VariantSummary {
    let mut s = VariantSummary::default();
    s.clinvar_significance = vec!["benign".into()];
    s.sift = PredictorCall::new(Some("tolerated".into()), Some(0.9));
    s.polyphen = PredictorCall::new(Some("benign".into()), Some(0.01));
    s.population.controls = Some(AlleleFrequency::new(0.12, Some(60_000)));
    s.population.homozygotes = Some(812);
    s.conservation.gerp = Some(-1.3);
    s
}

#[test]
fn test_counts_match_rows() {
    let t = Thresholds::default();
    for s in [tp53_r175h(), common_benign(), VariantSummary::default()] {
        let tally = aggregate(&s, &t);
        let (p, u, b) = tally.counts();
        assert_eq!((p + u + b) as usize, tally.rows().len());
        let recount = |a: Assessment| tally.rows().iter().filter(|r| r.assessment == a).count() as u32;
        assert_eq!(p, recount(Assessment::Pathogenic));
        assert_eq!(u, recount(Assessment::Uncertain));
        assert_eq!(b, recount(Assessment::Benign));
    }
}

#[test]
fn test_hotspot_is_likely_pathogenic() {
    let tally = aggregate(&tp53_r175h(), &Thresholds::default());
    let sources: Vec<_> = tally.rows().iter().map(|r| r.source.as_str()).collect();
    assert_eq!(
        sources,
        vec!["ClinVar", "AlphaMissense", "REVEL", "CADD", "SIFT", "PolyPhen-2", "GERP++", "PhastCons"]
    );
    // CADD 28.7 is above the cutoff but below 30.
    assert_eq!(tally.counts(), (7, 1, 0));
    assert_eq!(tally.badge(), Badge::LikelyPathogenic);
}

#[test]
fn test_common_variant_is_likely_benign() {
    let tally = aggregate(&common_benign(), &Thresholds::default());
    assert_eq!(tally.counts(), (0, 0, 6));
    assert_eq!(tally.badge().to_string(), "likely benign");
}

#[test]
fn test_popmax_zero_without_controls() {
    let mut s = VariantSummary::default();
    s.population.popmax = Some(AlleleFrequency::new(0.0, None));
    let tally = aggregate(&s, &Thresholds::default());
    assert_eq!(tally.rows().len(), 1);
    assert_eq!(tally.rows()[0].source, "PopMax AF");
    assert_eq!(tally.rows()[0].assessment, Assessment::Pathogenic);
}

#[test]
fn test_sift_direction_is_lower_is_worse() {
    let t = Thresholds::default();
    let mut s = VariantSummary::default();

    s.sift = PredictorCall::new(None, Some(0.01));
    assert_eq!(aggregate(&s, &t).rows()[0].assessment, Assessment::Pathogenic);

    s.sift = PredictorCall::new(None, Some(0.90));
    assert_eq!(aggregate(&s, &t).rows()[0].assessment, Assessment::Benign);

    // The same numbers read the other way round for PolyPhen-2.
    let mut s = VariantSummary::default();
    s.polyphen = PredictorCall::new(None, Some(0.90));
    assert_eq!(aggregate(&s, &t).rows()[0].assessment, Assessment::Pathogenic);
    s.polyphen = PredictorCall::new(None, Some(0.01));
    assert_eq!(aggregate(&s, &t).rows()[0].assessment, Assessment::Benign);
}

#[test]
fn test_threshold_change_moves_votes() {
    let mut s = VariantSummary::default();
    s.population.controls = Some(AlleleFrequency::new(5e-5, None));

    let mut t = Thresholds::default();
    assert_eq!(aggregate(&s, &t).rows()[0].assessment, Assessment::Uncertain);

    t.set("af_ceiling", "1e-4").unwrap();
    assert_eq!(aggregate(&s, &t).rows()[0].assessment, Assessment::Pathogenic);
}

#[test]
fn test_badge_reference_triples() {
    assert_eq!(classify(3, 0, 0).to_string(), "likely pathogenic");
    assert_eq!(classify(0, 0, 3).to_string(), "likely benign");
    assert_eq!(classify(1, 1, 1).to_string(), "uncertain significance");
    assert_eq!(classify(2, 1, 2).to_string(), "conflicting evidence");
    assert_eq!(classify(0, 0, 0).to_string(), "no data available");
}

#[test]
fn test_hints_do_not_change_counts() {
    let s = tp53_r175h();
    let t = Thresholds::default();
    let before = aggregate(&s, &t);
    let hints = heuristic_hints(&s, &t);
    assert!(!hints.is_empty());
    assert_eq!(aggregate(&s, &t), before);
}
