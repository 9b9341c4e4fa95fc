//! Vote-count evidence aggregation.
//!
//! Each source is consulted in a fixed order and casts at most one vote.
//! A source with no usable value is skipped: no row, no count.
//!
//! | Source          | Vote |
//! |-----------------|------|
//! | ClinVar         | pathogenic token → P; benign token → B; other → U |
//! | AlphaMissense   | class label first; else score ≥0.8 P, ≤0.2 B, else U |
//! | REVEL           | ≥ strong P; ≥ suggestive U; else B |
//! | CADD            | ≥30 P; ≥ cutoff U; else B |
//! | SIFT            | score < cutoff P, else B; label fallback |
//! | PolyPhen-2      | ≥0.85 P; ≥0.15 U; else B; label fallback |
//! | Controls/PopMax | 0 or ≤ ceiling P; ≤10× ceiling U; else B |
//! | Homozygotes     | 0 → P; >5 → B; 1–5 no vote |
//! | GERP++          | >4 P; >2 U; else B |
//! | PhastCons       | ≥0.95 P; ≥0.5 U; else B |

use mutantscope_common::{AlleleFrequency, VariantSummary};
use tracing::debug;

use crate::evidence::{Assessment, EvidenceRow, EvidenceTally};
use crate::interpret::{self, fmt_af, fmt_call, fmt_cohort, fmt_score};
use crate::thresholds::Thresholds;

type Rule = fn(&VariantSummary, &Thresholds) -> Option<EvidenceRow>;

/// Consultation order. The name is only used for logging skipped sources.
const RULES: [(&str, Rule); 10] = [
    ("ClinVar",       clinvar),
    ("AlphaMissense", alphamissense),
    ("REVEL",         revel),
    ("CADD",          cadd),
    ("SIFT",          sift),
    ("PolyPhen-2",    polyphen),
    ("Population AF", population),
    ("Homozygotes",   homozygotes),
    ("GERP++",        gerp),
    ("PhastCons",     phastcons),
];

/// Aggregate every source's vote for one summary.
pub fn aggregate(summary: &VariantSummary, thresholds: &Thresholds) -> EvidenceTally {
    let mut tally = EvidenceTally::default();
    for (name, rule) in RULES {
        match rule(summary, thresholds) {
            Some(row) => tally.push(row),
            None => debug!(source = name, "No usable value, source skipped"),
        }
    }
    tally
}

/// Lower-cased alphanumeric tokens: "Likely_pathogenic" → ["likely", "pathogenic"].
fn tokens(label: &str) -> impl Iterator<Item = String> + '_ {
    label
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn has_token(label: &str, token: &str) -> bool {
    tokens(label).any(|t| t == token)
}

fn clinvar(s: &VariantSummary, _: &Thresholds) -> Option<EvidenceRow> {
    if s.clinvar_significance.is_empty() {
        return None;
    }
    let any = |token: &str| s.clinvar_significance.iter().any(|l| has_token(l, token));
    let (assessment, text) = if any("pathogenic") {
        (Assessment::Pathogenic, "ClinVar lists a pathogenic assertion.")
    } else if any("benign") {
        (Assessment::Benign, "ClinVar lists a benign assertion.")
    } else {
        (Assessment::Uncertain, "ClinVar assertion is neither pathogenic nor benign.")
    };
    let mut interpretation = text.to_string();
    if !s.clinvar_review.is_empty() {
        interpretation.push_str(&format!(" Review status: {}.", s.clinvar_review.join("; ")));
    }
    Some(EvidenceRow::new(
        "ClinVar",
        s.clinvar_significance.join(", "),
        interpretation,
        assessment,
    ))
}

fn alphamissense(s: &VariantSummary, _: &Thresholds) -> Option<EvidenceRow> {
    let call = &s.alphamissense;
    if call.is_empty() {
        return None;
    }
    let label = call.label.as_deref().unwrap_or("");

    let (assessment, text) = if has_token(label, "pathogenic") {
        (Assessment::Pathogenic, "Class indicates likely pathogenicity; supportive.")
    } else if has_token(label, "benign") {
        (Assessment::Benign, "Class indicates a likely benign change.")
    } else {
        match call.score {
            Some(x) if x >= 0.8 => (Assessment::Pathogenic, "Score ≥0.8: concerning."),
            Some(x) if x <= 0.2 => (Assessment::Benign, "Score ≤0.2: little predicted impact."),
            Some(x) if x >= 0.6 => (Assessment::Uncertain, "Moderate concern; combine with other lines."),
            _ => (Assessment::Uncertain, "No strong pathogenic signal alone."),
        }
    };
    Some(EvidenceRow::new("AlphaMissense", fmt_call(call), text, assessment))
}

fn revel(s: &VariantSummary, t: &Thresholds) -> Option<EvidenceRow> {
    let x = s.revel?;
    let assessment = if x >= t.revel_strong {
        Assessment::Pathogenic
    } else if x >= t.revel_suggestive {
        Assessment::Uncertain
    } else {
        Assessment::Benign
    };
    Some(EvidenceRow::new(
        "REVEL",
        fmt_score(x),
        interpret::revel(x, t.revel_suggestive, t.revel_strong),
        assessment,
    ))
}

fn cadd(s: &VariantSummary, t: &Thresholds) -> Option<EvidenceRow> {
    let x = s.cadd_phred?;
    let assessment = if x >= 30.0 {
        Assessment::Pathogenic
    } else if x >= t.cadd_cutoff {
        Assessment::Uncertain
    } else {
        Assessment::Benign
    };
    Some(EvidenceRow::new("CADD", fmt_score(x), interpret::cadd(x, t.cadd_cutoff), assessment))
}

/// Lower score = more damaging.
fn sift(s: &VariantSummary, t: &Thresholds) -> Option<EvidenceRow> {
    let call = &s.sift;
    let (assessment, text) = match (call.score, call.label.as_deref()) {
        (Some(x), _) if x < t.sift_deleterious => (
            Assessment::Pathogenic,
            format!("Deleterious by numeric cutoff (<{}).", fmt_score(t.sift_deleterious)),
        ),
        (Some(_), _) => (Assessment::Benign, "Not strongly deleterious by SIFT.".to_string()),
        (None, Some(l)) if has_token(l, "deleterious") => {
            (Assessment::Pathogenic, "SIFT says not tolerated (deleterious).".to_string())
        }
        (None, Some(l)) if has_token(l, "tolerated") => {
            (Assessment::Benign, "SIFT predicts the change is tolerated.".to_string())
        }
        _ => return None,
    };
    Some(EvidenceRow::new("SIFT", fmt_call(call), text, assessment))
}

/// Higher score = more damaging.
fn polyphen(s: &VariantSummary, _: &Thresholds) -> Option<EvidenceRow> {
    let call = &s.polyphen;
    let (assessment, text) = match (call.score, call.label.as_deref()) {
        (Some(x), _) if x >= 0.85 => (Assessment::Pathogenic, "Score ≥0.85: probably damaging."),
        (Some(x), _) if x >= 0.15 => (Assessment::Uncertain, "Score 0.15 to 0.85: possibly damaging."),
        (Some(_), _) => (Assessment::Benign, "Not strongly damaging by PolyPhen-2."),
        (None, Some(l)) if has_token(l, "probably") => (Assessment::Pathogenic, "Predicted probably damaging."),
        (None, Some(l)) if has_token(l, "possibly") => (Assessment::Uncertain, "Predicted possibly damaging."),
        (None, Some(l)) if has_token(l, "benign") => (Assessment::Benign, "Predicted benign."),
        _ => return None,
    };
    Some(EvidenceRow::new("PolyPhen-2", fmt_call(call), text, assessment))
}

/// Controls cohort first, PopMax otherwise. The joint AF is context only.
fn population(s: &VariantSummary, t: &Thresholds) -> Option<EvidenceRow> {
    let pop = &s.population;
    let (source, freq) = match (&pop.controls, &pop.popmax) {
        (Some(c), _) => ("Controls AF", c),
        (None, Some(p)) => ("PopMax AF", p),
        (None, None) => return None,
    };

    let af = freq.af;
    let assessment = if af == 0.0 || af <= t.af_ceiling {
        Assessment::Pathogenic
    } else if af <= 10.0 * t.af_ceiling {
        Assessment::Uncertain
    } else {
        Assessment::Benign
    };

    let context = |f: &Option<AlleleFrequency>| {
        f.as_ref().map(|f| fmt_af(f.af)).unwrap_or_else(|| "n/a".to_string())
    };
    let interpretation = format!(
        "AF={}; PopMax={}. {}",
        context(&pop.joint),
        context(&pop.popmax),
        interpret::rarity(af)
    );
    Some(EvidenceRow::new(source, fmt_cohort(freq), interpretation, assessment))
}

fn homozygotes(s: &VariantSummary, _: &Thresholds) -> Option<EvidenceRow> {
    let n = s.population.homozygotes?;
    let (assessment, text) = match n {
        0 => (
            Assessment::Pathogenic,
            "No healthy homozygous carriers observed; informational.",
        ),
        n if n > 5 => (
            Assessment::Benign,
            "Several homozygous carriers; unlikely for a severe fully penetrant disorder.",
        ),
        _ => return None,
    };
    Some(EvidenceRow::new("Homozygotes", n.to_string(), text, assessment))
}

fn gerp(s: &VariantSummary, _: &Thresholds) -> Option<EvidenceRow> {
    let x = s.conservation.gerp?;
    let assessment = if x > 4.0 {
        Assessment::Pathogenic
    } else if x > 2.0 {
        Assessment::Uncertain
    } else {
        Assessment::Benign
    };
    Some(EvidenceRow::new("GERP++", fmt_score(x), interpret::gerp(x), assessment))
}

fn phastcons(s: &VariantSummary, _: &Thresholds) -> Option<EvidenceRow> {
    let x = s.conservation.phastcons?;
    let assessment = if x >= 0.95 {
        Assessment::Pathogenic
    } else if x >= 0.5 {
        Assessment::Uncertain
    } else {
        Assessment::Benign
    };
    Some(EvidenceRow::new("PhastCons", fmt_score(x), interpret::phastcons(x), assessment))
}
