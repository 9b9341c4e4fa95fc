/// Core variant types shared by the normaliser, the aggregator and the reports.
/// `VariantSummary` is the flat record every downstream stage reads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Raw payload
// ---------------------------------------------------------------------------

/// Per-variant annotation records exactly as the upstream service returned them.
/// Only the first record is ever normalised.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawAnnotationPayload(pub Vec<Value>);

impl RawAnnotationPayload {
    pub fn new(records: Vec<Value>) -> Self {
        Self(records)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn first(&self) -> Option<&Value> {
        self.0.first()
    }

    pub fn records(&self) -> &[Value] {
        &self.0
    }

    /// Pretty-printed JSON of the whole payload, for the verbatim export.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Predictors
// ---------------------------------------------------------------------------

/// A categorical call plus a numeric score from one in-silico tool.
/// Either half may be missing independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictorCall {
    pub label: Option<String>,
    pub score: Option<f64>,
}

impl PredictorCall {
    pub fn new(label: Option<String>, score: Option<f64>) -> Self {
        Self { label, score }
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.score.is_none()
    }
}

// ---------------------------------------------------------------------------
// Population
// ---------------------------------------------------------------------------

/// One cohort's allele frequency with its allele-number denominator, if reported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlleleFrequency {
    pub af: f64,
    pub allele_number: Option<u64>,
}

impl AlleleFrequency {
    pub fn new(af: f64, allele_number: Option<u64>) -> Self {
        Self { af, allele_number }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationFrequencies {
    /// gnomAD joint (exomes + genomes) frequency.
    pub joint: Option<AlleleFrequency>,
    /// Controls-only cohort, the healthy-population proxy.
    pub controls: Option<AlleleFrequency>,
    /// Highest frequency across continental subpopulations.
    pub popmax: Option<AlleleFrequency>,
    /// Individuals observed homozygous for the alternate allele.
    pub homozygotes: Option<u64>,
}

impl PopulationFrequencies {
    pub fn is_empty(&self) -> bool {
        self.joint.is_none()
            && self.controls.is_none()
            && self.popmax.is_none()
            && self.homozygotes.is_none()
    }
}

// ---------------------------------------------------------------------------
// Conservation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConservationScores {
    /// GERP++ rejected substitutions; unbounded and signed.
    pub gerp: Option<f64>,
    /// PhastCons probability, 0–1.
    pub phastcons: Option<f64>,
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Canonical, flat summary of one annotated variant.
///
/// List fields are de-duplicated in first-seen order. Absent source values
/// leave fields as `None` or empty; they are never coerced to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantSummary {
    pub gene: Option<String>,
    /// Genomic HGVS (the queried input when the service echoes it).
    pub hgvsg: Option<String>,
    /// Protein HGVS, e.g. `ENSP00000269305.4:p.Arg175His`.
    pub hgvsp: Option<String>,
    pub transcript_id: Option<String>,
    pub protein_id: Option<String>,
    pub consequence: Option<String>,
    pub impact: Option<String>,
    pub protein_position: Option<u32>,
    /// Unknown unless supplied by the caller; the payload does not carry it.
    pub protein_length: Option<u32>,

    pub clinvar_significance: Vec<String>,
    pub clinvar_review: Vec<String>,
    pub phenotypes: Vec<String>,

    pub alphamissense: PredictorCall,
    /// Lower score = more damaging.
    pub sift: PredictorCall,
    /// Higher score = more damaging.
    pub polyphen: PredictorCall,
    pub cadd_phred: Option<f64>,
    pub revel: Option<f64>,

    pub population: PopulationFrequencies,
    pub conservation: ConservationScores,

    pub domains: Vec<String>,
    pub go_terms: Vec<String>,
    pub pubmed_ids: Vec<String>,
    pub interactors: Vec<String>,
}

impl VariantSummary {
    /// Identifier used for bookmarks and report titles.
    pub fn display_id(&self) -> Option<&str> {
        self.hgvsg.as_deref().or(self.hgvsp.as_deref())
    }
}
