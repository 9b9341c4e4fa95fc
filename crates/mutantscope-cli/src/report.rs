//! Variant report assembly and rendering.
//!
//! Three outputs: a plain-text terminal summary, a Markdown document with
//! fixed section headers, and the raw annotation payload as pretty JSON.

use chrono::{DateTime, Utc};
use mutantscope_common::{AlleleFrequency, PredictorCall, RawAnnotationPayload, Result, VariantSummary};
use mutantscope_ingestion::models::ArticleRef;
use mutantscope_ingestion::normalise::parse_protein_change;
use mutantscope_ingestion::normalise_payload;
use mutantscope_ranker::interpret::{fmt_af, fmt_score};
use mutantscope_ranker::{aggregate, heuristic_hints, Badge, EvidenceTally, Hint, Thresholds};

use crate::config::DisplayConfig;

const NONE: &str = "—";

const DISCLAIMER: &str = "This tool provides research information only and is not medical advice.";

const NEXT_STEPS: [&str; 5] = [
    "Validate the variant context (GRCh38, HGVS form).",
    "Aggregate evidence: ClinVar, AI predictors (AlphaMissense/REVEL/CADD), conservation, and extreme rarity in gnomAD.",
    "Use the PubMed links; prioritize phenotype-matched reports.",
    "For classification or testing decisions, consult clinical genetics.",
    "Functional work: prioritize assays tied to the listed domains and GO processes.",
];

/// Everything produced for one looked-up variant.
#[derive(Debug, Clone)]
pub struct VariantReport {
    /// The identifier as the user typed it.
    pub query: String,
    pub summary: VariantSummary,
    pub tally: EvidenceTally,
    pub badge: Badge,
    pub hints: Vec<Hint>,
    pub articles: Vec<ArticleRef>,
    pub raw: RawAnnotationPayload,
    pub generated_at: DateTime<Utc>,
}

impl VariantReport {
    /// Normalise and aggregate a payload. Publications start as bare links.
    pub fn build(query: &str, raw: RawAnnotationPayload, thresholds: &Thresholds) -> Result<Self> {
        let summary = normalise_payload(&raw)?;
        let tally = aggregate(&summary, thresholds);
        let badge = tally.badge();
        let hints = heuristic_hints(&summary, thresholds);
        let articles = summary.pubmed_ids.iter().map(|id| ArticleRef::link_only(id)).collect();
        Ok(Self {
            query: query.trim().to_string(),
            summary,
            tally,
            badge,
            hints,
            articles,
            raw,
            generated_at: Utc::now(),
        })
    }

    /// Canonical identifier: genomic HGVS when the service echoed one, else the query.
    pub fn variant_key(&self) -> &str {
        self.summary.hgvsg.as_deref().unwrap_or(&self.query)
    }

    /// Re-run aggregation after a threshold change; the summary is reused.
    pub fn reassess(&mut self, thresholds: &Thresholds) {
        self.tally = aggregate(&self.summary, thresholds);
        self.badge = self.tally.badge();
        self.hints = heuristic_hints(&self.summary, thresholds);
    }

    fn protein_change(&self) -> Option<String> {
        self.summary
            .hgvsp
            .as_deref()
            .and_then(parse_protein_change)
            .map(|c| c.short_form())
    }

    fn counts_line(&self) -> String {
        let (p, u, b) = self.tally.counts();
        format!("{} pathogenic / {} uncertain / {} benign", p, u, b)
    }

    // ── Plain text ──────────────────────────────────────────────────────────

    pub fn render_text(&self, display: &DisplayConfig) -> String {
        let s = &self.summary;
        let mut out = vec![
            format!("MutantScope: {}", self.variant_key()),
            format!("  Verdict: {} ({})", self.badge, self.counts_line()),
            String::new(),
            format!("Gene:         {}", or_none(&s.gene)),
            format!("Variant:      {}", or_none(&s.hgvsg)),
            format!(
                "Protein:      {}{}",
                or_none(&s.hgvsp),
                self.protein_change().map(|c| format!(" ({})", c)).unwrap_or_default()
            ),
            format!("Position:     {}", opt(s.protein_position)),
            format!("Transcript:   {}", or_none(&s.transcript_id)),
            format!("Consequence:  {}", or_none(&s.consequence)),
            format!("Impact:       {}", or_none(&s.impact)),
            String::new(),
            "Clinical".to_string(),
            format!("  ClinVar significance:  {}", join_or_none(&s.clinvar_significance)),
            format!("  ClinVar review status: {}", join_or_none(&s.clinvar_review)),
        ];

        if !s.phenotypes.is_empty() {
            out.push("  Phenotypes:".to_string());
            let (shown, hidden) = head(&s.phenotypes, display.max_phenotypes);
            out.extend(shown.iter().map(|p| format!("    - {}", p)));
            out.extend(more(hidden).map(|m| format!("    {}", m)));
        }

        out.push(String::new());
        out.push("Evidence".to_string());
        if self.tally.is_empty() {
            out.push("  No usable evidence in this payload.".to_string());
        }
        for row in self.tally.rows() {
            out.push(format!(
                "  {:<13} {:<10} {:<28} {}",
                row.source, row.assessment.to_string(), row.value, row.interpretation
            ));
        }

        out.push(String::new());
        out.push("Heuristic hints (not ACMG adjudication)".to_string());
        out.extend(self.hints.iter().map(|h| format!("  [{}] {}", h.code, h.text)));

        if !s.domains.is_empty() {
            out.push(String::new());
            out.push(format!("Domains:      {}", s.domains.join(", ")));
        }
        if !s.go_terms.is_empty() {
            out.push("GO terms:".to_string());
            let (shown, hidden) = head(&s.go_terms, display.max_go_terms);
            out.extend(shown.iter().map(|g| format!("  - {}", g)));
            out.extend(more(hidden).map(|m| format!("  {}", m)));
        }
        if !s.interactors.is_empty() {
            out.push(format!("Interactors:  {}", s.interactors.join(", ")));
        }

        out.push(String::new());
        out.push("Literature".to_string());
        if self.articles.is_empty() {
            out.push("  No PubMed identifiers returned in this payload.".to_string());
        }
        let (shown, hidden) = head(&self.articles, display.max_publications);
        for article in shown {
            out.push(match &article.metadata {
                Some(meta) => format!(
                    "  - {} {}{}",
                    article.url,
                    meta.title,
                    meta.publication_date.as_ref().map(|d| format!(" ({})", d)).unwrap_or_default()
                ),
                None => format!("  - {}", article.url),
            });
        }
        out.extend(more(hidden).map(|m| format!("  {}", m)));

        out.push(String::new());
        out.push(DISCLAIMER.to_string());
        out.join("\n")
    }

    // ── Markdown ────────────────────────────────────────────────────────────

    pub fn render_markdown(&self, display: &DisplayConfig) -> String {
        let s = &self.summary;
        let mut md = vec![
            format!("# MutantScope report: {}", self.variant_key()),
            String::new(),
            format!(
                "_Generated {} UTC. {}_",
                self.generated_at.format("%Y-%m-%d %H:%M:%S"),
                DISCLAIMER
            ),
            String::new(),
            "## Gene".to_string(),
            String::new(),
            or_none(&s.gene).to_string(),
            String::new(),
            "## Variant".to_string(),
            String::new(),
            format!("- **HGVSg:** {}", or_none(&s.hgvsg)),
            format!("- **Query:** {}", self.query),
            String::new(),
            "## Protein".to_string(),
            String::new(),
            format!("- **HGVSp:** {}", or_none(&s.hgvsp)),
            format!("- **Change:** {}", self.protein_change().as_deref().unwrap_or(NONE)),
            format!("- **Position:** {}", opt(s.protein_position)),
            format!("- **Transcript:** {}", or_none(&s.transcript_id)),
            format!("- **Protein ID:** {}", or_none(&s.protein_id)),
            format!("- **Domains:** {}", join_or_none(&s.domains)),
            String::new(),
            "## Consequence/Impact".to_string(),
            String::new(),
            format!("- **Consequence:** {}", or_none(&s.consequence)),
            format!("- **Impact:** {}", or_none(&s.impact)),
            String::new(),
            "## Clinical".to_string(),
            String::new(),
            format!("- **ClinVar significance:** {}", join_or_none(&s.clinvar_significance)),
            format!("- **ClinVar review status:** {}", join_or_none(&s.clinvar_review)),
        ];
        if !s.phenotypes.is_empty() {
            md.push("- **Phenotypes:**".to_string());
            let (shown, hidden) = head(&s.phenotypes, display.max_phenotypes);
            md.extend(shown.iter().map(|p| format!("  - {}", p)));
            md.extend(more(hidden).map(|m| format!("  - {}", m)));
        }

        md.extend([
            String::new(),
            "## Predictor scores".to_string(),
            String::new(),
            "| Predictor | Call | Score |".to_string(),
            "|---|---|---|".to_string(),
            predictor_row("AlphaMissense", &s.alphamissense),
            predictor_row("SIFT", &s.sift),
            predictor_row("PolyPhen-2", &s.polyphen),
            format!("| CADD (PHRED) | {} | {} |", NONE, opt_score(s.cadd_phred)),
            format!("| REVEL | {} | {} |", NONE, opt_score(s.revel)),
            String::new(),
            "## Population frequencies".to_string(),
            String::new(),
            "| Cohort | AF | AN |".to_string(),
            "|---|---|---|".to_string(),
            cohort_row("gnomAD joint", s.population.joint.as_ref()),
            cohort_row("Controls", s.population.controls.as_ref()),
            cohort_row("PopMax", s.population.popmax.as_ref()),
            String::new(),
            format!("- **Homozygotes:** {}", opt(s.population.homozygotes)),
            String::new(),
            "## Conservation".to_string(),
            String::new(),
            format!("- **GERP++:** {}", opt_score(s.conservation.gerp)),
            format!("- **PhastCons:** {}", opt_score(s.conservation.phastcons)),
            String::new(),
            "## Evidence table".to_string(),
            String::new(),
            "| Source | Value | Assessment | Interpretation |".to_string(),
            "|---|---|---|---|".to_string(),
        ]);
        md.extend(self.tally.rows().iter().map(|r| {
            format!(
                "| {} | {} | {} | {} |",
                cell(&r.source), cell(&r.value), r.assessment, cell(&r.interpretation)
            )
        }));

        let (p, u, b) = self.tally.counts();
        md.extend([
            String::new(),
            "## Aggregate counts".to_string(),
            String::new(),
            format!("- **Pathogenic:** {}", p),
            format!("- **Uncertain:** {}", u),
            format!("- **Benign:** {}", b),
            format!("- **Badge:** {}", self.badge),
            String::new(),
            "## Heuristic hints".to_string(),
            String::new(),
        ]);
        md.extend(self.hints.iter().map(|h| format!("- **{}**: {}", h.code, h.text)));

        if !s.go_terms.is_empty() {
            md.extend([String::new(), "## Gene Ontology".to_string(), String::new()]);
            let (shown, hidden) = head(&s.go_terms, display.max_go_terms);
            md.extend(shown.iter().map(|g| format!("- {}", g)));
            md.extend(more(hidden).map(|m| format!("- {}", m)));
        }

        md.extend([String::new(), "## Literature".to_string(), String::new()]);
        if self.articles.is_empty() {
            md.push("No PubMed identifiers returned in this payload.".to_string());
        }
        let (shown, hidden) = head(&self.articles, display.max_publications);
        for article in shown {
            md.push(match &article.metadata {
                Some(meta) => format!(
                    "- [PMID {}]({}): {}{}",
                    article.pmid,
                    article.url,
                    meta.title,
                    meta.publication_date.as_ref().map(|d| format!(" ({})", d)).unwrap_or_default()
                ),
                None => format!("- [PMID {}]({})", article.pmid, article.url),
            });
        }
        md.extend(more(hidden).map(|m| format!("- {}", m)));
        if !s.interactors.is_empty() {
            md.push(String::new());
            md.push(format!("**Known/reported interactors (IntAct):** {}", s.interactors.join(", ")));
        }

        md.extend([String::new(), "## Suggested next steps (non-medical)".to_string(), String::new()]);
        md.extend(NEXT_STEPS.iter().map(|step| format!("- {}", step)));
        md.push(String::new());
        md.join("\n")
    }

    /// The annotation payload exactly as received, pretty-printed.
    pub fn raw_json(&self) -> Result<String> {
        Ok(self.raw.to_pretty_json()?)
    }
}

fn or_none(v: &Option<String>) -> &str {
    v.as_deref().unwrap_or(NONE)
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| NONE.to_string())
}

fn opt_score(v: Option<f64>) -> String {
    v.map(fmt_score).unwrap_or_else(|| NONE.to_string())
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() { NONE.to_string() } else { items.join(", ") }
}

/// The first `max` items and how many were left out.
fn head<T>(items: &[T], max: usize) -> (&[T], usize) {
    let shown = items.len().min(max);
    (&items[..shown], items.len() - shown)
}

fn more(hidden: usize) -> Option<String> {
    (hidden > 0).then(|| format!("... and {} more", hidden))
}

fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn predictor_row(name: &str, call: &PredictorCall) -> String {
    let label = call.label.as_deref().unwrap_or(NONE);
    format!("| {} | {} | {} |", name, cell(label), opt_score(call.score))
}

fn cohort_row(name: &str, freq: Option<&AlleleFrequency>) -> String {
    match freq {
        Some(f) => format!("| {} | {} | {} |", name, fmt_af(f.af), opt(f.allele_number)),
        None => format!("| {} | {} | {} |", name, NONE, NONE),
    }
}

/// One-line summary used by batch tables and bookmark listings.
pub fn one_line(report: &VariantReport) -> String {
    let change = report.protein_change().unwrap_or_else(|| NONE.to_string());
    format!(
        "{:<32} {:<8} {:<10} {}",
        report.variant_key(),
        or_none(&report.summary.gene),
        change,
        report.badge
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mutantscope_common::MutantscopeError;
    use serde_json::json;

    fn payload() -> RawAnnotationPayload {
        RawAnnotationPayload::new(vec![json!({
            "input": "NC_000017.11:g.7675088C>T",
            "most_severe_consequence": "missense_variant",
            "colocated_variants": [{ "clin_sig": ["pathogenic"], "pubmed": "1,2,3" }],
            "transcript_consequences": [{
                "gene_symbol": "TP53",
                "hgvsp": "ENSP00000269305.4:p.Arg175His",
                "impact": "MODERATE",
                "cadd_phred": 28.7,
                "revel": 0.931,
                "sift_score": 0.0,
                "gnomad_exomes_controls_af": 3.98e-6,
                "go": ["a", "b", "c"],
                "phenotypes": [{ "phenotype": "Li-Fraumeni | LFS" }]
            }]
        })])
    }

    fn narrow() -> DisplayConfig {
        DisplayConfig { max_phenotypes: 15, max_publications: 2, max_go_terms: 1 }
    }

    #[test]
    fn test_build_from_empty_payload_is_no_data() {
        let err = VariantReport::build("x", RawAnnotationPayload::default(), &Thresholds::default())
            .unwrap_err();
        assert!(matches!(err, MutantscopeError::NoData(_)));
    }

    #[test]
    fn test_markdown_sections_in_order() {
        let report = VariantReport::build("q", payload(), &Thresholds::default()).unwrap();
        let md = report.render_markdown(&DisplayConfig::default());
        let headers = [
            "## Gene", "## Variant", "## Protein", "## Consequence/Impact",
            "## Predictor scores", "## Population frequencies", "## Conservation",
            "## Evidence table", "## Aggregate counts", "## Literature",
        ];
        let mut last = 0;
        for h in headers {
            let pos = md.find(h).unwrap_or_else(|| panic!("missing {}", h));
            assert!(pos >= last, "{} out of order", h);
            last = pos;
        }
        assert!(md.contains("| Controls | 3.98e-6 | — |"));
        assert!(md.contains("- **Change:** p.R175H"));
        assert!(md.contains("- **Pathogenic:** 4"));
        assert!(md.contains("- **Uncertain:** 1"));
    }

    #[test]
    fn test_lists_are_truncated() {
        let report = VariantReport::build("q", payload(), &Thresholds::default()).unwrap();
        let text = report.render_text(&narrow());
        assert!(text.contains("... and 2 more"));
        assert!(text.contains("... and 1 more"));
        assert!(text.contains("https://pubmed.ncbi.nlm.nih.gov/2/"));
        assert!(!text.contains("https://pubmed.ncbi.nlm.nih.gov/3/"));
    }

    #[test]
    fn test_table_cells_escape_pipes() {
        assert_eq!(cell("a|b\nc"), "a\\|b c");
    }

    #[test]
    fn test_raw_json_is_verbatim() {
        let report = VariantReport::build("q", payload(), &Thresholds::default()).unwrap();
        let round: serde_json::Value = serde_json::from_str(&report.raw_json().unwrap()).unwrap();
        assert_eq!(round, serde_json::to_value(&payload()).unwrap());
    }

    #[test]
    fn test_variant_key_falls_back_to_query() {
        let raw = RawAnnotationPayload::new(vec![json!({ "transcript_consequences": [] })]);
        let report = VariantReport::build(" rs28934578 ", raw, &Thresholds::default()).unwrap();
        assert_eq!(report.variant_key(), "rs28934578");
        assert_eq!(report.badge, Badge::NoData);
    }
}
