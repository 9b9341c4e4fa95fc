//! Fetch → normalise → aggregate → report, one variant at a time.

use mutantscope_common::{MutantscopeError, Result};
use mutantscope_ingestion::sources::pubmed::PubMedClient;
use mutantscope_ingestion::sources::vep::VepClient;
use mutantscope_ingestion::sources::{resolve_articles, AnnotationSource, LiteratureSource};
use mutantscope_ranker::Thresholds;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::report::{one_line, VariantReport};

pub struct Pipeline {
    annotation: Box<dyn AnnotationSource>,
    literature: Option<Box<dyn LiteratureSource>>,
    species: String,
    max_articles: usize,
}

/// Result for one batch line; failures are kept, not fatal.
pub struct BatchOutcome {
    pub query: String,
    pub result: Result<VariantReport>,
}

impl Pipeline {
    pub fn new(
        annotation: Box<dyn AnnotationSource>,
        literature: Option<Box<dyn LiteratureSource>>,
        species: &str,
        max_articles: usize,
    ) -> Self {
        Self { annotation, literature, species: species.to_string(), max_articles }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let vep = VepClient::new(&config.vep.base_url, config.vep.timeout())?
            .with_extra_params(config.vep.extra_params.clone());

        let literature: Option<Box<dyn LiteratureSource>> = if config.literature.enabled {
            let client = PubMedClient::new(
                config.literature.resolved_api_key(),
                config.literature.timeout(),
            )?;
            Some(Box::new(client))
        } else {
            None
        };

        Ok(Self::new(
            Box::new(vep),
            literature,
            &config.vep.species,
            config.literature.max_articles,
        ))
    }

    #[instrument(skip(self, thresholds))]
    pub async fn lookup(
        &self,
        hgvs: &str,
        thresholds: &Thresholds,
        with_articles: bool,
    ) -> Result<VariantReport> {
        let raw = self.annotation.fetch(hgvs, &self.species).await?;
        let mut report = VariantReport::build(hgvs, raw, thresholds)?;
        if with_articles {
            self.resolve_literature(&mut report).await;
        }
        info!(variant = report.variant_key(), badge = %report.badge, "Lookup complete");
        Ok(report)
    }

    /// Attach article metadata where the literature source can supply it.
    pub async fn resolve_literature(&self, report: &mut VariantReport) {
        match &self.literature {
            Some(source) => {
                report.articles =
                    resolve_articles(source.as_ref(), &report.summary.pubmed_ids, self.max_articles).await;
            }
            None => debug!("Literature lookups disabled"),
        }
    }

    /// Look up each query in order. A failure is logged and recorded; the batch continues.
    pub async fn run_batch(&self, queries: &[String], thresholds: &Thresholds) -> Vec<BatchOutcome> {
        let mut outcomes = Vec::with_capacity(queries.len());
        for (i, query) in queries.iter().enumerate() {
            info!(line = i + 1, total = queries.len(), %query, "Batch lookup");
            let result = self.lookup(query, thresholds, false).await;
            if let Err(e) = &result {
                warn!(%query, error = %e, "Batch lookup failed");
            }
            outcomes.push(BatchOutcome { query: query.clone(), result });
        }
        outcomes
    }
}

/// HGVS queries from a batch file: one per line, blank lines and `#` comments skipped.
pub fn batch_queries(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect()
}

/// One line per variant, failures included.
pub fn batch_table(outcomes: &[BatchOutcome]) -> String {
    let ok = outcomes.iter().filter(|o| o.result.is_ok()).count();
    let mut lines: Vec<String> = outcomes
        .iter()
        .map(|o| match &o.result {
            Ok(report) => one_line(report),
            Err(e) => format!("{:<32} error: {}", o.query, describe(e)),
        })
        .collect();
    lines.push(format!("{} of {} variants annotated", ok, outcomes.len()));
    lines.join("\n")
}

/// User-facing wording for pipeline errors.
pub fn describe(e: &MutantscopeError) -> String {
    match e {
        MutantscopeError::NoData(_) => "no annotation returned for this variant".to_string(),
        other => other.to_string(),
    }
}
