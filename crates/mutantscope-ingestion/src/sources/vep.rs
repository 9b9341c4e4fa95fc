//! Ensembl VEP REST client.
//!
//! Endpoint: {base_url}/vep/{species}/hgvs/{notation}
//!
//! Every request carries the plugin/flag table below so that predictor,
//! population, conservation and phenotype fields are present in the payload.

use std::time::Duration;

use async_trait::async_trait;
use mutantscope_common::sandbox::SandboxClient;
use mutantscope_common::{MutantscopeError, RawAnnotationPayload, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use super::AnnotationSource;

pub const DEFAULT_BASE_URL: &str = "https://rest.ensembl.org";

/// Plugins and core flags requested on every lookup.
pub const PLUGIN_PARAMETERS: &[(&str, &str)] = &[
    ("AlphaMissense", "1"),
    ("AncestralAllele", "1"),
    ("Blosum62", "1"),
    ("CADD", "1"),
    ("ClinPred", "1"),
    ("Conservation", "1"),
    ("DosageSensitivity", "1"),
    ("EVE", "1"),
    ("Enformer", "1"),
    ("GO", "1"),
    ("GeneSplicer", "1"),
    ("Geno2MP", "1"),
    ("IntAct", "1"),
    ("LOEUF", "1"),
    ("LoF", "1"),
    ("MaveDB", "1"),
    ("MaxEntScan", "1"),
    ("NMD", "1"),
    ("OpenTargets", "1"),
    ("Phenotypes", "1"),
    ("REVEL", "1"),
    ("RiboseqORFs", "1"),
    ("SpliceAI", "2"),
    ("UTRAnnotator", "1"),
    // core flags / fields
    ("ambiguous_hgvs", "1"),
    ("appris", "1"),
    ("canonical", "1"),
    ("ccds", "1"),
    ("dbNSFP", "ALL"),
    ("dbscSNV", "1"),
    ("domains", "1"),
    ("failed", "1"),
    ("flag_pick", "1"),
    ("flag_pick_allele", "1"),
    ("flag_pick_allele_gene", "1"),
    ("ga4gh_vrs", "1"),
    ("gencode_basic", "0"),
    ("gencode_primary", "1"),
    ("hgvs", "1"),
    ("mane", "1"),
    ("merged", "1"),
    ("minimal", "1"),
    ("mirna", "1"),
    ("mutfunc", "1"),
    ("numbers", "1"),
    ("per_gene", "1"),
    ("pick", "1"),
    ("pick_allele", "1"),
    ("pick_allele_gene", "1"),
    ("protein", "1"),
    ("shift_3prime", "1"),
    ("shift_genomic", "1"),
    ("transcript_version", "1"),
    ("tsl", "1"),
    ("uniprot", "1"),
    ("variant_class", "1"),
    ("vcf_string", "1"),
    ("xref_refseq", "1"),
];

pub struct VepClient {
    client: SandboxClient,
    base_url: String,
    extra_params: Vec<(String, String)>,
}

impl VepClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut client = SandboxClient::with_timeout(timeout)?;
        client.allow_url_host(base_url)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            extra_params: Vec::new(),
        })
    }

    /// Additional query parameters; a key already in the plugin table is overridden.
    pub fn with_extra_params<I>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.extra_params.extend(params);
        self
    }

    fn query_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = PLUGIN_PARAMETERS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for (key, value) in &self.extra_params {
            match params.iter_mut().find(|(k, _)| k == key) {
                Some(slot) => slot.1 = value.clone(),
                None => params.push((key.clone(), value.clone())),
            }
        }
        params
    }

    /// Request URL with the notation and species percent-encoded as path segments.
    pub fn build_url(&self, hgvs: &str, species: &str) -> Result<Url> {
        let hgvs = hgvs.trim();
        let species = species.trim();
        if hgvs.is_empty() {
            return Err(MutantscopeError::InvalidInput("HGVS notation is required.".to_string()));
        }
        if species.is_empty() {
            return Err(MutantscopeError::InvalidInput("Species is required.".to_string()));
        }

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| MutantscopeError::Config(format!("Invalid VEP base URL '{}': {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| MutantscopeError::Config(format!("VEP base URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["vep", species, "hgvs", hgvs]);
        url.query_pairs_mut().extend_pairs(self.query_params().iter());
        Ok(url)
    }
}

/// Accept only a top-level JSON array of records.
pub fn payload_from_value(value: Value) -> Result<RawAnnotationPayload> {
    match value {
        Value::Array(records) => Ok(RawAnnotationPayload::new(records)),
        _ => Err(MutantscopeError::UnexpectedPayload(
            "Unexpected VEP response format.".to_string(),
        )),
    }
}

/// Decode a response body received in full.
pub fn payload_from_body(body: &[u8]) -> Result<RawAnnotationPayload> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        MutantscopeError::UnexpectedPayload(format!("VEP response is not JSON: {}", e))
    })?;
    payload_from_value(value)
}

#[async_trait]
impl AnnotationSource for VepClient {
    #[instrument(skip(self))]
    async fn fetch(&self, hgvs: &str, species: &str) -> Result<RawAnnotationPayload> {
        let url = self.build_url(hgvs, species)?;

        let resp = self.client
            .get(url.as_str())?
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "VEP request failed");
                MutantscopeError::Transport(e.to_string())
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let body = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("no reason given").to_string()
            } else {
                body
            };
            warn!(status = status.as_u16(), "VEP returned an error status");
            return Err(MutantscopeError::Upstream { status: status.as_u16(), body });
        }

        // A body cut off mid-read is a transport failure, not a bad payload.
        let body = resp.bytes().await.map_err(|e| {
            warn!(error = %e, "VEP response body could not be read");
            MutantscopeError::Transport(e.to_string())
        })?;

        let payload = payload_from_body(&body)?;
        debug!(records = payload.len(), "VEP returned records");
        Ok(payload)
    }
}
