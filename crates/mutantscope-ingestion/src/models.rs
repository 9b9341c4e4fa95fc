//! Data models for literature lookups.

use serde::{Deserialize, Serialize};

const PUBMED_ARTICLE_URL: &str = "https://pubmed.ncbi.nlm.nih.gov";

/// Canonical PubMed landing page for an identifier.
pub fn pubmed_url(pmid: &str) -> String {
    format!("{}/{}/", PUBMED_ARTICLE_URL, pmid.trim())
}

/// Title, abstract and date for one publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleMetadata {
    pub pmid: String,
    pub title: String,
    pub abstract_text: Option<String>,
    /// As printed by PubMed, e.g. "2019 Mar 14" or "2019 Mar-Apr".
    pub publication_date: Option<String>,
    pub url: String,
}

/// A publication reference as shown to the user: always a link, metadata when available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRef {
    pub pmid: String,
    pub url: String,
    pub metadata: Option<ArticleMetadata>,
}

impl ArticleRef {
    pub fn link_only(pmid: &str) -> Self {
        Self { pmid: pmid.to_string(), url: pubmed_url(pmid), metadata: None }
    }

    pub fn with_metadata(metadata: ArticleMetadata) -> Self {
        Self { pmid: metadata.pmid.clone(), url: metadata.url.clone(), metadata: Some(metadata) }
    }
}
