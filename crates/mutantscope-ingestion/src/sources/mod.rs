//! Remote source clients.

pub mod vep;
pub mod pubmed;

use async_trait::async_trait;
use mutantscope_common::{RawAnnotationPayload, Result};

use crate::models::{ArticleMetadata, ArticleRef};

/// Common interface for variant annotation services.
#[async_trait]
pub trait AnnotationSource: Send + Sync {
    /// Fetch the raw annotation payload for an HGVS identifier.
    ///
    /// Transport failures and non-2xx responses are reported as distinct errors.
    async fn fetch(&self, hgvs: &str, species: &str) -> Result<RawAnnotationPayload>;
}

/// Common interface for literature metadata lookups.
///
/// Best effort: any failure is `None`, never an error.
#[async_trait]
pub trait LiteratureSource: Send + Sync {
    async fn fetch_article(&self, pmid: &str) -> Option<ArticleMetadata>;
}

/// Resolve up to `max` publication ids, one request at a time.
/// Ids past `max`, and ids whose lookup fails, become bare links.
pub async fn resolve_articles(
    source: &dyn LiteratureSource,
    pmids: &[String],
    max: usize,
) -> Vec<ArticleRef> {
    let mut refs = Vec::with_capacity(pmids.len());
    for (i, pmid) in pmids.iter().enumerate() {
        let resolved = if i < max { source.fetch_article(pmid).await } else { None };
        refs.push(match resolved {
            Some(meta) => ArticleRef::with_metadata(meta),
            None => ArticleRef::link_only(pmid),
        });
    }
    refs
}
