//! PubMed E-utilities client.
//!
//! Endpoint used:
//!   efetch: https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi
//!
//! Lookups are best effort. Any transport, status or parse failure is logged
//! and reported as `None` so the caller falls back to a bare link.

use std::time::Duration;

use async_trait::async_trait;
use mutantscope_common::sandbox::SandboxClient;
use mutantscope_common::Result;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, instrument, warn};

use super::LiteratureSource;
use crate::models::{pubmed_url, ArticleMetadata};

const EFETCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct PubMedClient {
    client: SandboxClient,
    api_key: Option<String>,
}

impl PubMedClient {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: SandboxClient::with_timeout(timeout)?,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    async fn efetch(&self, pmid: &str) -> std::result::Result<String, String> {
        let mut params = vec![
            ("db", "pubmed".to_string()),
            ("id", pmid.to_string()),
            ("rettype", "abstract".to_string()),
            ("retmode", "xml".to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }

        let resp = self.client
            .get(EFETCH_URL)
            .map_err(|e| e.to_string())?
            .query(&params)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = resp.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }
        resp.text().await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl LiteratureSource for PubMedClient {
    #[instrument(skip(self))]
    async fn fetch_article(&self, pmid: &str) -> Option<ArticleMetadata> {
        let pmid = pmid.trim();
        if pmid.is_empty() || !pmid.chars().all(|c| c.is_ascii_digit()) {
            debug!("Not a PubMed id, keeping the bare link");
            return None;
        }

        let xml = match self.efetch(pmid).await {
            Ok(xml) => xml,
            Err(e) => {
                warn!(error = %e, "PubMed efetch failed");
                return None;
            }
        };

        let meta = parse_efetch_xml(&xml);
        if meta.is_none() {
            warn!("PubMed efetch returned no usable article");
        }
        meta
    }
}

/// Parse an efetch (abstract mode) document for a single article.
///
/// Only the first `PubmedArticle` is read. Its first `PMID` is the article id
/// (later ones belong to comments and corrections). Abstract sections are
/// joined with a blank line. An article without a title is rejected.
pub fn parse_efetch_xml(xml: &str) -> Option<ArticleMetadata> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pmid: Option<String> = None;
    let mut title = String::new();
    let mut sections: Vec<String> = Vec::new();
    let mut date = PubDate::default();

    let mut in_article   = false;
    let mut in_pmid      = false;
    let mut in_title     = false;
    let mut in_abstract  = false;
    let mut in_pub_date  = false;
    let mut date_part: Option<DatePart> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"PubmedArticle" => in_article = true,
                b"PMID" if in_article && pmid.is_none() => in_pmid = true,
                b"ArticleTitle" => in_title = true,
                b"AbstractText" => {
                    in_abstract = true;
                    sections.push(String::new());
                }
                b"PubDate" => in_pub_date = true,
                b"Year" if in_pub_date => date_part = Some(DatePart::Year),
                b"Month" if in_pub_date => date_part = Some(DatePart::Month),
                b"Day" if in_pub_date => date_part = Some(DatePart::Day),
                b"MedlineDate" if in_pub_date => date_part = Some(DatePart::Medline),
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if !in_article {
                    buf.clear();
                    continue;
                }
                let text = e.unescape().unwrap_or_default().to_string();
                if in_pmid {
                    pmid = Some(text.clone());
                }
                if in_title {
                    push_inline(&mut title, &text);
                }
                if in_abstract {
                    if let Some(section) = sections.last_mut() {
                        push_inline(section, &text);
                    }
                }
                if let Some(part) = date_part {
                    date.set(part, text);
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"PMID" => in_pmid = false,
                b"ArticleTitle" => in_title = false,
                b"AbstractText" => in_abstract = false,
                b"PubDate" => in_pub_date = false,
                b"Year" | b"Month" | b"Day" | b"MedlineDate" => date_part = None,
                b"PubmedArticle" => break,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!("XML parse error: {}", e);
                return None;
            }
            _ => {}
        }
        buf.clear();
    }

    let pmid = pmid?;
    let title = title.trim().to_string();
    if title.is_empty() {
        return None;
    }
    let abstract_text = sections
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    Some(ArticleMetadata {
        url: pubmed_url(&pmid),
        pmid,
        title,
        abstract_text: (!abstract_text.is_empty()).then_some(abstract_text),
        publication_date: date.render(),
    })
}

/// Inline markup (`<i>`, `<sup>`) splits text into several events.
fn push_inline(target: &mut String, text: &str) {
    if !target.is_empty() && !text.starts_with(|c: char| c.is_ascii_punctuation()) {
        target.push(' ');
    }
    target.push_str(text);
}

#[derive(Debug, Clone, Copy)]
enum DatePart {
    Year,
    Month,
    Day,
    Medline,
}

#[derive(Debug, Default)]
struct PubDate {
    year: Option<String>,
    month: Option<String>,
    day: Option<String>,
    medline: Option<String>,
}

impl PubDate {
    fn set(&mut self, part: DatePart, text: String) {
        let slot = match part {
            DatePart::Year => &mut self.year,
            DatePart::Month => &mut self.month,
            DatePart::Day => &mut self.day,
            DatePart::Medline => &mut self.medline,
        };
        *slot = Some(text);
    }

    /// "2001 Mar 15", "2001 Mar", "2001", or the free-text MedlineDate.
    fn render(self) -> Option<String> {
        match self.year {
            Some(year) => {
                let parts: Vec<String> = [Some(year), self.month, self.day]
                    .into_iter()
                    .flatten()
                    .collect();
                Some(parts.join(" "))
            }
            None => self.medline,
        }
    }
}
