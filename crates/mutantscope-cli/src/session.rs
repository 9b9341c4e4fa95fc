//! Interactive session state: thresholds, the last report, and bookmarks.
//!
//! Bookmarks live for the process only. They are keyed by the canonical
//! variant identifier and re-bookmarking replaces the entry in place.

use chrono::{DateTime, Utc};
use mutantscope_common::{MutantscopeError, Result};
use mutantscope_ranker::Thresholds;

use crate::report::VariantReport;

#[derive(Debug, Clone, PartialEq)]
pub struct Bookmark {
    pub key: String,
    /// Badge at the time of bookmarking.
    pub label: String,
    pub gene: Option<String>,
    pub note: Option<String>,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct Session {
    pub thresholds: Thresholds,
    last: Option<VariantReport>,
    bookmarks: Vec<Bookmark>,
}

impl Session {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds, last: None, bookmarks: Vec::new() }
    }

    pub fn set_report(&mut self, report: VariantReport) {
        self.last = Some(report);
    }

    pub fn last_report(&self) -> Option<&VariantReport> {
        self.last.as_ref()
    }

    /// Change one threshold and re-aggregate the current report with it.
    pub fn set_threshold(&mut self, name: &str, raw: &str) -> Result<()> {
        self.thresholds.set(name, raw)?;
        if let Some(report) = self.last.as_mut() {
            report.reassess(&self.thresholds);
        }
        Ok(())
    }

    /// Bookmark the current report. Last write wins per variant.
    pub fn bookmark(&mut self, note: Option<String>) -> Result<&Bookmark> {
        let report = self.last.as_ref().ok_or_else(|| {
            MutantscopeError::InvalidInput("Nothing to bookmark; look up a variant first.".to_string())
        })?;

        let entry = Bookmark {
            key: report.variant_key().to_string(),
            label: report.badge.to_string(),
            gene: report.summary.gene.clone(),
            note: note.filter(|n| !n.trim().is_empty()),
            saved_at: Utc::now(),
        };

        let idx = match self.bookmarks.iter().position(|b| b.key == entry.key) {
            Some(i) => {
                self.bookmarks[i] = entry;
                i
            }
            None => {
                self.bookmarks.push(entry);
                self.bookmarks.len() - 1
            }
        };
        Ok(&self.bookmarks[idx])
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }
}
