//! Evidence rows and their vote tally.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::badge::{classify, Badge};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Assessment {
    Pathogenic,
    Uncertain,
    Benign,
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Assessment::Pathogenic => "Pathogenic",
            Assessment::Uncertain  => "Uncertain",
            Assessment::Benign     => "Benign",
        };
        f.write_str(s)
    }
}

/// One consulted source's vote with its justification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRow {
    pub source: String,
    /// Raw value as displayed, e.g. "deleterious (0.01)".
    pub value: String,
    pub interpretation: String,
    pub assessment: Assessment,
}

impl EvidenceRow {
    pub fn new(
        source: impl Into<String>,
        value: impl Into<String>,
        interpretation: impl Into<String>,
        assessment: Assessment,
    ) -> Self {
        Self {
            source: source.into(),
            value: value.into(),
            interpretation: interpretation.into(),
            assessment,
        }
    }
}

/// Rows in consultation order plus one counter per assessment.
///
/// Rows are only added through [`EvidenceTally::push`], so the three counts
/// always sum to the number of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceTally {
    pathogenic: u32,
    uncertain: u32,
    benign: u32,
    rows: Vec<EvidenceRow>,
}

impl EvidenceTally {
    pub fn push(&mut self, row: EvidenceRow) {
        match row.assessment {
            Assessment::Pathogenic => self.pathogenic += 1,
            Assessment::Uncertain  => self.uncertain += 1,
            Assessment::Benign     => self.benign += 1,
        }
        self.rows.push(row);
    }

    pub fn pathogenic(&self) -> u32 { self.pathogenic }
    pub fn uncertain(&self) -> u32 { self.uncertain }
    pub fn benign(&self) -> u32 { self.benign }

    pub fn counts(&self) -> (u32, u32, u32) {
        (self.pathogenic, self.uncertain, self.benign)
    }

    pub fn rows(&self) -> &[EvidenceRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn badge(&self) -> Badge {
        classify(self.pathogenic, self.uncertain, self.benign)
    }
}
