//! mutantscope-ranker — rule-based evidence aggregation.
//!
//! Per-source votes (Pathogenic / Uncertain / Benign) are counted, never
//! summed into a weighted score; the counts map to a qualitative badge.

pub mod aggregate;
pub mod badge;
pub mod evidence;
pub mod hints;
pub mod interpret;
pub mod thresholds;

pub use aggregate::aggregate;
pub use badge::{classify, Badge};
pub use evidence::{Assessment, EvidenceRow, EvidenceTally};
pub use hints::{heuristic_hints, Hint, HintKind};
pub use thresholds::Thresholds;
