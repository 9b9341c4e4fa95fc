//! mutantscope-ingestion — Fetches VEP annotation payloads and literature
//! metadata, and normalises payloads into `VariantSummary` records.

pub mod models;
pub mod normalise;
pub mod sources;

pub use normalise::{normalise_payload, normalise_record};
