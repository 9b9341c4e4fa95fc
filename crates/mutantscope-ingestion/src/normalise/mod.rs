//! Payload normalisation.
//!
//! - `fields`: accessor-key table and first-match-wins helpers
//! - `hgvs`: protein HGVS parsing and the protein-position fallback
//! - `vep`: VEP record → `VariantSummary`

pub mod fields;
pub mod hgvs;
pub mod vep;

pub use hgvs::{parse_protein_change, protein_position, ProteinChange};
pub use vep::{normalise_payload, normalise_record};
