//! mutantscope-common — Shared variant types, errors, and the HTTP client used across all MutantScope crates.

pub mod error;
pub mod variant;
pub mod sandbox;

// Re-export commonly used types
pub use error::{MutantscopeError, Result};
pub use variant::{
    AlleleFrequency, ConservationScores, PopulationFrequencies, PredictorCall,
    RawAnnotationPayload, VariantSummary,
};
