//! Named numeric cutoffs consumed by the aggregator.
//!
//! Created once per session, changed only by explicit user input, and passed
//! by reference into every aggregation call. Every cutoff must be finite,
//! whether it comes from `set` or a deserialized config: anything else is
//! rejected with the offending name and text, never replaced by the default.

use mutantscope_common::{MutantscopeError, Result};
use serde::{Deserialize, Serialize};

fn default_af_ceiling() -> f64 { 1e-5 }
fn default_cadd_cutoff() -> f64 { 20.0 }
fn default_revel_suggestive() -> f64 { 0.5 }
fn default_revel_strong() -> f64 { 0.75 }
fn default_sift_deleterious() -> f64 { 0.05 }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Allele-frequency ceiling consistent with a severe disease phenotype.
    #[serde(default = "default_af_ceiling")]
    pub af_ceiling: f64,
    /// CADD PHRED score at which a variant is treated as concerning.
    #[serde(default = "default_cadd_cutoff")]
    pub cadd_cutoff: f64,
    #[serde(default = "default_revel_suggestive")]
    pub revel_suggestive: f64,
    #[serde(default = "default_revel_strong")]
    pub revel_strong: f64,
    /// SIFT scores below this are deleterious.
    #[serde(default = "default_sift_deleterious")]
    pub sift_deleterious: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            af_ceiling:       default_af_ceiling(),
            cadd_cutoff:      default_cadd_cutoff(),
            revel_suggestive: default_revel_suggestive(),
            revel_strong:     default_revel_strong(),
            sift_deleterious: default_sift_deleterious(),
        }
    }
}

impl Thresholds {
    /// Threshold names accepted by [`Thresholds::set`], in display order.
    pub const NAMES: [&'static str; 5] = [
        "af_ceiling",
        "cadd_cutoff",
        "revel_suggestive",
        "revel_strong",
        "sift_deleterious",
    ];

    fn slot(&mut self, name: &str) -> Option<&mut f64> {
        match name {
            "af_ceiling"       => Some(&mut self.af_ceiling),
            "cadd_cutoff"      => Some(&mut self.cadd_cutoff),
            "revel_suggestive" => Some(&mut self.revel_suggestive),
            "revel_strong"     => Some(&mut self.revel_strong),
            "sift_deleterious" => Some(&mut self.sift_deleterious),
            _ => None,
        }
    }

    /// Parse `raw` and store it under `name`. On error nothing changes.
    pub fn set(&mut self, name: &str, raw: &str) -> Result<()> {
        let name = name.trim();
        let slot = self
            .slot(name)
            .ok_or_else(|| MutantscopeError::UnknownThreshold(name.to_string()))?;
        let parsed = raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| MutantscopeError::InvalidThreshold {
                name: name.to_string(),
                value: raw.to_string(),
            })?;
        *slot = parsed;
        Ok(())
    }

    /// Apply a `name=value` assignment, as given on the command line.
    pub fn apply(&mut self, assignment: &str) -> Result<()> {
        let (name, raw) = assignment.split_once('=').ok_or_else(|| {
            MutantscopeError::InvalidInput(format!(
                "Expected name=value, got '{}'",
                assignment
            ))
        })?;
        self.set(name, raw)
    }

    /// Reject non-finite cutoffs that arrived without going through [`Thresholds::set`],
    /// e.g. `nan` or `inf` float literals in a config file.
    pub fn validate(&self) -> Result<()> {
        match self.entries().into_iter().find(|(_, v)| !v.is_finite()) {
            Some((name, value)) => Err(MutantscopeError::InvalidThreshold {
                name: name.to_string(),
                value: value.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// (name, value) pairs in display order.
    pub fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("af_ceiling",       self.af_ceiling),
            ("cadd_cutoff",      self.cadd_cutoff),
            ("revel_suggestive", self.revel_suggestive),
            ("revel_strong",     self.revel_strong),
            ("sift_deleterious", self.sift_deleterious),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let t = Thresholds::default();
        assert_eq!(t.af_ceiling, 1e-5);
        assert_eq!(t.cadd_cutoff, 20.0);
        assert_eq!(t.revel_suggestive, 0.5);
        assert_eq!(t.revel_strong, 0.75);
        assert_eq!(t.sift_deleterious, 0.05);
    }

    #[test]
    fn test_set_parses_numbers() {
        let mut t = Thresholds::default();
        t.set("af_ceiling", " 1e-4 ").unwrap();
        assert_eq!(t.af_ceiling, 1e-4);
        t.apply("cadd_cutoff=25").unwrap();
        assert_eq!(t.cadd_cutoff, 25.0);
    }

    #[test]
    fn test_invalid_value_fails_visibly_and_keeps_old_value() {
        let mut t = Thresholds::default();
        let err = t.set("revel_strong", "high").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value for threshold 'revel_strong': 'high' is not a number"
        );
        assert!(t.set("revel_strong", "NaN").is_err());
        assert!(t.set("revel_strong", "inf").is_err());
        assert_eq!(t.revel_strong, 0.75);
    }

    #[test]
    fn test_validate_rejects_non_finite_fields() {
        assert!(Thresholds::default().validate().is_ok());
        let t = Thresholds { revel_strong: f64::NAN, ..Default::default() };
        assert!(matches!(
            t.validate(),
            Err(MutantscopeError::InvalidThreshold { ref name, .. }) if name == "revel_strong"
        ));
        let t = Thresholds { sift_deleterious: f64::NEG_INFINITY, ..Default::default() };
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_unknown_name() {
        let mut t = Thresholds::default();
        assert!(matches!(
            t.set("gerp_cutoff", "2"),
            Err(MutantscopeError::UnknownThreshold(_))
        ));
        assert!(matches!(t.apply("cadd_cutoff"), Err(MutantscopeError::InvalidInput(_))));
    }
}
