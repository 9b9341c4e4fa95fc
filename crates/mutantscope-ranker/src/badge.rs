//! Qualitative label for an evidence tally.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Badge {
    NoData,
    LikelyPathogenic,
    LikelyBenign,
    UncertainSignificance,
    ConflictingEvidence,
    LeaningPathogenic,
}

impl Badge {
    pub fn label(&self) -> &'static str {
        match self {
            Badge::NoData                => "no data available",
            Badge::LikelyPathogenic      => "likely pathogenic",
            Badge::LikelyBenign          => "likely benign",
            Badge::UncertainSignificance => "uncertain significance",
            Badge::ConflictingEvidence   => "conflicting evidence",
            Badge::LeaningPathogenic     => "uncertain — leaning pathogenic",
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map pathogenic / uncertain / benign counts to a badge.
///
/// Checks run in this order: no votes, pathogenic majority, benign
/// majority, uncertain at least as large as both, pathogenic tied with
/// benign. The last arm keeps the function total.
pub fn classify(pathogenic: u32, uncertain: u32, benign: u32) -> Badge {
    let total = pathogenic as u64 + uncertain as u64 + benign as u64;
    if total == 0 {
        Badge::NoData
    } else if pathogenic > uncertain && pathogenic > benign {
        Badge::LikelyPathogenic
    } else if benign > pathogenic && benign > uncertain {
        Badge::LikelyBenign
    } else if uncertain >= pathogenic && uncertain >= benign {
        Badge::UncertainSignificance
    } else if pathogenic == benign {
        Badge::ConflictingEvidence
    } else {
        Badge::LeaningPathogenic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_triples() {
        assert_eq!(classify(3, 0, 0).label(), "likely pathogenic");
        assert_eq!(classify(0, 0, 3).label(), "likely benign");
        assert_eq!(classify(1, 1, 1).label(), "uncertain significance");
        assert_eq!(classify(2, 1, 2).label(), "conflicting evidence");
        assert_eq!(classify(0, 0, 0).label(), "no data available");
    }

    #[test]
    fn test_uncertain_tie_beats_pathogenic() {
        assert_eq!(classify(2, 2, 0), Badge::UncertainSignificance);
        assert_eq!(classify(0, 2, 2), Badge::UncertainSignificance);
    }

    #[test]
    fn test_total_and_deterministic_over_small_grid() {
        for p in 0..6 {
            for u in 0..6 {
                for b in 0..6 {
                    let first = classify(p, u, b);
                    assert_eq!(first, classify(p, u, b));
                    assert_eq!(first == Badge::NoData, p + u + b == 0);
                }
            }
        }
    }

    #[test]
    fn test_large_counts_do_not_overflow() {
        assert_eq!(classify(u32::MAX, u32::MAX, 0), Badge::UncertainSignificance);
    }
}
