//! Protein HGVS parsing.
//!
//! Parses the protein part of VEP's `hgvsp` strings (e.g.
//! "ENSP00000269305.4:p.Arg175His", "p.(R175H)", "p.Val600%3D") into a
//! position with reference and alternate residues, and provides the
//! protein-position fallback used when no explicit coordinate is present.
//!
//! # Example
//! ```ignore
//! let c = parse_protein_change("ENSP00000269305.4:p.Arg175His").unwrap();
//! assert_eq!(c.position, 175);
//! assert_eq!(c.short_form(), "p.R175H");
//! ```

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Single-letter → three-letter amino acid map.
fn aa1_to_aa3(aa: &str) -> Option<&'static str> {
    match aa.to_uppercase().as_str() {
        "A" => Some("Ala"), "C" => Some("Cys"), "D" => Some("Asp"),
        "E" => Some("Glu"), "F" => Some("Phe"), "G" => Some("Gly"),
        "H" => Some("His"), "I" => Some("Ile"), "K" => Some("Lys"),
        "L" => Some("Leu"), "M" => Some("Met"), "N" => Some("Asn"),
        "P" => Some("Pro"), "Q" => Some("Gln"), "R" => Some("Arg"),
        "S" => Some("Ser"), "T" => Some("Thr"), "V" => Some("Val"),
        "W" => Some("Trp"), "Y" => Some("Tyr"), "*" => Some("Ter"),
        _ => None,
    }
}

/// Three-letter (any case) → canonical three-letter and one-letter forms.
fn aa3_canonical(aa: &str) -> Option<(&'static str, char)> {
    match aa.to_lowercase().as_str() {
        "ala" => Some(("Ala", 'A')), "cys" => Some(("Cys", 'C')), "asp" => Some(("Asp", 'D')),
        "glu" => Some(("Glu", 'E')), "phe" => Some(("Phe", 'F')), "gly" => Some(("Gly", 'G')),
        "his" => Some(("His", 'H')), "ile" => Some(("Ile", 'I')), "lys" => Some(("Lys", 'K')),
        "leu" => Some(("Leu", 'L')), "met" => Some(("Met", 'M')), "asn" => Some(("Asn", 'N')),
        "pro" => Some(("Pro", 'P')), "gln" => Some(("Gln", 'Q')), "arg" => Some(("Arg", 'R')),
        "ser" => Some(("Ser", 'S')), "thr" => Some(("Thr", 'T')), "val" => Some(("Val", 'V')),
        "trp" => Some(("Trp", 'W')), "tyr" => Some(("Tyr", 'Y')), "ter" => Some(("Ter", '*')),
        "sec" => Some(("Sec", 'U')),
        _ => None,
    }
}

fn resolve_residue(raw: &str) -> Option<(&'static str, char)> {
    if raw.len() == 1 {
        aa1_to_aa3(raw).and_then(aa3_canonical)
    } else {
        aa3_canonical(raw)
    }
}

/// A parsed single-residue protein change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProteinChange {
    pub position: u32,
    /// Reference residue, three-letter, e.g. "Arg".
    pub ref_aa: String,
    /// Alternate residue, three-letter. Equal to `ref_aa` for synonymous changes.
    pub alt_aa: String,
    ref_1: char,
    alt_1: char,
}

impl ProteinChange {
    /// One-letter display form, e.g. "p.R175H".
    pub fn short_form(&self) -> String {
        format!("p.{}{}{}", self.ref_1, self.position, self.alt_1)
    }

    /// Three-letter form, e.g. "p.Arg175His".
    pub fn long_form(&self) -> String {
        format!("p.{}{}{}", self.ref_aa, self.position, self.alt_aa)
    }

    pub fn is_synonymous(&self) -> bool {
        self.ref_aa == self.alt_aa
    }
}

/// The protein part of an `hgvsp` string: everything after "p.", with the
/// URL-encoded "=" VEP emits decoded. Strings without "p." are used whole.
fn protein_part(hgvsp: &str) -> String {
    let decoded = hgvsp.trim().replace("%3D", "=");
    match decoded.split_once("p.") {
        Some((_, rest)) => rest.to_string(),
        None => decoded,
    }
}

fn change_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Arg175His, R175H, (Arg175His), Val600=, Arg213*, Gly12fs...
    RE.get_or_init(|| {
        Regex::new(r"^\(?([A-Z][a-z]{2}|[A-Z*])(\d+)([A-Z][a-z]{2}|[A-Z*=])")
            .expect("static regex")
    })
}

fn digits_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("static regex"))
}

/// Parse a protein HGVS string into a single-residue change.
/// Returns `None` for anything that is not ref-position-alt shaped.
pub fn parse_protein_change(hgvsp: &str) -> Option<ProteinChange> {
    let part = protein_part(hgvsp);
    let caps = change_regex().captures(&part)?;

    let (ref_aa, ref_1) = resolve_residue(caps.get(1)?.as_str())?;
    let position: u32 = caps.get(2)?.as_str().parse().ok()?;
    let alt_raw = caps.get(3)?.as_str();
    let (alt_aa, alt_1) = if alt_raw == "=" {
        (ref_aa, ref_1)
    } else {
        resolve_residue(alt_raw)?
    };

    if position == 0 {
        return None;
    }

    Some(ProteinChange {
        position,
        ref_aa: ref_aa.to_string(),
        alt_aa: alt_aa.to_string(),
        ref_1,
        alt_1,
    })
}

/// Protein position from an `hgvsp` string.
///
/// Uses the structured parse when it succeeds, otherwise the first run of
/// digits in the protein part. Unparseable, overflowing or zero positions
/// are `None`, never 0.
pub fn protein_position(hgvsp: &str) -> Option<u32> {
    if let Some(change) = parse_protein_change(hgvsp) {
        return Some(change.position);
    }
    let part = protein_part(hgvsp);
    digits_regex()
        .find(&part)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|&p| p > 0)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
