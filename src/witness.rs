//! Witness resolution.
//!
//! A reading's `mss` attribute is a space-delimited witness-id list (a
//! single id is the degenerate one-token case). Matching is exact-token:
//! `"A1"` never matches a list containing only `"A10"`.

use crate::document::{Reading, Verse};

/// Whether `requested` appears as an exact token of `witness_list`.
pub fn matches(witness_list: &str, requested: &str) -> bool {
    witness_list
        .split_whitespace()
        .any(|token| token == requested)
}

/// The reading of `verse` attested by `witness`, if any.
///
/// Load-time validation guarantees a witness attests at most one reading
/// per verse, so the first match is the only match.
pub fn select_reading<'a>(verse: &'a Verse, witness: &str) -> Option<&'a Reading> {
    verse
        .readings
        .iter()
        .find(|reading| matches(&reading.witnesses, witness))
}
