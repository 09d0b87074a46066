//! Ordering of model file names before they are resolved and loaded.
//!
//! OpenVINO IR models come as a topology file (`.xml`) plus a weights file
//! (`.bin`). The loader needs the topology first, whatever order the caller
//! listed them in. Every other set of names is passed through untouched.

use crate::{InferError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairPart {
    Topology,
    Weights,
}

/// `^.+\.(xml|bin)$`, case-insensitive.
fn pair_part(name: &str) -> Option<PairPart> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    if ext.eq_ignore_ascii_case("xml") {
        Some(PairPart::Topology)
    } else if ext.eq_ignore_ascii_case("bin") {
        Some(PairPart::Weights)
    } else {
        None
    }
}

/// True when `name` follows the IR naming convention (`*.xml` or `*.bin`).
pub fn is_ir_file(name: &str) -> bool {
    pair_part(name).is_some()
}

/// Put an `.xml`/`.bin` pair in topology-then-weights order; return anything
/// else unchanged.
///
/// Two IR names that are not one of each (`a.xml` + `b.xml`) cannot be loaded
/// as a pair and fail with [`InferError::InvalidFileSet`].
pub fn classify(files: &[String]) -> Result<Vec<String>> {
    if let [first, second] = files {
        if let (Some(a), Some(b)) = (pair_part(first), pair_part(second)) {
            return match (a, b) {
                (PairPart::Topology, PairPart::Weights) => Ok(vec![first.clone(), second.clone()]),
                (PairPart::Weights, PairPart::Topology) => Ok(vec![second.clone(), first.clone()]),
                _ => Err(InferError::InvalidFileSet(files.to_vec())),
            };
        }
    }
    Ok(files.to_vec())
}

/// How a classified file list is handed to the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelLayout {
    /// One self-contained file.
    Single,
    /// Two files: model first, weights second.
    Pair,
    /// A main file followed by auxiliary files.
    Multi(usize),
}

impl ModelLayout {
    pub fn of(files: &[String]) -> Self {
        match files.len() {
            1 => ModelLayout::Single,
            2 => ModelLayout::Pair,
            n => ModelLayout::Multi(n),
        }
    }
}
