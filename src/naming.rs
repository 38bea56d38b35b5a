//! Canonical filename stems and collision-free name resolution
//!
//! The canonical stem is `YYYY-MM-DD HH.MM.SS`. It is both the rename
//! target format and the recognition pattern for files that have already
//! been organized.

use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

lazy_static! {
    /// Full-stem match for already-organized files. A trailing `_N`
    /// collision suffix also counts, so collision-resolved outputs stay
    /// stable across repeated runs.
    static ref CANONICAL_STEM: Regex =
        Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}\.\d{2}\.\d{2}(?:_\d+)?$").unwrap();
}

/// Render a resolved date into the canonical filename stem
pub fn format_stem(datetime: &NaiveDateTime) -> String {
    datetime.format("%Y-%m-%d %H.%M.%S").to_string()
}

/// Check whether a filename stem is already in canonical form
pub fn is_canonical_stem(stem: &str) -> bool {
    CANONICAL_STEM.is_match(stem)
}

/// Find a stem that does not collide with an existing entry in `dir`
///
/// Probes `stem`, then `stem_1`, `stem_2`, ... against the current
/// filesystem state. Always re-probes rather than caching a listing,
/// since earlier renames in the same pass change what counts as a
/// collision. Single-threaded assumption: no other writer races us
/// between the probe and the caller's rename.
pub fn unique_stem(dir: &Path, stem: &str, ext: &str) -> Result<String> {
    if !dir.join(format!("{stem}{ext}")).exists() {
        return Ok(stem.to_string());
    }

    for counter in 1..10000 {
        let candidate = format!("{stem}_{counter}");
        if !dir.join(format!("{candidate}{ext}")).exists() {
            return Ok(candidate);
        }
    }

    Err(Error::NameExhausted {
        path: dir.join(format!("{stem}{ext}")),
    })
}
