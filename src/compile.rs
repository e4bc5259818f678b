//! Route Table Compiler
//!
//! Turns the scanner's descriptors into the specificity-ordered route table
//! the emitter serializes. Ordering is the resolution contract: at every
//! segment position a literal outranks a dynamic segment, which outranks a
//! catch-all, and earlier positions dominate later ones.

use crate::route::{MatchRule, RouteDescriptor, RouteEntry, RouteTable, SynthError};

/// Compile descriptors into an ordered route table.
///
/// Fails when a catch-all segment sits in a non-final position, or when two
/// descriptors collapse to the same match rule. Identical shapes cannot be
/// resolved by ordering; both claim the same requests, so the caller has to
/// restructure one of the pages.
pub fn compile_route_table(
    descriptors: &[RouteDescriptor],
    fallback_file: Option<String>,
) -> Result<RouteTable, SynthError> {
    let mut entries = Vec::with_capacity(descriptors.len());

    for descriptor in descriptors {
        let rule =
            MatchRule::from_segments(&descriptor.segments).map_err(|message| {
                SynthError::InvalidRoute {
                    source_path: descriptor.source_path.clone(),
                    message,
                }
            })?;
        entries.push(RouteEntry {
            rule,
            exported_file: descriptor.exported_file.clone(),
            source_path: descriptor.source_path.clone(),
        });
    }

    // Stable sort on the specificity key; duplicates end up adjacent.
    entries.sort_by(|a, b| a.rule.cmp(&b.rule));

    for pair in entries.windows(2) {
        if pair[0].rule == pair[1].rule {
            return Err(SynthError::AmbiguousRoute {
                pattern: pair[0].rule.shape_string(),
                first: pair[0].source_path.clone(),
                second: pair[1].source_path.clone(),
            });
        }
    }

    Ok(RouteTable {
        entries,
        fallback_file,
    })
}
