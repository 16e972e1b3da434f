//! Structural path matching.
//!
//! A pattern matches a path when both have the same number of segments,
//! every static segment is equal and every `:param` segment binds a
//! non-empty value. Among several matches the most specific wins: compared
//! segment by segment, a static match beats a parameter match.

use std::collections::BTreeMap;

use super::table::{CATCH_ALL, RouteEntry};

/// Normalise a request path: drop query and fragment, collapse duplicate
/// and trailing slashes. The empty path becomes `/`.
pub fn normalize_path(raw: &str) -> String {
    let path = raw.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = split_segments(path);
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// A successful structural match of one route entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Index of the entry in the table it came from.
    pub index: usize,
    /// Bound `:param` values.
    pub params: BTreeMap<String, String>,
    /// Per segment, `true` where the pattern segment was static.
    specificity: Vec<bool>,
}

/// Match one pattern against pre-split path segments.
///
/// The catch-all never matches here; callers fall back to it explicitly.
pub fn match_pattern(
    pattern: &str,
    segments: &[&str],
) -> Option<(BTreeMap<String, String>, Vec<bool>)> {
    if pattern == CATCH_ALL {
        return None;
    }

    let pattern_segments = split_segments(pattern);
    if pattern_segments.len() != segments.len() {
        return None;
    }

    let mut params = BTreeMap::new();
    let mut specificity = Vec::with_capacity(segments.len());
    for (expected, actual) in pattern_segments.iter().zip(segments) {
        match expected.strip_prefix(':') {
            Some(name) => {
                if actual.is_empty() {
                    return None;
                }
                params.insert(name.to_string(), (*actual).to_string());
                specificity.push(false);
            }
            None => {
                if expected != actual {
                    return None;
                }
                specificity.push(true);
            }
        }
    }
    Some((params, specificity))
}

/// Find the best structural match for a normalised path.
///
/// Returns `None` when only the catch-all would apply.
pub fn best_match(table: &[RouteEntry], path: &str) -> Option<RouteMatch> {
    let segments = split_segments(path);
    let mut best: Option<RouteMatch> = None;

    for (index, entry) in table.iter().enumerate() {
        let Some((params, specificity)) = match_pattern(entry.pattern, &segments) else {
            continue;
        };
        // Strictly greater keeps the earliest declaration on ties.
        let better = match &best {
            None => true,
            Some(current) => specificity > current.specificity,
        };
        if better {
            best = Some(RouteMatch {
                index,
                params,
                specificity,
            });
        }
    }
    best
}
