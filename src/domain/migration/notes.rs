//! Notes concatenation for merged buckets.

use std::collections::BTreeSet;

use crate::domain::schedule::Bucket;

use super::SourceBucket;

const NOTE_SEPARATOR: &str = "; ";

/// Joins the notes of retained sources as `[Mon] text` in chronological order.
///
/// Sources outside `retained`, or without notes, contribute nothing.
/// Returns `None` when nothing is left.
pub fn merge_notes(sources: &[SourceBucket], retained: &BTreeSet<Bucket>) -> Option<String> {
    let mut kept: Vec<&SourceBucket> = sources
        .iter()
        .filter(|s| retained.contains(&s.bucket))
        .collect();
    kept.sort_by_key(|s| s.bucket);

    let parts: Vec<String> = kept
        .into_iter()
        .filter_map(|s| {
            s.notes
                .as_deref()
                .map(|text| format!("[{}] {}", s.bucket.label(), text))
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(NOTE_SEPARATOR))
    }
}
