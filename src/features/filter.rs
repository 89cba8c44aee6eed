use std::collections::HashMap;

use crate::models::Interaction;

/// Drops interactions whose user or item falls below the activity thresholds.
///
/// Counts are taken once, over the unfiltered input, and records are kept only
/// when both their user and item meet the minimum on those pre-filter counts.
/// A user who drops below the threshold purely because partner items were
/// removed is NOT re-excluded; the original pipeline behaves this way and the
/// single-pass semantics are kept deliberately.
pub fn filter_entities(
    records: Vec<Interaction>,
    min_user_count: usize,
    min_item_count: usize,
) -> Vec<Interaction> {
    let mut user_counts: HashMap<&str, usize> = HashMap::new();
    let mut item_counts: HashMap<&str, usize> = HashMap::new();

    for record in &records {
        *user_counts.entry(record.user_id.as_str()).or_insert(0) += 1;
        *item_counts.entry(record.item_id.as_str()).or_insert(0) += 1;
    }

    let before = records.len();
    let filtered: Vec<Interaction> = records
        .iter()
        .filter(|r| {
            user_counts[r.user_id.as_str()] >= min_user_count
                && item_counts[r.item_id.as_str()] >= min_item_count
        })
        .cloned()
        .collect();

    tracing::info!(
        input = before,
        retained = filtered.len(),
        min_user_count,
        min_item_count,
        "Activity filtering completed"
    );

    filtered
}
