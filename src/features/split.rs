use std::collections::HashMap;

use crate::models::Interaction;

/// Per-user leave-last-out split.
///
/// Each user's chronologically last record (ties broken by input order, last
/// occurrence wins) goes to holdout; every other record goes to train. Both
/// outputs preserve the input's relative order. A user with a single retained
/// record contributes to holdout only, so their train share is empty.
pub fn split_holdout(records: Vec<Interaction>) -> (Vec<Interaction>, Vec<Interaction>) {
    // Position of each user's holdout pick in the input
    let mut holdout_pick: HashMap<&str, usize> = HashMap::new();
    for (pos, record) in records.iter().enumerate() {
        match holdout_pick.get(record.user_id.as_str()) {
            Some(&current) if records[current].sort_ts() > record.sort_ts() => {}
            _ => {
                // Equal timestamps fall through here, so the later
                // occurrence replaces the earlier one.
                holdout_pick.insert(record.user_id.as_str(), pos);
            }
        }
    }

    let picks: Vec<usize> = holdout_pick.into_values().collect();
    let is_holdout = {
        let mut flags = vec![false; records.len()];
        for pos in picks {
            flags[pos] = true;
        }
        flags
    };

    let mut train = Vec::with_capacity(records.len());
    let mut holdout = Vec::new();
    for (pos, record) in records.into_iter().enumerate() {
        if is_holdout[pos] {
            holdout.push(record);
        } else {
            train.push(record);
        }
    }

    tracing::info!(
        train = train.len(),
        holdout = holdout.len(),
        "Per-user holdout split completed"
    );

    (train, holdout)
}
