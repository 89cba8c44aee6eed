use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::Interaction;

/// Derives the `days_since_first` feature for every record.
///
/// `first_date` is each user's minimum timestamp among their retained,
/// dated records. A record's recency is the whole number of days between
/// `first_date` and its own timestamp, clamped to 0; records without a
/// parseable timestamp get 0.
pub fn compute_recency(records: Vec<Interaction>) -> Vec<Interaction> {
    let mut first_dates: HashMap<&str, DateTime<Utc>> = HashMap::new();
    for record in &records {
        if let Some(ts) = record.timestamp {
            first_dates
                .entry(record.user_id.as_str())
                .and_modify(|first| {
                    if ts < *first {
                        *first = ts;
                    }
                })
                .or_insert(ts);
        }
    }

    let first_dates: HashMap<String, DateTime<Utc>> = first_dates
        .into_iter()
        .map(|(user, ts)| (user.to_string(), ts))
        .collect();

    records
        .into_iter()
        .map(|mut record| {
            record.days_since_first = match (record.timestamp, first_dates.get(&record.user_id)) {
                (Some(ts), Some(first)) => {
                    let days = (ts - *first).num_days();
                    days.max(0) as f32
                }
                _ => 0.0,
            };
            record
        })
        .collect()
}
