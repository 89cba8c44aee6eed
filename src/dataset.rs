use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Deserialize;

use crate::{
    error::{PipelineError, PipelineResult},
    models::Interaction,
};

/// Raw row shape as it appears in the delimited dataset. Ratings and
/// timestamps arrive as text and are validated/parsed into `Interaction`.
#[derive(Debug, Deserialize)]
struct RawRow {
    user_id: String,
    item_id: String,
    #[serde(default)]
    item_title: String,
    rating: f32,
    #[serde(default)]
    timestamp: String,
}

/// Reads and cleans the raw ratings dataset from a file path.
pub fn load_interactions(path: impl AsRef<Path>, delimiter: u8) -> PipelineResult<Vec<Interaction>> {
    let file = std::fs::File::open(path.as_ref())?;
    let interactions = read_interactions(file, delimiter)?;

    tracing::info!(
        path = %path.as_ref().display(),
        records = interactions.len(),
        "Dataset loaded"
    );

    Ok(interactions)
}

/// Reads and cleans interaction records from any delimited tabular source.
///
/// Cleaning rules:
/// - ratings must be whole numbers in 1..=5; other rows are dropped
/// - timestamps parse from unix epoch seconds, `YYYY-MM-DD`, or RFC 3339;
///   anything else becomes `None` and the row is kept (recency degrades to 0)
pub fn read_interactions<R: Read>(reader: R, delimiter: u8) -> PipelineResult<Vec<Interaction>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(reader);

    let mut interactions = Vec::new();
    let mut dropped = 0usize;
    let mut undated = 0usize;

    for row in csv_reader.deserialize::<RawRow>() {
        let row = row?;

        let rating = match validate_rating(row.rating) {
            Some(r) => r,
            None => {
                dropped += 1;
                continue;
            }
        };

        let timestamp = parse_timestamp(&row.timestamp);
        if timestamp.is_none() {
            undated += 1;
        }

        interactions.push(Interaction::new(
            row.user_id,
            row.item_id,
            row.item_title,
            rating,
            timestamp,
        ));
    }

    if dropped > 0 || undated > 0 {
        tracing::warn!(
            dropped_ratings = dropped,
            undated_records = undated,
            "Dataset rows required cleaning"
        );
    }

    if interactions.is_empty() {
        return Err(PipelineError::InvalidInput(
            "Dataset contains no usable interaction records".to_string(),
        ));
    }

    Ok(interactions)
}

/// Accepts only whole-number ratings in 1..=5.
fn validate_rating(raw: f32) -> Option<u8> {
    if raw.fract() != 0.0 {
        return None;
    }
    let rating = raw as i64;
    if (1..=5).contains(&rating) {
        Some(rating as u8)
    } else {
        None
    }
}

/// Best-effort timestamp parsing; `None` on anything unparseable.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    // Unix epoch seconds (the review dataset's native format)
    if let Ok(epoch) = raw.parse::<i64>() {
        return Utc.timestamp_opt(epoch, 0).single();
    }

    // Plain dates
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| Utc.from_utc_datetime(&dt));
    }

    // Full RFC 3339 stamps
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TSV: &str = "\
user_id\titem_id\titem_title\trating\ttimestamp
u1\ti1\tThe Matrix\t5\t2013-03-11
u1\ti2\tInception\t3\t1365465600
u2\ti1\tThe Matrix\t4\tnot-a-date
u3\ti3\tAlien\t9\t2013-03-11
u3\ti3\tAlien\t4.5\t2013-03-11
";

    #[test]
    fn test_read_interactions_cleans_rows() {
        let interactions = read_interactions(SAMPLE_TSV.as_bytes(), b'\t').unwrap();

        // The rating-9 and rating-4.5 rows are dropped, the rest survive
        assert_eq!(interactions.len(), 3);
        assert_eq!(interactions[0].user_id, "u1");
        assert_eq!(interactions[0].rating, 5);
        assert!(interactions[0].timestamp.is_some());
    }

    #[test]
    fn test_unparseable_timestamp_becomes_none() {
        let interactions = read_interactions(SAMPLE_TSV.as_bytes(), b'\t').unwrap();
        let u2 = interactions
            .iter()
            .find(|i| i.user_id == "u2")
            .expect("u2 row should survive cleaning");
        assert_eq!(u2.timestamp, None);
    }

    #[test]
    fn test_epoch_and_date_parse_agree() {
        // 1365465600 == 2013-04-09T00:00:00Z
        let from_epoch = parse_timestamp("1365465600").unwrap();
        let from_date = parse_timestamp("2013-04-09").unwrap();
        assert_eq!(from_epoch, from_date);
    }

    #[test]
    fn test_validate_rating_bounds() {
        assert_eq!(validate_rating(1.0), Some(1));
        assert_eq!(validate_rating(5.0), Some(5));
        assert_eq!(validate_rating(0.0), None);
        assert_eq!(validate_rating(6.0), None);
        assert_eq!(validate_rating(3.5), None);
    }

    #[test]
    fn test_empty_dataset_is_an_error() {
        let header_only = "user_id\titem_id\titem_title\trating\ttimestamp\n";
        let result = read_interactions(header_only.as_bytes(), b'\t');
        assert!(matches!(result, Err(PipelineError::InvalidInput(_))));
    }

    #[test]
    fn test_comma_delimited_input() {
        let csv_input = "\
user_id,item_id,item_title,rating,timestamp
u1,i1,Heat,4,2013-03-11
";
        let interactions = read_interactions(csv_input.as_bytes(), b',').unwrap();
        assert_eq!(interactions.len(), 1);
        assert_eq!(interactions[0].item_title, "Heat");
    }
}
