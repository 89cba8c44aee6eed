use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::config::FmHyperparameters;

/// A single (user, item, rating) event from the raw dataset.
///
/// Immutable once loaded, except for `days_since_first` which is derived in a
/// later pass and defaults to 0 until then.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub user_id: String,
    pub item_id: String,
    pub item_title: String,
    /// Star rating in 1..=5; rows outside that range are dropped at ingest
    pub rating: u8,
    /// Review date; `None` when the raw field was missing or unparseable
    pub timestamp: Option<DateTime<Utc>>,
    /// Whole days between this user's first retained interaction and this one
    pub days_since_first: f32,
}

impl Interaction {
    pub fn new(
        user_id: impl Into<String>,
        item_id: impl Into<String>,
        item_title: impl Into<String>,
        rating: u8,
        timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            item_id: item_id.into(),
            item_title: item_title.into(),
            rating,
            timestamp,
            days_since_first: 0.0,
        }
    }

    /// Sort key for chronological ordering; undated records sort first so a
    /// dated record always wins the per-user holdout pick over an undated one.
    pub fn sort_ts(&self) -> i64 {
        self.timestamp.map(|t| t.timestamp()).unwrap_or(i64::MIN)
    }
}

/// One row of the encoded matrix: parallel coordinate/value lists.
///
/// Every row produced by the encoder has exactly three non-zeros: the user
/// slot, the item slot, and the recency value at the last dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    pub indices: Vec<u32>,
    pub values: Vec<f32>,
}

impl SparseVector {
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }
}

/// Encoded split: sparse rows plus the parallel label vector.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedDataset {
    pub rows: Vec<SparseVector>,
    pub labels: Vec<f32>,
    /// Feature dimension `D` shared by every row
    pub dim: usize,
}

impl EncodedDataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One line of a serialized shard (JSON lines wire format).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShardRecord {
    pub indices: Vec<u32>,
    pub values: Vec<f32>,
    pub label: f32,
}

/// Where one uploaded shard lives, as understood by the training service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShardLocation {
    pub name: String,
    pub records: usize,
}

/// Job request handed to the external factorization-machine learner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingJobSpec {
    pub job_name: String,
    pub feature_dim: usize,
    pub train_shards: Vec<ShardLocation>,
    pub holdout_shards: Vec<ShardLocation>,
    pub hyperparameters: FmHyperparameters,
}

/// Lifecycle of a submitted training job, as reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingJobStatus {
    InProgress,
    Completed { model: ModelHandle },
    Failed { reason: String },
}

/// Opaque handle to a trained model, used to address the serving endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelHandle(pub String);

impl Display for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wire request for a single rating prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub indices: Vec<u32>,
    pub values: Vec<f32>,
}

impl From<&SparseVector> for PredictionRequest {
    fn from(row: &SparseVector) -> Self {
        Self {
            indices: row.indices.clone(),
            values: row.values.clone(),
        }
    }
}

/// Wire response from the serving endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionResponse {
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sort_ts_undated_sorts_first() {
        let dated = Interaction::new(
            "u1",
            "i1",
            "The Matrix",
            5,
            Some(Utc.with_ymd_and_hms(2013, 3, 11, 0, 0, 0).unwrap()),
        );
        let undated = Interaction::new("u1", "i2", "Inception", 4, None);
        assert!(undated.sort_ts() < dated.sort_ts());
    }

    #[test]
    fn test_shard_record_serde_round_trip() {
        let record = ShardRecord {
            indices: vec![0, 7, 12],
            values: vec![1.0, 1.0, 42.0],
            label: 4.0,
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: ShardRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_training_job_status_serde() {
        let status = TrainingJobStatus::Completed {
            model: ModelHandle("fm-2013-03-11".to_string()),
        };
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("completed"));

        let back: TrainingJobStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, status);
    }
}
