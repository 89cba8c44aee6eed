use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::Config,
    error::PipelineResult,
    features::{compute_recency, encode, filter_entities, partition, split_holdout, FeatureSpace},
    models::{
        EncodedDataset, Interaction, ModelHandle, ShardLocation, ShardRecord, TrainingJobSpec,
    },
    services::{BlobStorage, ServingService, TrainingService},
};

/// How many holdout rows get a sample prediction after deployment
const SAMPLE_PREDICTIONS: usize = 5;

/// End-to-end feature pipeline: clean records in, trained model and sample
/// predictions out. The heavy lifting (training, serving) happens in the
/// injected collaborators; everything local is the pure feature-builder
/// passes run in sequence.
pub struct Pipeline {
    config: Config,
    storage: Arc<dyn BlobStorage>,
    training: Arc<dyn TrainingService>,
    serving: Arc<dyn ServingService>,
}

/// Summary of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub num_users: usize,
    pub num_items: usize,
    pub feature_dim: usize,
    pub train_rows: usize,
    pub holdout_rows: usize,
    /// Holdout users with no train record (single-interaction users).
    /// Kept in holdout, but evaluation that needs a paired train example
    /// should skip them.
    pub cold_holdout_users: usize,
    pub train_shards: Vec<ShardLocation>,
    pub holdout_shards: Vec<ShardLocation>,
    pub model: ModelHandle,
    /// (actual rating, predicted rating) for the first few holdout rows
    pub sample_predictions: Vec<(f32, f32)>,
}

impl Pipeline {
    pub fn new(
        config: Config,
        storage: Arc<dyn BlobStorage>,
        training: Arc<dyn TrainingService>,
        serving: Arc<dyn ServingService>,
    ) -> Self {
        Self {
            config,
            storage,
            training,
            serving,
        }
    }

    /// Runs the full pipeline over cleaned interaction records.
    pub async fn run(&self, records: Vec<Interaction>) -> PipelineResult<PipelineReport> {
        tracing::info!(
            records = records.len(),
            storage = self.storage.name(),
            "Pipeline starting"
        );

        let filtered = filter_entities(
            records,
            self.config.min_user_count,
            self.config.min_item_count,
        );
        let filtered = compute_recency(filtered);

        // Indices cover the full filtered set, so both splits encode against
        // the same feature space.
        let space = FeatureSpace::build(&filtered)?;
        let (train, holdout) = split_holdout(filtered);

        let train_users: HashSet<&str> = train.iter().map(|r| r.user_id.as_str()).collect();
        let cold_holdout_users = holdout
            .iter()
            .filter(|r| !train_users.contains(r.user_id.as_str()))
            .count();
        if cold_holdout_users > 0 {
            tracing::warn!(
                cold_holdout_users,
                "Some holdout users have no train record"
            );
        }

        let encoded_train = encode(&train, &space)?;
        let encoded_holdout = encode(&holdout, &space)?;

        let train_shards = self.upload_split("train", &encoded_train).await?;
        let holdout_shards = self.upload_split("holdout", &encoded_holdout).await?;

        let spec = TrainingJobSpec {
            job_name: format!("fm-{}", uuid::Uuid::new_v4()),
            feature_dim: space.dim(),
            train_shards: train_shards.clone(),
            holdout_shards: holdout_shards.clone(),
            hyperparameters: self.config.hyperparameters.clone(),
        };

        let job_id = self.training.submit_job(spec).await?;
        let model = self
            .training
            .wait_for_completion(&job_id, Duration::from_secs(self.config.poll_interval_secs))
            .await?;

        let mut sample_predictions = Vec::new();
        for (row, label) in encoded_holdout
            .rows
            .iter()
            .zip(&encoded_holdout.labels)
            .take(SAMPLE_PREDICTIONS)
        {
            let score = self.serving.predict(&model, row).await?;
            sample_predictions.push((*label, score));
        }

        tracing::info!(
            model = %model,
            predictions = sample_predictions.len(),
            "Pipeline completed"
        );

        Ok(PipelineReport {
            num_users: space.num_users(),
            num_items: space.num_items(),
            feature_dim: space.dim(),
            train_rows: encoded_train.len(),
            holdout_rows: encoded_holdout.len(),
            cold_holdout_users,
            train_shards,
            holdout_shards,
            model,
            sample_predictions,
        })
    }

    /// Partitions one encoded split and uploads each shard as JSON lines.
    async fn upload_split(
        &self,
        split: &str,
        encoded: &EncodedDataset,
    ) -> PipelineResult<Vec<ShardLocation>> {
        let records: Vec<ShardRecord> = encoded
            .rows
            .iter()
            .zip(&encoded.labels)
            .map(|(row, label)| ShardRecord {
                indices: row.indices.clone(),
                values: row.values.clone(),
                label: *label,
            })
            .collect();

        let shards = partition(&records, self.config.num_shards)?;

        let mut locations = Vec::with_capacity(shards.len());
        for (idx, shard) in shards.iter().enumerate() {
            let name = format!("{}/part-{:03}.jsonl", split, idx);
            let bytes = serialize_shard(shard)?;
            self.storage.put(&name, bytes).await?;
            locations.push(ShardLocation {
                name,
                records: shard.len(),
            });
        }

        tracing::info!(
            split,
            rows = records.len(),
            shards = locations.len(),
            "Split uploaded"
        );

        Ok(locations)
    }
}

/// One JSON object per record, newline-terminated, input order preserved.
pub fn serialize_shard(records: &[ShardRecord]) -> PipelineResult<Vec<u8>> {
    let mut out = Vec::new();
    for record in records {
        serde_json::to_writer(&mut out, record)?;
        out.write_all(b"\n")?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{MockBlobStorage, MockServingService, MockTrainingService};
    use chrono::{TimeZone, Utc};
    use mockall::predicate;

    fn dated(user: &str, item: &str, rating: u8, day: u32) -> Interaction {
        Interaction::new(
            user,
            item,
            "",
            rating,
            Some(Utc.with_ymd_and_hms(2013, 3, day, 0, 0, 0).unwrap()),
        )
    }

    fn test_config() -> Config {
        let mut config: Config =
            envy::from_iter(std::iter::empty::<(String, String)>()).unwrap();
        config.min_user_count = 1;
        config.min_item_count = 1;
        config.num_shards = 1;
        config.poll_interval_secs = 0;
        config
    }

    #[tokio::test]
    async fn test_run_uploads_shards_then_trains_then_predicts() {
        let records = vec![
            dated("u1", "i1", 5, 1),
            dated("u1", "i2", 3, 6),
            dated("u2", "i1", 4, 1),
        ];

        let mut storage = MockBlobStorage::new();
        storage.expect_name().return_const("mock");
        storage
            .expect_put()
            .times(2)
            .returning(|_, _| Ok(()));

        let mut training = MockTrainingService::new();
        training
            .expect_submit_job()
            .withf(|spec: &TrainingJobSpec| {
                spec.feature_dim == 5
                    && spec.train_shards.len() == 1
                    && spec.holdout_shards.len() == 1
            })
            .returning(|_| Ok("job-1".to_string()));
        training
            .expect_wait_for_completion()
            .with(predicate::eq("job-1"), predicate::always())
            .returning(|_, _| Ok(ModelHandle("fm-model".to_string())));

        let mut serving = MockServingService::new();
        serving
            .expect_predict()
            .times(2)
            .returning(|_, _| Ok(4.2));

        let pipeline = Pipeline::new(
            test_config(),
            Arc::new(storage),
            Arc::new(training),
            Arc::new(serving),
        );

        let report = pipeline.run(records).await.unwrap();
        assert_eq!(report.feature_dim, 5);
        assert_eq!(report.train_rows, 1);
        assert_eq!(report.holdout_rows, 2);
        assert_eq!(report.cold_holdout_users, 1);
        assert_eq!(report.model, ModelHandle("fm-model".to_string()));
        assert_eq!(report.sample_predictions, vec![(3.0, 4.2), (4.0, 4.2)]);
    }

    #[test]
    fn test_serialize_shard_is_json_lines() {
        let records = vec![
            ShardRecord {
                indices: vec![0, 2, 4],
                values: vec![1.0, 1.0, 0.0],
                label: 5.0,
            },
            ShardRecord {
                indices: vec![1, 2, 4],
                values: vec![1.0, 1.0, 3.0],
                label: 2.0,
            },
        ];

        let bytes = serialize_shard(&records).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let back: ShardRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(back, records[1]);
    }
}
