/// External collaborator abstractions
///
/// The pipeline talks to three narrow capabilities: an object store for
/// encoded shards, a managed training service with a submit/poll contract,
/// and a serving endpoint with a predict contract. Each is a trait so tests
/// substitute in-memory fakes and deployments pick an HTTP-backed client.
use std::time::Duration;

use crate::{
    error::{PipelineError, PipelineResult},
    models::{ModelHandle, SparseVector, TrainingJobSpec, TrainingJobStatus},
};

#[cfg(test)]
use mockall::automock;

pub mod serving;
pub mod storage;
pub mod training;

pub use serving::HttpServingService;
pub use storage::{FsBlobStorage, HttpBlobStorage};
pub use training::HttpTrainingService;

/// Shard sink with a bare `put` contract.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait BlobStorage: Send + Sync {
    /// Stores one named blob, overwriting any previous blob of that name.
    async fn put(&self, name: &str, bytes: Vec<u8>) -> PipelineResult<()>;

    /// Backend name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Managed factorization-machine trainer (submit/poll contract).
///
/// The training algorithm is entirely the service's concern; this side only
/// ships shard locations, the feature dimension, and hyperparameters.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait TrainingService: Send + Sync {
    /// Submits a job and returns its id without waiting for completion.
    async fn submit_job(&self, spec: TrainingJobSpec) -> PipelineResult<String>;

    /// One status poll.
    async fn job_status(&self, job_id: &str) -> PipelineResult<TrainingJobStatus>;

    /// Polls until the job leaves `InProgress`.
    ///
    /// Default implementation sleeps `poll_interval` between polls. Job
    /// failures surface as `TrainingJobFailed`; transport errors propagate
    /// from `job_status` untouched (no retry here).
    async fn wait_for_completion(
        &self,
        job_id: &str,
        poll_interval: Duration,
    ) -> PipelineResult<ModelHandle> {
        loop {
            match self.job_status(job_id).await? {
                TrainingJobStatus::InProgress => {
                    tracing::debug!(job_id = %job_id, "Training job still in progress");
                    tokio::time::sleep(poll_interval).await;
                }
                TrainingJobStatus::Completed { model } => {
                    tracing::info!(job_id = %job_id, model = %model, "Training job completed");
                    return Ok(model);
                }
                TrainingJobStatus::Failed { reason } => {
                    return Err(PipelineError::TrainingJobFailed(format!(
                        "job {}: {}",
                        job_id, reason
                    )));
                }
            }
        }
    }
}

/// Deployed model endpoint (predict contract).
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ServingService: Send + Sync {
    /// Returns the rating estimate for one encoded feature vector.
    async fn predict(&self, model: &ModelHandle, row: &SparseVector) -> PipelineResult<f32>;
}
