/// HTTP training-service client
///
/// Job flow:
/// 1. Submit: POST /v1/jobs with the job spec → `{"job_id": ...}`
/// 2. Poll:   GET  /v1/jobs/{id} → a `TrainingJobStatus`
///
/// The polling cadence lives in the default `wait_for_completion` on the
/// trait; this client only implements the two wire calls.
use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::{PipelineError, PipelineResult},
    models::{TrainingJobSpec, TrainingJobStatus},
    services::TrainingService,
};

#[derive(Debug, Clone)]
pub struct HttpTrainingService {
    http_client: HttpClient,
    api_url: String,
}

impl HttpTrainingService {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl TrainingService for HttpTrainingService {
    async fn submit_job(&self, spec: TrainingJobSpec) -> PipelineResult<String> {
        let url = format!("{}/v1/jobs", self.api_url);

        let response = self.http_client.post(&url).json(&spec).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::TrainingJobFailed(format!(
                "submission returned status {}: {}",
                status, body
            )));
        }

        #[derive(Deserialize)]
        struct SubmitResponse {
            job_id: String,
        }

        let submit_response: SubmitResponse = response.json().await?;

        tracing::info!(
            job_id = %submit_response.job_id,
            job_name = %spec.job_name,
            feature_dim = spec.feature_dim,
            train_shards = spec.train_shards.len(),
            holdout_shards = spec.holdout_shards.len(),
            "Training job submitted"
        );

        Ok(submit_response.job_id)
    }

    async fn job_status(&self, job_id: &str) -> PipelineResult<TrainingJobStatus> {
        let url = format!("{}/v1/jobs/{}", self.api_url, job_id);

        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::TrainingJobFailed(format!(
                "status poll for {} returned {}: {}",
                job_id, status, body
            )));
        }

        Ok(response.json().await?)
    }
}
