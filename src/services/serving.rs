/// HTTP serving-endpoint client
///
/// POST /v1/models/{handle}/predict with the sparse row's coordinate/value
/// lists; the endpoint answers `{"score": ...}` with the rating estimate.
use reqwest::Client as HttpClient;

use crate::{
    error::{PipelineError, PipelineResult},
    models::{ModelHandle, PredictionRequest, PredictionResponse, SparseVector},
    services::ServingService,
};

#[derive(Debug, Clone)]
pub struct HttpServingService {
    http_client: HttpClient,
    api_url: String,
}

impl HttpServingService {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ServingService for HttpServingService {
    async fn predict(&self, model: &ModelHandle, row: &SparseVector) -> PipelineResult<f32> {
        let url = format!("{}/v1/models/{}/predict", self.api_url, model);
        let request = PredictionRequest::from(row);

        let response = self.http_client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Serving(format!(
                "predict against {} returned status {}: {}",
                model, status, body
            )));
        }

        let prediction: PredictionResponse = response.json().await?;

        tracing::debug!(
            model = %model,
            score = prediction.score,
            "Prediction returned"
        );

        Ok(prediction.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_request_mirrors_row() {
        let row = SparseVector {
            indices: vec![1, 9, 14],
            values: vec![1.0, 1.0, 3.0],
        };

        let request = PredictionRequest::from(&row);
        assert_eq!(request.indices, row.indices);
        assert_eq!(request.values, row.values);
    }

    #[test]
    fn test_prediction_response_deserialization() {
        let response: PredictionResponse = serde_json::from_str(r#"{"score":4.25}"#).unwrap();
        assert!((response.score - 4.25).abs() < f32::EPSILON);
    }
}
