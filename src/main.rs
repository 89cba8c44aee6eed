use std::sync::Arc;

use fmprep::{
    dataset,
    services::{HttpBlobStorage, HttpServingService, HttpTrainingService},
    Config, Pipeline,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let records = dataset::load_interactions(&config.dataset_path, config.delimiter_byte())?;

    let storage = Arc::new(HttpBlobStorage::new(config.storage_url.clone()));
    let training = Arc::new(HttpTrainingService::new(config.training_api_url.clone()));
    let serving = Arc::new(HttpServingService::new(config.serving_api_url.clone()));

    let pipeline = Pipeline::new(config, storage, training, serving);
    let report = pipeline.run(records).await?;

    tracing::info!(
        users = report.num_users,
        items = report.num_items,
        feature_dim = report.feature_dim,
        train_rows = report.train_rows,
        holdout_rows = report.holdout_rows,
        model = %report.model,
        "Run finished"
    );

    for (actual, predicted) in &report.sample_predictions {
        tracing::info!(actual, predicted, "Sample holdout prediction");
    }

    Ok(())
}
