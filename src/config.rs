use serde::Deserialize;

/// Pipeline configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the raw ratings dataset (delimited tabular file)
    #[serde(default = "default_dataset_path")]
    pub dataset_path: String,

    /// Field delimiter in the raw dataset (single byte, e.g. "\t" or ",")
    #[serde(default = "default_dataset_delimiter")]
    pub dataset_delimiter: String,

    /// Minimum interactions a user needs to survive filtering
    #[serde(default = "default_min_user_count")]
    pub min_user_count: usize,

    /// Minimum interactions an item needs to survive filtering
    #[serde(default = "default_min_item_count")]
    pub min_item_count: usize,

    /// Number of contiguous shards each encoded split is partitioned into
    #[serde(default = "default_num_shards")]
    pub num_shards: usize,

    /// Object store base URL for encoded shards
    #[serde(default = "default_storage_url")]
    pub storage_url: String,

    /// Training service base URL
    #[serde(default = "default_training_api_url")]
    pub training_api_url: String,

    /// Serving endpoint base URL
    #[serde(default = "default_serving_api_url")]
    pub serving_api_url: String,

    /// Seconds between training-job status polls
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default)]
    pub hyperparameters: FmHyperparameters,
}

/// Hyperparameters forwarded verbatim to the factorization-machine learner.
/// The learner itself is an external service; nothing here is interpreted
/// locally beyond serialization.
#[derive(Debug, Deserialize, serde::Serialize, Clone)]
pub struct FmHyperparameters {
    #[serde(default = "default_num_factors")]
    pub num_factors: usize,

    #[serde(default = "default_epochs")]
    pub epochs: usize,

    #[serde(default = "default_mini_batch_size")]
    pub mini_batch_size: usize,
}

impl Default for FmHyperparameters {
    fn default() -> Self {
        Self {
            num_factors: default_num_factors(),
            epochs: default_epochs(),
            mini_batch_size: default_mini_batch_size(),
        }
    }
}

fn default_dataset_path() -> String {
    "data/ratings.tsv".to_string()
}

fn default_dataset_delimiter() -> String {
    "\t".to_string()
}

fn default_min_user_count() -> usize {
    5
}

fn default_min_item_count() -> usize {
    10
}

fn default_num_shards() -> usize {
    4
}

fn default_storage_url() -> String {
    "http://localhost:9000/fmprep".to_string()
}

fn default_training_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_serving_api_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_num_factors() -> usize {
    64
}

fn default_epochs() -> usize {
    100
}

fn default_mini_batch_size() -> usize {
    1000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// The delimiter as a raw byte for the dataset reader
    pub fn delimiter_byte(&self) -> u8 {
        self.dataset_delimiter.as_bytes().first().copied().unwrap_or(b'\t')
    }
}
