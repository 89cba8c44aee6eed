//! fmprep: feature preparation pipeline for an external factorization-machine
//! rating predictor.
//!
//! Converts a raw (user, item, rating, timestamp) reviews dataset into sparse
//! train/holdout matrices, ships them to an object store in shards, and
//! drives a managed training/serving platform through narrow submit/poll and
//! predict contracts.

pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod models;
pub mod pipeline;
pub mod services;

pub use config::Config;
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{Pipeline, PipelineReport};
