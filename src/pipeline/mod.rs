//! Acquire → featurise → predict orchestration.
//!
//! A run moves through `AwaitingAcquire`, then `AwaitingPredict`, then
//! succeeds. Any error ends the run; nothing is retried and no upstream call
//! is compensated.

pub mod error;
pub mod features;
pub mod upstream;

use serde_json::Value;
use tracing::{error, info, instrument};

pub use error::{PipelineError, Stage, MISSING_DATA_MESSAGE};
pub use features::{featurise, FeatureVector, Reading, FEATURE_COUNT};
pub use upstream::{AcquireResponse, PredictMeta, PredictRequest, UpstreamClient};

use crate::config::Settings;

/// Everything a successful run produced, in stage order.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRun {
    /// Acquire body exactly as received.
    pub acquired: Value,
    pub features: FeatureVector,
    /// Predict body exactly as received.
    pub prediction: Value,
}

/// Request-independent pipeline state, shared read-only by every handler call.
#[derive(Debug, Clone)]
pub struct Pipeline {
    upstream: UpstreamClient,
}

impl Pipeline {
    pub fn new(settings: &Settings) -> reqwest::Result<Self> {
        Ok(Self {
            upstream: UpstreamClient::new(settings)?,
        })
    }

    /// Execute one end-to-end run.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<PipelineRun, PipelineError> {
        info!("starting pipeline");
        let outcome = self.execute().await;
        if let Err(err) = &outcome {
            error!(stage = %err.stage(), error = %err, "pipeline failed");
            if let Some(details) = err.details() {
                error!(%details, "remote error details");
            }
        }
        outcome
    }

    async fn execute(&self) -> Result<PipelineRun, PipelineError> {
        info!(url = %self.upstream.acquire_url(), "requesting data from acquire");
        let acquired = self.upstream.acquire().await?;
        let reading = AcquireResponse::from_body(&acquired)?;
        info!(
            status = reading.status.as_deref().unwrap_or("-"),
            data = ?reading.data,
            "data received from acquire"
        );

        let features = featurise(&reading.data);
        info!(features = ?features.as_slice(), "features prepared");

        info!(url = %self.upstream.predict_url(), "sending features to predict");
        let request = PredictRequest::new(features, &reading);
        let prediction = self.upstream.predict(&request).await?;
        info!(%prediction, "prediction received");

        Ok(PipelineRun {
            acquired,
            features: request.features,
            prediction,
        })
    }
}
