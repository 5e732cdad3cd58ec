//! JSON envelopes returned by `GET /pipeline`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pipeline::{FeatureVector, PipelineError, PipelineRun};

pub const SUCCESS_STATUS: &str = "success";
pub const FAILURE_LABEL: &str = "Pipeline failed";

/// Stage-by-stage output of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResultDto {
    pub status: String,
    pub step_1_acquire: Value,
    pub step_2_features: FeatureVector,
    pub step_3_predict: Value,
}

/// Uniform body for every failed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
    pub message: String,
    /// Upstream response body, `null` for local failures.
    pub details: Value,
}

impl From<PipelineRun> for PipelineResultDto {
    fn from(value: PipelineRun) -> Self {
        PipelineResultDto {
            status: SUCCESS_STATUS.to_string(),
            step_1_acquire: value.acquired,
            step_2_features: value.features,
            step_3_predict: value.prediction,
        }
    }
}

impl From<&PipelineError> for ErrorDto {
    fn from(err: &PipelineError) -> Self {
        ErrorDto {
            error: FAILURE_LABEL.to_string(),
            message: err.to_string(),
            details: err.details().cloned().unwrap_or(Value::Null),
        }
    }
}
