//! Failure taxonomy for a single pipeline run.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Message reported when Acquire answers without a `data` object. Callers
/// match on this exact text.
pub const MISSING_DATA_MESSAGE: &str = "Acquire no devolvió datos válidos";

/// Stage of the linear pipeline a run is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AwaitingAcquire,
    AwaitingPredict,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::AwaitingAcquire => f.write_str("acquire"),
            Stage::AwaitingPredict => f.write_str("predict"),
        }
    }
}

/// Why a run ended in the `Failed` state.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Transport failure or non-2xx answer from an upstream service.
    #[error("{message}")]
    Upstream {
        stage: Stage,
        message: String,
        /// Upstream response body, when the failure came with one.
        details: Option<Value>,
    },

    /// Acquire answered without usable `data` (absent, `null`, `false`, `0`
    /// or `""`).
    #[error("{}", MISSING_DATA_MESSAGE)]
    MissingData,
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Upstream { stage, .. } => *stage,
            PipelineError::MissingData => Stage::AwaitingAcquire,
        }
    }

    /// Remote response body carried by upstream failures.
    pub fn details(&self) -> Option<&Value> {
        match self {
            PipelineError::Upstream { details, .. } => details.as_ref(),
            PipelineError::MissingData => None,
        }
    }
}
