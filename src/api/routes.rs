//! HTTP route handlers for Axum.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    api::types::{ErrorDto, PipelineResultDto},
    pipeline::PipelineError,
};

use super::AppState;

type ApiResult<T> = Result<Json<T>, PipelineError>;

pub async fn run_pipeline(state: State<AppState>) -> ApiResult<PipelineResultDto> {
    let run = state.pipeline.run().await?;
    Ok(Json(run.into()))
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorDto::from(&self))).into_response()
    }
}
