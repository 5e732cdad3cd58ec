//! Outbound calls to the Acquire and Predict services.

use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use super::{
    error::{PipelineError, Stage},
    features::{FeatureVector, Reading},
};
use crate::config::Settings;

/// Fields the pipeline reads out of an Acquire body. The body itself is kept
/// verbatim for the final envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquireResponse {
    pub status: Option<String>,
    pub db_id: Option<Value>,
    pub simulation_date: Option<Value>,
    pub data: Reading,
}

impl AcquireResponse {
    /// Extract the typed view from a raw Acquire body.
    pub fn from_body(body: &Value) -> Result<Self, PipelineError> {
        let data = match body.get("data") {
            Some(data) if !is_falsy(data) => Reading::from_data(data),
            _ => return Err(PipelineError::MissingData),
        };

        Ok(Self {
            status: body.get("status").and_then(Value::as_str).map(str::to_owned),
            db_id: present(body, "db_id"),
            simulation_date: present(body, "simulationDate"),
            data,
        })
    }
}

/// `null`, `false`, zero and the empty string do not count as data.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn present(body: &Value, key: &str) -> Option<Value> {
    body.get(key).filter(|v| !v.is_null()).cloned()
}

/// Body sent to Predict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub features: FeatureVector,
    pub meta: PredictMeta,
}

/// Provenance of the features, so Predict can link its output to raw data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_db_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulation_date: Option<Value>,
}

impl PredictRequest {
    pub fn new(features: FeatureVector, acquired: &AcquireResponse) -> Self {
        Self {
            features,
            meta: PredictMeta {
                source_db_id: acquired.db_id.clone(),
                simulation_date: acquired.simulation_date.clone(),
            },
        }
    }
}

/// HTTP client bound to the two configured upstream endpoints.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    acquire_url: Url,
    predict_url: Url,
}

impl UpstreamClient {
    pub fn new(settings: &Settings) -> reqwest::Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("energy-pipeline/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            acquire_url: settings.acquire_url.clone(),
            predict_url: settings.predict_url.clone(),
        })
    }

    pub fn acquire_url(&self) -> &Url {
        &self.acquire_url
    }

    pub fn predict_url(&self) -> &Url {
        &self.predict_url
    }

    /// `GET` the Acquire endpoint and return its JSON body.
    #[instrument(skip(self), fields(url = %self.acquire_url))]
    pub async fn acquire(&self) -> Result<Value, PipelineError> {
        let stage = Stage::AwaitingAcquire;
        let response = self
            .http
            .get(self.acquire_url.clone())
            .send()
            .await
            .map_err(|err| transport_error(stage, err))?;
        read_body(stage, response).await
    }

    /// `POST` the feature vector to Predict and return its body untouched.
    #[instrument(skip(self, request), fields(url = %self.predict_url))]
    pub async fn predict(&self, request: &PredictRequest) -> Result<Value, PipelineError> {
        let stage = Stage::AwaitingPredict;
        let response = self
            .http
            .post(self.predict_url.clone())
            .json(request)
            .send()
            .await
            .map_err(|err| transport_error(stage, err))?;
        read_body(stage, response).await
    }
}

async fn read_body(stage: Stage, response: Response) -> Result<Value, PipelineError> {
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|err| transport_error(stage, err))?;
    let body = decode_body(&bytes);
    debug!(%stage, status = status.as_u16(), len = bytes.len(), "upstream responded");

    if !status.is_success() {
        return Err(PipelineError::Upstream {
            stage,
            message: format!("Request failed with status code {}", status.as_u16()),
            details: body,
        });
    }
    Ok(body.unwrap_or(Value::Null))
}

fn transport_error(stage: Stage, err: reqwest::Error) -> PipelineError {
    PipelineError::Upstream {
        stage,
        message: err.to_string(),
        details: None,
    }
}

/// JSON when the body parses, the raw text otherwise, `None` when empty.
fn decode_body(bytes: &[u8]) -> Option<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    serde_json::from_slice(bytes)
        .ok()
        .or_else(|| Some(Value::String(String::from_utf8_lossy(bytes).into_owned())))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn body_without_data_is_missing_data() {
        for body in [
            json!({ "status": "ok", "db_id": 1 }),
            json!({ "status": "ok", "db_id": 1, "data": null }),
            json!({ "status": "ok", "db_id": 1, "data": false }),
            json!({ "status": "ok", "db_id": 1, "data": 0 }),
            json!({ "status": "ok", "db_id": 1, "data": 0.0 }),
            json!({ "status": "ok", "db_id": 1, "data": "" }),
            json!("<html>gateway</html>"),
        ] {
            let err = AcquireResponse::from_body(&body).unwrap_err();
            assert!(matches!(err, PipelineError::MissingData), "{body}");
        }
    }

    #[test]
    fn meta_follows_acquire_identifiers() {
        let body = json!({
            "status": "ok",
            "db_id": "65f1c0",
            "simulationDate": "2024-03-02",
            "data": { "consumo_hoy": 3 }
        });
        let acquired = AcquireResponse::from_body(&body).unwrap();
        assert_eq!(acquired.status.as_deref(), Some("ok"));

        let request = PredictRequest::new(crate::pipeline::featurise(&acquired.data), &acquired);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "features": [3, null, null, null, null, null, 0],
                "meta": { "source_db_id": "65f1c0", "simulation_date": "2024-03-02" }
            })
        );
    }

    #[test]
    fn absent_identifiers_are_omitted_from_meta() {
        let acquired = AcquireResponse::from_body(&json!({ "data": {} })).unwrap();
        let request = PredictRequest::new(crate::pipeline::featurise(&acquired.data), &acquired);
        assert_eq!(serde_json::to_value(&request.meta).unwrap(), json!({}));
    }

    #[test]
    fn string_decimals_reach_predict_unchanged() {
        let body = json!({ "data": { "consumo_hoy": "10.50", "consumo_ayer": 12 } });
        let acquired = AcquireResponse::from_body(&body).unwrap();
        assert_eq!(acquired.data.consumo_hoy, json!("10.50"));
        assert_eq!(acquired.data.consumo_ayer, json!(12));
    }

    #[test]
    fn truthy_non_object_data_is_accepted() {
        for data in [json!(true), json!(5), json!("x"), json!([])] {
            let body = json!({ "data": data });
            assert!(AcquireResponse::from_body(&body).is_ok(), "{body}");
        }
    }

    #[test]
    fn decode_body_falls_back_to_text() {
        assert_eq!(decode_body(b""), None);
        assert_eq!(decode_body(b"{\"a\":1}"), Some(json!({ "a": 1 })));
        assert_eq!(
            decode_body(b"Internal Server Error"),
            Some(json!("Internal Server Error"))
        );
    }
}
