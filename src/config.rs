//! Runtime configuration for the pipeline orchestrator.

use std::env;

use anyhow::Context;
use reqwest::Url;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3003;
const DEFAULT_ACQUIRE_URL: &str = "http://acquire:3001/acquire";
const DEFAULT_PREDICT_URL: &str = "http://predict:3002/predict";

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Address the HTTP listener binds to.
    pub host: String,
    /// Inbound listen port.
    pub port: u16,
    /// Endpoint returning the latest consumption reading.
    pub acquire_url: Url,
    /// Endpoint accepting a feature vector and returning a prediction.
    pub predict_url: Url,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = lookup("PORT")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let acquire_url = lookup("ACQUIRE_URL").unwrap_or_else(|| DEFAULT_ACQUIRE_URL.to_string());
        let predict_url = lookup("PREDICT_URL").unwrap_or_else(|| DEFAULT_PREDICT_URL.to_string());

        Ok(Self {
            host,
            port,
            acquire_url: Url::parse(&acquire_url)
                .with_context(|| format!("parsing ACQUIRE_URL {acquire_url:?}"))?,
            predict_url: Url::parse(&predict_url)
                .with_context(|| format!("parsing PREDICT_URL {predict_url:?}"))?,
        })
    }
}
