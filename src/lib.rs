//! Orchestrator that pulls a consumption reading from the Acquire service,
//! turns it into the model's feature vector and asks the Predict service for
//! a forecast.

pub mod api;
pub mod cli;
pub mod config;
pub mod logging;
pub mod pipeline;
