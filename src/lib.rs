//! capi-ibmcloud-webhooks library crate
//!
//! This module exports the machine CRD definitions, the PowerVS region
//! catalogue, and the admission webhooks that default and validate them.

pub mod config;
pub mod crd;
pub mod health;
pub mod region;
pub mod webhooks;

pub use config::{Config, ConfigError};
pub use health::HealthState;
pub use webhooks::{WebhookError, run_webhook_server};
