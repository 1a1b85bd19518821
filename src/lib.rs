//! Adapter between a provider-agnostic uptime [`monitor::Monitor`] and StatusCake's test API.

pub mod config;
pub mod logging;
pub mod monitor;
pub mod provider;
pub mod secret;
pub mod statuscake;

pub use monitor::{Monitor, ProviderConfig, StatusCakeConfig};
pub use provider::{Credentials, MonitorProvider, ProviderError, UpsertOutcome};
pub use statuscake::StatusCakeMonitorService;
