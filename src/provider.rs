//! The capability set every monitoring-provider adapter offers the reconciliation layer.
//!
//! Each adapter implements the typed `try_*` operations. The provided methods wrap them with the
//! log-and-carry-on behaviour the reconciliation loop historically relied on: listing failures
//! read as "no monitors", and create/update/delete report only through the logs.

use async_trait::async_trait;
use redact::Secret;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::monitor::Monitor;

/// Connection details for one provider, fixed at setup.
#[derive(Debug, Clone)]
pub struct Credentials {
	pub api_key: Secret<String>,
	pub api_url: String,
	pub username: String,
	/// Alert contact group used when a monitor doesn't name its own
	pub alert_contacts: String,
}

/// What the provider told us about a create, update or delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpsertOutcome {
	pub success: bool,
	/// Only set on create
	pub insert_id: Option<String>,
	pub message: Option<String>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
	#[error("Unable to parse provider API url: {0}")]
	InvalidBaseUrl(#[from] url::ParseError),
	#[error("HTTP call to provider failed: {0}")]
	Transport(#[from] reqwest::Error),
	#[error("Unable to decode provider response: {0}")]
	Decode(#[from] serde_json::Error),
	#[error("Provider responded with {status}: {body}")]
	Status {
		status: reqwest::StatusCode,
		body: String,
	},
	#[error("Monitor has no remote id yet: {0}")]
	MissingId(String),
	#[error("No monitor found with name: {0}")]
	NotFound(String),
	#[error("Provider used before setup")]
	NotSetUp,
}

#[async_trait]
pub trait MonitorProvider: Send + Sync {
	/// Stores credentials and builds the HTTP client; no network I/O.
	///
	/// # Errors
	///
	/// This function will return an error if the HTTP client can't be constructed.
	fn setup(&mut self, credentials: &Credentials) -> Result<(), ProviderError>;

	async fn try_get_all(&self) -> Result<Vec<Monitor>, ProviderError>;

	async fn try_add(&self, monitor: &Monitor) -> Result<UpsertOutcome, ProviderError>;

	/// Requires `monitor.id` to be set.
	async fn try_update(&self, monitor: &Monitor) -> Result<UpsertOutcome, ProviderError>;

	/// Requires `monitor.id` to be set.
	async fn try_remove(&self, monitor: &Monitor) -> Result<UpsertOutcome, ProviderError>;

	/// Whether updating `old` to `new` would be a no-op on the remote side.
	fn equal(&self, old: &Monitor, new: &Monitor) -> bool;

	/// Every remote monitor, or an empty list if the provider couldn't be queried.
	async fn get_all(&self) -> Vec<Monitor> {
		match self.try_get_all().await {
			Ok(monitors) => monitors,
			Err(e) => {
				error!(%e, "Unable to retrieve monitors");
				Vec::new()
			},
		}
	}

	async fn get_by_name(&self, name: &str) -> Result<Monitor, ProviderError> {
		self.get_all()
			.await
			.into_iter()
			.find(|monitor| monitor.name == name)
			.ok_or_else(|| ProviderError::NotFound(name.to_string()))
	}

	async fn add(&self, monitor: &Monitor) {
		match self.try_add(monitor).await {
			Ok(UpsertOutcome {
				success: true,
				insert_id,
				..
			}) => info!(name = %monitor.name, id = ?insert_id, "Monitor added"),
			Ok(outcome) => log_rejection("added", monitor, &outcome),
			Err(e) => error!(name = %monitor.name, %e, "Insert request failed"),
		}
	}

	async fn update(&self, monitor: &Monitor) {
		match self.try_update(monitor).await {
			Ok(UpsertOutcome { success: true, .. }) => {
				info!(name = %monitor.name, id = %monitor.id, "Monitor updated");
			},
			Ok(outcome) => log_rejection("updated", monitor, &outcome),
			Err(e) => error!(name = %monitor.name, %e, "Update request failed"),
		}
	}

	async fn remove(&self, monitor: &Monitor) {
		match self.try_remove(monitor).await {
			Ok(UpsertOutcome { success: true, .. }) => {
				info!(name = %monitor.name, id = %monitor.id, "Monitor deleted");
			},
			Ok(outcome) => log_rejection("deleted", monitor, &outcome),
			Err(e) => error!(name = %monitor.name, %e, "Delete request failed"),
		}
	}
}

/// The provider understood us but said no. Not worth more than a debug line.
fn log_rejection(action: &str, monitor: &Monitor, outcome: &UpsertOutcome) {
	debug!(
		name = %monitor.name,
		message = outcome.message.as_deref().unwrap_or_default(),
		"Monitor couldn't be {action}"
	);
}
