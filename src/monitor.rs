//! The provider-agnostic description of one uptime check, as handed to us by the reconciliation
//! layer.

use serde::{Deserialize, Serialize};

/// One uptime check we are asked to maintain on a remote monitoring service.
///
/// `id` is whatever the remote service assigned; it stays empty until the first successful create.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Monitor {
	pub name: String,
	/// Percent-encoded, decoded just before transmission
	pub url: String,
	#[serde(default)]
	pub id: String,
	#[serde(default)]
	pub config: Option<ProviderConfig>,
}

/// Provider specific knobs attached to a [`Monitor`], keyed by provider kind.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "provider", content = "config")]
pub enum ProviderConfig {
	StatusCake(StatusCakeConfig),
	/// Config for a provider this crate doesn't model, kept as raw JSON
	#[serde(untagged)]
	Other(serde_json::Value),
}

/// Everything the StatusCake test API lets us tune for a single test.
///
/// Zero/empty values mean "not set", the form builder substitutes defaults or leaves the field out.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusCakeConfig {
	/// Seconds between checks
	pub check_rate: i32,
	pub test_type: String,
	pub contact_group: String,
	pub test_tags: String,
	/// Name of the environment variable holding the password, and the username itself
	pub basic_auth_user: String,
	/// Comma separated
	pub status_codes: String,
	pub paused: bool,
	pub follow_redirect: bool,
	#[serde(rename = "enableSSLAlert")]
	pub enable_ssl_alert: bool,
	pub real_browser: bool,
	#[serde(rename = "pingURL")]
	pub ping_url: String,
	pub node_locations: String,
	pub trigger_rate: i32,
	pub port: i32,
	pub confirmation: i32,
}

impl Monitor {
	pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			url: url.into(),
			..Self::default()
		}
	}

	#[must_use]
	pub fn with_id(mut self, id: impl Into<String>) -> Self {
		self.id = id.into();
		self
	}

	#[must_use]
	pub fn with_config(mut self, config: ProviderConfig) -> Self {
		self.config = Some(config);
		self
	}

	/// The StatusCake config, if any. Config belonging to some other provider reads as absent.
	pub fn statuscake_config(&self) -> Option<&StatusCakeConfig> {
		match &self.config {
			Some(ProviderConfig::StatusCake(config)) => Some(config),
			Some(ProviderConfig::Other(_)) | None => None,
		}
	}
}
