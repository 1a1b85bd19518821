//! [`MonitorProvider`] for StatusCake's legacy test API.

use async_trait::async_trait;
use redact::Secret;
use reqwest::RequestBuilder;
use tracing::debug;
use url::Url;

use crate::{
	monitor::Monitor,
	provider::{Credentials, MonitorProvider, ProviderError, UpsertOutcome},
};

pub mod api_types;
pub mod form;

use self::{
	api_types::{StatusCakeTest, UpsertResponse},
	form::{build_upsert_form, UpsertForm},
};

const TESTS_PATH: &str = "/API/Tests/";
const UPSERT_PATH: &str = "/API/Tests/Update";
const DETAILS_PATH: &str = "/API/Tests/Details";

#[derive(Debug, Clone)]
pub struct StatusCakeMonitorService {
	/// Built by `setup`
	client: Option<reqwest::Client>,
	api_key: Secret<String>,
	api_url: String,
	username: String,
	contact_group: String,
}

impl Default for StatusCakeMonitorService {
	fn default() -> Self {
		Self {
			client: None,
			api_key: Secret::new(String::new()),
			api_url: String::new(),
			username: String::new(),
			contact_group: String::new(),
		}
	}
}

impl StatusCakeMonitorService {
	/// A service that is already set up with `credentials`.
	///
	/// # Errors
	///
	/// This function will return an error if the HTTP client can't be constructed.
	pub fn new(credentials: &Credentials) -> Result<Self, ProviderError> {
		let mut service = Self::default();
		service.setup(credentials)?;
		Ok(service)
	}

	fn client(&self) -> Result<&reqwest::Client, ProviderError> {
		self.client.as_ref().ok_or(ProviderError::NotSetUp)
	}

	/// `path` on the configured API host. A bare host is taken to mean https.
	fn endpoint(&self, path: &str) -> Result<Url, ProviderError> {
		let mut url = match Url::parse(&self.api_url) {
			Ok(url) => url,
			Err(url::ParseError::RelativeUrlWithoutBase) => {
				Url::parse(&format!("https://{}", self.api_url))?
			},
			Err(e) => return Err(e.into()),
		};
		url.set_path(path);
		url.set_query(None);
		Ok(url)
	}

	/// Sends `request` with our auth headers and hands back the body of a 2xx response.
	async fn send(&self, request: RequestBuilder) -> Result<String, ProviderError> {
		let response = request
			.header("API", self.api_key.expose_secret().as_str())
			.header("Username", &self.username)
			.send()
			.await?;
		let status = response.status();
		let body = response.text().await?;
		if !status.is_success() {
			return Err(ProviderError::Status { status, body });
		}
		Ok(body)
	}

	async fn upsert(&self, form: &UpsertForm) -> Result<UpsertOutcome, ProviderError> {
		let client = self.client()?;
		let url = self.endpoint(UPSERT_PATH)?;
		let body = self.send(client.put(url).form(form)).await?;
		let response: UpsertResponse = serde_json::from_str(&body)?;
		Ok(response.into())
	}

	fn upsert_form(&self, monitor: &Monitor) -> UpsertForm {
		build_upsert_form(monitor, &self.contact_group)
	}

	/// The create form plus `TestID`, which turns the upsert into a modification.
	fn update_form(&self, monitor: &Monitor) -> Result<UpsertForm, ProviderError> {
		let id = remote_id(monitor)?;
		let mut form = self.upsert_form(monitor);
		form.add("TestID", id);
		Ok(form)
	}
}

fn remote_id(monitor: &Monitor) -> Result<&str, ProviderError> {
	if monitor.id.is_empty() {
		return Err(ProviderError::MissingId(monitor.name.clone()));
	}
	Ok(&monitor.id)
}

#[async_trait]
impl MonitorProvider for StatusCakeMonitorService {
	fn setup(&mut self, credentials: &Credentials) -> Result<(), ProviderError> {
		self.client = Some(reqwest::Client::builder().build()?);
		self.api_key = credentials.api_key.clone();
		self.api_url = credentials.api_url.clone();
		self.username = credentials.username.clone();
		self.contact_group = credentials.alert_contacts.clone();
		Ok(())
	}

	async fn try_get_all(&self) -> Result<Vec<Monitor>, ProviderError> {
		let client = self.client()?;
		let url = self.endpoint(TESTS_PATH)?;
		debug!(%url, "Listing StatusCake tests");
		let body = self.send(client.get(url)).await?;
		let tests: Vec<StatusCakeTest> = serde_json::from_str(&body)?;
		Ok(api_types::to_monitors(tests))
	}

	async fn try_add(&self, monitor: &Monitor) -> Result<UpsertOutcome, ProviderError> {
		debug!(name = %monitor.name, "Creating StatusCake test");
		self.upsert(&self.upsert_form(monitor)).await
	}

	async fn try_update(&self, monitor: &Monitor) -> Result<UpsertOutcome, ProviderError> {
		let form = self.update_form(monitor)?;
		debug!(name = %monitor.name, id = %monitor.id, "Updating StatusCake test");
		self.upsert(&form).await
	}

	async fn try_remove(&self, monitor: &Monitor) -> Result<UpsertOutcome, ProviderError> {
		let id = remote_id(monitor)?;
		let client = self.client()?;
		let mut url = self.endpoint(DETAILS_PATH)?;
		url.query_pairs_mut().append_pair("TestID", id);
		debug!(name = %monitor.name, %id, "Deleting StatusCake test");
		let body = self.send(client.delete(url)).await?;
		let response: UpsertResponse = serde_json::from_str(&body)?;
		Ok(response.into())
	}

	/// Always `false`, so every reconciliation pass pushes an update.
	///
	/// StatusCake's list endpoint doesn't return the full test config, so there is nothing to diff
	/// the desired state against without a per-test details call.
	// TODO: fetch `/API/Tests/Details` for `old.id` and compare the fields `build_upsert_form`
	// sends
	fn equal(&self, _old: &Monitor, _new: &Monitor) -> bool {
		false
	}
}
