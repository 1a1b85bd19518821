use serde::{Deserialize, Serialize};

use crate::{monitor::Monitor, provider::UpsertOutcome};

/// One entry of `GET /API/Tests/`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct StatusCakeTest {
	#[serde(rename = "TestID")]
	pub test_id: i64,
	pub website_name: String,
	#[serde(rename = "WebsiteURL")]
	pub website_url: String,
	#[serde(default)]
	pub paused: bool,
	#[serde(default)]
	pub test_type: String,
	#[serde(default)]
	pub status: String,
	#[serde(default)]
	pub uptime: f64,
}

/// Body of `PUT /API/Tests/Update` and `DELETE /API/Tests/Details` responses.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct UpsertResponse {
	#[serde(rename = "Success", alias = "success")]
	pub success: bool,
	#[serde(rename = "InsertID", alias = "insert_id", default)]
	pub insert_id: Option<i64>,
	#[serde(rename = "Message", alias = "message", default)]
	pub message: Option<String>,
}

impl From<StatusCakeTest> for Monitor {
	fn from(test: StatusCakeTest) -> Self {
		Monitor::new(test.website_name, test.website_url).with_id(test.test_id.to_string())
	}
}

impl From<UpsertResponse> for UpsertOutcome {
	fn from(response: UpsertResponse) -> Self {
		Self {
			success: response.success,
			insert_id: response.insert_id.map(|id| id.to_string()),
			message: response.message.filter(|message| !message.is_empty()),
		}
	}
}

pub fn to_monitors(tests: Vec<StatusCakeTest>) -> Vec<Monitor> {
	tests.into_iter().map(Monitor::from).collect()
}
