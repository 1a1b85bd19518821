//! Builds the url-encoded form StatusCake expects when creating or updating a test.
//!
//! Field presence matters to the remote API (no `ContactGroup` is not the same as an empty one),
//! so a field is either set from config, set from a default, or left out. Never sent empty.

use serde::Serialize;
use tracing::{info, warn};

use crate::{
	monitor::Monitor,
	secret::{EnvResolver, SecretRef, SecretResolver},
};

pub const DEFAULT_CHECK_RATE: i32 = 300;
pub const DEFAULT_TEST_TYPE: &str = "HTTP";

/// Status codes StatusCake should treat as "down" unless the monitor says otherwise.
/// Order and membership are relied upon by existing tests on the remote side, don't regenerate.
pub const DEFAULT_STATUS_CODES: &[&str] = &[
	"204", // No content
	"205", // Reset content
	"206", // Partial content
	"303", // See other
	"305", // Use proxy
	// https://en.wikipedia.org/wiki/List_of_HTTP_status_codes#4xx_Client_errors
	// https://support.cloudflare.com/hc/en-us/articles/115003014512/
	"400", "401", "402", "403", "404", "405", "406", "407", "408", "409", "410", "411", "412",
	"413", "414", "415", "416", "417", "418", "421", "422", "423", "424", "425", "426", "428",
	"429", "431", "444", "451", "499",
	// https://support.cloudflare.com/hc/en-us/articles/115003011431/
	"500", "501", "502", "503", "504", "505", "506", "507", "508", "509", "510", "511", "520",
	"521", "522", "523", "524", "525", "526", "527", "530", "598", "599",
];

/// Ordered, possibly repeating, key/value pairs. Serializes as `application/x-www-form-urlencoded`.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct UpsertForm(Vec<(&'static str, String)>);

impl UpsertForm {
	pub fn add(&mut self, key: &'static str, value: impl Into<String>) {
		self.0.push((key, value.into()));
	}

	/// First value for `key`
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0
			.iter()
			.find(|(k, _)| *k == key)
			.map(|(_, v)| v.as_str())
	}

	pub fn contains(&self, key: &str) -> bool {
		self.get(key).is_some()
	}

	pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.0.iter().map(|(k, _)| *k)
	}
}

/// Form for `monitor`, with basic auth passwords looked up in the process environment.
pub fn build_upsert_form(monitor: &Monitor, contact_group: &str) -> UpsertForm {
	build_upsert_form_with(monitor, contact_group, &EnvResolver)
}

/// `contact_group` is the adapter wide fallback, used only when the monitor doesn't name one.
pub fn build_upsert_form_with<R: SecretResolver + ?Sized>(
	monitor: &Monitor,
	contact_group: &str,
	secrets: &R,
) -> UpsertForm {
	let mut form = UpsertForm::default();
	form.add("WebsiteName", monitor.name.as_str());
	form.add("WebsiteURL", unescape_url(&monitor.url));

	let config = monitor.statuscake_config().cloned().unwrap_or_default();

	let check_rate = if config.check_rate > 0 {
		config.check_rate
	} else {
		DEFAULT_CHECK_RATE
	};
	form.add("CheckRate", check_rate.to_string());

	if config.test_type.is_empty() {
		form.add("TestType", DEFAULT_TEST_TYPE);
	} else {
		form.add("TestType", config.test_type);
	}

	if !config.contact_group.is_empty() {
		form.add("ContactGroup", config.contact_group);
	} else if !contact_group.is_empty() {
		form.add("ContactGroup", contact_group);
	}

	if !config.test_tags.is_empty() {
		form.add("TestTags", config.test_tags);
	}

	if !config.basic_auth_user.is_empty() {
		// The username doubles as the name of the env var holding its password
		let user = SecretRef::new(config.basic_auth_user);
		match user.resolve(secrets) {
			Some(password) => {
				info!(
					user = user.name(),
					"Basic auth requirement detected, setting username and password"
				);
				form.add("BasicUser", user.name());
				form.add("BasicPass", password.expose_secret().as_str());
			},
			None => warn!(
				user = user.name(),
				"Unable to read basic auth password, creating monitor without basic auth"
			),
		}
	}

	if config.status_codes.is_empty() {
		form.add("StatusCodes", DEFAULT_STATUS_CODES.join(","));
	} else {
		form.add("StatusCodes", config.status_codes);
	}

	for (key, enabled) in [
		("Paused", config.paused),
		("FollowRedirect", config.follow_redirect),
		("EnableSSLAlert", config.enable_ssl_alert),
		("RealBrowser", config.real_browser),
	] {
		if enabled {
			form.add(key, "1");
		}
	}

	if !config.ping_url.is_empty() {
		form.add("PingURL", config.ping_url);
	}
	if !config.node_locations.is_empty() {
		form.add("NodeLocations", config.node_locations);
	}

	for (key, value) in [
		("TriggerRate", config.trigger_rate),
		("Port", config.port),
		("Confirmation", config.confirmation),
	] {
		if value > 0 {
			form.add(key, value.to_string());
		}
	}

	form
}

/// Query-unescapes `url`. A malformed `%` escape or a non UTF-8 result leaves `url` untouched.
fn unescape_url(url: &str) -> String {
	if !has_well_formed_escapes(url) {
		return url.to_string();
	}
	urlencoding::decode(&url.replace('+', " "))
		.map(|decoded| decoded.into_owned())
		.unwrap_or_else(|_| url.to_string())
}

/// Every `%` must be followed by two hex digits.
fn has_well_formed_escapes(url: &str) -> bool {
	let bytes = url.as_bytes();
	bytes.iter().enumerate().all(|(i, b)| {
		*b != b'%'
			|| bytes
				.get(i + 1..i + 3)
				.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::monitor::{ProviderConfig, StatusCakeConfig};

	fn no_secrets(_: &str) -> Option<String> {
		None
	}

	fn with_config(config: StatusCakeConfig) -> Monitor {
		Monitor::new("frontpage", "https://example.com")
			.with_config(ProviderConfig::StatusCake(config))
	}

	#[test]
	fn defaults_without_config() {
		let monitor = Monitor::new("frontpage", "https://example.com");
		let form = build_upsert_form_with(&monitor, "", &no_secrets);

		assert_eq!(form.get("WebsiteName"), Some("frontpage"));
		assert_eq!(form.get("WebsiteURL"), Some("https://example.com"));
		assert_eq!(form.get("CheckRate"), Some("300"));
		assert_eq!(form.get("TestType"), Some("HTTP"));
		assert!(!form.contains("ContactGroup"));
		assert_eq!(
			form.keys().collect::<Vec<_>>(),
			vec!["WebsiteName", "WebsiteURL", "CheckRate", "TestType", "StatusCodes"]
		);
	}

	#[test]
	fn default_status_codes_are_joined_in_order() {
		let form = build_upsert_form_with(&Monitor::new("a", "https://a.example"), "", &no_secrets);
		let codes = form.get("StatusCodes").unwrap();

		assert_eq!(DEFAULT_STATUS_CODES.len(), 59);
		assert!(codes.starts_with("204,205,206,303,305,400,401,"));
		assert!(codes.contains(",418,421,"));
		assert!(codes.contains(",499,500,"));
		assert!(codes.ends_with(",527,530,598,599"));
		assert_eq!(codes.split(',').collect::<Vec<_>>(), DEFAULT_STATUS_CODES);
	}

	#[test]
	fn adapter_contact_group_is_fallback_only() {
		let monitor = Monitor::new("a", "https://a.example");
		let form = build_upsert_form_with(&monitor, "1234", &no_secrets);
		assert_eq!(form.get("ContactGroup"), Some("1234"));

		let monitor = with_config(StatusCakeConfig {
			contact_group: "5678".to_string(),
			..StatusCakeConfig::default()
		});
		let form = build_upsert_form_with(&monitor, "1234", &no_secrets);
		assert_eq!(form.get("ContactGroup"), Some("5678"));
	}

	#[test]
	fn non_positive_check_rate_falls_back_to_default() {
		for check_rate in [0, -1, -300] {
			let monitor = with_config(StatusCakeConfig {
				check_rate,
				..StatusCakeConfig::default()
			});
			let form = build_upsert_form_with(&monitor, "", &no_secrets);
			assert_eq!(form.get("CheckRate"), Some("300"));
		}

		let monitor = with_config(StatusCakeConfig {
			check_rate: 60,
			..StatusCakeConfig::default()
		});
		assert_eq!(build_upsert_form_with(&monitor, "", &no_secrets).get("CheckRate"), Some("60"));
	}

	#[test]
	fn basic_auth_is_attached_when_password_resolves() {
		let monitor = with_config(StatusCakeConfig {
			basic_auth_user: "FRONTPAGE_USER".to_string(),
			..StatusCakeConfig::default()
		});
		let secrets = |name: &str| (name == "FRONTPAGE_USER").then(|| "secret123".to_string());
		let form = build_upsert_form_with(&monitor, "", &secrets);

		assert_eq!(form.get("BasicUser"), Some("FRONTPAGE_USER"));
		assert_eq!(form.get("BasicPass"), Some("secret123"));
	}

	#[test]
	fn basic_auth_is_skipped_when_password_is_missing_or_empty() {
		let monitor = with_config(StatusCakeConfig {
			basic_auth_user: "FRONTPAGE_USER".to_string(),
			..StatusCakeConfig::default()
		});

		for form in [
			build_upsert_form_with(&monitor, "", &no_secrets),
			build_upsert_form_with(&monitor, "", &|_: &str| Some(String::new())),
			build_upsert_form(&monitor, ""),
		] {
			assert!(!form.contains("BasicUser"));
			assert!(!form.contains("BasicPass"));
		}
	}

	#[test]
	fn false_flags_are_omitted() {
		let monitor = with_config(StatusCakeConfig::default());
		let form = build_upsert_form_with(&monitor, "", &no_secrets);
		for flag in ["Paused", "FollowRedirect", "EnableSSLAlert", "RealBrowser"] {
			assert!(!form.contains(flag), "{flag} should be absent");
		}
	}

	#[test]
	fn full_config_is_passed_through() {
		let monitor = with_config(StatusCakeConfig {
			check_rate: 60,
			test_type: "HEAD".to_string(),
			test_tags: "prod,web".to_string(),
			status_codes: "500,503".to_string(),
			paused: true,
			follow_redirect: true,
			enable_ssl_alert: true,
			real_browser: true,
			ping_url: "https://ping.example.com".to_string(),
			node_locations: "UK1,US2".to_string(),
			trigger_rate: 5,
			port: 8443,
			confirmation: 2,
			..StatusCakeConfig::default()
		});
		let form = build_upsert_form_with(&monitor, "", &no_secrets);

		assert_eq!(form.get("TestType"), Some("HEAD"));
		assert_eq!(form.get("TestTags"), Some("prod,web"));
		assert_eq!(form.get("StatusCodes"), Some("500,503"));
		for flag in ["Paused", "FollowRedirect", "EnableSSLAlert", "RealBrowser"] {
			assert_eq!(form.get(flag), Some("1"));
		}
		assert_eq!(form.get("PingURL"), Some("https://ping.example.com"));
		assert_eq!(form.get("NodeLocations"), Some("UK1,US2"));
		assert_eq!(form.get("TriggerRate"), Some("5"));
		assert_eq!(form.get("Port"), Some("8443"));
		assert_eq!(form.get("Confirmation"), Some("2"));
	}

	#[test]
	fn zero_numeric_fields_are_omitted() {
		let monitor = with_config(StatusCakeConfig::default());
		let form = build_upsert_form_with(&monitor, "", &no_secrets);
		for key in ["TriggerRate", "Port", "Confirmation", "PingURL", "NodeLocations", "TestTags"] {
			assert!(!form.contains(key), "{key} should be absent");
		}
	}

	#[test]
	fn website_url_is_unescaped() {
		let monitor = Monitor::new("a", "https%3A%2F%2Fexample.com%2Fhealth%3Fa%3Db+c");
		let form = build_upsert_form_with(&monitor, "", &no_secrets);
		assert_eq!(form.get("WebsiteURL"), Some("https://example.com/health?a=b c"));
	}

	#[test]
	fn malformed_escapes_leave_url_raw() {
		for raw in [
			"https://example.com/a+b%zz",
			"https://example.com/health%2",
			"https://example.com/%",
			"https://example.com/a%2Fb%g1",
		] {
			let form = build_upsert_form_with(&Monitor::new("a", raw), "", &no_secrets);
			assert_eq!(form.get("WebsiteURL"), Some(raw));
		}
	}

	#[test]
	fn undecodable_url_is_sent_raw() {
		// %FF alone isn't valid UTF-8
		let monitor = Monitor::new("a", "https://example.com/%FF");
		let form = build_upsert_form_with(&monitor, "", &no_secrets);
		assert_eq!(form.get("WebsiteURL"), Some("https://example.com/%FF"));
	}
}
