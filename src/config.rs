use std::env;

use color_eyre::eyre::{self, WrapErr};
use redact::Secret;

use crate::provider::Credentials;

pub const DEFAULT_API_URL: &str = "https://app.statuscake.com";

/// Reads StatusCake credentials from the environment.
///
/// # Errors
///
/// This function will return an error if `STATUSCAKE_API_KEY` or `STATUSCAKE_USERNAME` is unset.
pub fn new() -> eyre::Result<Credentials> {
	let api_key = env::var("STATUSCAKE_API_KEY").wrap_err("STATUSCAKE_API_KEY must be set")?;
	let username = env::var("STATUSCAKE_USERNAME").wrap_err("STATUSCAKE_USERNAME must be set")?;
	let api_url = env::var("STATUSCAKE_API_URL").unwrap_or(DEFAULT_API_URL.into());
	let alert_contacts = env::var("STATUSCAKE_ALERT_CONTACTS").unwrap_or_default();
	Ok(Credentials {
		api_key: Secret::new(api_key),
		api_url,
		username,
		alert_contacts,
	})
}
