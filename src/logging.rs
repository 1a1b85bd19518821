use std::{env, io::IsTerminal, str::FromStr};

use color_eyre::eyre;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
	/// Compact, for humans
	Plain,
	/// One flattened JSON object per event, for log shippers
	Json,
}

impl FromStr for LogFormat {
	type Err = eyre::Report;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"plain" | "text" => Ok(Self::Plain),
			"json" => Ok(Self::Json),
			other => eyre::bail!("Unknown log format: {other}"),
		}
	}
}

impl LogFormat {
	/// `STATUSCAKE_LOG_FORMAT` when set, else plain on a terminal and JSON everywhere else.
	///
	/// # Errors
	///
	/// This function will return an error if `STATUSCAKE_LOG_FORMAT` holds an unknown format.
	pub fn detect() -> eyre::Result<Self> {
		match env::var("STATUSCAKE_LOG_FORMAT") {
			Ok(format) => format.parse(),
			Err(_) if std::io::stdout().is_terminal() => Ok(Self::Plain),
			Err(_) => Ok(Self::Json),
		}
	}
}

/// Installs the global subscriber. Verbosity follows `RUST_LOG`, default `info`.
///
/// # Errors
///
/// This function will return an error if a global subscriber is already installed.
pub fn init(format: LogFormat) -> eyre::Result<()> {
	use tracing_subscriber::fmt as layer_fmt;
	let (plain_log_format, json_log_format) = match format {
		LogFormat::Plain => (Some(layer_fmt::layer().compact()), None),
		LogFormat::Json => (None, Some(layer_fmt::layer().json().flatten_event(true))),
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	Registry::default()
		.with(filter)
		.with(plain_log_format)
		.with(json_log_format)
		.try_init()?;
	Ok(())
}
