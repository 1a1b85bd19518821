use color_eyre::eyre;
use statuscake_monitor::{config, logging, MonitorProvider, StatusCakeMonitorService};
use tracing::info;

/// Checks that the configured StatusCake account is reachable by listing its tests.
#[tokio::main]
async fn main() -> eyre::Result<()> {
	color_eyre::install()?;
	logging::init(logging::LogFormat::detect()?)?;

	let credentials = config::new()?;
	let service = StatusCakeMonitorService::new(&credentials)?;

	let monitors = service.try_get_all().await?;
	info!(count = monitors.len(), "Fetched StatusCake tests");
	for monitor in &monitors {
		info!(name = %monitor.name, id = %monitor.id, url = %monitor.url, "Found monitor");
	}
	Ok(())
}
