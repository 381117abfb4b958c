use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Map the number of `-v` flags to a default filter directive.
pub fn verbosity_filter(verbose: u8) -> &'static str {
	match verbose {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	}
}

/// Install a stderr subscriber. `RUST_LOG` takes precedence over `verbose`.
pub fn setup_logging(verbose: u8) -> Result<()> {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(verbosity_filter(verbose)));

	let stderr_layer = fmt::layer()
		.with_target(true)
		.with_level(true)
		.with_writer(std::io::stderr);

	let subscriber = tracing_subscriber::registry()
		.with(filter)
		.with(stderr_layer);

	tracing::subscriber::set_global_default(subscriber)
		.context("Failed to set tracing subscriber")?;

	tracing::debug!(filter = verbosity_filter(verbose), "logging initialized");

	Ok(())
}
