//! terminal monitor for prometheus alertmanagers
//!
//! Features:
//! - polls any number of alertmanagers concurrently, one failing alertmanager
//!   doesn't hide the alerts of the others
//! - summary mode: one severity colored line per alert group, refreshed every
//!   interval
//! - detail mode: annotations and labels of all matching alerts, printed once
//! - per alertmanager receiver filters

use std::io;

use anyhow::{Context, Result};
use settings::Settings;
use tokio_util::sync::CancellationToken;

use crate::{fetcher::Fetcher, render::Renderer, scheduler::Scheduler};

mod alert;
mod classifier;
mod error;
mod fetcher;
mod log;
mod matcher;
mod render;
mod scheduler;
mod settings;
mod source;
mod styled;
#[cfg(test)]
mod test_support;

/// exit the complete program if one thread panics
fn setup_panic_handler() {
	let default_panic = std::panic::take_hook();
	std::panic::set_hook(Box::new(move |info| {
		default_panic(info);
		std::process::exit(1);
	}));
}

/// the entry point of the program
#[tokio::main]
pub async fn main() -> Result<()> {
	setup_panic_handler();

	let settings = Settings::init().context("failed to load config and command line arguments")?;

	log::setup_logging().context("could not setup logging")?;

	if settings.sources.is_empty() {
		eprintln!("Requires config or sources\n");
		crate::settings::command()
			.print_help()
			.context("failed to print usage")?;
		std::process::exit(2);
	}

	let mode = settings.display_mode().context("invalid details pattern")?;
	let fetcher = Fetcher::new(settings.timeout)?;

	let scheduler = Scheduler::new(
		fetcher,
		Renderer::new(mode),
		settings.sources.clone(),
		settings.interval,
		io::stdout(),
	);

	let token = CancellationToken::new();
	tokio::spawn({
		let token = token.clone();
		async move {
			match tokio::signal::ctrl_c().await {
				Ok(()) => tracing::debug!("interrupted"),
				Err(err) => tracing::error!("failed to listen for ctrl-c: {}", err),
			}
			token.cancel();
		}
	});

	scheduler.run(token).await?;

	Ok(())
}
