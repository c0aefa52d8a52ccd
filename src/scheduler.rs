//! Drives the fetch, render, sleep cycle.
//!
//! In detail mode a single cycle is run. In summary mode cycles repeat every
//! interval until the cancellation token fires. Cycles never overlap.

use std::{io::Write, time::Duration};

use anyhow::{Context, Result};
use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::{fetcher::Fetcher, render::Renderer, source::SourceDescriptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
	/// fetch, render, done
	SingleShot,
	/// fetch, render, sleep `interval`, repeat
	Continuous { interval: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
	Running,
	Stopped,
}

pub struct Scheduler<W> {
	fetcher: Fetcher,
	renderer: Renderer,
	sources: Vec<SourceDescriptor>,
	mode: Mode,
	state: State,
	out: W,
}

impl<W: Write> Scheduler<W> {
	/// Constructs a scheduler writing its reports to `out`. The mode follows
	/// the display mode of the renderer, `interval` only matters in summary
	/// mode.
	pub fn new(
		fetcher: Fetcher,
		renderer: Renderer,
		sources: Vec<SourceDescriptor>,
		interval: Duration,
		out: W,
	) -> Self {
		let mode = if renderer.mode().is_detail() {
			Mode::SingleShot
		} else {
			Mode::Continuous { interval }
		};

		Self {
			fetcher,
			renderer,
			sources,
			mode,
			state: State::Running,
			out,
		}
	}

	pub fn mode(&self) -> Mode {
		self.mode
	}

	/// Runs cycles until the scheduler stops and returns the number of
	/// completed cycles. `token` is checked before every cycle, while fetching
	/// and while sleeping, a cycle interrupted while fetching isn't rendered.
	pub async fn run(mut self, token: CancellationToken) -> Result<u64> {
		let mut cycles = 0;

		tracing::info!(mode = ?self.mode(), sources = self.sources.len(), "starting");

		while self.state == State::Running {
			if token.is_cancelled() {
				self.state = State::Stopped;
				break;
			}

			let cycle = tokio::select! {
				_ = token.cancelled() => {
					self.state = State::Stopped;
					break;
				}
				cycle = self.fetcher.fetch_all(&self.sources) => cycle,
			};

			let report = self.renderer.render(&cycle, Utc::now());
			report
				.write_ansi(&mut self.out)
				.context("failed to write report")?;

			cycles += 1;
			tracing::debug!(cycle = cycles, "rendered");
			tracing::trace!("report:\n{}", report.plain_text());

			self.state = match self.mode {
				Mode::SingleShot => State::Stopped,
				Mode::Continuous { interval } => {
					tokio::select! {
						_ = token.cancelled() => State::Stopped,
						_ = tokio::time::sleep(interval) => State::Running,
					}
				}
			};
		}

		tracing::info!(cycles, "stopped");

		Ok(cycles)
	}
}
