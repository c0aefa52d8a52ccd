//! Concurrent polling of all alertmanagers.
//!
//! Every source gets exactly one request per cycle. Requests run concurrently
//! on a shared client and a failing source only affects its own outcome.

use std::time::Duration;

use anyhow::{Context, Result};
use futures::future::join_all;
use tracing::Instrument;

use crate::{alert::AlertGroup, error::FetchError, source::SourceDescriptor};

pub type FetchOutcome = Result<Vec<AlertGroup>, FetchError>;

/// result of polling one source during a cycle
#[derive(Debug)]
pub struct SourceOutcome<'a> {
	pub source: &'a SourceDescriptor,
	pub outcome: FetchOutcome,
}

/// Outcomes of all sources of one cycle, in configured order. Built once the
/// last request settled and never modified afterwards.
pub type CycleResult<'a> = Vec<SourceOutcome<'a>>;

#[derive(Debug, Clone)]
pub struct Fetcher {
	client: reqwest::Client,
}

impl Fetcher {
	/// Constructs a fetcher whose requests each give up after `timeout`.
	pub fn new(timeout: Duration) -> Result<Self> {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
			.build()
			.context("failed to build http client")?;

		Ok(Self { client })
	}

	/// Polls all sources concurrently and waits until every request succeeded
	/// or failed.
	pub async fn fetch_all<'a>(&self, sources: &'a [SourceDescriptor]) -> CycleResult<'a> {
		let requests = sources.iter().map(|source| {
			let span = tracing::debug_span!("fetch", source = %source.name);
			async move {
				let outcome = self.fetch(source).await;
				if let Err(err) = &outcome {
					tracing::warn!("fetching alerts failed: {}", err);
				}
				SourceOutcome { source, outcome }
			}
			.instrument(span)
		});

		join_all(requests).await
	}

	/// Fetches the active alert groups of a single source.
	pub async fn fetch(&self, source: &SourceDescriptor) -> FetchOutcome {
		let url = source
			.groups_url()
			.ok_or_else(|| FetchError::InvalidUrl(source.url.to_string()))?;

		let response = self.client.get(url).send().await?;

		let status = response.status();
		if !status.is_success() {
			return Err(FetchError::Status(status));
		}

		let body = response.bytes().await?;
		let groups: Vec<AlertGroup> = serde_json::from_slice(&body)?;

		tracing::debug!(groups = groups.len(), "fetched alert groups");

		Ok(groups)
	}
}
