//! error types shared between fetching, matching and rendering

use reqwest::StatusCode;
use thiserror::Error;

/// Reasons a single source could not deliver its alert groups for a cycle.
///
/// These never leave the cycle they occured in, the renderer shows them in
/// place of the source's alerts.
#[derive(Error, Debug)]
pub enum FetchError {
	/// the configured base url can't be extended with the api path
	#[error("invalid source url {0}")]
	InvalidUrl(String),
	/// connection failure, timeout or a broken response stream
	#[error("request failed: {0}")]
	Request(#[from] reqwest::Error),
	/// the alertmanager answered with a non 2xx status
	#[error("unexpected status {0}")]
	Status(StatusCode),
	/// the body isn't a list of alert groups
	#[error("malformed response body: {0}")]
	Decode(#[from] serde_json::Error),
}

/// An alert that lacks data the monitor relies on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlertDataError {
	#[error("missing label `{0}`")]
	MissingLabel(&'static str),
	#[error("missing startsAt timestamp")]
	MissingTimestamp,
	#[error("invalid startsAt timestamp `{value}`: {reason}")]
	InvalidTimestamp { value: String, reason: String },
}

/// A receiver or alert name filter that isn't a valid regular expression.
#[derive(Error, Debug)]
#[error("invalid pattern `{pattern}`: {source}")]
pub struct PatternError {
	pub pattern: String,
	#[source]
	pub source: regex::Error,
}
