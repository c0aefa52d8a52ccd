//! data structures for deserializing alert groups returned by the alertmanager
//! `/api/v2/alerts/groups` endpoint
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::AlertDataError;

/// label holding the name of an alert
pub const ALERTNAME: &str = "alertname";
/// label holding the severity of an alert
pub const SEVERITY: &str = "severity";
/// annotation shown next to the alert name
pub const SUMMARY: &str = "summary";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
/// alerts sharing a routing receiver
pub struct AlertGroup {
	pub receiver: Receiver,
	#[serde(default)]
	pub alerts: Vec<Alert>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Receiver {
	pub name: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// a single firing alert, labels and annotations keep the order of the payload
pub struct Alert {
	#[serde(default)]
	pub labels: IndexMap<String, String>,
	#[serde(default)]
	pub annotations: IndexMap<String, String>,
	/// kept verbatim so one bad or missing timestamp doesn't reject the whole
	/// source
	#[serde(default)]
	pub starts_at: Option<String>,
	#[serde(rename = "generatorURL", default)]
	pub generator_url: String,
}

impl Alert {
	pub fn name(&self) -> Result<&str, AlertDataError> {
		self.label(ALERTNAME)
	}

	pub fn severity(&self) -> Result<&str, AlertDataError> {
		self.label(SEVERITY)
	}

	/// the summary annotation, empty if the alert has none
	pub fn summary(&self) -> &str {
		self.annotations.get(SUMMARY).map(String::as_str).unwrap_or_default()
	}

	pub fn starts_at(&self) -> Result<DateTime<FixedOffset>, AlertDataError> {
		let value = self.starts_at.as_deref().ok_or(AlertDataError::MissingTimestamp)?;

		DateTime::parse_from_rfc3339(value).map_err(|err| AlertDataError::InvalidTimestamp {
			value: value.to_string(),
			reason: err.to_string(),
		})
	}

	fn label(&self, key: &'static str) -> Result<&str, AlertDataError> {
		self.labels
			.get(key)
			.map(String::as_str)
			.ok_or(AlertDataError::MissingLabel(key))
	}
}
