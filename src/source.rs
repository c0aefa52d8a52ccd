//! config file options for an alertmanager to poll

use serde::Deserialize;
use url::Url;

use crate::matcher::Patterns;

/// path of the alert groups endpoint, relative to the source url
const GROUPS_PATH: [&str; 4] = ["api", "v2", "alerts", "groups"];

#[derive(Debug, Clone, Deserialize)]
#[serde(from = "SourceSettings")]
/// an alertmanager polled every cycle
pub struct SourceDescriptor {
	/// label printed above the alerts of this source
	pub name: String,
	/// base url of the alertmanager
	pub url: Url,
	/// receiver filters, `None` shows the groups of every receiver
	pub receivers: Option<Patterns>,
}

#[derive(Debug, Deserialize)]
struct SourceSettings {
	name: Option<String>,
	url: Url,
	// config lowercases keys, so no camelCase alias
	#[serde(alias = "receiver_filters")]
	receivers: Option<Patterns>,
}

impl From<SourceSettings> for SourceDescriptor {
	fn from(settings: SourceSettings) -> Self {
		let name = settings.name.unwrap_or_else(|| name_from_url(&settings.url));

		Self {
			name,
			url: settings.url,
			receivers: settings.receivers,
		}
	}
}

impl SourceDescriptor {
	/// source given on the command line, named after its host
	pub fn from_url(url: Url) -> Self {
		Self {
			name: name_from_url(&url),
			url,
			receivers: None,
		}
	}

	/// Url of the alert groups endpoint, restricted to active alerts that are
	/// neither silenced nor inhibited. Returns [None] if the url can't have a
	/// path (e.g. `mailto:`).
	pub fn groups_url(&self) -> Option<Url> {
		let mut url = self.url.clone();

		url.path_segments_mut()
			.ok()?
			.pop_if_empty()
			.extend(GROUPS_PATH);

		url.query_pairs_mut()
			.clear()
			.append_pair("silenced", "false")
			.append_pair("inhibited", "false")
			.append_pair("active", "true");

		Some(url)
	}
}

/// `host[:port]` of the url, the whole url if it has no host
fn name_from_url(url: &Url) -> String {
	match (url.host_str(), url.port()) {
		(Some(host), Some(port)) => format!("{host}:{port}"),
		(Some(host), None) => host.to_string(),
		(None, _) => url.to_string(),
	}
}
