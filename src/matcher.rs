//! Decides which alert groups and alerts of a source end up on screen.
//!
//! Receiver filters and alert name filters are regular expressions that only
//! have to match at the start of the candidate, `team-a` keeps `team-a-oncall`
//! but `oncall` doesn't.

use std::fmt;

use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::{
	alert::{Alert, AlertGroup},
	error::PatternError,
};

/// alert names that are never displayed
pub const SUPPRESSED_ALERTS: [&str; 2] = ["InfoInhibitor", "Watchdog"];

/// ordered list of compiled, start anchored patterns
#[derive(Clone, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct Patterns(Vec<Regex>);

impl Patterns {
	/// compiles case sensitive patterns
	pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, PatternError> {
		Self::compile(patterns, false)
	}

	/// compiles patterns that ignore case, used for alert names
	pub fn case_insensitive<S: AsRef<str>>(patterns: &[S]) -> Result<Self, PatternError> {
		Self::compile(patterns, true)
	}

	fn compile<S: AsRef<str>>(patterns: &[S], case_insensitive: bool) -> Result<Self, PatternError> {
		patterns
			.iter()
			.map(|pattern| {
				RegexBuilder::new(pattern.as_ref())
					.case_insensitive(case_insensitive)
					.build()
					.map_err(|source| PatternError {
						pattern: pattern.as_ref().to_string(),
						source,
					})
			})
			.collect::<Result<Vec<_>, _>>()
			.map(Self)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// index of the first pattern matching at the start of `candidate`.
	/// Patterns after the first hit are never evaluated.
	pub fn first_match(&self, candidate: &str) -> Option<usize> {
		self.0.iter().position(|regex| {
			// leftmost-first search, so a match at 0 is found whenever one exists
			regex.find(candidate).map_or(false, |m| m.start() == 0)
		})
	}

	pub fn matches(&self, candidate: &str) -> bool {
		self.first_match(candidate).is_some()
	}
}

impl TryFrom<Vec<String>> for Patterns {
	type Error = PatternError;

	fn try_from(patterns: Vec<String>) -> Result<Self, Self::Error> {
		Self::new(patterns.as_slice())
	}
}

impl fmt::Debug for Patterns {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.0.iter().map(Regex::as_str)).finish()
	}
}

/// How alerts are displayed, fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub enum DisplayMode {
	/// one line per alert group, refreshed every interval
	Summary,
	/// every alert with annotations and labels, printed once. An empty
	/// pattern list shows all alerts.
	Detail(Patterns),
}

impl DisplayMode {
	pub fn is_detail(&self) -> bool {
		matches!(self, Self::Detail(_))
	}
}

/// a group that survived filtering together with the alerts to display
#[derive(Debug)]
pub struct Selection<'a> {
	pub group: &'a AlertGroup,
	pub alerts: Vec<&'a Alert>,
}

pub fn is_suppressed(alert: &Alert) -> bool {
	alert
		.name()
		.map_or(false, |name| SUPPRESSED_ALERTS.contains(&name))
}

/// Filters the groups of one source. Groups without any displayable alert are
/// left out.
///
/// # Arguments
///
/// * `groups` - groups in the order the alertmanager returned them
///
/// * `receivers` - receiver filters of the source, `None` keeps every group
///
/// * `mode` - display mode, carries the alert name filters
pub fn select<'a>(
	groups: &'a [AlertGroup],
	receivers: Option<&Patterns>,
	mode: &DisplayMode,
) -> Vec<Selection<'a>> {
	groups
		.iter()
		.filter(|group| match receivers {
			Some(receivers) => {
				let keep = receivers.matches(&group.receiver.name);
				if !keep {
					tracing::trace!(receiver = %group.receiver.name, "receiver filtered");
				}
				keep
			}
			None => true,
		})
		.filter_map(|group| {
			let alerts = select_alerts(group, mode);
			(!alerts.is_empty()).then(|| Selection { group, alerts })
		})
		.collect()
}

fn select_alerts<'a>(group: &'a AlertGroup, mode: &DisplayMode) -> Vec<&'a Alert> {
	let mut selected = Vec::new();

	for alert in &group.alerts {
		if let DisplayMode::Detail(names) = mode {
			if !names.is_empty() && !name_matches(names, alert) {
				continue;
			}
		}

		if is_suppressed(alert) {
			match mode {
				// the first meaningful alert represents the group, a suppressed
				// one ends the scan
				DisplayMode::Summary => break,
				DisplayMode::Detail(_) => continue,
			}
		}

		selected.push(alert);

		if !mode.is_detail() {
			break;
		}
	}

	selected
}

/// alerts without a name pass so they get reported as malformed
fn name_matches(names: &Patterns, alert: &Alert) -> bool {
	alert.name().map_or(true, |name| names.matches(name))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_support::{alert, group};

	fn names<'a>(selection: &[Selection<'a>]) -> Vec<Vec<&'a str>> {
		selection
			.iter()
			.map(|s| s.alerts.iter().map(|a| a.name().unwrap()).collect())
			.collect()
	}

	#[test]
	fn patterns_match_prefix_only() {
		let patterns = Patterns::new(&["team"]).unwrap();
		assert!(patterns.matches("team-a"));
		assert!(patterns.matches("team"));
		assert!(!patterns.matches("my-team"));

		let patterns = Patterns::new(&["team-(a|b)$"]).unwrap();
		assert!(patterns.matches("team-b"));
		assert!(!patterns.matches("team-b-oncall"));
	}

	#[test]
	fn first_matching_pattern_wins() {
		let patterns = Patterns::new(&["team-a", "team-b", "team"]).unwrap();

		assert_eq!(patterns.first_match("team-a-oncall"), Some(0));
		assert_eq!(patterns.first_match("team-b"), Some(1));
		assert_eq!(patterns.first_match("team-c"), Some(2));
		assert_eq!(patterns.first_match("ops"), None);
	}

	#[test]
	fn empty_pattern_list_matches_nothing() {
		let patterns = Patterns::new::<&str>(&[]).unwrap();
		assert!(patterns.is_empty());
		assert!(!patterns.matches("anything"));
	}

	#[test]
	fn case_insensitive_patterns() {
		let patterns = Patterns::case_insensitive(&["highcpu"]).unwrap();
		assert!(patterns.matches("HighCPU"));
		assert!(!Patterns::new(&["highcpu"]).unwrap().matches("HighCPU"));
	}

	#[test]
	fn invalid_pattern_is_rejected() {
		let err = Patterns::new(&["ok", "("]).unwrap_err();
		assert_eq!(err.pattern, "(");
	}

	#[test]
	fn receiver_filters_keep_prefix_matches() {
		let groups = vec![
			group("team-a-oncall", vec![alert("A", "critical")]),
			group("team-c", vec![alert("C", "critical")]),
			group("team-b", vec![alert("B", "warning")]),
		];
		let receivers = Patterns::new(&["team-a", "team-b"]).unwrap();

		let selection = select(&groups, Some(&receivers), &DisplayMode::Summary);
		assert_eq!(names(&selection), [vec!["A"], vec!["B"]]);
	}

	#[test]
	fn no_receiver_filters_keep_every_group() {
		let groups = vec![
			group("team-a", vec![alert("A", "critical")]),
			group("team-c", vec![alert("C", "critical")]),
		];

		let selection = select(&groups, None, &DisplayMode::Summary);
		assert_eq!(selection.len(), 2);
	}

	#[test]
	fn summary_picks_first_alert_of_group() {
		let groups = vec![group(
			"default",
			vec![alert("A", "critical"), alert("B", "critical"), alert("C", "info")],
		)];

		let selection = select(&groups, None, &DisplayMode::Summary);
		assert_eq!(names(&selection), [vec!["A"]]);
	}

	#[test]
	fn suppressed_alert_ends_summary_scan() {
		let groups = vec![
			group("default", vec![alert("Watchdog", "none"), alert("A", "critical")]),
			group("other", vec![alert("B", "warning"), alert("InfoInhibitor", "none")]),
		];

		let selection = select(&groups, None, &DisplayMode::Summary);
		assert_eq!(names(&selection), [vec!["B"]]);
	}

	#[test]
	fn suppressed_alerts_are_skipped_in_detail_mode() {
		let groups = vec![group(
			"default",
			vec![alert("Watchdog", "none"), alert("A", "critical"), alert("B", "warning")],
		)];
		let mode = DisplayMode::Detail(Patterns::new::<&str>(&[]).unwrap());

		let selection = select(&groups, None, &mode);
		assert_eq!(names(&selection), [vec!["A", "B"]]);
	}

	#[test]
	fn group_of_suppressed_alerts_renders_nothing() {
		let groups = vec![group(
			"default",
			vec![alert("Watchdog", "none"), alert("InfoInhibitor", "none")],
		)];

		assert!(select(&groups, None, &DisplayMode::Summary).is_empty());

		let detail = DisplayMode::Detail(Patterns::new::<&str>(&[]).unwrap());
		assert!(select(&groups, None, &detail).is_empty());
	}

	#[test]
	fn detail_filters_match_alert_names_ignoring_case() {
		let groups = vec![group(
			"default",
			vec![
				alert("HighCPU", "critical"),
				alert("DiskFull", "warning"),
				alert("highMemory", "warning"),
			],
		)];
		let mode = DisplayMode::Detail(Patterns::case_insensitive(&["high"]).unwrap());

		let selection = select(&groups, None, &mode);
		assert_eq!(names(&selection), [vec!["HighCPU", "highMemory"]]);
	}

	#[test]
	fn unnamed_alerts_pass_name_filters() {
		let mut unnamed = alert("x", "critical");
		unnamed.labels.remove("alertname");
		let groups = vec![group("default", vec![unnamed])];
		let mode = DisplayMode::Detail(Patterns::case_insensitive(&["high"]).unwrap());

		let selection = select(&groups, None, &mode);
		assert_eq!(selection.len(), 1);
		assert!(selection[0].alerts[0].name().is_err());
	}
}
