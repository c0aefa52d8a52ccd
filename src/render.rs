//! Turns the outcomes of a polling cycle into a [Report].
//!
//! Summary mode prints one line per alert group and clears the screen before
//! every report. Detail mode prints every selected alert together with its
//! annotations, labels and generator url.

use chrono::{DateTime, Local, Utc};
use crossterm::style::Color;

use crate::{
	alert::{Alert, AlertGroup},
	classifier::classify,
	fetcher::CycleResult,
	matcher::{self, DisplayMode},
	styled::{Line, Report, Style},
};

const ERROR_STYLE: Style = Style {
	background: None,
	foreground: Some(Color::DarkRed),
	bold: false,
};

#[derive(Debug, Clone)]
pub struct Renderer {
	mode: DisplayMode,
}

impl Renderer {
	pub fn new(mode: DisplayMode) -> Self {
		Self { mode }
	}

	pub fn mode(&self) -> &DisplayMode {
		&self.mode
	}

	/// Renders a cycle. Sources keep their configured order, groups and alerts
	/// the order the alertmanager returned them in.
	///
	/// # Arguments
	///
	/// * `cycle` - outcomes of all sources
	///
	/// * `now` - reference time for the freshness of alerts and the update line
	pub fn render(&self, cycle: &CycleResult<'_>, now: DateTime<Utc>) -> Report {
		let mut lines = vec![Line::new().plain(format!(
			"Last Update: {}",
			now.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
		))];

		for outcome in cycle {
			let source = outcome.source;

			let groups = match &outcome.outcome {
				Ok(groups) => groups,
				Err(err) => {
					lines.push(Line::new());
					lines.push(
						Line::new()
							.plain(format!("{}: ", source.name))
							.styled(err.to_string(), ERROR_STYLE),
					);
					continue;
				}
			};

			let selection = matcher::select(groups, source.receivers.as_ref(), &self.mode);
			if selection.is_empty() {
				continue;
			}

			lines.push(Line::new());
			lines.push(Line::new().plain(format!("{}:", source.name)));

			for selected in &selection {
				for alert in &selected.alerts {
					self.render_alert(&mut lines, selected.group, alert, now);
				}
			}
		}

		Report {
			clear_screen: !self.mode.is_detail(),
			lines,
		}
	}

	fn render_alert(&self, lines: &mut Vec<Line>, group: &AlertGroup, alert: &Alert, now: DateTime<Utc>) {
		let classified = alert
			.name()
			.and_then(|name| classify(alert, now).map(|classification| (name, classification)));

		let (name, classification) = match classified {
			Ok(classified) => classified,
			Err(err) => {
				tracing::debug!(receiver = %group.receiver.name, "malformed alert: {}", err);
				lines.push(
					Line::new()
						.plain("- ")
						.styled("malformed alert", ERROR_STYLE)
						.plain(format!(": {err}")),
				);
				return;
			}
		};

		let mut title = name.to_string();
		if !self.mode.is_detail() && group.alerts.len() > 1 {
			title.push_str(&format!("({})", group.alerts.len()));
		}

		lines.push(
			Line::new()
				.plain("- ")
				.styled(title, classification.style())
				.plain(format!(": {}", alert.summary())),
		);

		if !self.mode.is_detail() {
			return;
		}

		for (key, value) in alert.annotations.iter().chain(alert.labels.iter()) {
			lines.push(
				Line::new()
					.plain("  - ")
					.styled(title_case(key), Style::BOLD)
					.plain(format!(": {value}")),
			);
		}

		lines.push(
			Line::new()
				.plain("  - ")
				.styled("URL", Style::BOLD)
				.plain(format!(": {}", alert.generator_url)),
		);
	}
}

/// Upper cases the first letter of every word and lower cases the rest, any
/// non alphabetic character separates words (`runbook_url` -> `Runbook_Url`).
pub fn title_case(key: &str) -> String {
	let mut in_word = false;

	key.chars()
		.flat_map(|c| {
			let mapped: Vec<char> = if !c.is_alphabetic() {
				in_word = false;
				vec![c]
			} else if in_word {
				c.to_lowercase().collect()
			} else {
				in_word = true;
				c.to_uppercase().collect()
			};
			mapped
		})
		.collect()
}
