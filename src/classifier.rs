//! Severity and age of an alert, and the style they map to.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use crossterm::style::Color;

use crate::{alert::Alert, error::AlertDataError, styled::Style};

/// alerts that started firing at most this many seconds ago are fresh
pub const FRESH_FOR_SECS: i64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
	Critical,
	Warning,
	Info,
	/// severities we don't know how to color
	Other,
}

impl Severity {
	/// The first of `critical`, `warning` and `info` contained in the label
	/// decides, so `page-critical` is critical.
	pub fn from_label(label: &str) -> Self {
		let label = label.to_lowercase();

		if label.contains("critical") {
			Self::Critical
		} else if label.contains("warning") {
			Self::Warning
		} else if label.contains("info") {
			Self::Info
		} else {
			Self::Other
		}
	}

	fn color(self) -> Option<Color> {
		match self {
			Self::Critical => Some(Color::DarkRed),
			Self::Warning => Some(Color::DarkYellow),
			Self::Info => Some(Color::DarkBlue),
			Self::Other => None,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
	pub severity: Severity,
	pub fresh: bool,
}

impl Classification {
	/// Fresh alerts get a colored background, older ones only a colored name.
	pub fn style(&self) -> Style {
		match (self.severity.color(), self.fresh) {
			(Some(color), true) => Style {
				background: Some(color),
				foreground: Some(Color::Black),
				bold: true,
			},
			(Some(color), false) => Style {
				background: None,
				foreground: Some(color),
				bold: true,
			},
			(None, _) => Style::BOLD,
		}
	}
}

pub fn is_fresh(starts_at: DateTime<FixedOffset>, now: DateTime<Utc>) -> bool {
	now.signed_duration_since(starts_at) <= Duration::seconds(FRESH_FOR_SECS)
}

pub fn classify(alert: &Alert, now: DateTime<Utc>) -> Result<Classification, AlertDataError> {
	Ok(Classification {
		severity: Severity::from_label(alert.severity()?),
		fresh: is_fresh(alert.starts_at()?, now),
	})
}
