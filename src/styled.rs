//! Styled text spans and their translation to terminal escape sequences.
//!
//! The renderer only deals with [Line]s made of [Span]s, a [Report] is turned
//! into ANSI output in a single place.

use std::io::{self, Write};

use crossterm::{
	cursor::MoveTo,
	queue,
	style::{Attribute, Color, ContentStyle},
	terminal::{Clear, ClearType},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// presentation of a span
pub struct Style {
	pub background: Option<Color>,
	pub foreground: Option<Color>,
	pub bold: bool,
}

impl Style {
	pub const PLAIN: Self = Self {
		background: None,
		foreground: None,
		bold: false,
	};

	pub const BOLD: Self = Self {
		background: None,
		foreground: None,
		bold: true,
	};

	fn to_content_style(self) -> ContentStyle {
		let mut style = ContentStyle::new();
		style.background_color = self.background;
		style.foreground_color = self.foreground;
		if self.bold {
			style.attributes.set(Attribute::Bold);
		}
		style
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
	pub text: String,
	pub style: Style,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// a single line of output without the trailing newline
pub struct Line(pub Vec<Span>);

impl Line {
	pub fn new() -> Self {
		Self(Vec::new())
	}

	pub fn plain(self, text: impl Into<String>) -> Self {
		self.styled(text, Style::PLAIN)
	}

	pub fn styled(mut self, text: impl Into<String>, style: Style) -> Self {
		self.0.push(Span {
			text: text.into(),
			style,
		});
		self
	}

	pub fn spans(&self) -> &[Span] {
		&self.0
	}

	/// the text of the line without any styling
	pub fn text(&self) -> String {
		self.0.iter().map(|span| span.text.as_str()).collect()
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// the complete output of one polling cycle
pub struct Report {
	/// wipe the terminal before printing
	pub clear_screen: bool,
	pub lines: Vec<Line>,
}

impl Report {
	/// Writes the report as ANSI styled text and flushes `out`.
	pub fn write_ansi<W: Write>(&self, out: &mut W) -> io::Result<()> {
		if self.clear_screen {
			queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
		}

		for line in &self.lines {
			for span in line.spans() {
				if span.style == Style::PLAIN {
					write!(out, "{}", span.text)?;
				} else {
					write!(out, "{}", span.style.to_content_style().apply(&span.text))?;
				}
			}
			writeln!(out)?;
		}

		out.flush()
	}

	/// the report without styling, one line per entry
	pub fn plain_text(&self) -> String {
		self.lines
			.iter()
			.map(|line| line.text() + "\n")
			.collect()
	}
}
