//! Status decoration for terminal output
//!
//! `Painter` is a plain `Copy` value: it knows whether colour is enabled and nothing else.
//! Every status line in the pipeline goes through [`Painter::line`] so markers and colours stay
//! identical across checks regardless of which tool produced the result.

use anstyle::{AnsiColor, Color, Style};
use std::io::IsTerminal;

/// Colour mode requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorMode {
  /// Colour when stdout is a terminal and NO_COLOR is unset
  #[default]
  Auto,
  Always,
  Never,
}

/// What a line reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
  /// A step is starting
  Progress,
  Pass,
  /// Hard failure of a critical step
  Fail,
  /// Failure of a best-effort step, or a notice
  Warn,
  /// Captured tool output
  Info,
  /// Section banner
  Heading,
}

impl Status {
  /// Bracketed marker printed in front of status lines
  pub fn marker(self) -> &'static str {
    match self {
      Status::Progress => "[*]",
      Status::Pass => "[+]",
      Status::Fail => "[-]",
      Status::Warn => "[!]",
      Status::Info | Status::Heading => "",
    }
  }

  fn style(self) -> Style {
    match self {
      Status::Progress => Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlue))),
      Status::Pass => Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightGreen))),
      Status::Fail => Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightRed))),
      Status::Warn => Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightYellow))),
      Status::Info => Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightWhite))),
      Status::Heading => Style::new()
        .bold()
        .fg_color(Some(Color::Ansi(AnsiColor::BrightCyan))),
    }
  }
}

/// Stateless text decorator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Painter {
  color: bool,
}

impl Painter {
  /// Resolve a colour mode against the current environment
  pub fn new(mode: ColorMode) -> Self {
    let color = match mode {
      ColorMode::Always => true,
      ColorMode::Never => false,
      ColorMode::Auto => std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal(),
    };
    Self { color }
  }

  /// Painter that never emits escape codes
  #[cfg(test)]
  pub fn plain() -> Self {
    Self { color: false }
  }

  /// Wrap `text` in the style for `status`
  pub fn paint(&self, status: Status, text: &str) -> String {
    if !self.color {
      return text.to_string();
    }
    let style = status.style();
    format!("{}{}{}", style.render(), text, style.render_reset())
  }

  /// Marker + text, decorated
  pub fn line(&self, status: Status, text: &str) -> String {
    let marker = status.marker();
    if marker.is_empty() {
      self.paint(status, text)
    } else {
      self.paint(status, &format!("{} {}", marker, text))
    }
  }

  /// Bold variant, used for summary totals
  pub fn bold(&self, text: &str) -> String {
    if !self.color {
      return text.to_string();
    }
    let style = Style::new().bold();
    format!("{}{}{}", style.render(), text, style.render_reset())
  }

  /// Three-line banner used for section titles
  pub fn banner(&self, title: &str) -> String {
    let rule = "=".repeat(70);
    self.paint(Status::Heading, &format!("{}\n{}\n{}", rule, title, rule))
  }

  /// Print a decorated status line to stdout
  pub fn println(&self, status: Status, text: &str) {
    println!("{}", self.line(status, text));
  }

  /// Print captured tool output, skipping blank output entirely
  pub fn print_output(&self, status: Status, output: &str) {
    let trimmed = output.trim();
    if !trimmed.is_empty() {
      println!("{}", self.paint(status, trimmed));
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_plain_line_has_marker_and_no_escapes() {
    let painter = Painter::plain();
    assert_eq!(painter.line(Status::Pass, "Build - PASSED"), "[+] Build - PASSED");
    assert_eq!(painter.line(Status::Warn, "Style - WARNINGS"), "[!] Style - WARNINGS");
    assert_eq!(painter.line(Status::Info, "raw output"), "raw output");
  }

  #[test]
  fn test_colored_line_wraps_text() {
    let painter = Painter::new(ColorMode::Always);
    let line = painter.line(Status::Fail, "Markdown - FAILED");
    assert!(line.starts_with("\u{1b}["));
    assert!(line.contains("[-] Markdown - FAILED"));
    assert!(line.ends_with("\u{1b}[0m"));
  }

  #[test]
  fn test_never_mode_is_plain() {
    assert_eq!(Painter::new(ColorMode::Never), Painter::plain());
  }

  #[test]
  fn test_banner_shape() {
    let banner = Painter::plain().banner("VALIDATION SUMMARY");
    let lines: Vec<_> = banner.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].len(), 70);
    assert_eq!(lines[1], "VALIDATION SUMMARY");
  }
}
