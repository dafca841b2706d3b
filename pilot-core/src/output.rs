//! # Output Formatting
//!
//! Provides formatted output functions with colors and emojis for
//! user-facing progress lines, plus the workflow-command annotations the
//! hosting pipeline understands (`::error::`, `::warning::`,
//! `::add-mask::`).

use owo_colors::OwoColorize;
use {clap, emojis};

/// Enum representing different color modes for output
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
  /// Enable colored output
  Yes,
  /// Enable colored output (alias for Yes)
  Always,
  /// Automatically detect if colors should be used based on terminal
  /// capabilities
  Auto,
  /// Disable colored output
  No,
  /// Disable colored output (alias for No)
  Never,
}

impl ColorMode {
  /// Apply this mode to every subsequent colored write
  pub fn apply(self) {
    match self {
      Self::Always | Self::Yes => owo_colors::set_override(true),
      Self::Never | Self::No => owo_colors::set_override(false),
      // Leave terminal detection to owo_colors
      Self::Auto => {}
    }
  }
}

/// Helper function to safely get an emoji or fallback to a default character
pub fn get_emoji_or_default(name: &str, default: &str) -> String {
  match emojis::get_by_shortcode(name) {
    Some(emoji) => emoji.to_string(),
    None => default.to_string(),
  }
}

/// Print a success message
pub fn print_success(message: &str) {
  let check = get_emoji_or_default("check_mark", "✓");
  println!("{} {}", check.green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
  let cross = get_emoji_or_default("cross_mark", "✗");
  eprintln!("{} {}", cross.red().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
  let info = get_emoji_or_default("information", "ℹ");
  println!("{} {}", info.blue().bold(), message);
}

/// Format a run conclusion
pub fn format_conclusion(conclusion: &str) -> String {
  match conclusion {
    "success" => conclusion.green().to_string(),
    "failure" => conclusion.red().to_string(),
    _ => conclusion.to_string(),
  }
}

/// Build an error annotation line
pub fn error_annotation(message: &str) -> String {
  format!("::error::{}", escape_annotation(message))
}

/// Build a warning annotation line
pub fn warning_annotation(message: &str) -> String {
  format!("::warning::{}", escape_annotation(message))
}

/// Emit an error annotation to the pipeline log
pub fn annotate_error(message: &str) {
  println!("{}", error_annotation(message));
}

/// Emit a warning annotation to the pipeline log
pub fn annotate_warning(message: &str) {
  println!("{}", warning_annotation(message));
}

/// Ask the pipeline to redact `value` from every later log line
pub fn add_mask(value: &str) {
  if !value.is_empty() {
    println!("::add-mask::{value}");
  }
}

/// Workflow commands are line-oriented, so newlines are percent-encoded
fn escape_annotation(message: &str) -> String {
  message.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_get_emoji_or_default() {
    // Test with a known emoji
    let result = get_emoji_or_default("check_mark", "✓");
    assert!(!result.is_empty());

    // Test with unknown emoji
    let result = get_emoji_or_default("nonexistent_emoji", "fallback");
    assert_eq!(result, "fallback");
  }

  #[test]
  fn test_annotations() {
    assert_eq!(
      error_annotation("Prepare step failed with error: boom"),
      "::error::Prepare step failed with error: boom"
    );
    assert_eq!(warning_annotation("careful"), "::warning::careful");
  }

  #[test]
  fn test_multiline_annotation_stays_on_one_line() {
    let line = error_annotation("Environment variable validation failed:\n  - 100% broken");
    assert_eq!(
      line,
      "::error::Environment variable validation failed:%0A  - 100%25 broken"
    );
  }

  #[test]
  fn test_format_functions() {
    assert!(format_conclusion("success").contains("success"));
    assert_eq!(format_conclusion("skipped"), "skipped");
  }
}
