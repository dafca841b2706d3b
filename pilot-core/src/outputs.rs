//! # Workflow Output Channel
//!
//! Publishes step outputs and exported variables the way the hosting
//! pipeline reads them: `key=value` lines appended to the files named by
//! `GITHUB_OUTPUT` and `GITHUB_ENV`. Multi-line values use the heredoc form
//! `key<<DELIMITER`. Every published pair is also recorded in memory.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::config::WorkflowFiles;
use crate::error::{ActionError, Result};

/// Output and env channel writer for one entrypoint invocation
#[derive(Debug, Default)]
pub struct ActionOutputs {
  files: WorkflowFiles,
  outputs: Vec<(String, String)>,
  exports: Vec<(String, String)>,
}

impl ActionOutputs {
  pub fn new(files: WorkflowFiles) -> Self {
    Self {
      files,
      outputs: Vec::new(),
      exports: Vec::new(),
    }
  }

  /// Publish a step output
  pub fn set_output(&mut self, key: &str, value: &str) -> Result<()> {
    match &self.files.output {
      Some(path) => append_entry(path, key, value)?,
      // Runners without an output file still understand the legacy command
      None => println!("::set-output name={key}::{value}"),
    }
    debug!("Set output {}", key);
    self.outputs.push((key.to_string(), value.to_string()));
    Ok(())
  }

  /// Export an environment variable to later steps
  pub fn export_variable(&mut self, key: &str, value: &str) -> Result<()> {
    match &self.files.env {
      Some(path) => append_entry(path, key, value)?,
      None => info!("No env channel available, keeping {} in memory only", key),
    }
    self.exports.push((key.to_string(), value.to_string()));
    Ok(())
  }

  /// Every output published so far, in order
  pub fn outputs(&self) -> &[(String, String)] {
    &self.outputs
  }

  /// Every variable exported so far, in order
  pub fn exports(&self) -> &[(String, String)] {
    &self.exports
  }

  /// The most recent value published for `key`
  pub fn output(&self, key: &str) -> Option<&str> {
    latest(&self.outputs, key)
  }

  /// The most recent value exported for `key`
  pub fn exported(&self, key: &str) -> Option<&str> {
    latest(&self.exports, key)
  }
}

fn latest<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
  pairs.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

/// Render one channel entry
pub fn format_entry(key: &str, value: &str) -> String {
  if !value.contains('\n') {
    return format!("{key}={value}\n");
  }

  let mut counter = 0usize;
  let mut delimiter = "ghadelimiter".to_string();
  while value.contains(&delimiter) || key.contains(&delimiter) {
    counter += 1;
    delimiter = format!("ghadelimiter_{counter}");
  }
  format!("{key}<<{delimiter}\n{value}\n{delimiter}\n")
}

fn append_entry(path: &Path, key: &str, value: &str) -> Result<()> {
  let mut file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .map_err(|e| ActionError::io(path, e))?;
  file
    .write_all(format_entry(key, value).as_bytes())
    .map_err(|e| ActionError::io(path, e))
}

#[cfg(test)]
mod tests {
  use pilot_test_utils::WorkflowGuard;

  use super::*;

  fn outputs_for(guard: &WorkflowGuard) -> ActionOutputs {
    ActionOutputs::new(WorkflowFiles {
      output: Some(guard.output_path().to_path_buf()),
      env: Some(guard.env_path().to_path_buf()),
    })
  }

  #[test]
  fn test_format_entry_single_line() {
    assert_eq!(format_entry("contains_trigger", "true"), "contains_trigger=true\n");
  }

  #[test]
  fn test_format_entry_multi_line_uses_heredoc() {
    assert_eq!(
      format_entry("prepare_error", "line one\nline two"),
      "prepare_error<<ghadelimiter\nline one\nline two\nghadelimiter\n"
    );
  }

  #[test]
  fn test_format_entry_avoids_delimiter_collision() {
    let entry = format_entry("k", "a\nghadelimiter\nb");
    assert!(entry.starts_with("k<<ghadelimiter_1\n"));
    assert!(entry.ends_with("\nghadelimiter_1\n"));
  }

  #[test]
  fn test_outputs_are_appended_and_recorded() {
    let guard = WorkflowGuard::new();
    let mut outputs = outputs_for(&guard);

    outputs.set_output("claude_comment_id", "42").unwrap();
    outputs.set_output("prepare_error", "first\nsecond").unwrap();
    outputs.export_variable("ALLOWED_TOOLS", "Edit,Read").unwrap();

    assert_eq!(guard.output("claude_comment_id").as_deref(), Some("42"));
    assert_eq!(guard.output("prepare_error").as_deref(), Some("first\nsecond"));
    assert_eq!(guard.exported("ALLOWED_TOOLS").as_deref(), Some("Edit,Read"));

    assert_eq!(outputs.output("claude_comment_id"), Some("42"));
    assert_eq!(outputs.exported("ALLOWED_TOOLS"), Some("Edit,Read"));
    assert_eq!(outputs.outputs().len(), 2);
  }

  #[test]
  fn test_missing_channels_still_record() {
    let mut outputs = ActionOutputs::new(WorkflowFiles::default());
    outputs.set_output("conclusion", "success").unwrap();
    outputs.export_variable("DISALLOWED_TOOLS", "WebFetch").unwrap();

    assert_eq!(outputs.output("conclusion"), Some("success"));
    assert_eq!(outputs.exported("DISALLOWED_TOOLS"), Some("WebFetch"));
  }
}
