//! Workflow channel management for testing
//!
//! This module provides a guard owning a temporary directory laid out like a
//! runner workspace: an output channel file, an env channel file, a runner
//! temp directory and a slot for the event payload.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

/// RAII guard for a temporary runner workspace
pub struct WorkflowGuard {
  /// The temporary directory holding every file
  pub temp_dir: TempDir,
  output_path: PathBuf,
  env_path: PathBuf,
  event_path: PathBuf,
  runner_temp: PathBuf,
}

impl Default for WorkflowGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl WorkflowGuard {
  /// Create a new workspace with empty channel files
  pub fn new() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let root = temp_dir.path().to_path_buf();

    let output_path = root.join("github_output");
    let env_path = root.join("github_env");
    let event_path = root.join("event.json");
    let runner_temp = root.join("runner_temp");

    fs::write(&output_path, "").expect("Failed to create output file");
    fs::write(&env_path, "").expect("Failed to create env file");
    fs::create_dir_all(&runner_temp).expect("Failed to create runner temp directory");

    Self {
      temp_dir,
      output_path,
      env_path,
      event_path,
      runner_temp,
    }
  }

  pub fn output_path(&self) -> &Path {
    &self.output_path
  }

  pub fn env_path(&self) -> &Path {
    &self.env_path
  }

  pub fn event_path(&self) -> &Path {
    &self.event_path
  }

  pub fn runner_temp(&self) -> &Path {
    &self.runner_temp
  }

  /// Write the event payload file
  pub fn write_event(&self, payload: &Value) {
    fs::write(&self.event_path, payload.to_string()).expect("Failed to write event payload");
  }

  /// Environment pointing every channel at this workspace
  pub fn env(&self) -> HashMap<String, String> {
    HashMap::from([
      ("GITHUB_OUTPUT".to_string(), path_string(&self.output_path)),
      ("GITHUB_ENV".to_string(), path_string(&self.env_path)),
      ("GITHUB_EVENT_PATH".to_string(), path_string(&self.event_path)),
      ("RUNNER_TEMP".to_string(), path_string(&self.runner_temp)),
    ])
  }

  /// Every `key=value` pair written to the output channel, in order
  pub fn outputs(&self) -> Vec<(String, String)> {
    parse_channel(&fs::read_to_string(&self.output_path).expect("Failed to read output file"))
  }

  /// The last value written to the output channel for `key`
  pub fn output(&self, key: &str) -> Option<String> {
    self
      .outputs()
      .into_iter()
      .rev()
      .find(|(k, _)| k == key)
      .map(|(_, v)| v)
  }

  /// The last value written to the env channel for `key`
  pub fn exported(&self, key: &str) -> Option<String> {
    parse_channel(&fs::read_to_string(&self.env_path).expect("Failed to read env file"))
      .into_iter()
      .rev()
      .find(|(k, _)| k == key)
      .map(|(_, v)| v)
  }
}

fn path_string(path: &Path) -> String {
  path.to_string_lossy().into_owned()
}

/// Parse channel content, understanding both `key=value` and the
/// `key<<DELIMITER` multi-line form
pub fn parse_channel(content: &str) -> Vec<(String, String)> {
  let mut pairs = Vec::new();
  let mut lines = content.lines();

  while let Some(line) = lines.next() {
    if let Some((key, delimiter)) = line.split_once("<<") {
      let mut value_lines = Vec::new();
      for value_line in lines.by_ref() {
        if value_line == delimiter {
          break;
        }
        value_lines.push(value_line);
      }
      pairs.push((key.to_string(), value_lines.join("\n")));
    } else if let Some((key, value)) = line.split_once('=') {
      pairs.push((key.to_string(), value.to_string()));
    }
  }

  pairs
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_channel_handles_both_forms() {
    let content = "contains_trigger=true\nprepare_error<<EOF_1\nline one\nline two\nEOF_1\nmcp_config={\"a\":1}\n";
    let pairs = parse_channel(content);
    assert_eq!(
      pairs,
      vec![
        ("contains_trigger".to_string(), "true".to_string()),
        ("prepare_error".to_string(), "line one\nline two".to_string()),
        ("mcp_config".to_string(), "{\"a\":1}".to_string()),
      ]
    );
  }
}
