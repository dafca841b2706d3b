//! Structured execution log.
//!
//! Captured output becomes a JSON array with one element per non-blank line.
//! Lines holding a JSON document are kept as documents; anything else is
//! kept as a string so no output is lost.

use std::fs;
use std::path::Path;

use pilot_core::{ActionError, Result};
use serde_json::Value;
use tracing::debug;

/// Build the log document from captured lines
pub fn build_execution_log(lines: &[String]) -> Value {
  Value::Array(
    lines
      .iter()
      .filter(|line| !line.trim().is_empty())
      .map(|line| serde_json::from_str(line).unwrap_or_else(|_| Value::String(line.clone())))
      .collect(),
  )
}

/// Write the log to `path`, pretty-printed.
///
/// Every failure is reported as [`ActionError::LogPersistence`] so the
/// caller can downgrade it to a warning.
pub fn persist_execution_log(path: &Path, lines: &[String]) -> Result<()> {
  let persistence_error = |message: String| ActionError::LogPersistence {
    path: path.to_path_buf(),
    message,
  };

  let content = serde_json::to_string_pretty(&build_execution_log(lines)).map_err(|e| persistence_error(e.to_string()))?;
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).map_err(|e| persistence_error(e.to_string()))?;
  }
  fs::write(path, content).map_err(|e| persistence_error(e.to_string()))?;

  debug!("Wrote {} line(s) to {}", lines.len(), path.display());
  Ok(())
}
