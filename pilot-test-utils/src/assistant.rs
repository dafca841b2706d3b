//! Stand-in assistant executables
//!
//! Supervisor tests need a child process that behaves like the assistant
//! binary: streams lines, writes to stderr, exits with a chosen code or
//! refuses to exit at all. These are small `sh` scripts written into a
//! temporary directory.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// RAII guard for a temporary executable script
pub struct FakeAssistant {
  #[allow(dead_code)]
  temp_dir: TempDir,
  path: PathBuf,
}

impl FakeAssistant {
  /// Create an executable `sh` script with the given body
  pub fn new(body: &str) -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let path = temp_dir.path().join("fake-assistant");

    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write fake assistant");

    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("Failed to mark fake assistant executable");
    }

    Self { temp_dir, path }
  }

  /// A script that prints its arguments as a JSON line, then the given lines,
  /// and exits with `code`
  pub fn streaming(lines: &[&str], code: i32) -> Self {
    let mut body = String::from("printf '{\"type\":\"args\",\"count\":%s}\\n' \"$#\"\n");
    for line in lines {
      body.push_str(&format!("printf '%s\\n' '{}'\n", line.replace('\'', "'\\''")));
    }
    body.push_str(&format!("exit {code}"));
    Self::new(&body)
  }

  /// A script that ignores the graceful termination signal and never exits
  /// on its own
  pub fn stubborn() -> Self {
    Self::new("trap '' TERM\necho '{\"type\":\"system\"}'\nwhile true; do sleep 1; done")
  }

  /// A script that exits promptly on the graceful termination signal
  pub fn sleeper() -> Self {
    Self::new("echo '{\"type\":\"system\"}'\nexec sleep 60")
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn program(&self) -> String {
    self.path.to_string_lossy().into_owned()
  }
}
