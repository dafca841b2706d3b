//! # Prompt Source Resolution
//!
//! The `run` entrypoint accepts either an inline prompt or a prompt file,
//! never both. An inline prompt is materialised to a file so the assistant
//! always receives a path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ActionError, Result};

/// Where the prompt came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSource {
  /// A prompt file supplied by the pipeline
  File(PathBuf),
  /// An inline prompt written to a temporary file
  Inline(PathBuf),
}

impl PromptSource {
  pub fn path(&self) -> &Path {
    match self {
      Self::File(path) | Self::Inline(path) => path,
    }
  }
}

/// Validate the prompt inputs and produce a prompt file path.
///
/// `inline_path` is where an inline prompt gets written.
pub fn prepare_prompt(prompt: Option<&str>, prompt_file: Option<&Path>, inline_path: &Path) -> Result<PromptSource> {
  match (prompt, prompt_file) {
    (None, None) => Err(ActionError::config(
      "Neither 'prompt' nor 'prompt_file' was provided. At least one is required.",
    )),
    (Some(_), Some(_)) => Err(ActionError::config(
      "Both 'prompt' and 'prompt_file' were provided. Please specify only one.",
    )),
    (None, Some(path)) => {
      let metadata = fs::metadata(path)
        .map_err(|e| ActionError::config(format!("Prompt file '{}' does not exist: {e}", path.display())))?;
      if metadata.len() == 0 {
        return Err(ActionError::config(
          "Prompt file is empty. Please provide a non-empty prompt.",
        ));
      }
      Ok(PromptSource::File(path.to_path_buf()))
    }
    (Some(prompt), None) => {
      if prompt.trim().is_empty() {
        return Err(ActionError::config("Prompt is empty. Please provide a non-empty prompt."));
      }
      if let Some(parent) = inline_path.parent() {
        fs::create_dir_all(parent).map_err(|e| ActionError::io(parent, e))?;
      }
      fs::write(inline_path, prompt).map_err(|e| ActionError::io(inline_path, e))?;
      Ok(PromptSource::Inline(inline_path.to_path_buf()))
    }
  }
}
