//! # Tracking Comment Bodies
//!
//! The tracking comment is rewritten in place: once at creation, once when a
//! branch is created, and once with the terminal status. Bodies are pure
//! functions of their inputs, so retrying an update writes the same text.

/// Final status of a run as seen by the completion reporter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
  /// Preparation failed before the assistant ran
  PrepareFailed { error: Option<String> },
  /// The assistant finished successfully
  Succeeded,
  /// The assistant ran and failed
  Failed,
}

impl RunStatus {
  /// Select a status from the pipeline's step results. A preparation failure
  /// takes priority over the assistant's result.
  pub fn from_flags(prepare_success: bool, prepare_error: Option<String>, claude_success: bool) -> Self {
    if !prepare_success {
      Self::PrepareFailed { error: prepare_error }
    } else if claude_success {
      Self::Succeeded
    } else {
      Self::Failed
    }
  }
}

/// Inputs for the terminal comment body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalReport {
  pub status: RunStatus,
  pub claude_branch: Option<String>,
  pub has_output_file: bool,
  pub run_url: String,
}

const WORKING: &str = "🔄 Working on your request...";

/// Body posted when the run starts
pub fn initial_comment_body() -> String {
  WORKING.to_string()
}

/// Body after a working branch was created
pub fn branch_comment_body(branch: &str, branch_url: &str) -> String {
  format!("{WORKING}\n\nBranch: [`{branch}`]({branch_url})")
}

/// Body for the terminal status update
pub fn terminal_comment_body(report: &TerminalReport) -> String {
  let mut body = String::new();

  match &report.status {
    RunStatus::PrepareFailed { error } => {
      body.push_str("❌ **Failed to prepare Claude request**\n\n");
      if let Some(error) = error.as_deref().filter(|e| !e.is_empty()) {
        body.push_str(&format!("Error: {error}\n\n"));
      }
    }
    RunStatus::Succeeded => {
      body.push_str("✅ **Request completed successfully**\n\n");
      push_branch(&mut body, report.claude_branch.as_deref());
      if report.has_output_file {
        body.push_str("Changes have been made to your codebase.\n\n");
      }
    }
    RunStatus::Failed => {
      body.push_str("❌ **Request failed**\n\n");
      push_branch(&mut body, report.claude_branch.as_deref());
    }
  }

  body.push_str(&format!("[View run details]({})", report.run_url));
  body
}

fn push_branch(body: &mut String, branch: Option<&str>) {
  if let Some(branch) = branch.filter(|b| !b.is_empty()) {
    body.push_str(&format!("Branch: `{branch}`\n\n"));
  }
}
