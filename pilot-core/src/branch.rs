//! # Branch Info
//!
//! Which branch the assistant works on. Pull requests reuse their head
//! branch; issues get a fresh branch named after the issue and the time the
//! run started.

use chrono::{DateTime, Utc};

/// Prefix for branches created for issue runs
pub const BRANCH_PREFIX: &str = "claude/";

/// Branch layout for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchInfo {
  pub base_branch: String,
  /// Set only when a new branch was created for an issue
  pub claude_branch: Option<String>,
  pub current_branch: String,
}

impl BranchInfo {
  /// Work directly on a pull request's head branch
  pub fn for_pull_request(head_ref: impl Into<String>) -> Self {
    let head_ref = head_ref.into();
    Self {
      base_branch: head_ref.clone(),
      claude_branch: None,
      current_branch: head_ref,
    }
  }

  /// Work on a newly created branch cut from `base_branch`
  pub fn for_new_branch(base_branch: impl Into<String>, claude_branch: impl Into<String>) -> Self {
    let claude_branch = claude_branch.into();
    Self {
      base_branch: base_branch.into(),
      current_branch: claude_branch.clone(),
      claude_branch: Some(claude_branch),
    }
  }
}

/// Name for a new issue branch: `claude/issue-<n>-<YYYYMMDD-HHMMSS>` in UTC
pub fn issue_branch_name(issue_number: u64, now: DateTime<Utc>) -> String {
  format!("{BRANCH_PREFIX}issue-{issue_number}-{}", now.format("%Y%m%d-%H%M%S"))
}
