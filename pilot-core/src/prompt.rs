//! # Prompt Assembly
//!
//! Turns the parsed context, branch layout and fetched platform data into
//! the prompt file handed to the assistant. The prompt is built from
//! structural fields; the wording around them is fixed.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::branch::BranchInfo;
use crate::context::ParsedContext;
use crate::data::{ChangedFile, CommentDetails, FetchedData};
use crate::error::{ActionError, Result};

/// File name of the prompt inside the prompt directory
pub const PROMPT_FILE_NAME: &str = "claude-prompt.txt";

/// Structural fields of one prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedContext {
  pub repository: String,
  pub claude_comment_id: u64,
  pub trigger_phrase: String,
  pub trigger_username: String,
  pub event_name: String,
  pub event_action: Option<String>,
  pub is_pull_request: bool,
  pub entity_number: u64,
  pub trigger_content: Option<String>,
  pub base_branch: String,
  pub claude_branch: Option<String>,
  pub custom_instructions: Option<String>,
  pub direct_prompt: Option<String>,
}

impl PreparedContext {
  pub fn new(
    context: &ParsedContext,
    claude_comment_id: u64,
    branch: &BranchInfo,
    trigger_content: Option<String>,
    trigger_username: impl Into<String>,
  ) -> Self {
    let inputs = &context.inputs;
    Self {
      repository: context.repository.full_name.clone(),
      claude_comment_id,
      trigger_phrase: inputs.trigger_phrase.clone(),
      trigger_username: trigger_username.into(),
      event_name: context.event_kind().as_str().to_string(),
      event_action: context.event_action.clone(),
      is_pull_request: context.is_pull_request,
      entity_number: context.entity_number,
      trigger_content,
      base_branch: branch.base_branch.clone(),
      claude_branch: branch.claude_branch.clone(),
      custom_instructions: non_empty(&inputs.custom_instructions),
      direct_prompt: non_empty(&inputs.direct_prompt),
    }
  }

  fn entity_label(&self) -> &'static str {
    if self.is_pull_request { "Pull Request" } else { "Issue" }
  }
}

fn non_empty(value: &str) -> Option<String> {
  (!value.trim().is_empty()).then(|| value.to_string())
}

/// Summary of the issue or pull request itself
pub fn format_context(data: &FetchedData, is_pull_request: bool) -> String {
  let entity = &data.entity;
  let mut lines = vec![
    format!("Title: {}", entity.title),
    format!("Author: {}", entity.author),
    format!("State: {}", entity.state),
  ];
  if is_pull_request {
    if let (Some(head), Some(base)) = (&entity.head_branch, &entity.base_branch) {
      lines.push(format!("Branch: {head} -> {base}"));
    }
    lines.push(format!("Changed Files: {}", data.changed_files.len()));
  }
  lines.join("\n")
}

/// Issue or pull request body, or a placeholder when empty
pub fn format_body(body: &str) -> String {
  if body.trim().is_empty() {
    "No description provided".to_string()
  } else {
    body.to_string()
  }
}

/// Conversation comments, oldest first
pub fn format_comments(comments: &[CommentDetails]) -> String {
  if comments.is_empty() {
    return "No comments".to_string();
  }
  comments
    .iter()
    .map(|comment| format!("[{} at {}]: {}", comment.author, comment.created_at, comment.body))
    .collect::<Vec<_>>()
    .join("\n\n")
}

/// Changed files with their diff stats
pub fn format_changed_files(files: &[ChangedFile]) -> String {
  files
    .iter()
    .map(|file| {
      format!(
        "- {} ({}) +{}/-{}",
        file.filename, file.status, file.additions, file.deletions
      )
    })
    .collect::<Vec<_>>()
    .join("\n")
}

/// Render the full prompt text
pub fn generate_prompt(context: &PreparedContext, data: &FetchedData) -> String {
  let mut sections = vec![
    "You are Claude, an AI assistant designed to help with GitHub issues and pull requests.".to_string(),
    tagged("formatted_context", &format_context(data, context.is_pull_request)),
    tagged(
      if context.is_pull_request { "pr_or_issue_body" } else { "issue_body" },
      &format_body(&data.entity.body),
    ),
    tagged("comments", &format_comments(&data.comments)),
  ];

  if context.is_pull_request && !data.changed_files.is_empty() {
    sections.push(tagged("changed_files", &format_changed_files(&data.changed_files)));
  }

  let mut event = format!("{} {}", context.entity_label(), context.entity_number);
  if let Some(action) = &context.event_action {
    event.push_str(&format!(" ({}: {})", context.event_name, action));
  } else {
    event.push_str(&format!(" ({})", context.event_name));
  }

  let mut metadata = vec![
    format!("Repository: {}", context.repository),
    format!("Event: {event}"),
    format!("Comment ID: {}", context.claude_comment_id),
    format!("Trigger Phrase: {}", context.trigger_phrase),
    format!("Trigger User: {}", context.trigger_username),
    format!("Base Branch: {}", context.base_branch),
  ];
  if let Some(branch) = &context.claude_branch {
    metadata.push(format!("Working Branch: {branch}"));
  }
  sections.push(tagged("metadata", &metadata.join("\n")));

  if let Some(content) = context.trigger_content.as_deref().filter(|c| !c.trim().is_empty()) {
    sections.push(tagged("trigger_comment", content));
  }
  if let Some(direct_prompt) = &context.direct_prompt {
    sections.push(tagged("direct_prompt", direct_prompt));
  }
  if let Some(instructions) = &context.custom_instructions {
    sections.push(format!("CUSTOM INSTRUCTIONS:\n{instructions}"));
  }

  sections.join("\n\n")
}

fn tagged(tag: &str, content: &str) -> String {
  format!("<{tag}>\n{content}\n</{tag}>")
}

/// Write the prompt into `prompt_dir`, returning the file path
pub fn write_prompt(prompt_dir: &Path, prompt: &str) -> Result<PathBuf> {
  fs::create_dir_all(prompt_dir).map_err(|e| ActionError::io(prompt_dir, e))?;

  let path = prompt_dir.join(PROMPT_FILE_NAME);
  fs::write(&path, prompt).map_err(|e| ActionError::io(&path, e))?;

  info!("Prompt written to {}", path.display());
  debug!("===== FINAL PROMPT =====\n{}\n=======================", prompt);
  Ok(path)
}
