//! # Context Model
//!
//! Typed snapshot of one automation trigger. The event payload is modelled as
//! a tagged union with one case per supported event kind, each carrying only
//! the fields that event guarantees. A context is built once per run and
//! never mutated afterwards.

use std::fs;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::EventConfig;
use crate::error::{ActionError, Result};

/// Supported platform event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
  /// An issue was opened, assigned, edited, ...
  Issues,
  /// A comment was posted on an issue or pull request conversation
  IssueComment,
  /// A pull request was opened or updated
  PullRequest,
  /// A pull request review was submitted
  PullRequestReview,
  /// A comment was posted on a pull request diff
  PullRequestReviewComment,
}

impl EventKind {
  /// Resolve an event name as reported by the hosting pipeline
  pub fn from_name(name: &str) -> Option<Self> {
    match name {
      "issues" => Some(Self::Issues),
      "issue_comment" => Some(Self::IssueComment),
      "pull_request" => Some(Self::PullRequest),
      "pull_request_review" => Some(Self::PullRequestReview),
      "pull_request_review_comment" => Some(Self::PullRequestReviewComment),
      _ => None,
    }
  }

  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Issues => "issues",
      Self::IssueComment => "issue_comment",
      Self::PullRequest => "pull_request",
      Self::PullRequestReview => "pull_request_review",
      Self::PullRequestReviewComment => "pull_request_review_comment",
    }
  }
}

/// A platform account reference
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Account {
  pub login: String,
}

/// The issue part of an issue or issue comment payload
#[derive(Debug, Clone, Deserialize)]
pub struct IssueRef {
  pub number: u64,
  #[serde(default)]
  pub body: Option<String>,
  #[serde(default)]
  pub assignees: Vec<Account>,
  /// Present when the "issue" is really a pull request conversation
  #[serde(default)]
  pub pull_request: Option<Value>,
}

/// The pull request part of a pull request payload
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestRef {
  pub number: u64,
}

/// A comment as carried in a payload
#[derive(Debug, Clone, Deserialize)]
pub struct CommentRef {
  #[serde(default)]
  pub id: u64,
  #[serde(default)]
  pub body: Option<String>,
}

/// A review as carried in a payload
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRef {
  #[serde(default)]
  pub body: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssuesEvent {
  pub issue: IssueRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueCommentEvent {
  pub issue: IssueRef,
  pub comment: CommentRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
  pub pull_request: PullRequestRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestReviewEvent {
  pub pull_request: PullRequestRef,
  pub review: ReviewRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestReviewCommentEvent {
  pub pull_request: PullRequestRef,
  pub comment: CommentRef,
}

/// Event-kind-specific payload
#[derive(Debug, Clone)]
pub enum EventPayload {
  Issues(IssuesEvent),
  IssueComment(IssueCommentEvent),
  PullRequest(PullRequestEvent),
  PullRequestReview(PullRequestReviewEvent),
  PullRequestReviewComment(PullRequestReviewCommentEvent),
}

impl EventPayload {
  /// Parse a raw payload according to its event name, failing loudly on an
  /// unsupported kind or a payload missing the fields that kind guarantees
  pub fn parse(event_name: &str, raw: &Value) -> Result<Self> {
    let kind =
      EventKind::from_name(event_name).ok_or_else(|| ActionError::config(format!("Unsupported event type: {event_name}")))?;

    let payload = match kind {
      EventKind::Issues => Self::Issues(decode(kind, raw)?),
      EventKind::IssueComment => Self::IssueComment(decode(kind, raw)?),
      EventKind::PullRequest => Self::PullRequest(decode(kind, raw)?),
      EventKind::PullRequestReview => Self::PullRequestReview(decode(kind, raw)?),
      EventKind::PullRequestReviewComment => Self::PullRequestReviewComment(decode(kind, raw)?),
    };
    Ok(payload)
  }

  pub const fn kind(&self) -> EventKind {
    match self {
      Self::Issues(_) => EventKind::Issues,
      Self::IssueComment(_) => EventKind::IssueComment,
      Self::PullRequest(_) => EventKind::PullRequest,
      Self::PullRequestReview(_) => EventKind::PullRequestReview,
      Self::PullRequestReviewComment(_) => EventKind::PullRequestReviewComment,
    }
  }

  /// The issue or pull request number this event concerns
  pub const fn entity_number(&self) -> u64 {
    match self {
      Self::Issues(event) => event.issue.number,
      Self::IssueComment(event) => event.issue.number,
      Self::PullRequest(event) => event.pull_request.number,
      Self::PullRequestReview(event) => event.pull_request.number,
      Self::PullRequestReviewComment(event) => event.pull_request.number,
    }
  }

  /// Whether the entity is a pull request
  pub const fn is_pull_request(&self) -> bool {
    match self {
      Self::Issues(_) => false,
      Self::IssueComment(event) => event.issue.pull_request.is_some(),
      Self::PullRequest(_) | Self::PullRequestReview(_) | Self::PullRequestReviewComment(_) => true,
    }
  }
}

fn decode<T: for<'de> Deserialize<'de>>(kind: EventKind, raw: &Value) -> Result<T> {
  T::deserialize(raw).map_err(|e| ActionError::config(format!("Invalid {} event payload: {e}", kind.as_str())))
}

/// Repository identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
  pub owner: String,
  pub name: String,
  pub full_name: String,
}

impl Repository {
  /// Parse an `owner/name` repository identifier
  pub fn parse(full_name: &str) -> Result<Self> {
    match full_name.split_once('/') {
      Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => Ok(Self {
        owner: owner.to_string(),
        name: name.to_string(),
        full_name: full_name.to_string(),
      }),
      _ => Err(ActionError::config(format!(
        "GITHUB_REPOSITORY must be in owner/name form, got '{full_name}'"
      ))),
    }
  }
}

/// Configured action inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inputs {
  pub trigger_phrase: String,
  pub assignee_trigger: String,
  pub allowed_tools: Vec<String>,
  pub disallowed_tools: Vec<String>,
  pub custom_instructions: String,
  pub direct_prompt: String,
  pub base_branch: Option<String>,
}

/// Split a multi-line, comma-separated tool list, dropping `#` comments and
/// blank entries
pub fn parse_multiline_input(s: &str) -> Vec<String> {
  s.lines()
    .flat_map(|line| line.split(','))
    .filter_map(|tool| {
      let cleaned = tool.split('#').next().unwrap_or_default().trim();
      (!cleaned.is_empty()).then(|| cleaned.to_string())
    })
    .collect()
}

/// Immutable snapshot of one automation trigger
#[derive(Debug, Clone)]
pub struct ParsedContext {
  pub run_id: String,
  pub event_action: Option<String>,
  pub repository: Repository,
  pub actor: String,
  pub payload: EventPayload,
  pub raw_payload: Value,
  pub entity_number: u64,
  pub is_pull_request: bool,
  pub inputs: Inputs,
}

impl ParsedContext {
  /// Build a context from an already-loaded payload
  pub fn from_payload(
    event_name: &str,
    raw_payload: Value,
    repository: &str,
    run_id: impl Into<String>,
    actor: impl Into<String>,
    inputs: Inputs,
  ) -> Result<Self> {
    let repository = Repository::parse(repository)?;
    let payload = EventPayload::parse(event_name, &raw_payload)?;
    if payload.entity_number() == 0 {
      return Err(ActionError::config(format!(
        "Invalid {event_name} event payload: entity number must be at least 1"
      )));
    }
    let event_action = raw_payload.get("action").and_then(Value::as_str).map(str::to_string);

    Ok(Self {
      run_id: run_id.into(),
      event_action,
      repository,
      actor: actor.into(),
      entity_number: payload.entity_number(),
      is_pull_request: payload.is_pull_request(),
      payload,
      raw_payload,
      inputs,
    })
  }

  /// Parse the context described by the pipeline's event configuration
  pub fn parse(event: &EventConfig, inputs: Inputs) -> Result<Self> {
    let event_path = event
      .event_path
      .as_ref()
      .ok_or_else(|| ActionError::config("GITHUB_EVENT_PATH not found"))?;
    let event_name = event
      .event_name
      .as_deref()
      .ok_or_else(|| ActionError::config("GITHUB_EVENT_NAME not found"))?;
    let repository = event
      .repository
      .as_deref()
      .ok_or_else(|| ActionError::config("GITHUB_REPOSITORY not found"))?;

    let content = fs::read_to_string(event_path).map_err(|e| ActionError::io(event_path, e))?;
    let raw_payload: Value = serde_json::from_str(&content)?;
    debug!("Loaded {} payload from {}", event_name, event_path.display());

    Self::from_payload(
      event_name,
      raw_payload,
      repository,
      event.run_id.clone(),
      event.actor.clone(),
      inputs,
    )
  }

  pub const fn event_kind(&self) -> EventKind {
    self.payload.kind()
  }

  pub fn is_issues_event(&self) -> bool {
    self.event_kind() == EventKind::Issues
  }

  pub fn is_issues_assigned_event(&self) -> bool {
    self.is_issues_event() && self.event_action.as_deref() == Some("assigned")
  }

  pub fn is_issues_opened_event(&self) -> bool {
    self.is_issues_event() && self.event_action.as_deref() == Some("opened")
  }
}
