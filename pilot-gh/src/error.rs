//! # GitHub Transport Errors
//!
//! Every failed platform call surfaces as a [`GitHubError`] naming the
//! method and URL involved. At the pipeline boundary these become
//! [`ActionError::Transport`].

use pilot_core::ActionError;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitHubError {
  /// The request never produced a response
  #[error("{method} {url} failed: {source}")]
  Request {
    method: &'static str,
    url: String,
    #[source]
    source: reqwest::Error,
  },

  /// The API answered with a non-success status
  #[error("{method} {url} failed: HTTP {status} - {message}")]
  Status {
    method: &'static str,
    url: String,
    status: StatusCode,
    message: String,
  },

  /// The response body did not have the expected shape
  #[error("Failed to parse response from {url}: {message}")]
  Decode { url: String, message: String },

  /// A GraphQL query returned errors
  #[error("GraphQL query failed: {0}")]
  GraphQl(String),
}

impl GitHubError {
  /// HTTP status, when the API answered
  pub const fn status(&self) -> Option<StatusCode> {
    match self {
      Self::Status { status, .. } => Some(*status),
      _ => None,
    }
  }

  /// Whether the API reported that the resource does not exist
  pub fn is_not_found(&self) -> bool {
    self.status() == Some(StatusCode::NOT_FOUND)
  }
}

impl From<GitHubError> for ActionError {
  fn from(error: GitHubError) -> Self {
    ActionError::Transport(error.to_string())
  }
}

pub type Result<T> = std::result::Result<T, GitHubError>;
