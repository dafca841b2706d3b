//! # Error Taxonomy
//!
//! Errors raised across the preparation, supervision and reporting stages.
//! Each variant maps to one failure class with its own propagation policy:
//! most are fatal and caught once at the entrypoint, while
//! [`ActionError::LogPersistence`] is always recovered and downgraded to a
//! warning by the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the automation bridge
#[derive(Debug, Error)]
pub enum ActionError {
  /// Bad or missing input, raised before any side effect
  #[error("{0}")]
  Configuration(String),

  /// The triggering actor could not be confirmed as a human account
  #[error("{0}")]
  ActorValidation(String),

  /// The triggering actor lacks write access to the repository
  #[error("{0}")]
  PermissionDenied(String),

  /// No platform token could be obtained
  #[error("Failed to get GitHub token: {0}")]
  Token(String),

  /// A platform API call returned a non-success status or never completed
  #[error("{0}")]
  Transport(String),

  /// The assistant process could not be started
  #[error("Failed to spawn {program}: {source}")]
  ProcessSpawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// The execution log could not be written
  #[error("Failed to persist execution log to {}: {message}", path.display())]
  LogPersistence { path: PathBuf, message: String },

  #[error("I/O error on {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error(transparent)]
  Json(#[from] serde_json::Error),
}

impl ActionError {
  /// Shorthand for a configuration error
  pub fn config(message: impl Into<String>) -> Self {
    Self::Configuration(message.into())
  }

  /// Wrap an I/O error with the path it concerns
  pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }
}

pub type Result<T> = std::result::Result<T, ActionError>;
