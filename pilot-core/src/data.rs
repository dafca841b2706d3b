//! Supplementary platform data loaded for the prompt

/// Title, body and ownership of the issue or pull request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityDetails {
  pub title: String,
  pub body: String,
  pub author: String,
  pub state: String,
  /// Pull requests only
  pub head_branch: Option<String>,
  /// Pull requests only
  pub base_branch: Option<String>,
}

/// A conversation comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDetails {
  pub author: String,
  pub body: String,
  pub created_at: String,
}

/// A file touched by a pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
  pub filename: String,
  pub status: String,
  pub additions: u64,
  pub deletions: u64,
}

/// Everything fetched about the entity before the prompt is assembled
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedData {
  pub entity: EntityDetails,
  pub comments: Vec<CommentDetails>,
  pub changed_files: Vec<ChangedFile>,
  /// Display name of the triggering user, or their login when unknown
  pub trigger_display_name: String,
}

impl FetchedData {
  /// Head branch of a pull request, if this data describes one
  pub fn head_branch(&self) -> Option<&str> {
    self.entity.head_branch.as_deref()
  }
}
