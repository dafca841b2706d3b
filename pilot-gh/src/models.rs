use serde::{Deserialize, Serialize};

/// Represents a GitHub user
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
  pub login: String,
  #[serde(default)]
  pub id: u64,
  /// Account type, e.g. `User` or `Bot`
  #[serde(rename = "type", default)]
  pub account_type: String,
  #[serde(default)]
  pub name: Option<String>,
}

impl GitHubUser {
  pub fn is_bot(&self) -> bool {
    self.account_type == "Bot"
  }
}

/// A collaborator's permission level on a repository
#[derive(Debug, Clone, Deserialize)]
pub struct CollaboratorPermission {
  pub permission: String,
}

/// Represents an issue or pull request conversation comment
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubComment {
  pub id: u64,
  #[serde(default)]
  pub body: Option<String>,
  pub user: Option<GitHubUser>,
  #[serde(default)]
  pub created_at: String,
}

/// Request body for creating or editing a comment
#[derive(Debug, Serialize)]
pub struct CommentBody<'a> {
  pub body: &'a str,
}

/// Represents a GitHub issue
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubIssue {
  pub number: u64,
  pub title: String,
  #[serde(default)]
  pub body: Option<String>,
  pub state: String,
  pub user: Option<GitHubUser>,
}

/// Represents a GitHub pull request
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubPullRequest {
  pub number: u64,
  pub title: String,
  #[serde(default)]
  pub body: Option<String>,
  pub state: String,
  pub user: Option<GitHubUser>,
  pub head: GitHubPRRef,
  pub base: GitHubPRRef,
}

/// Represents a GitHub pull request reference (head or base)
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubPRRef {
  #[serde(rename = "ref")]
  pub ref_name: String,
  pub sha: String,
}

/// A file changed by a pull request
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubPRFile {
  pub filename: String,
  pub status: String,
  #[serde(default)]
  pub additions: u64,
  #[serde(default)]
  pub deletions: u64,
}

/// Repository metadata
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepository {
  pub full_name: String,
  pub default_branch: String,
}

/// A git reference and the object it points at
#[derive(Debug, Clone, Deserialize)]
pub struct GitRef {
  #[serde(rename = "ref")]
  pub ref_name: String,
  pub object: GitObject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitObject {
  pub sha: String,
}

/// Request body for creating a git reference
#[derive(Debug, Serialize)]
pub struct CreateRefParams<'a> {
  #[serde(rename = "ref")]
  pub ref_name: &'a str,
  pub sha: &'a str,
}

/// Installation access token returned by the token exchange
#[derive(Debug, Deserialize)]
pub struct InstallationToken {
  pub token: String,
}

/// OIDC ID token returned by the runner's token service
#[derive(Debug, Deserialize)]
pub struct IdToken {
  pub value: Option<String>,
}
