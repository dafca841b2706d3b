//! GitHub Issues API endpoint implementations, including the conversation
//! comments shared by issues and pull requests.

use tracing::{info, instrument};

use crate::client::GitHubClient;
use crate::error::Result;
use crate::models::{CommentBody, GitHubComment, GitHubIssue};

impl GitHubClient {
  /// Get a specific issue by number.
  ///
  /// # Errors
  ///
  /// Returns an error if the issue is not found, authentication fails,
  /// the request cannot be sent, or the response cannot be parsed.
  #[instrument(skip(self), level = "debug")]
  pub async fn get_issue(&self, owner: &str, repo: &str, issue_number: u64) -> Result<GitHubIssue> {
    info!("Fetching issue #{} for {}/{}", issue_number, owner, repo);
    let url = format!("{}/repos/{}/{}/issues/{}", self.base_url, owner, repo, issue_number);
    self.get_json(&url).await
  }

  /// List conversation comments on an issue or pull request
  #[instrument(skip(self), level = "debug")]
  pub async fn list_issue_comments(&self, owner: &str, repo: &str, issue_number: u64) -> Result<Vec<GitHubComment>> {
    let url = format!(
      "{}/repos/{}/{}/issues/{}/comments?per_page=100",
      self.base_url, owner, repo, issue_number
    );
    self.get_json(&url).await
  }

  /// Post a new conversation comment
  #[instrument(skip(self, body), level = "debug")]
  pub async fn create_issue_comment(&self, owner: &str, repo: &str, issue_number: u64, body: &str) -> Result<GitHubComment> {
    let url = format!(
      "{}/repos/{}/{}/issues/{}/comments",
      self.base_url, owner, repo, issue_number
    );
    let comment: GitHubComment = self.post_json(&url, &CommentBody { body }).await?;
    info!("Created comment {} on #{}", comment.id, issue_number);
    Ok(comment)
  }

  /// Replace the body of an existing conversation comment.
  ///
  /// `repository` is the `owner/name` full name.
  #[instrument(skip(self, body), level = "debug")]
  pub async fn update_issue_comment(&self, repository: &str, comment_id: u64, body: &str) -> Result<GitHubComment> {
    let url = format!("{}/repos/{}/issues/comments/{}", self.base_url, repository, comment_id);
    let comment: GitHubComment = self.patch_json(&url, &CommentBody { body }).await?;
    info!("Updated comment {}", comment.id);
    Ok(comment)
  }
}
