//! Repository and git reference endpoints used for branch setup.

use tracing::{debug, info, instrument};

use crate::client::GitHubClient;
use crate::error::Result;
use crate::models::{CreateRefParams, GitHubRepository, GitRef};

impl GitHubClient {
  /// Get repository metadata
  #[instrument(skip(self), level = "debug")]
  pub async fn get_repository(&self, owner: &str, repo: &str) -> Result<GitHubRepository> {
    let url = format!("{}/repos/{}/{}", self.base_url, owner, repo);
    self.get_json(&url).await
  }

  /// Resolve the commit a branch points at
  #[instrument(skip(self), level = "debug")]
  pub async fn get_branch_sha(&self, owner: &str, repo: &str, branch: &str) -> Result<String> {
    let url = format!("{}/repos/{}/{}/git/ref/heads/{}", self.base_url, owner, repo, branch);
    let git_ref: GitRef = self.get_json(&url).await?;
    debug!("{} is at {}", git_ref.ref_name, git_ref.object.sha);
    Ok(git_ref.object.sha)
  }

  /// Create a branch pointing at `sha`
  #[instrument(skip(self), level = "debug")]
  pub async fn create_branch(&self, owner: &str, repo: &str, branch: &str, sha: &str) -> Result<GitRef> {
    let url = format!("{}/repos/{}/{}/git/refs", self.base_url, owner, repo);
    let ref_name = format!("refs/heads/{branch}");
    let created: GitRef = self
      .post_json(
        &url,
        &CreateRefParams {
          ref_name: &ref_name,
          sha,
        },
      )
      .await?;
    info!("Created branch {} at {}", branch, sha);
    Ok(created)
  }
}
