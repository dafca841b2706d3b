use tracing::{info, instrument};

use crate::client::GitHubClient;
use crate::error::Result;
use crate::models::{GitHubPRFile, GitHubPullRequest};

impl GitHubClient {
  /// Get a specific pull request
  #[instrument(skip(self), level = "debug")]
  pub async fn get_pull_request(&self, owner: &str, repo: &str, pr_number: u64) -> Result<GitHubPullRequest> {
    info!("Fetching pull request #{} for {}/{}", pr_number, owner, repo);
    let url = format!("{}/repos/{}/{}/pulls/{}", self.base_url, owner, repo, pr_number);
    self.get_json(&url).await
  }

  /// List the files changed by a pull request
  #[instrument(skip(self), level = "debug")]
  pub async fn list_pull_request_files(&self, owner: &str, repo: &str, pr_number: u64) -> Result<Vec<GitHubPRFile>> {
    let url = format!(
      "{}/repos/{}/{}/pulls/{}/files?per_page=100",
      self.base_url, owner, repo, pr_number
    );
    self.get_json(&url).await
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use wiremock::matchers::{method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use crate::client::tests::test_client;

  #[tokio::test]
  async fn test_get_pull_request() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server);

    Mock::given(method("GET"))
      .and(path("/repos/octo/repo/pulls/12"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "number": 12,
        "title": "Add feature",
        "body": "Implements the thing",
        "state": "open",
        "user": { "login": "alice", "id": 1, "type": "User" },
        "head": { "ref": "feature/thing", "sha": "abc123", "label": "octo:feature/thing" },
        "base": { "ref": "main", "sha": "def456", "label": "octo:main" }
      })))
      .mount(&mock_server)
      .await;

    let pr = client.get_pull_request("octo", "repo", 12).await?;
    assert_eq!(pr.number, 12);
    assert_eq!(pr.head.ref_name, "feature/thing");
    assert_eq!(pr.base.ref_name, "main");

    Ok(())
  }

  #[tokio::test]
  async fn test_list_pull_request_files() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server);

    Mock::given(method("GET"))
      .and(path("/repos/octo/repo/pulls/12/files"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([
        { "filename": "src/lib.rs", "status": "modified", "additions": 10, "deletions": 2 },
        { "filename": "README.md", "status": "added" }
      ])))
      .mount(&mock_server)
      .await;

    let files = client.list_pull_request_files("octo", "repo", 12).await?;
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].additions, 10);
    assert_eq!(files[1].deletions, 0);

    Ok(())
  }
}
