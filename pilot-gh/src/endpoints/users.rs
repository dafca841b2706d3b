use serde_json::json;
use tracing::{debug, info, instrument};

use crate::client::GitHubClient;
use crate::error::Result;
use crate::models::{CollaboratorPermission, GitHubUser};

const DISPLAY_NAME_QUERY: &str = "query($login: String!) { user(login: $login) { name } }";

impl GitHubClient {
  /// Get a user by login
  #[instrument(skip(self), level = "debug")]
  pub async fn get_user(&self, login: &str) -> Result<GitHubUser> {
    info!("Fetching user {}", login);
    let url = format!("{}/users/{}", self.base_url, login);
    self.get_json(&url).await
  }

  /// Get a user's permission level on a repository
  #[instrument(skip(self), level = "debug")]
  pub async fn get_collaborator_permission(&self, owner: &str, repo: &str, login: &str) -> Result<String> {
    let url = format!(
      "{}/repos/{}/{}/collaborators/{}/permission",
      self.base_url, owner, repo, login
    );
    let permission: CollaboratorPermission = self.get_json(&url).await?;
    debug!("{} has permission {} on {}/{}", login, permission.permission, owner, repo);
    Ok(permission.permission)
  }

  /// Look up a user's display name through GraphQL
  #[instrument(skip(self), level = "debug")]
  pub async fn get_user_display_name(&self, login: &str) -> Result<Option<String>> {
    let data = self.graphql(DISPLAY_NAME_QUERY, json!({ "login": login })).await?;
    Ok(
      data
        .pointer("/user/name")
        .and_then(|name| name.as_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string),
    )
  }
}
