//! # Actor & Permission Gate
//!
//! Two checks run before the assistant may act. The human-actor check fails
//! hard, including when the lookup itself fails. The write-permission check
//! fails closed: any lookup failure means no permission.

use pilot_core::{ActionError, ParsedContext};
use tracing::{info, instrument, warn};

use crate::client::GitHubClient;

/// Permission levels that grant write access
pub const WRITE_PERMISSIONS: &[&str] = &["admin", "maintain", "write"];

/// Ensure the triggering actor is not a bot account
#[instrument(skip_all, fields(actor = %context.actor), level = "debug")]
pub async fn check_human_actor(client: &GitHubClient, context: &ParsedContext) -> Result<(), ActionError> {
  let user = client
    .get_user(&context.actor)
    .await
    .map_err(|e| ActionError::ActorValidation(format!("Failed to validate actor {}: {e}", context.actor)))?;

  if user.is_bot() {
    return Err(ActionError::ActorValidation(format!(
      "Actor {} is a bot",
      context.actor
    )));
  }

  info!("Actor {} validated as human", context.actor);
  Ok(())
}

/// Whether the triggering actor has write access to the repository
#[instrument(skip_all, fields(actor = %context.actor), level = "debug")]
pub async fn check_write_permissions(client: &GitHubClient, context: &ParsedContext) -> bool {
  let repository = &context.repository;
  match client
    .get_collaborator_permission(&repository.owner, &repository.name, &context.actor)
    .await
  {
    Ok(permission) => {
      let permission = permission.to_lowercase();
      info!("Actor {} has permission: {}", context.actor, permission);
      WRITE_PERMISSIONS.contains(&permission.as_str())
    }
    Err(e) => {
      warn!("Could not check permissions for {}: {}", context.actor, e);
      false
    }
  }
}

#[cfg(test)]
mod tests {
  use pilot_core::Inputs;
  use pilot_test_utils::payloads;
  use serde_json::json;
  use test_case::test_case;
  use wiremock::matchers::{method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;
  use crate::client::tests::test_client;

  fn context() -> ParsedContext {
    ParsedContext::from_payload(
      "issue_comment",
      payloads::issue_comment(1, "@claude hi", false),
      "octo/repo",
      "1",
      "alice",
      Inputs::default(),
    )
    .unwrap()
  }

  #[test_case("admin", true ; "admin")]
  #[test_case("maintain", true ; "maintain")]
  #[test_case("write", true ; "write")]
  #[test_case("WRITE", true ; "case insensitive")]
  #[test_case("triage", false ; "triage")]
  #[test_case("read", false ; "read")]
  #[test_case("none", false ; "none")]
  #[tokio::test]
  async fn test_permission_levels(level: &str, expected: bool) {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/repos/octo/repo/collaborators/alice/permission"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "permission": level })))
      .mount(&mock_server)
      .await;

    assert_eq!(check_write_permissions(&test_client(&mock_server), &context()).await, expected);
  }

  #[tokio::test]
  async fn test_permission_lookup_failure_denies() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/repos/octo/repo/collaborators/alice/permission"))
      .respond_with(ResponseTemplate::new(500))
      .mount(&mock_server)
      .await;

    assert!(!check_write_permissions(&test_client(&mock_server), &context()).await);
  }

  #[tokio::test]
  async fn test_human_actor_passes() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/users/alice"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "login": "alice", "id": 1, "type": "User" })))
      .mount(&mock_server)
      .await;

    check_human_actor(&test_client(&mock_server), &context()).await?;
    Ok(())
  }

  #[tokio::test]
  async fn test_bot_actor_is_rejected() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/users/alice"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "login": "alice", "id": 1, "type": "Bot" })))
      .mount(&mock_server)
      .await;

    let err = check_human_actor(&test_client(&mock_server), &context()).await.unwrap_err();
    assert!(matches!(err, ActionError::ActorValidation(_)));
    assert_eq!(err.to_string(), "Actor alice is a bot");
  }

  #[tokio::test]
  async fn test_actor_lookup_failure_is_fatal() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/users/alice"))
      .respond_with(ResponseTemplate::new(502))
      .mount(&mock_server)
      .await;

    let err = check_human_actor(&test_client(&mock_server), &context()).await.unwrap_err();
    assert!(matches!(err, ActionError::ActorValidation(_)));
    assert!(err.to_string().starts_with("Failed to validate actor alice"));
  }
}
