//! Tracking comment lifecycle: create, add the branch link, report the
//! terminal status. Each update replaces the whole body.

use pilot_core::comment::{TerminalReport, branch_comment_body, initial_comment_body, terminal_comment_body};
use pilot_core::{GitHubEndpoints, ParsedContext};
use tracing::{info, instrument};

use crate::client::GitHubClient;
use crate::error::Result;

/// Post the tracking comment on the triggering issue or pull request,
/// returning its id
#[instrument(skip_all, level = "debug")]
pub async fn create_initial_comment(client: &GitHubClient, context: &ParsedContext) -> Result<u64> {
  let repository = &context.repository;
  let comment = client
    .create_issue_comment(
      &repository.owner,
      &repository.name,
      context.entity_number,
      &initial_comment_body(),
    )
    .await?;
  info!("Created tracking comment {}", comment.id);
  Ok(comment.id)
}

/// Rewrite the tracking comment to link the newly created branch
#[instrument(skip(client, endpoints), level = "debug")]
pub async fn update_with_branch(
  client: &GitHubClient,
  endpoints: &GitHubEndpoints,
  repository: &str,
  comment_id: u64,
  branch: &str,
) -> Result<()> {
  let body = branch_comment_body(branch, &endpoints.branch_url(repository, branch));
  client.update_issue_comment(repository, comment_id, &body).await?;
  Ok(())
}

/// Rewrite the tracking comment with the run's terminal status, returning
/// the body written
#[instrument(skip(client, report), level = "debug")]
pub async fn update_terminal(
  client: &GitHubClient,
  repository: &str,
  comment_id: u64,
  report: &TerminalReport,
) -> Result<String> {
  let body = terminal_comment_body(report);
  client.update_issue_comment(repository, comment_id, &body).await?;
  Ok(body)
}
