//! Working-branch resolution: reuse a pull request head or cut a new issue branch.

use chrono::{DateTime, Utc};
use pilot_core::branch::issue_branch_name;
use pilot_core::data::FetchedData;
use pilot_core::{BranchInfo, ParsedContext};
use tracing::{info, instrument};

use crate::client::GitHubClient;
use crate::error::Result;

/// Resolve the branch layout for the run, creating a new branch for issues.
///
/// Pull requests reuse their head branch. Issues branch off `BASE_BRANCH`
/// when configured, otherwise the repository's default branch.
#[instrument(skip_all, level = "debug")]
pub async fn setup_branch(
  client: &GitHubClient,
  data: &FetchedData,
  context: &ParsedContext,
  now: DateTime<Utc>,
) -> Result<BranchInfo> {
  let repository = &context.repository;

  if context.is_pull_request {
    let head = match data.head_branch() {
      Some(head) => head.to_string(),
      None => {
        client
          .get_pull_request(&repository.owner, &repository.name, context.entity_number)
          .await?
          .head
          .ref_name
      }
    };
    info!("Using pull request branch {}", head);
    return Ok(BranchInfo::for_pull_request(head));
  }

  let base_branch = match &context.inputs.base_branch {
    Some(base) => base.clone(),
    None => {
      client
        .get_repository(&repository.owner, &repository.name)
        .await?
        .default_branch
    }
  };

  let sha = client
    .get_branch_sha(&repository.owner, &repository.name, &base_branch)
    .await?;
  let new_branch = issue_branch_name(context.entity_number, now);
  client
    .create_branch(&repository.owner, &repository.name, &new_branch, &sha)
    .await?;

  info!("Created branch {} from {}", new_branch, base_branch);
  Ok(BranchInfo::for_new_branch(base_branch, new_branch))
}
