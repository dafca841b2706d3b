use pilot_core::ParsedContext;
use pilot_core::data::{ChangedFile, CommentDetails, EntityDetails, FetchedData};
use tracing::{debug, instrument, warn};

use crate::client::GitHubClient;
use crate::error::Result;
use crate::models::{GitHubComment, GitHubUser};

/// Load the entity, its comments, changed files for pull requests, and the
/// trigger user's display name.
///
/// The display name lookup never fails the fetch: the login is used instead.
#[instrument(skip_all, fields(number = context.entity_number), level = "debug")]
pub async fn fetch_github_data(client: &GitHubClient, context: &ParsedContext) -> Result<FetchedData> {
  let repository = &context.repository;
  let (owner, repo, number) = (&repository.owner, &repository.name, context.entity_number);

  let (entity, changed_files) = if context.is_pull_request {
    let pr = client.get_pull_request(owner, repo, number).await?;
    let files = client.list_pull_request_files(owner, repo, number).await?;
    let entity = EntityDetails {
      title: pr.title,
      body: pr.body.unwrap_or_default(),
      author: login(pr.user.as_ref()),
      state: pr.state,
      head_branch: Some(pr.head.ref_name),
      base_branch: Some(pr.base.ref_name),
    };
    let files = files
      .into_iter()
      .map(|file| ChangedFile {
        filename: file.filename,
        status: file.status,
        additions: file.additions,
        deletions: file.deletions,
      })
      .collect();
    (entity, files)
  } else {
    let issue = client.get_issue(owner, repo, number).await?;
    let entity = EntityDetails {
      title: issue.title,
      body: issue.body.unwrap_or_default(),
      author: login(issue.user.as_ref()),
      state: issue.state,
      head_branch: None,
      base_branch: None,
    };
    (entity, Vec::new())
  };

  let comments = client
    .list_issue_comments(owner, repo, number)
    .await?
    .into_iter()
    .map(comment_details)
    .collect::<Vec<_>>();
  debug!("Fetched {} comment(s) and {} changed file(s)", comments.len(), changed_files.len());

  let trigger_display_name = match client.get_user_display_name(&context.actor).await {
    Ok(Some(name)) => name,
    Ok(None) => context.actor.clone(),
    Err(e) => {
      warn!("Failed to fetch display name for {}: {}", context.actor, e);
      context.actor.clone()
    }
  };

  Ok(FetchedData {
    entity,
    comments,
    changed_files,
    trigger_display_name,
  })
}

fn login(user: Option<&GitHubUser>) -> String {
  user.map(|u| u.login.clone()).unwrap_or_else(|| "ghost".to_string())
}

fn comment_details(comment: GitHubComment) -> CommentDetails {
  CommentDetails {
    author: login(comment.user.as_ref()),
    body: comment.body.unwrap_or_default(),
    created_at: comment.created_at,
  }
}
