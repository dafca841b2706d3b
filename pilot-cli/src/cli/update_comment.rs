//! # Update Comment Command
//!
//! The completion reporter: rewrites the tracking comment with the run's
//! terminal status once every earlier step has finished.

use std::process::ExitCode;

use pilot_core::comment::{RunStatus, TerminalReport};
use pilot_core::output::annotate_error;
use pilot_core::{ProcessEnv, Result, UpdateCommentConfig, print_success};
use pilot_gh::create_github_client;
use pilot_gh::operations::update_terminal;
use tracing::instrument;

/// Handle the `update-comment` subcommand
pub async fn handle_update_comment_command() -> ExitCode {
  let result = match UpdateCommentConfig::from_env(&ProcessEnv) {
    Ok(config) => update_comment(&config).await,
    Err(e) => Err(e),
  };

  match result {
    Ok(_) => {
      print_success("Comment updated successfully");
      ExitCode::SUCCESS
    }
    Err(e) => {
      annotate_error(&format!("Update comment failed with error: {e}"));
      ExitCode::FAILURE
    }
  }
}

/// Select the terminal status from the earlier steps' results
pub fn terminal_report(config: &UpdateCommentConfig) -> TerminalReport {
  TerminalReport {
    status: RunStatus::from_flags(
      config.prepare_success,
      config.prepare_error.clone(),
      config.claude_success,
    ),
    claude_branch: config.claude_branch.clone(),
    has_output_file: config.output_file.is_some(),
    run_url: config.endpoints.run_url(&config.repository, &config.run_id),
  }
}

/// Rewrite the tracking comment, returning the body written
#[instrument(skip_all, fields(comment_id = config.comment_id), level = "debug")]
pub async fn update_comment(config: &UpdateCommentConfig) -> Result<String> {
  let client = create_github_client(&config.token, &config.endpoints);
  let body = update_terminal(&client, &config.repository, config.comment_id, &terminal_report(config)).await?;
  Ok(body)
}
