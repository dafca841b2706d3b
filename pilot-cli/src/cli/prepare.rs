//! # Prepare Command
//!
//! The run preparer: acquires a token, parses the event, applies the
//! permission and trigger gates, then creates the tracking comment, the
//! working branch, the prompt and the MCP configuration for the assistant.
//! A missing trigger is a clean, successful exit; every other abort
//! publishes `prepare_error` and exits 1.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use pilot_core::mcp::prepare_mcp_config;
use pilot_core::output::{add_mask, annotate_error, annotate_warning};
use pilot_core::prompt::{PreparedContext, generate_prompt, write_prompt};
use pilot_core::tools::{allowed_tools, disallowed_tools};
use pilot_core::{
  ActionError, ActionOutputs, BranchInfo, ParsedContext, PrepareConfig, ProcessEnv, Result, evaluate, print_info,
  print_success,
};
use pilot_gh::operations::{create_initial_comment, fetch_github_data, setup_branch, update_with_branch};
use pilot_gh::{RetryPolicy, acquire_token_with, check_human_actor, check_write_permissions, create_github_client};
use tracing::{info, instrument, warn};

use crate::consts::{
  ENV_ALLOWED_TOOLS, ENV_DISALLOWED_TOOLS, OUTPUT_BASE_BRANCH, OUTPUT_CLAUDE_BRANCH, OUTPUT_COMMENT_ID,
  OUTPUT_CONTAINS_TRIGGER, OUTPUT_GITHUB_TOKEN, OUTPUT_MCP_CONFIG, OUTPUT_PREPARE_ERROR,
};

/// How a preparation ended when nothing went wrong
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrepareOutcome {
  /// The event did not contain a trigger
  Skipped,
  /// The assistant's run is ready
  Prepared {
    comment_id: u64,
    branch: BranchInfo,
    prompt_path: PathBuf,
  },
}

/// Handle the `prepare` subcommand
pub async fn handle_prepare_command() -> ExitCode {
  let config = PrepareConfig::from_env(&ProcessEnv);
  let mut outputs = ActionOutputs::new(config.workflow.clone());

  match execute(&config, &mut outputs, RetryPolicy::default()).await {
    Ok(_) => ExitCode::SUCCESS,
    Err(_) => ExitCode::FAILURE,
  }
}

/// Run the pipeline and report any failure through the pipeline log and the
/// `prepare_error` output
pub async fn execute(config: &PrepareConfig, outputs: &mut ActionOutputs, retry: RetryPolicy) -> Result<PrepareOutcome> {
  match prepare(config, outputs, retry).await {
    Ok(PrepareOutcome::Skipped) => {
      print_info("No trigger found, skipping remaining steps");
      Ok(PrepareOutcome::Skipped)
    }
    Ok(outcome) => {
      print_success("Run prepared");
      Ok(outcome)
    }
    Err(e) => {
      let message = e.to_string();
      annotate_error(&format!("Prepare step failed with error: {message}"));
      if let Err(write_err) = outputs.set_output(OUTPUT_PREPARE_ERROR, &message) {
        warn!("Failed to publish {}: {}", OUTPUT_PREPARE_ERROR, write_err);
      }
      Err(e)
    }
  }
}

/// The preparation pipeline proper
#[instrument(skip_all, level = "debug")]
pub async fn prepare(config: &PrepareConfig, outputs: &mut ActionOutputs, retry: RetryPolicy) -> Result<PrepareOutcome> {
  let token = acquire_token_with(&config.token, &config.endpoints, retry).await?;
  add_mask(&token);
  let client = create_github_client(&token, &config.endpoints);

  let context = ParsedContext::parse(&config.event, config.inputs.clone())?;
  info!(
    "Preparing {} #{} in {}",
    context.event_kind().as_str(),
    context.entity_number,
    context.repository.full_name
  );

  if !check_write_permissions(&client, &context).await {
    return Err(ActionError::PermissionDenied(
      "Actor does not have write permissions to the repository".to_string(),
    ));
  }

  let decision = evaluate(&context);
  outputs.set_output(OUTPUT_CONTAINS_TRIGGER, &decision.should_run.to_string())?;
  if !decision.should_run {
    return Ok(PrepareOutcome::Skipped);
  }

  check_human_actor(&client, &context).await?;

  let comment_id = create_initial_comment(&client, &context).await?;
  outputs.set_output(OUTPUT_COMMENT_ID, &comment_id.to_string())?;

  let data = fetch_github_data(&client, &context).await?;

  let branch = setup_branch(&client, &data, &context, Utc::now()).await?;
  if let Some(claude_branch) = &branch.claude_branch {
    outputs.set_output(OUTPUT_CLAUDE_BRANCH, claude_branch)?;
  }
  outputs.set_output(OUTPUT_BASE_BRANCH, &branch.base_branch)?;
  outputs.set_output(OUTPUT_GITHUB_TOKEN, &token)?;

  if let Some(claude_branch) = &branch.claude_branch {
    update_with_branch(
      &client,
      &config.endpoints,
      &context.repository.full_name,
      comment_id,
      claude_branch,
    )
    .await?;
  }

  let prepared = PreparedContext::new(
    &context,
    comment_id,
    &branch,
    decision.trigger_content,
    data.trigger_display_name.clone(),
  );
  let prompt_path = write_prompt(&config.prompt_dir(), &generate_prompt(&prepared, &data))?;

  let inputs = &context.inputs;
  outputs.export_variable(ENV_ALLOWED_TOOLS, &allowed_tools(&inputs.allowed_tools))?;
  outputs.export_variable(
    ENV_DISALLOWED_TOOLS,
    &disallowed_tools(&inputs.disallowed_tools, &inputs.allowed_tools),
  )?;

  let mcp = prepare_mcp_config(config.additional_mcp_config.as_deref());
  if let Some(warning) = &mcp.warning {
    annotate_warning(&warning.to_string());
  }
  outputs.set_output(OUTPUT_MCP_CONFIG, &mcp.json)?;

  Ok(PrepareOutcome::Prepared {
    comment_id,
    branch,
    prompt_path,
  })
}
