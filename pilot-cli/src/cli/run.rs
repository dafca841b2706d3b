//! # Run Command
//!
//! Validates the provider and run options, bootstraps the assistant's
//! settings, resolves the prompt and supervises the assistant. Every path
//! publishes a `conclusion`; the execution log is persisted whenever output
//! was captured, on success and failure alike.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use pilot_core::output::{annotate_error, annotate_warning, format_conclusion};
use pilot_core::prompt_source::prepare_prompt;
use pilot_core::settings::setup_settings;
use pilot_core::{ActionError, ActionOutputs, ProcessEnv, Result, RunConfig, RunOptions, print_info};
use tracing::{debug, info, instrument, warn};

use super::exit_code;
use crate::consts::{OUTPUT_CONCLUSION, OUTPUT_EXECUTION_FILE};
use crate::runner::{ExecutionOutcome, Invocation, persist_execution_log, supervise};

/// Handle the `run` subcommand
pub async fn handle_run_command() -> ExitCode {
  let config = RunConfig::from_env(&ProcessEnv);
  let mut outputs = ActionOutputs::new(config.workflow.clone());
  exit_code(execute(&config, &mut outputs).await)
}

/// Run the assistant and publish its conclusion, returning the exit code:
/// 0 on success, the assistant's code on failure (124 on timeout), and 1
/// when the assistant could not be started
#[instrument(skip_all, level = "debug")]
pub async fn execute(config: &RunConfig, outputs: &mut ActionOutputs) -> i32 {
  let invocation = match prepare_invocation(config) {
    Ok(invocation) => invocation,
    Err(e) => return fail(outputs, &e),
  };

  let outcome = match supervise(&invocation).await {
    Ok(outcome) => outcome,
    Err(e) => return fail(outputs, &e),
  };

  report(config, &invocation, outputs, &outcome)
}

/// Everything that must hold before a process is spawned
fn prepare_invocation(config: &RunConfig) -> Result<Invocation> {
  config.provider.validate()?;
  info!("Using provider: {}", config.provider.provider_name());

  let options = RunOptions::try_from(config.options.clone())?;

  let settings_dir = config.settings_dir.as_deref().ok_or_else(|| {
    ActionError::config("Unable to locate the assistant settings directory: neither XDG_CONFIG_HOME nor HOME is set")
  })?;
  let settings_path = setup_settings(settings_dir)?;
  debug!("Settings ready at {}", settings_path.display());

  let prompt = prepare_prompt(
    config.prompt.as_deref(),
    config.prompt_file.as_deref(),
    &config.inline_prompt_path(),
  )?;
  info!("Using prompt file {}", prompt.path().display());
  log_run_diagnostics(config, &options, prompt.path());

  Ok(Invocation::new(config.executable.clone(), &options, prompt.path()))
}

/// Log the provider setup and run inputs, naming custom env keys only
fn log_run_diagnostics(config: &RunConfig, options: &RunOptions, prompt_path: &Path) {
  for (key, value) in config.provider.diagnostics() {
    info!("{}: {}", key, value);
  }
  match fs::metadata(prompt_path) {
    Ok(metadata) => info!("Prompt file size: {} bytes", metadata.len()),
    Err(e) => debug!("Could not stat prompt file {}: {}", prompt_path.display(), e),
  }
  if !options.custom_env.is_empty() {
    let keys: Vec<&str> = options.custom_env.keys().map(String::as_str).collect();
    info!("Custom environment variables: {}", keys.join(", "));
  }
}

fn fail(outputs: &mut ActionOutputs, error: &ActionError) -> i32 {
  annotate_error(&format!("Failed to run Claude: {error}"));
  publish(outputs, OUTPUT_CONCLUSION, "failure");
  1
}

fn report(config: &RunConfig, invocation: &Invocation, outputs: &mut ActionOutputs, outcome: &ExecutionOutcome) -> i32 {
  if outcome.timed_out() {
    annotate_error(&format!(
      "Claude process timed out after {} seconds",
      invocation.timeout.as_secs()
    ));
  } else if outcome.exit_code != 0 {
    annotate_error(&format!(
      "Claude process exited with code {}: {}",
      outcome.exit_code,
      outcome.stderr_text.trim()
    ));
  }

  let execution_file = config.execution_file();
  let persisted = if outcome.captured_output.is_empty() {
    false
  } else {
    match persist_execution_log(&execution_file, &outcome.captured_output) {
      Ok(()) => {
        print_info(&format!("Log saved to {}", execution_file.display()));
        true
      }
      Err(e) => {
        annotate_warning(&e.to_string());
        false
      }
    }
  };

  publish(outputs, OUTPUT_CONCLUSION, outcome.conclusion());
  if persisted {
    publish(outputs, OUTPUT_EXECUTION_FILE, &execution_file.to_string_lossy());
  }
  print_info(&format!("Conclusion: {}", format_conclusion(outcome.conclusion())));

  if outcome.success() { 0 } else { outcome.exit_code }
}

/// A failed write to the output channel is reported but never changes the
/// exit code
fn publish(outputs: &mut ActionOutputs, key: &str, value: &str) {
  if let Err(e) = outputs.set_output(key, value) {
    warn!("Failed to publish {}: {}", key, e);
    annotate_warning(&format!("Failed to publish {key}: {e}"));
  }
}
