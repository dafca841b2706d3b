//! # Command Line Interface
//!
//! Defines the CLI structure and command handlers for the pilot tool. Each
//! subcommand is one stage of the pipeline: `prepare` before the assistant
//! runs, `run` to supervise it, and `update-comment` to report the result.

pub mod prepare;
pub mod run;
pub mod update_comment;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser, Subcommand};
use pilot_core::{ColorMode, print_error};
use tokio::runtime::{Builder, Runtime};

/// Top-level CLI command for the pilot tool
#[derive(Parser)]
#[command(name = "pilot")]
#[command(display_name = "🛫 Pilot")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "Run a coding assistant on GitHub issues and pull requests from CI")]
#[command(
  long_about = "Pilot bridges a CI pipeline and a coding assistant.\n\n\
        It decides whether an event should trigger the assistant, prepares its prompt\n\
        and branch, supervises the assistant process and reports the outcome back on\n\
        the issue or pull request through a tracking comment."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Controls when colored output is used
  #[arg(
    long,
    value_enum,
    ignore_case = true,
    global = true,
    default_value_t = ColorMode::Auto,
  )]
  pub colors: ColorMode,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for the pilot tool
#[derive(Subcommand)]
pub enum Commands {
  /// Decide whether to act and prepare the assistant's run
  #[command(long_about = "Prepare a run for the triggering event.\n\n\
            Acquires a platform token, checks the actor's permissions, evaluates the\n\
            trigger, creates the tracking comment and working branch, and writes the\n\
            prompt. Exits 0 when the run is prepared or when no trigger was found,\n\
            and 1 on any failure (the reason is published as `prepare_error`).")]
  Prepare,

  /// Run the assistant under supervision
  #[command(long_about = "Run the assistant with the prepared prompt.\n\n\
            Validates the provider settings, bootstraps the assistant's settings file,\n\
            resolves the prompt, then spawns the assistant with a wall-clock timeout.\n\
            Publishes `conclusion` and `execution_file` and exits with the assistant's\n\
            exit code (124 on timeout).")]
  Run,

  /// Report the final status on the tracking comment
  #[command(long_about = "Rewrite the tracking comment with the run's final status.\n\n\
            Reads the results of the earlier steps from the environment. Exits 1 when\n\
            a required variable is missing or the update fails.")]
  UpdateComment,
}

pub fn handle_cli(cli: Cli) -> ExitCode {
  // Set global color override based on --colors argument
  cli.colors.apply();

  let runtime = match create_runtime() {
    Ok(runtime) => runtime,
    Err(e) => {
      print_error(&format!("{e:#}"));
      return ExitCode::FAILURE;
    }
  };

  match cli.command {
    Commands::Prepare => runtime.block_on(prepare::handle_prepare_command()),
    Commands::Run => runtime.block_on(run::handle_run_command()),
    Commands::UpdateComment => runtime.block_on(update_comment::handle_update_comment_command()),
  }
}

/// One single-threaded runtime per invocation
fn create_runtime() -> Result<Runtime> {
  Builder::new_current_thread()
    .enable_all()
    .build()
    .context("Failed to create tokio runtime")
}

/// Convert a process exit code into one the shell can see
pub fn exit_code(code: i32) -> ExitCode {
  ExitCode::from(exit_status(code))
}

/// Codes outside `0..=255` collapse to a generic failure
fn exit_status(code: i32) -> u8 {
  u8::try_from(code).unwrap_or(1)
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_parse_subcommands() {
    let cli = Cli::try_parse_from(["pilot", "-vv", "update-comment"]).unwrap();
    assert_eq!(cli.verbose, 2);
    assert!(matches!(cli.command, Commands::UpdateComment));

    let cli = Cli::try_parse_from(["pilot", "prepare", "--colors", "NEVER"]).unwrap();
    assert_eq!(cli.colors, ColorMode::Never);
    assert!(matches!(cli.command, Commands::Prepare));
  }

  #[test]
  fn test_exit_code_conversion() {
    assert_eq!(exit_status(0), 0);
    assert_eq!(exit_status(124), 124);
    assert_eq!(exit_status(-1), 1);
    assert_eq!(exit_status(300), 1);
  }
}
