//! Spawning and supervising the assistant process.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;

use pilot_core::{ActionError, Result, RunOptions};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use super::{ExecutionOutcome, Termination};
use crate::consts::{DRAIN_GRACE, TERMINATION_GRACE, TIMEOUT_EXIT_CODE};

/// A fully composed assistant invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub program: String,
  pub args: Vec<String>,
  /// Variables overlaid on the inherited environment
  pub env: BTreeMap<String, String>,
  pub timeout: Duration,
  /// Time between the graceful signal and the forced kill
  pub termination_grace: Duration,
  /// Time the output reader gets to finish after the process has exited
  pub drain_grace: Duration,
}

impl Invocation {
  /// Compose the invocation for validated options, with the prompt file as
  /// the final positional argument
  pub fn new(program: impl Into<String>, options: &RunOptions, prompt_path: &Path) -> Self {
    Self {
      program: program.into(),
      args: options.build_args_with_prompt(prompt_path),
      env: options.custom_env.clone(),
      timeout: options.timeout(),
      termination_grace: TERMINATION_GRACE,
      drain_grace: DRAIN_GRACE,
    }
  }
}

/// Run the assistant to completion or until its budget elapses.
///
/// Only a failure to start the process is an error; a non-zero exit or a
/// timeout is reported through the outcome.
#[instrument(skip_all, fields(program = %invocation.program), level = "debug")]
pub async fn supervise(invocation: &Invocation) -> Result<ExecutionOutcome> {
  info!("Running {} {}", invocation.program, invocation.args.join(" "));

  let mut child = Command::new(&invocation.program)
    .args(&invocation.args)
    .envs(&invocation.env)
    .stdin(Stdio::null())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .kill_on_drop(true)
    .spawn()
    .map_err(|source| ActionError::ProcessSpawn {
      program: invocation.program.clone(),
      source,
    })?;

  let captured = Arc::new(Mutex::new(Vec::new()));
  let mut reader = tokio::spawn(drain_output(
    child.stdout.take(),
    child.stderr.take(),
    Arc::clone(&captured),
  ));

  let (exit_code, termination) = match timeout(invocation.timeout, child.wait()).await {
    Ok(Ok(status)) => (status_code(status), Termination::Exited),
    Ok(Err(e)) => {
      warn!("Failed to wait for {}: {}", invocation.program, e);
      (1, Termination::Exited)
    }
    Err(_) => {
      warn!(
        "{} did not finish within {}s, terminating",
        invocation.program,
        invocation.timeout.as_secs()
      );
      terminate(&mut child, invocation.termination_grace).await;
      (TIMEOUT_EXIT_CODE, Termination::TimedOut)
    }
  };
  debug!("Process ended with exit code {}", exit_code);

  let stderr_text = match timeout(invocation.drain_grace, &mut reader).await {
    Ok(Ok(stderr_text)) => stderr_text,
    Ok(Err(e)) => {
      warn!("Output reader failed: {}", e);
      String::new()
    }
    Err(_) => {
      warn!(
        "Output reader still busy {}s after exit, abandoning it",
        invocation.drain_grace.as_secs()
      );
      reader.abort();
      String::new()
    }
  };

  let captured_output = std::mem::take(&mut *captured.lock().await);

  Ok(ExecutionOutcome {
    exit_code,
    termination,
    captured_output,
    stderr_text,
  })
}

/// Echo and record every stdout line, and collect stderr, until both pipes
/// close. Returns the stderr text.
async fn drain_output(
  stdout: Option<ChildStdout>,
  stderr: Option<ChildStderr>,
  captured: Arc<Mutex<Vec<String>>>,
) -> String {
  let read_stdout = async {
    let Some(stdout) = stdout else {
      return;
    };
    let mut lines = BufReader::new(stdout).lines();
    loop {
      match lines.next_line().await {
        Ok(Some(line)) => {
          println!("{}", render_line(&line));
          captured.lock().await.push(line);
        }
        Ok(None) => break,
        Err(e) => {
          warn!("Failed to read assistant output: {}", e);
          break;
        }
      }
    }
  };

  let read_stderr = async {
    let mut text = String::new();
    if let Some(mut stderr) = stderr {
      if let Err(e) = stderr.read_to_string(&mut text).await {
        warn!("Failed to read assistant stderr: {}", e);
      }
    }
    text
  };

  let ((), stderr_text) = tokio::join!(read_stdout, read_stderr);
  stderr_text
}

/// Pretty-print a line that holds a JSON document, otherwise echo it as is
pub fn render_line(line: &str) -> String {
  match serde_json::from_str::<Value>(line) {
    Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| line.to_string()),
    Err(_) => line.to_string(),
  }
}

/// Escalate from the graceful signal to a forced kill
async fn terminate(child: &mut Child, grace: Duration) {
  #[cfg(unix)]
  if send_sigterm(child) {
    match timeout(grace, child.wait()).await {
      Ok(Ok(status)) => {
        info!("Process exited after SIGTERM with {}", status);
        return;
      }
      Ok(Err(e)) => warn!("Failed to wait after SIGTERM: {}", e),
      Err(_) => warn!("Process still running {}s after SIGTERM, killing", grace.as_secs()),
    }
  }

  if let Err(e) = child.kill().await {
    warn!("Failed to kill process: {}", e);
  }
}

#[cfg(unix)]
fn send_sigterm(child: &Child) -> bool {
  use nix::sys::signal::{Signal, kill};
  use nix::unistd::Pid;

  // No id means the process has already been reaped
  let Some(id) = child.id() else {
    return false;
  };
  let Ok(pid) = i32::try_from(id) else {
    return false;
  };

  match kill(Pid::from_raw(pid), Signal::SIGTERM) {
    Ok(()) => true,
    Err(e) => {
      warn!("Failed to send SIGTERM to {}: {}", pid, e);
      false
    }
  }
}

fn status_code(status: ExitStatus) -> i32 {
  if let Some(code) = status.code() {
    return code;
  }

  #[cfg(unix)]
  {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = status.signal() {
      return 128 + signal;
    }
  }

  1
}

#[cfg(all(test, unix))]
mod tests {
  use std::time::Instant;

  use pilot_test_utils::FakeAssistant;

  use super::*;

  fn invocation(assistant: &FakeAssistant, timeout: Duration) -> Invocation {
    Invocation {
      program: assistant.program(),
      args: vec!["-p".to_string(), "/tmp/prompt.txt".to_string()],
      env: BTreeMap::new(),
      timeout,
      termination_grace: Duration::from_secs(1),
      drain_grace: Duration::from_secs(3),
    }
  }

  #[test]
  fn test_render_line() {
    assert_eq!(render_line("{\"type\":\"result\"}"), "{\n  \"type\": \"result\"\n}");
    assert_eq!(render_line("plain text"), "plain text");
  }

  #[test]
  fn test_invocation_from_options() {
    let options = RunOptions {
      max_turns: Some(3),
      custom_env: BTreeMap::from([("FOO".to_string(), "bar".to_string())]),
      ..Default::default()
    };
    let invocation = Invocation::new("claude", &options, Path::new("/tmp/prompt.txt"));
    assert_eq!(invocation.args.last().map(String::as_str), Some("/tmp/prompt.txt"));
    assert!(invocation.args.contains(&"--max-turns".to_string()));
    assert_eq!(invocation.env.get("FOO").map(String::as_str), Some("bar"));
    assert_eq!(invocation.timeout, Duration::from_secs(600));
    assert_eq!(invocation.termination_grace, TERMINATION_GRACE);
  }

  #[tokio::test]
  async fn test_captures_lines_in_order() -> anyhow::Result<()> {
    let assistant = FakeAssistant::streaming(&["{\"type\":\"assistant\"}", "not json"], 0);
    let outcome = supervise(&invocation(&assistant, Duration::from_secs(30))).await?;

    assert!(outcome.success());
    assert_eq!(
      outcome.captured_output,
      vec![
        "{\"type\":\"args\",\"count\":2}".to_string(),
        "{\"type\":\"assistant\"}".to_string(),
        "not json".to_string(),
      ]
    );
    Ok(())
  }

  #[tokio::test]
  async fn test_propagates_exit_code_and_stderr() -> anyhow::Result<()> {
    let assistant = FakeAssistant::new("echo 'rate limited' >&2\nexit 3");
    let outcome = supervise(&invocation(&assistant, Duration::from_secs(30))).await?;

    assert_eq!(outcome.exit_code, 3);
    assert_eq!(outcome.termination, Termination::Exited);
    assert!(outcome.stderr_text.contains("rate limited"));
    Ok(())
  }

  #[tokio::test]
  async fn test_custom_env_overlays_inherited_environment() -> anyhow::Result<()> {
    let assistant = FakeAssistant::new("echo \"$PILOT_TEST_VALUE\"");
    let mut invocation = invocation(&assistant, Duration::from_secs(30));
    invocation
      .env
      .insert("PILOT_TEST_VALUE".to_string(), "overlaid".to_string());

    let outcome = supervise(&invocation).await?;
    assert_eq!(outcome.captured_output, vec!["overlaid".to_string()]);
    Ok(())
  }

  #[tokio::test]
  async fn test_timeout_terminates_gracefully() -> anyhow::Result<()> {
    let assistant = FakeAssistant::sleeper();
    let started = Instant::now();
    let outcome = supervise(&invocation(&assistant, Duration::from_secs(1))).await?;

    assert!(outcome.timed_out());
    assert_eq!(outcome.exit_code, TIMEOUT_EXIT_CODE);
    assert_eq!(outcome.captured_output, vec!["{\"type\":\"system\"}".to_string()]);
    assert!(started.elapsed() < Duration::from_secs(5));
    Ok(())
  }

  #[tokio::test]
  async fn test_timeout_kills_process_ignoring_sigterm() -> anyhow::Result<()> {
    let assistant = FakeAssistant::stubborn();
    let started = Instant::now();
    let outcome = supervise(&invocation(&assistant, Duration::from_secs(1))).await?;

    assert!(outcome.timed_out());
    assert_eq!(outcome.exit_code, TIMEOUT_EXIT_CODE);
    // budget + termination grace + drain grace, with slack
    assert!(started.elapsed() < Duration::from_secs(8));
    Ok(())
  }

  #[tokio::test]
  async fn test_missing_program_is_spawn_error() {
    let invocation = Invocation {
      program: "/nonexistent/pilot-assistant".to_string(),
      args: Vec::new(),
      env: BTreeMap::new(),
      timeout: Duration::from_secs(1),
      termination_grace: Duration::from_secs(1),
      drain_grace: Duration::from_secs(1),
    };
    let err = supervise(&invocation).await.unwrap_err();
    assert!(matches!(err, ActionError::ProcessSpawn { .. }));
  }
}
