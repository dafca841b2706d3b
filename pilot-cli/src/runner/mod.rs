//! # Assistant Process Supervisor
//!
//! Spawns the assistant with its composed command line, drains its streamed
//! output while enforcing a wall-clock budget, and classifies how it ended.
//! Two tasks run per invocation: the output reader, which is the only writer
//! of the captured lines, and the exit wait, which owns the timeout and gives
//! the reader a bounded grace period once the process is gone.

pub mod execution_log;
pub mod process;

pub use execution_log::persist_execution_log;
pub use process::{Invocation, supervise};

/// How the assistant process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
  /// The process exited on its own
  Exited,
  /// The budget elapsed and the process was terminated
  TimedOut,
}

/// Everything observed about one assistant run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
  pub exit_code: i32,
  pub termination: Termination,
  /// Standard output lines in the order the process emitted them
  pub captured_output: Vec<String>,
  pub stderr_text: String,
}

impl ExecutionOutcome {
  pub fn timed_out(&self) -> bool {
    self.termination == Termination::TimedOut
  }

  pub fn success(&self) -> bool {
    !self.timed_out() && self.exit_code == 0
  }

  /// The `conclusion` output value
  pub fn conclusion(&self) -> &'static str {
    if self.success() { "success" } else { "failure" }
  }
}
