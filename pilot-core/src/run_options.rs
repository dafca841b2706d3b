//! # Assistant Run Options
//!
//! Validated, immutable configuration for one assistant invocation and the
//! deterministic command line derived from it. Validation happens before any
//! process is spawned: a bad `max_turns` or timeout is a configuration error,
//! never silently dropped.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use crate::config::EnvSource;
use crate::error::{ActionError, Result};

/// Default wall-clock budget for the assistant, in minutes
pub const DEFAULT_TIMEOUT_MINUTES: u64 = 10;

/// Flags passed on every invocation
pub const BASE_ARGS: &[&str] = &["-p", "--verbose", "--output-format", "stream-json"];

/// Unvalidated run inputs as they arrive from the pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRunOptions {
  pub allowed_tools: Option<String>,
  pub disallowed_tools: Option<String>,
  pub max_turns: Option<String>,
  pub mcp_config: Option<String>,
  pub system_prompt: Option<String>,
  pub append_system_prompt: Option<String>,
  pub claude_env: Option<String>,
  pub timeout_minutes: Option<String>,
}

impl RawRunOptions {
  pub fn from_env(env: &impl EnvSource) -> Self {
    Self {
      allowed_tools: env.var("INPUT_ALLOWED_TOOLS"),
      disallowed_tools: env.var("INPUT_DISALLOWED_TOOLS"),
      max_turns: env.var("INPUT_MAX_TURNS"),
      mcp_config: env.var("INPUT_MCP_CONFIG"),
      system_prompt: env.var("INPUT_SYSTEM_PROMPT"),
      append_system_prompt: env.var("INPUT_APPEND_SYSTEM_PROMPT"),
      claude_env: env.var("INPUT_CLAUDE_ENV"),
      timeout_minutes: env.var("INPUT_TIMEOUT_MINUTES"),
    }
  }
}

/// Validated options for the assistant invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
  pub allowed_tools: Option<String>,
  pub disallowed_tools: Option<String>,
  pub max_turns: Option<u32>,
  pub mcp_config: Option<String>,
  pub system_prompt: Option<String>,
  pub append_system_prompt: Option<String>,
  pub timeout_minutes: u64,
  pub custom_env: BTreeMap<String, String>,
}

impl Default for RunOptions {
  fn default() -> Self {
    Self {
      allowed_tools: None,
      disallowed_tools: None,
      max_turns: None,
      mcp_config: None,
      system_prompt: None,
      append_system_prompt: None,
      timeout_minutes: DEFAULT_TIMEOUT_MINUTES,
      custom_env: BTreeMap::new(),
    }
  }
}

impl TryFrom<RawRunOptions> for RunOptions {
  type Error = ActionError;

  fn try_from(raw: RawRunOptions) -> Result<Self> {
    let max_turns = raw.max_turns.as_deref().map(parse_max_turns).transpose()?;
    let timeout_minutes = match raw.timeout_minutes.as_deref() {
      Some(value) => parse_timeout_minutes(value)?,
      None => DEFAULT_TIMEOUT_MINUTES,
    };
    let custom_env = parse_custom_env_vars(raw.claude_env.as_deref().unwrap_or_default());

    Ok(Self {
      allowed_tools: non_empty(raw.allowed_tools),
      disallowed_tools: non_empty(raw.disallowed_tools),
      max_turns,
      mcp_config: non_empty(raw.mcp_config),
      system_prompt: non_empty(raw.system_prompt),
      append_system_prompt: non_empty(raw.append_system_prompt),
      timeout_minutes,
      custom_env,
    })
  }
}

impl RunOptions {
  /// Wall-clock budget for the assistant process, saturating for
  /// budgets too large to express in seconds
  pub const fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_minutes.saturating_mul(60))
  }

  /// Command-line arguments in their fixed order: base flags, then allowed
  /// tools, disallowed tools, max turns, MCP config, system prompt and
  /// appended system prompt, each only when set
  pub fn build_args(&self) -> Vec<String> {
    let mut args: Vec<String> = BASE_ARGS.iter().map(|s| s.to_string()).collect();

    let mut push = |flag: &str, value: Option<String>| {
      if let Some(value) = value {
        args.push(flag.to_string());
        args.push(value);
      }
    };

    push("--allowedTools", self.allowed_tools.clone());
    push("--disallowedTools", self.disallowed_tools.clone());
    push("--max-turns", self.max_turns.map(|turns| turns.to_string()));
    push("--mcp-config", self.mcp_config.clone());
    push("--system-prompt", self.system_prompt.clone());
    push("--append-system-prompt", self.append_system_prompt.clone());

    args
  }

  /// Full argument vector with the prompt file as the final positional
  pub fn build_args_with_prompt(&self, prompt_path: &Path) -> Vec<String> {
    let mut args = self.build_args();
    args.push(prompt_path.to_string_lossy().into_owned());
    args
  }
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

/// Parse a max-turns setting, which must be a positive integer
pub fn parse_max_turns(value: &str) -> Result<u32> {
  match value.trim().parse::<u32>() {
    Ok(turns) if turns > 0 => Ok(turns),
    _ => Err(ActionError::config(format!(
      "maxTurns must be a positive number, got: {value}"
    ))),
  }
}

/// Parse a timeout setting, which must be a positive number of minutes
pub fn parse_timeout_minutes(value: &str) -> Result<u64> {
  match value.trim().parse::<u64>() {
    Ok(minutes) if minutes > 0 => Ok(minutes),
    _ => Err(ActionError::config(format!(
      "timeout_minutes must be a positive number, got: {value}"
    ))),
  }
}

/// Parse custom environment variables from `KEY: VALUE` lines.
///
/// Blank lines, `#` comments and lines without a colon are skipped; keys and
/// values are trimmed; empty keys are dropped; later keys overwrite earlier
/// ones.
pub fn parse_custom_env_vars(input: &str) -> BTreeMap<String, String> {
  let mut vars = BTreeMap::new();

  for line in input.lines() {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
      continue;
    }
    let Some((key, value)) = line.split_once(':') else {
      continue;
    };
    let key = key.trim();
    if key.is_empty() {
      continue;
    }
    vars.insert(key.to_string(), value.trim().to_string());
  }

  vars
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use test_case::test_case;

  use super::*;

  #[test]
  fn test_parse_custom_env_vars() {
    let vars = parse_custom_env_vars("FOO: bar\n# comment\n\nBAZ:qux");
    assert_eq!(
      vars,
      BTreeMap::from([("BAZ".to_string(), "qux".to_string()), ("FOO".to_string(), "bar".to_string())])
    );
  }

  #[test]
  fn test_parse_custom_env_vars_skips_lines_without_colon() {
    let vars = parse_custom_env_vars("noColonHere\nKEY: value");
    assert_eq!(vars.len(), 1);
    assert_eq!(vars["KEY"], "value");
  }

  #[test]
  fn test_parse_custom_env_vars_edge_cases() {
    let vars = parse_custom_env_vars("  : orphan\nURL: https://example.com:8080/x\nDUP: one\nDUP: two\nEMPTY:");
    assert_eq!(vars.get(""), None);
    assert_eq!(vars["URL"], "https://example.com:8080/x");
    assert_eq!(vars["DUP"], "two");
    assert_eq!(vars["EMPTY"], "");
  }

  #[test_case("0" ; "zero")]
  #[test_case("-3" ; "negative")]
  #[test_case("abc" ; "not a number")]
  #[test_case("" ; "empty")]
  fn test_invalid_max_turns_is_configuration_error(value: &str) {
    let raw = RawRunOptions {
      max_turns: Some(value.to_string()),
      ..Default::default()
    };
    let err = RunOptions::try_from(raw).unwrap_err();
    assert!(matches!(err, ActionError::Configuration(_)));
    assert!(err.to_string().contains("maxTurns must be a positive number"));
  }

  #[test_case("0" ; "zero")]
  #[test_case("ten" ; "not a number")]
  fn test_invalid_timeout_is_configuration_error(value: &str) {
    let raw = RawRunOptions {
      timeout_minutes: Some(value.to_string()),
      ..Default::default()
    };
    assert!(matches!(RunOptions::try_from(raw), Err(ActionError::Configuration(_))));
  }

  #[test]
  fn test_huge_timeout_saturates() {
    let raw = RawRunOptions {
      timeout_minutes: Some("307445734561825861".to_string()),
      ..Default::default()
    };
    let options = RunOptions::try_from(raw).unwrap();
    assert_eq!(options.timeout_minutes, 307_445_734_561_825_861);
    assert_eq!(options.timeout(), Duration::from_secs(u64::MAX));
  }

  #[test]
  fn test_defaults() {
    let options = RunOptions::try_from(RawRunOptions::default()).unwrap();
    assert_eq!(options.timeout_minutes, 10);
    assert_eq!(options.timeout(), Duration::from_secs(600));
    assert_eq!(options.build_args(), vec!["-p", "--verbose", "--output-format", "stream-json"]);
  }

  #[test]
  fn test_build_args_order() {
    let raw = RawRunOptions {
      allowed_tools: Some("Edit,Read".to_string()),
      disallowed_tools: Some("WebFetch".to_string()),
      max_turns: Some("5".to_string()),
      mcp_config: Some("/tmp/mcp.json".to_string()),
      system_prompt: Some("be terse".to_string()),
      append_system_prompt: Some("and kind".to_string()),
      claude_env: Some("A: 1".to_string()),
      timeout_minutes: Some("3".to_string()),
    };
    let options = RunOptions::try_from(raw).unwrap();
    let args = options.build_args_with_prompt(&PathBuf::from("/tmp/prompt.txt"));
    assert_eq!(
      args,
      vec![
        "-p",
        "--verbose",
        "--output-format",
        "stream-json",
        "--allowedTools",
        "Edit,Read",
        "--disallowedTools",
        "WebFetch",
        "--max-turns",
        "5",
        "--mcp-config",
        "/tmp/mcp.json",
        "--system-prompt",
        "be terse",
        "--append-system-prompt",
        "and kind",
        "/tmp/prompt.txt",
      ]
    );
    assert_eq!(options.timeout(), Duration::from_secs(180));
    assert_eq!(options.custom_env["A"], "1");
  }

  #[test]
  fn test_blank_settings_are_omitted() {
    let raw = RawRunOptions {
      allowed_tools: Some("   ".to_string()),
      system_prompt: Some(String::new()),
      ..Default::default()
    };
    let options = RunOptions::try_from(raw).unwrap();
    assert_eq!(options.build_args().len(), BASE_ARGS.len());
  }
}
