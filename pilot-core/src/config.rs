//! # Configuration
//!
//! Explicit configuration structs assembled once at the entrypoint boundary.
//! Components receive these structs as parameters and never read process
//! state themselves; [`EnvSource`] is the single seam through which
//! environment values enter the program, so tests can substitute a plain map.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::path::PathBuf;

use crate::context::{Inputs, parse_multiline_input};
use crate::error::{ActionError, Result};
use crate::provider::ProviderEnv;
use crate::run_options::RawRunOptions;

/// Default public GitHub API base URL
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default public GitHub web URL
pub const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Default trigger phrase when none is configured
pub const DEFAULT_TRIGGER_PHRASE: &str = "@claude";

/// Default assistant executable name
pub const DEFAULT_EXECUTABLE: &str = "claude";

/// Default temporary directory when the runner does not provide one
pub const DEFAULT_RUNNER_TEMP: &str = "/tmp";

/// A source of environment-style key/value settings.
///
/// Empty values are reported as absent.
pub trait EnvSource {
  fn var(&self, key: &str) -> Option<String>;

  /// Interpret a variable as a case-insensitive `true` flag
  fn flag(&self, key: &str) -> bool {
    self.var(key).is_some_and(|value| value.eq_ignore_ascii_case("true"))
  }

  /// Interpret a variable as an enable switch set to `1`
  fn switch(&self, key: &str) -> bool {
    self.var(key).as_deref() == Some("1")
  }
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
  fn var(&self, key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
  }
}

impl<K, V> EnvSource for HashMap<K, V>
where
  K: Borrow<str> + Hash + Eq,
  V: AsRef<str>,
{
  fn var(&self, key: &str) -> Option<String> {
    self
      .get(key)
      .map(|value| value.as_ref().to_string())
      .filter(|value| !value.is_empty())
  }
}

/// Platform URLs used to reach the API and build links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubEndpoints {
  pub api_url: String,
  pub server_url: String,
  pub graphql_url: String,
}

impl Default for GitHubEndpoints {
  fn default() -> Self {
    Self {
      api_url: DEFAULT_API_URL.to_string(),
      server_url: DEFAULT_SERVER_URL.to_string(),
      graphql_url: format!("{DEFAULT_API_URL}/graphql"),
    }
  }
}

impl GitHubEndpoints {
  pub fn from_env(env: &impl EnvSource) -> Self {
    let api_url = env
      .var("GITHUB_API_URL")
      .unwrap_or_else(|| DEFAULT_API_URL.to_string())
      .trim_end_matches('/')
      .to_string();
    let server_url = env
      .var("GITHUB_SERVER_URL")
      .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
      .trim_end_matches('/')
      .to_string();
    let graphql_url = env
      .var("GITHUB_GRAPHQL_URL")
      .unwrap_or_else(|| format!("{api_url}/graphql"));

    Self {
      api_url,
      server_url,
      graphql_url,
    }
  }

  /// Link to the workflow run page for a repository full name
  pub fn run_url(&self, repository: &str, run_id: &str) -> String {
    format!("{}/{}/actions/runs/{}", self.server_url, repository, run_id)
  }

  /// Link to a branch tree page
  pub fn branch_url(&self, repository: &str, branch: &str) -> String {
    format!("{}/{}/tree/{}", self.server_url, repository, branch)
  }
}

/// Inputs for obtaining a platform token
#[derive(Debug, Clone, Default)]
pub struct TokenConfig {
  pub override_token: Option<String>,
  pub request_url: Option<String>,
  pub request_token: Option<String>,
  pub installation_id: Option<String>,
}

impl TokenConfig {
  pub fn from_env(env: &impl EnvSource) -> Self {
    Self {
      override_token: env.var("OVERRIDE_GITHUB_TOKEN"),
      request_url: env.var("ACTIONS_ID_TOKEN_REQUEST_URL"),
      request_token: env.var("ACTIONS_ID_TOKEN_REQUEST_TOKEN"),
      installation_id: env.var("GITHUB_INSTALLATION_ID"),
    }
  }
}

/// Where the triggering event is described
#[derive(Debug, Clone, Default)]
pub struct EventConfig {
  pub event_path: Option<PathBuf>,
  pub event_name: Option<String>,
  pub repository: Option<String>,
  pub run_id: String,
  pub actor: String,
}

impl EventConfig {
  pub fn from_env(env: &impl EnvSource) -> Self {
    Self {
      event_path: env.var("GITHUB_EVENT_PATH").map(PathBuf::from),
      event_name: env.var("GITHUB_EVENT_NAME"),
      repository: env.var("GITHUB_REPOSITORY"),
      run_id: env.var("GITHUB_RUN_ID").unwrap_or_default(),
      actor: env.var("GITHUB_ACTOR").unwrap_or_default(),
    }
  }
}

/// Files the hosting pipeline reads outputs and exported variables from
#[derive(Debug, Clone, Default)]
pub struct WorkflowFiles {
  pub output: Option<PathBuf>,
  pub env: Option<PathBuf>,
}

impl WorkflowFiles {
  pub fn from_env(env: &impl EnvSource) -> Self {
    Self {
      output: env.var("GITHUB_OUTPUT").map(PathBuf::from),
      env: env.var("GITHUB_ENV").map(PathBuf::from),
    }
  }
}

impl Inputs {
  pub fn from_env(env: &impl EnvSource) -> Self {
    Self {
      trigger_phrase: env
        .var("TRIGGER_PHRASE")
        .unwrap_or_else(|| DEFAULT_TRIGGER_PHRASE.to_string()),
      assignee_trigger: env.var("ASSIGNEE_TRIGGER").unwrap_or_default(),
      allowed_tools: parse_multiline_input(&env.var("ALLOWED_TOOLS").unwrap_or_default()),
      disallowed_tools: parse_multiline_input(&env.var("DISALLOWED_TOOLS").unwrap_or_default()),
      custom_instructions: env.var("CUSTOM_INSTRUCTIONS").unwrap_or_default(),
      direct_prompt: env.var("DIRECT_PROMPT").unwrap_or_default(),
      base_branch: env.var("BASE_BRANCH"),
    }
  }
}

fn runner_temp(env: &impl EnvSource) -> PathBuf {
  PathBuf::from(env.var("RUNNER_TEMP").unwrap_or_else(|| DEFAULT_RUNNER_TEMP.to_string()))
}

/// Everything the `prepare` pipeline needs
#[derive(Debug, Clone)]
pub struct PrepareConfig {
  pub endpoints: GitHubEndpoints,
  pub token: TokenConfig,
  pub event: EventConfig,
  pub inputs: Inputs,
  pub additional_mcp_config: Option<String>,
  pub runner_temp: PathBuf,
  pub workflow: WorkflowFiles,
}

impl PrepareConfig {
  pub fn from_env(env: &impl EnvSource) -> Self {
    Self {
      endpoints: GitHubEndpoints::from_env(env),
      token: TokenConfig::from_env(env),
      event: EventConfig::from_env(env),
      inputs: Inputs::from_env(env),
      additional_mcp_config: env.var("MCP_CONFIG"),
      runner_temp: runner_temp(env),
      workflow: WorkflowFiles::from_env(env),
    }
  }

  /// Directory the prompt file is written into
  pub fn prompt_dir(&self) -> PathBuf {
    self.runner_temp.join("claude-prompts")
  }
}

/// Everything the `run` entrypoint needs
#[derive(Debug, Clone)]
pub struct RunConfig {
  pub prompt: Option<String>,
  pub prompt_file: Option<PathBuf>,
  pub options: RawRunOptions,
  pub executable: String,
  pub provider: ProviderEnv,
  pub settings_dir: Option<PathBuf>,
  pub runner_temp: PathBuf,
  pub workflow: WorkflowFiles,
}

impl RunConfig {
  pub fn from_env(env: &impl EnvSource) -> Self {
    let xdg_config_home = env.var("XDG_CONFIG_HOME").map(PathBuf::from);
    let home = directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());

    Self {
      prompt: env.var("INPUT_PROMPT"),
      prompt_file: env.var("INPUT_PROMPT_FILE").map(PathBuf::from),
      options: RawRunOptions::from_env(env),
      executable: env
        .var("CLAUDE_EXECUTABLE")
        .unwrap_or_else(|| DEFAULT_EXECUTABLE.to_string()),
      provider: ProviderEnv::from_env(env),
      settings_dir: crate::settings::config_home_dir(xdg_config_home, home),
      runner_temp: runner_temp(env),
      workflow: WorkflowFiles::from_env(env),
    }
  }

  /// Where the execution log is persisted
  pub fn execution_file(&self) -> PathBuf {
    self.runner_temp.join("claude-execution-output.json")
  }

  /// Where an inline prompt is materialised
  pub fn inline_prompt_path(&self) -> PathBuf {
    self.runner_temp.join("claude-action").join("prompt.txt")
  }
}

/// Everything the `update-comment` entrypoint needs
#[derive(Debug, Clone)]
pub struct UpdateCommentConfig {
  pub endpoints: GitHubEndpoints,
  pub repository: String,
  pub comment_id: u64,
  pub run_id: String,
  pub token: String,
  pub pr_number: Option<String>,
  pub claude_branch: Option<String>,
  pub base_branch: Option<String>,
  pub is_pr: bool,
  pub claude_success: bool,
  pub output_file: Option<String>,
  pub trigger_username: Option<String>,
  pub prepare_success: bool,
  pub prepare_error: Option<String>,
}

impl UpdateCommentConfig {
  /// Assemble the reporter configuration, failing if any required variable
  /// is missing
  pub fn from_env(env: &impl EnvSource) -> Result<Self> {
    let required = ["REPOSITORY", "CLAUDE_COMMENT_ID", "GITHUB_RUN_ID", "GITHUB_TOKEN"];
    let missing: Vec<&str> = required.iter().copied().filter(|key| env.var(key).is_none()).collect();
    if !missing.is_empty() {
      return Err(ActionError::config(format!(
        "Missing required environment variables: {}",
        missing.join(", ")
      )));
    }

    let raw_comment_id = env.var("CLAUDE_COMMENT_ID").unwrap_or_default();
    let comment_id = raw_comment_id
      .trim()
      .parse::<u64>()
      .map_err(|e| ActionError::config(format!("CLAUDE_COMMENT_ID must be a comment id, got '{raw_comment_id}': {e}")))?;

    Ok(Self {
      endpoints: GitHubEndpoints::from_env(env),
      repository: env.var("REPOSITORY").unwrap_or_default(),
      comment_id,
      run_id: env.var("GITHUB_RUN_ID").unwrap_or_default(),
      token: env.var("GITHUB_TOKEN").unwrap_or_default(),
      pr_number: env.var("PR_NUMBER"),
      claude_branch: env.var("CLAUDE_BRANCH"),
      base_branch: env.var("BASE_BRANCH"),
      is_pr: env.flag("IS_PR"),
      claude_success: env.flag("CLAUDE_SUCCESS"),
      output_file: env.var("OUTPUT_FILE"),
      trigger_username: env.var("TRIGGER_USERNAME"),
      prepare_success: env.flag("PREPARE_SUCCESS"),
      prepare_error: env.var("PREPARE_ERROR"),
    })
  }
}
