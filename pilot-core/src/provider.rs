//! # Model Provider Validation
//!
//! Checks that exactly one model provider is selected and that the variables
//! it needs are present. All problems are collected and reported together.

use crate::config::EnvSource;
use crate::error::{ActionError, Result};

/// Provider-related settings captured from the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderEnv {
  pub use_bedrock: bool,
  pub use_vertex: bool,
  pub anthropic_api_key: Option<String>,
  pub model: Option<String>,
  pub aws_region: Option<String>,
  pub aws_access_key_id: Option<String>,
  pub aws_secret_access_key: Option<String>,
  pub aws_session_token: Option<String>,
  pub bedrock_base_url: Option<String>,
  pub vertex_project_id: Option<String>,
  pub cloud_ml_region: Option<String>,
}

impl ProviderEnv {
  pub fn from_env(env: &impl EnvSource) -> Self {
    Self {
      use_bedrock: env.switch("CLAUDE_CODE_USE_BEDROCK"),
      use_vertex: env.switch("CLAUDE_CODE_USE_VERTEX"),
      anthropic_api_key: env.var("ANTHROPIC_API_KEY"),
      model: env.var("ANTHROPIC_MODEL"),
      aws_region: env.var("AWS_REGION"),
      aws_access_key_id: env.var("AWS_ACCESS_KEY_ID"),
      aws_secret_access_key: env.var("AWS_SECRET_ACCESS_KEY"),
      aws_session_token: env.var("AWS_SESSION_TOKEN"),
      bedrock_base_url: env.var("ANTHROPIC_BEDROCK_BASE_URL"),
      vertex_project_id: env.var("ANTHROPIC_VERTEX_PROJECT_ID"),
      cloud_ml_region: env.var("CLOUD_ML_REGION"),
    }
  }

  /// Human-readable provider name
  pub const fn provider_name(&self) -> &'static str {
    if self.use_bedrock {
      "AWS Bedrock"
    } else if self.use_vertex {
      "Google Vertex AI"
    } else {
      "Anthropic API"
    }
  }

  /// Provider settings worth logging before a run. Credentials are reported
  /// as set or not set, never by value.
  pub fn diagnostics(&self) -> Vec<(&'static str, String)> {
    let presence = |value: &Option<String>| (if value.is_some() { "set" } else { "not set" }).to_string();
    let or_unset = |value: &Option<String>| value.clone().unwrap_or_else(|| "not set".to_string());

    vec![
      ("ANTHROPIC_MODEL", or_unset(&self.model)),
      ("CLAUDE_CODE_USE_BEDROCK", self.use_bedrock.to_string()),
      ("CLAUDE_CODE_USE_VERTEX", self.use_vertex.to_string()),
      ("AWS_REGION", or_unset(&self.aws_region)),
      ("AWS_ACCESS_KEY_ID", presence(&self.aws_access_key_id)),
      ("AWS_SECRET_ACCESS_KEY", presence(&self.aws_secret_access_key)),
      ("AWS_SESSION_TOKEN", presence(&self.aws_session_token)),
      ("ANTHROPIC_BEDROCK_BASE_URL", or_unset(&self.bedrock_base_url)),
    ]
  }

  /// Validate the selected provider's requirements
  pub fn validate(&self) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if self.use_bedrock && self.use_vertex {
      errors.push("Cannot use both Bedrock and Vertex AI simultaneously. Please set only one provider.".to_string());
    } else if self.use_bedrock {
      let required = [
        ("AWS_REGION", &self.aws_region),
        ("AWS_ACCESS_KEY_ID", &self.aws_access_key_id),
        ("AWS_SECRET_ACCESS_KEY", &self.aws_secret_access_key),
      ];
      errors.extend(
        required
          .iter()
          .filter(|(_, value)| value.is_none())
          .map(|(key, _)| format!("{key} is required when using AWS Bedrock.")),
      );
    } else if self.use_vertex {
      let required = [
        ("ANTHROPIC_VERTEX_PROJECT_ID", &self.vertex_project_id),
        ("CLOUD_ML_REGION", &self.cloud_ml_region),
      ];
      errors.extend(
        required
          .iter()
          .filter(|(_, value)| value.is_none())
          .map(|(key, _)| format!("{key} is required when using Google Vertex AI.")),
      );
    } else if self.anthropic_api_key.is_none() {
      errors.push("ANTHROPIC_API_KEY is required when using direct Anthropic API.".to_string());
    }

    if errors.is_empty() {
      return Ok(());
    }

    let details: Vec<String> = errors.iter().map(|e| format!("  - {e}")).collect();
    Err(ActionError::config(format!(
      "Environment variable validation failed:\n{}",
      details.join("\n")
    )))
  }
}
