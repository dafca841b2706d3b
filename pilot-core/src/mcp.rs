//! # MCP Configuration
//!
//! Builds the supplementary service configuration handed to the assistant.
//! The base configuration has no servers; a user fragment can add servers.
//! A malformed fragment never fails the run: the base configuration is used
//! and a warning value is returned for the caller to report.

use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::debug;

/// Why a user fragment was not merged
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum McpMergeWarning {
  #[error("MCP_CONFIG is not valid JSON, using base configuration: {0}")]
  InvalidJson(String),

  #[error("MCP_CONFIG has no mcpServers object, using base configuration")]
  MissingServers,
}

/// Result of a merge: the compact JSON configuration and an optional warning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpConfig {
  pub json: String,
  pub warning: Option<McpMergeWarning>,
}

/// Merge the user's fragment into the base configuration
pub fn prepare_mcp_config(additional: Option<&str>) -> McpConfig {
  let mut servers = Map::new();
  let warning = additional
    .filter(|fragment| !fragment.trim().is_empty())
    .and_then(|fragment| merge_servers(&mut servers, fragment).err());

  debug!("Prepared MCP config with {} server(s)", servers.len());
  let json = json!({ "mcpServers": servers }).to_string();

  McpConfig { json, warning }
}

fn merge_servers(servers: &mut Map<String, Value>, fragment: &str) -> Result<(), McpMergeWarning> {
  let value: Value = serde_json::from_str(fragment).map_err(|e| McpMergeWarning::InvalidJson(e.to_string()))?;

  let Some(additional) = value.get("mcpServers").and_then(Value::as_object) else {
    return Err(McpMergeWarning::MissingServers);
  };

  for (name, server) in additional {
    servers.insert(name.clone(), server.clone());
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_base_configuration() {
    let config = prepare_mcp_config(None);
    assert_eq!(config.json, r#"{"mcpServers":{}}"#);
    assert_eq!(config.warning, None);

    let config = prepare_mcp_config(Some("   "));
    assert_eq!(config.json, r#"{"mcpServers":{}}"#);
    assert_eq!(config.warning, None);
  }

  #[test]
  fn test_merges_user_servers() {
    let fragment = r#"{"mcpServers": {"docs": {"command": "docs-server", "args": ["--stdio"]}}}"#;
    let config = prepare_mcp_config(Some(fragment));
    let value: Value = serde_json::from_str(&config.json).unwrap();
    assert_eq!(value["mcpServers"]["docs"]["command"], "docs-server");
    assert_eq!(config.warning, None);
  }

  #[test]
  fn test_invalid_json_is_downgraded_to_warning() {
    let config = prepare_mcp_config(Some("{not json"));
    assert_eq!(config.json, r#"{"mcpServers":{}}"#);
    assert!(matches!(config.warning, Some(McpMergeWarning::InvalidJson(_))));
  }

  #[test]
  fn test_missing_servers_is_downgraded_to_warning() {
    let config = prepare_mcp_config(Some(r#"{"servers": {}}"#));
    assert_eq!(config.json, r#"{"mcpServers":{}}"#);
    assert_eq!(config.warning, Some(McpMergeWarning::MissingServers));

    let config = prepare_mcp_config(Some(r#"{"mcpServers": []}"#));
    assert_eq!(config.warning, Some(McpMergeWarning::MissingServers));
  }
}
