//! # Assistant Settings Bootstrap
//!
//! Ensures the assistant's settings file enables project-scoped MCP servers,
//! preserving any other settings already present.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{ActionError, Result};

/// Resolve the assistant's config directory: `$XDG_CONFIG_HOME/claude` when
/// set, otherwise `~/.claude`
pub fn config_home_dir(xdg_config_home: Option<PathBuf>, home: Option<PathBuf>) -> Option<PathBuf> {
  match xdg_config_home {
    Some(xdg) => Some(xdg.join("claude")),
    None => home.map(|home| home.join(".claude")),
  }
}

/// Create or update `settings.json` in `config_dir`, returning its path
pub fn setup_settings(config_dir: &Path) -> Result<PathBuf> {
  let settings_path = config_dir.join("settings.json");
  info!("Setting up assistant settings at {}", settings_path.display());

  fs::create_dir_all(config_dir).map_err(|e| ActionError::io(config_dir, e))?;

  let mut settings = load_settings(&settings_path);
  settings.insert("enableAllProjectMcpServers".to_string(), Value::Bool(true));

  let content = serde_json::to_string_pretty(&Value::Object(settings))?;
  fs::write(&settings_path, content).map_err(|e| ActionError::io(&settings_path, e))?;
  debug!("Settings saved with enableAllProjectMcpServers: true");

  Ok(settings_path)
}

/// Existing settings object, or an empty one when the file is missing,
/// empty, unreadable or not a JSON object
fn load_settings(path: &Path) -> Map<String, Value> {
  let content = match fs::read_to_string(path) {
    Ok(content) if !content.trim().is_empty() => content,
    _ => {
      debug!("No existing settings found, creating new settings");
      return Map::new();
    }
  };

  match serde_json::from_str::<Value>(&content) {
    Ok(Value::Object(map)) => map,
    _ => {
      debug!("Existing settings are not a JSON object, starting fresh");
      Map::new()
    }
  }
}
