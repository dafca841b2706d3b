//! # Tool Lists
//!
//! Composes the comma-joined tool allow and deny lists handed to the
//! assistant. User additions are appended after the base lists; a tool the
//! user explicitly allows is removed from the base deny list first, so an
//! allow always overrides a base deny.

/// Tools the assistant may always use
pub const BASE_ALLOWED_TOOLS: &[&str] = &[
  "Edit",
  "MultiEdit",
  "Glob",
  "Grep",
  "LS",
  "Read",
  "Write",
  "mcp__github_file_ops__commit_files",
  "mcp__github_file_ops__delete_files",
  "mcp__github_file_ops__update_claude_comment",
];

/// Tools denied unless the user explicitly allows them
pub const BASE_DISALLOWED_TOOLS: &[&str] = &["WebSearch", "WebFetch"];

/// Join names in order, keeping only the first occurrence of each
fn join_unique<'a>(tools: impl IntoIterator<Item = &'a str>) -> String {
  let mut seen: Vec<&str> = Vec::new();
  for tool in tools {
    if !seen.contains(&tool) {
      seen.push(tool);
    }
  }
  seen.join(",")
}

/// Build the allow list from the base list and user additions
pub fn build_allowed_tools_string(base: &[&str], custom_allowed: &[String]) -> String {
  join_unique(base.iter().copied().chain(custom_allowed.iter().map(String::as_str)))
}

/// Build the deny list from the base list and user additions, dropping base
/// entries the user explicitly allowed
pub fn build_disallowed_tools_string(base: &[&str], custom_disallowed: &[String], allowed: &[String]) -> String {
  let base = base.iter().copied().filter(|tool| !allowed.iter().any(|a| a == tool));
  join_unique(base.chain(custom_disallowed.iter().map(String::as_str)))
}

/// The exported allow list for this run
pub fn allowed_tools(custom_allowed: &[String]) -> String {
  build_allowed_tools_string(BASE_ALLOWED_TOOLS, custom_allowed)
}

/// The exported deny list for this run
pub fn disallowed_tools(custom_disallowed: &[String], allowed: &[String]) -> String {
  build_disallowed_tools_string(BASE_DISALLOWED_TOOLS, custom_disallowed, allowed)
}
